//! Search request building and route entry point.

mod search_for_results;
pub use search_for_results::search_for_results;

pub mod facet_quoting;
pub mod overlay_params;
pub mod search_builder;
