//! Common library exports shared by the search pipeline and response adapter.

extern crate serde;


pub mod api_params;
pub mod search_config;
pub mod search_const;
pub mod search_query;
pub mod search_result;
