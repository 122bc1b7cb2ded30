pub mod response;
pub mod search;
