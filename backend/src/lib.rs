//! Europeana Search API request building and response adaptation.

pub mod api;
pub mod api_utils;
