//! Search endpoint: builds the API request, sends it and wraps the payload.

use common::{search_config::SearchConfig, search_query::SearchState};

use crate::api::response::{Document, Response};
use crate::api::search::search_builder::SearchBuilder;
use crate::api_utils::europeana_utils::europeana_search;

pub async fn search_for_results<D: Document>(config: &SearchConfig, query: &SearchState) -> anyhow::Result<Response<D>> {
    let params = SearchBuilder::new(config, query).to_params();
    tracing::debug!("search params: {:?}", params);
    let payload = europeana_search(&params).await?;
    Ok(Response::new(payload, params))
}
