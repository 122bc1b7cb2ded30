//! Facet counts from the payload's `facets` array:
//! `[{"name": "TYPE", "fields": [{"label": "IMAGE", "count": 10}]}]`.

use common::search_result::{SearchResultFacetItem, SearchResultFacets};
use tracing::debug;

use super::{Document, Response};

impl<D: Document> Response<D> {
    /// Facets in payload order. Malformed entries are skipped.
    pub fn aggregations(&self) -> &[SearchResultFacets] {
        self.facets.get_or_init(|| match self.data.payload().get("facets") {
            Some(serde_json::Value::Array(facets)) => facets.iter().filter_map(parse_facet).collect(),
            _ => Vec::new(),
        })
    }

    pub fn facet_by_field_name(&self, name: &str) -> Option<&SearchResultFacets> {
        self.aggregations().iter().find(|facet| facet.name == name)
    }
}

fn parse_facet(facet: &serde_json::Value) -> Option<SearchResultFacets> {
    let Some(name) = facet.get("name").and_then(serde_json::Value::as_str) else {
        debug!("Skipping facet without a name: {}", facet);
        return None;
    };
    let items = match facet.get("fields") {
        Some(serde_json::Value::Array(fields)) => fields.iter().filter_map(parse_facet_item).collect(),
        _ => Vec::new(),
    };
    Some(SearchResultFacets { name: name.to_string(), items })
}

fn parse_facet_item(item: &serde_json::Value) -> Option<SearchResultFacetItem> {
    let value = match item.get("label")? {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let hits = match item.get("count") {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    Some(SearchResultFacetItem { value, hits })
}
