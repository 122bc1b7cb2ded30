//! Caller-supplied search state.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api_params::ParamValue;


/// Free-text query, or a structured field→value mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryInput {
    Text(String),
    Fields(IndexMap<String, String>),
}

impl QueryInput {
    pub fn is_blank(&self) -> bool {
        match self {
            QueryInput::Text(text) => text.trim().is_empty(),
            QueryInput::Fields(fields) => fields.is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchState {
    pub q: Option<QueryInput>,
    /// Applied facet filters. A single value is stored as a one-element list.
    #[serde(deserialize_with = "deserialize_facet_filters")]
    pub f: IndexMap<String, Vec<String>>,
    /// Key of the configured search field scoping the query.
    pub search_field: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_count")]
    pub page: Option<u64>,
    #[serde(deserialize_with = "deserialize_lenient_count")]
    pub per_page: Option<u64>,
    pub sort: Option<String>,
    /// Pre-formed filter terms passed through verbatim.
    pub qf: Option<Vec<String>>,
    pub api_url: Option<String>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        self.q = Some(QueryInput::Text(q.into()));
        self
    }

    pub fn with_structured_query(mut self, fields: IndexMap<String, String>) -> Self {
        self.q = Some(QueryInput::Fields(fields));
        self
    }

    pub fn with_facet<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.f
            .entry(field.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    pub fn with_search_field(mut self, search_field: impl Into<String>) -> Self {
        self.search_field = Some(search_field.into());
        self
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_filter_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.qf
            .get_or_insert_with(Vec::new)
            .extend(terms.into_iter().map(Into::into));
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn facet_values(&self, field: &str) -> Option<&[String]> {
        self.f.get(field).map(Vec::as_slice)
    }
}

/// Facet values may arrive as one scalar or a list of scalars. Numbers and
/// booleans are kept as their text form; nulls and nested objects are dropped.
fn deserialize_facet_filters<'de, D>(deserializer: D) -> Result<IndexMap<String, Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let serde_json::Value::Object(raw) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(IndexMap::new());
    };
    Ok(raw
        .into_iter()
        .filter_map(|(field, values)| {
            ParamValue::from_json(&values).map(|values| (field, values.into_list()))
        })
        .collect())
}

/// Page numbers and sizes are often sent as strings. Anything that is not a
/// non-negative integer reads as unset.
fn deserialize_lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_facet_value_becomes_list() {
        let state: SearchState = serde_json::from_str(
            r#"{"q": "cats", "f": {"MEDIA": "true", "TYPE": ["IMAGE", "TEXT"]}, "page": 2}"#,
        )
        .unwrap();
        assert_eq!(state.facet_values("MEDIA"), Some(&["true".to_string()][..]));
        assert_eq!(state.facet_values("TYPE").map(<[String]>::len), Some(2));
        assert_eq!(state.page, Some(2));
        assert_eq!(state.q, Some(QueryInput::Text("cats".to_string())));
    }

    #[test]
    fn test_string_paging_is_parsed() {
        let state: SearchState =
            serde_json::from_str(r#"{"q": "cats", "page": "2", "per_page": " 10 "}"#).unwrap();
        assert_eq!(state.page, Some(2));
        assert_eq!(state.per_page, Some(10));
    }

    #[test]
    fn test_invalid_paging_is_unset() {
        let state: SearchState =
            serde_json::from_str(r#"{"q": "cats", "page": "two", "per_page": -5}"#).unwrap();
        assert_eq!(state.page, None);
        assert_eq!(state.per_page, None);
        assert_eq!(state.q, Some(QueryInput::Text("cats".to_string())));

        let state: SearchState = serde_json::from_str(r#"{"page": null, "per_page": [10]}"#).unwrap();
        assert_eq!(state.page, None);
        assert_eq!(state.per_page, None);
    }

    #[test]
    fn test_scalar_facet_values_are_stringified() {
        let state: SearchState = serde_json::from_str(
            r#"{"f": {"YEAR": [1900, "2000"], "MEDIA": true, "PROVIDER": null, "COUNTRY": {"a": 1}}}"#,
        )
        .unwrap();
        assert_eq!(state.facet_values("YEAR").unwrap(), ["1900", "2000"]);
        assert_eq!(state.facet_values("MEDIA").unwrap(), ["true"]);
        assert!(state.facet_values("PROVIDER").is_none());
        assert!(state.facet_values("COUNTRY").is_none());
    }

    #[test]
    fn test_non_object_facets_are_ignored() {
        let state: SearchState = serde_json::from_str(r#"{"q": "cats", "f": "TYPE"}"#).unwrap();
        assert!(state.f.is_empty());
    }

    #[test]
    fn test_structured_query_deserializes() {
        let state: SearchState = serde_json::from_str(r#"{"q": {"title": "paris"}}"#).unwrap();
        assert!(matches!(state.q, Some(QueryInput::Fields(_))));
        assert!(!state.q.unwrap().is_blank());
    }

    #[test]
    fn test_blank_queries() {
        assert!(QueryInput::Text("   ".to_string()).is_blank());
        assert!(QueryInput::Fields(IndexMap::new()).is_blank());
    }

    #[test]
    fn test_with_facet_accumulates() {
        let state = SearchState::new()
            .with_facet("TYPE", ["IMAGE"])
            .with_facet("TYPE", ["SOUND"]);
        assert_eq!(state.facet_values("TYPE").unwrap(), ["IMAGE", "SOUND"]);
    }
}
