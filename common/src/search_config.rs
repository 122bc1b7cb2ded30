//! Search configuration: default API parameters, facet and search field
//! definitions. Consumed read-only by the request pipeline.

use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::api_params::{ApiParams, ParamValue};

/// Per-facet override of the global "request facet fields" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum IncludeInRequest {
    #[default]
    Unset,
    Include,
    Exclude,
}

impl From<Option<bool>> for IncludeInRequest {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => IncludeInRequest::Unset,
            Some(true) => IncludeInRequest::Include,
            Some(false) => IncludeInRequest::Exclude,
        }
    }
}

impl From<IncludeInRequest> for Option<bool> {
    fn from(value: IncludeInRequest) -> Self {
        match value {
            IncludeInRequest::Unset => None,
            IncludeInRequest::Include => Some(true),
            IncludeInRequest::Exclude => Some(false),
        }
    }
}

/// Facet result-count limit: `true` means "use the configured default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetLimit {
    Flag(bool),
    Count(u64),
}

impl FacetLimit {
    pub fn resolve(self, default_limit: Option<u64>) -> Option<u64> {
        match self {
            FacetLimit::Flag(true) => default_limit,
            FacetLimit::Flag(false) => None,
            FacetLimit::Count(count) => Some(count),
        }
    }
}

/// One selectable value of a query-style facet and the parameters it adds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetQueryItem {
    pub label: Option<String>,
    pub fq: IndexMap<String, ParamValue>,
}

impl FacetQueryItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: Some(label.into()), fq: IndexMap::new() }
    }

    pub fn with_fq(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.fq.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetDefinition {
    /// Name the facet is configured and applied under.
    pub key: String,
    /// API field name, when it differs from `key`.
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub limit: Option<FacetLimit>,
    #[serde(default)]
    pub query: Option<IndexMap<String, FacetQueryItem>>,
    #[serde(default)]
    pub include_in_request: IncludeInRequest,
}

impl FacetDefinition {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field: None,
            label: None,
            limit: None,
            query: None,
            include_in_request: IncludeInRequest::Unset,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_limit(mut self, limit: FacetLimit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_query_item(mut self, value: impl Into<String>, item: FacetQueryItem) -> Self {
        self.query.get_or_insert_with(IndexMap::new).insert(value.into(), item);
        self
    }

    pub fn with_include_in_request(mut self, include: IncludeInRequest) -> Self {
        self.include_in_request = include;
        self
    }

    pub fn field_name(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.key)
    }

    pub fn is_query_facet(&self) -> bool {
        self.query.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFieldDefinition {
    pub key: String,
    /// API field the query is scoped to; `None` searches all fields.
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl SearchFieldDefinition {
    pub fn new(key: impl Into<String>, field: Option<&str>) -> Self {
        Self { key: key.into(), field: field.map(str::to_string), label: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_params: ApiParams,
    pub facet_fields: Vec<FacetDefinition>,
    pub search_fields: Vec<SearchFieldDefinition>,
    pub default_facet_limit: Option<u64>,
    pub add_facet_fields_to_request: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_params: ApiParams::new(),
            facet_fields: Vec::new(),
            search_fields: Vec::new(),
            default_facet_limit: None,
            add_facet_fields_to_request: true,
        }
    }
}

impl SearchConfig {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse search config")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read search config {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn with_default_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.default_params.insert(key, value);
        self
    }

    pub fn with_facet(mut self, facet: FacetDefinition) -> Self {
        self.facet_fields.push(facet);
        self
    }

    pub fn with_search_field(mut self, search_field: SearchFieldDefinition) -> Self {
        self.search_fields.push(search_field);
        self
    }

    pub fn facet_field(&self, key: &str) -> Option<&FacetDefinition> {
        self.facet_fields.iter().find(|facet| facet.key == key)
    }

    pub fn search_field(&self, key: &str) -> Option<&SearchFieldDefinition> {
        self.search_fields.iter().find(|field| field.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_json() {
        let config = SearchConfig::from_json_str(
            r#"{
                "default_params": {"wskey": "demo", "rows": 24},
                "facet_fields": [
                    {"key": "TYPE", "limit": true},
                    {"key": "PROVIDER", "limit": 50, "include_in_request": false},
                    {"key": "YEAR", "query": {
                        "1900s": {"label": "1900-1999", "fq": {"qf": "YEAR:[1900 TO 1999]"}}
                    }}
                ],
                "search_fields": [{"key": "title", "field": "title"}],
                "default_facet_limit": 7
            }"#,
        )
        .unwrap();

        assert!(config.add_facet_fields_to_request);
        assert_eq!(config.default_params.get("rows"), Some(&ParamValue::Int(24)));
        let type_facet = config.facet_field("TYPE").unwrap();
        assert_eq!(type_facet.limit.unwrap().resolve(config.default_facet_limit), Some(7));
        assert_eq!(type_facet.include_in_request, IncludeInRequest::Unset);
        assert_eq!(
            config.facet_field("PROVIDER").unwrap().include_in_request,
            IncludeInRequest::Exclude
        );
        let year = config.facet_field("YEAR").unwrap();
        assert!(year.is_query_facet());
        assert_eq!(
            year.query.as_ref().unwrap()["1900s"].fq.get("qf"),
            Some(&ParamValue::from("YEAR:[1900 TO 1999]"))
        );
        assert_eq!(config.search_field("title").unwrap().field.as_deref(), Some("title"));
    }

    #[test]
    fn test_field_name_falls_back_to_key() {
        assert_eq!(FacetDefinition::new("TYPE").field_name(), "TYPE");
        assert_eq!(FacetDefinition::new("what").with_field("proxy_dc_type").field_name(), "proxy_dc_type");
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let err = SearchConfig::from_json_file("/nonexistent/search-config.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read search config"));
    }
}
