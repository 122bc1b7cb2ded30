//! Read-only view over one Europeana Search API payload.
//!
//! Derived values (documents, facets) are computed on first access and
//! cached for the lifetime of the response. Numeric fields are parsed
//! leniently: anything that is not an integer reads as 0.

mod facets;
mod pagination;

use std::sync::OnceLock;

use common::{
    api_params::{ApiParams, ParamValue},
    search_const::zero_based_offset,
    search_result::SearchResultFacets,
};
use serde::{Deserialize, Serialize};

/// Raw payload plus the parameters of the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseData {
    payload: serde_json::Value,
    request_params: ApiParams,
    params: ApiParams,
}

impl ResponseData {
    pub fn new(payload: serde_json::Value, request_params: ApiParams) -> Self {
        let params = match payload.get("params") {
            Some(serde_json::Value::Object(echoed)) => ApiParams::from_json_object(echoed),
            _ => request_params.clone(),
        };
        Self { payload, request_params, params }
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn request_params(&self) -> &ApiParams {
        &self.request_params
    }

    /// Parameters echoed by the API, or the request parameters when the
    /// payload carries none.
    pub fn params(&self) -> &ApiParams {
        &self.params
    }

    pub fn total(&self) -> i64 {
        match self.payload.get("totalResults") {
            Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(serde_json::Value::String(s)) => parse_integer(s),
            _ => 0,
        }
    }

    /// 0-based offset of the first document; -1 when the start is unknown.
    pub fn start(&self) -> i64 {
        zero_based_offset(param_integer(self.params.get("start")))
    }

    pub fn rows(&self) -> i64 {
        param_integer(self.params.get("rows"))
    }

    pub fn sort(&self) -> Option<&ParamValue> {
        self.params.get("sort")
    }

    fn records(&self) -> Vec<serde_json::Value> {
        if let Some(object) = self.payload.get("object") {
            return vec![object.clone()];
        }
        match self.payload.get("items") {
            Some(serde_json::Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        }
    }
}

fn parse_integer(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

fn param_integer(value: Option<&ParamValue>) -> i64 {
    match value {
        Some(ParamValue::Int(i)) => *i,
        Some(ParamValue::Text(s)) => parse_integer(s),
        Some(ParamValue::List(_)) | None => 0,
    }
}

/// A search result document built from one raw API record.
pub trait Document: Sized {
    fn from_record(record: serde_json::Value, response: &ResponseData) -> Self;

    /// Identifiers of the formats this document can be exported as.
    fn export_formats(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Default document model: the record's `id` plus its untouched fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: Option<String>,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl Document for RawDocument {
    fn from_record(record: serde_json::Value, _response: &ResponseData) -> Self {
        let fields = match record {
            serde_json::Value::Object(fields) => fields,
            _ => serde_json::Map::new(),
        };
        let id = fields.get("id").and_then(serde_json::Value::as_str).map(str::to_string);
        Self { id, fields }
    }
}

#[derive(Debug)]
pub struct Response<D: Document = RawDocument> {
    data: ResponseData,
    documents: OnceLock<Vec<D>>,
    facets: OnceLock<Vec<SearchResultFacets>>,
}

impl<D: Document> Response<D> {
    pub fn new(payload: serde_json::Value, request_params: ApiParams) -> Self {
        Self {
            data: ResponseData::new(payload, request_params),
            documents: OnceLock::new(),
            facets: OnceLock::new(),
        }
    }

    pub fn data(&self) -> &ResponseData {
        &self.data
    }

    pub fn params(&self) -> &ApiParams {
        self.data.params()
    }

    /// Documents from the singular `object` record if present, otherwise
    /// from the `items` list.
    pub fn documents(&self) -> &[D] {
        self.documents.get_or_init(|| {
            self.data
                .records()
                .into_iter()
                .map(|record| D::from_record(record, &self.data))
                .collect()
        })
    }

    pub fn total(&self) -> i64 {
        self.data.total()
    }

    pub fn start(&self) -> i64 {
        self.data.start()
    }

    pub fn rows(&self) -> i64 {
        self.data.rows()
    }

    pub fn sort(&self) -> Option<&ParamValue> {
        self.data.sort()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    // The API has no result grouping.
    pub fn grouped(&self) -> Vec<D> {
        Vec::new()
    }

    pub fn group(&self, _key: &str) -> Option<&D> {
        None
    }

    pub fn is_grouped(&self) -> bool {
        false
    }

    pub fn export_formats(&self) -> Vec<String> {
        let mut formats: Vec<String> = Vec::new();
        for format in self.documents().iter().flat_map(Document::export_formats) {
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        formats
    }
}
