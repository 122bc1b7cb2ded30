//! Builds Europeana Search API parameters from a search state.
//!
//! The request is produced by folding an ordered chain of processors over an
//! [`ApiRequest`]. Each processor reads the search state and configuration
//! through the [`SearchBuilder`] and returns the updated request. Order
//! matters: later processors read and overwrite what earlier ones set.
//!
//! No processor fails. Blank or unknown input falls back to a default or is
//! skipped, so a malformed search never prevents a request from being sent.

use common::{
    api_params::{ApiParams, ParamValue},
    search_config::{FacetDefinition, IncludeInRequest, SearchConfig},
    search_const::{DEFAULT_ROWS, MATCH_ALL_QUERY, one_based_start},
    search_query::{QueryInput, SearchState},
};
use tracing::debug;

use crate::api::search::{
    facet_quoting::{STANDALONE_FACETS, is_standalone_facet, quote_facet_value},
    overlay_params::{OverlayFragment, OverlayParams},
};

/// Parameters accumulated during one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    pub params: ApiParams,
    pub overlay_params: OverlayParams,
}

pub type ProcessorFn = fn(ApiRequest, &SearchBuilder<'_>) -> ApiRequest;

#[derive(Clone, Copy)]
pub struct Processor {
    pub name: &'static str,
    pub run: ProcessorFn,
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name)
    }
}

pub const DEFAULT_PROCESSOR_CHAIN: [Processor; 12] = [
    Processor { name: "seed_defaults", run: seed_defaults },
    Processor { name: "select_profile", run: select_profile },
    Processor { name: "assemble_query", run: assemble_query },
    Processor { name: "append_filter_terms", run: append_filter_terms },
    Processor { name: "translate_facet_filters", run: translate_facet_filters },
    Processor { name: "translate_query_facets", run: translate_query_facets },
    Processor { name: "extract_standalone_facets", run: extract_standalone_facets },
    Processor { name: "declare_facets", run: declare_facets },
    Processor { name: "apply_paging", run: apply_paging },
    Processor { name: "apply_sort", run: apply_sort },
    Processor { name: "apply_endpoint_override", run: apply_endpoint_override },
    Processor { name: "flatten_overlays", run: flatten_overlays },
];

#[derive(Debug, Clone)]
pub struct SearchBuilder<'a> {
    config: &'a SearchConfig,
    state: &'a SearchState,
    rows: Option<u64>,
    start: Option<u64>,
    overlay_params: OverlayParams,
    processor_chain: Vec<Processor>,
}

impl<'a> SearchBuilder<'a> {
    pub fn new(config: &'a SearchConfig, state: &'a SearchState) -> Self {
        Self {
            config,
            state,
            rows: None,
            start: None,
            overlay_params: OverlayParams::new(),
            processor_chain: DEFAULT_PROCESSOR_CHAIN.to_vec(),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        self.config
    }

    pub fn state(&self) -> &SearchState {
        self.state
    }

    /// Explicit page size, taking precedence over the caller's `per_page`.
    pub fn with_rows(mut self, rows: u64) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Explicit 1-based start, taking precedence over the computed one.
    pub fn with_start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Adds parameters merged with, rather than replacing, any existing
    /// values under the same keys.
    pub fn with_overlay_params(mut self, fragment: OverlayFragment) -> Self {
        self.overlay_params.push(fragment);
        self
    }

    /// Drops the named processors from the chain.
    pub fn except(mut self, names: &[&str]) -> Self {
        self.processor_chain.retain(|processor| !names.contains(&processor.name));
        self
    }

    pub fn processor_chain(&self) -> Vec<&'static str> {
        self.processor_chain.iter().map(|processor| processor.name).collect()
    }

    pub fn to_api_request(&self) -> ApiRequest {
        let initial = ApiRequest { params: ApiParams::new(), overlay_params: self.overlay_params.clone() };
        self.processor_chain
            .iter()
            .fold(initial, |request, processor| (processor.run)(request, self))
    }

    pub fn to_params(&self) -> ApiParams {
        self.to_api_request().params
    }

    pub fn rows_or(&self, fallback: Option<u64>) -> u64 {
        self.rows.or(self.state.per_page).or(fallback).unwrap_or(DEFAULT_ROWS)
    }

    /// 1-based start, never below 1.
    pub fn start_for(&self, rows: u64) -> u64 {
        self.start
            .unwrap_or_else(|| one_based_start(self.state.page.unwrap_or(1), rows))
            .max(1)
    }

    /// Facets whose counts are requested from the API, in configured order.
    pub fn request_facet_fields(&self) -> impl Iterator<Item = &'a FacetDefinition> + '_ {
        self.config.facet_fields.iter().filter(move |facet| self.is_requestable(facet))
    }

    pub fn is_requestable(&self, facet: &FacetDefinition) -> bool {
        if facet.is_query_facet() {
            return false;
        }
        match facet.include_in_request {
            IncludeInRequest::Exclude => false,
            IncludeInRequest::Include | IncludeInRequest::Unset => self.config.add_facet_fields_to_request,
        }
    }

    /// Whether an applied query-style facet contributes its filter fragments.
    pub fn is_query_facet_applied(&self, facet: &FacetDefinition) -> bool {
        if !facet.is_query_facet() {
            return false;
        }
        match facet.include_in_request {
            IncludeInRequest::Include => true,
            IncludeInRequest::Exclude => false,
            IncludeInRequest::Unset => self.config.add_facet_fields_to_request,
        }
    }

    pub fn facet_limit_for(&self, facet: &FacetDefinition) -> Option<u64> {
        facet.limit.and_then(|limit| limit.resolve(self.config.default_facet_limit))
    }

    /// API field the query is scoped to by the selected search field.
    pub fn search_scope_field(&self) -> Option<&'a str> {
        let key = self.state.search_field.as_deref()?;
        let field = self.config.search_field(key)?.field.as_deref()?;
        if field.trim().is_empty() { None } else { Some(field) }
    }
}

fn seed_defaults(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    for (key, value) in builder.config.default_params.iter() {
        request.params.insert(key.clone(), value.clone());
    }
    request
}

fn select_profile(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    let profile = if builder.config.facet_fields.is_empty() { "params rich" } else { "params rich facets" };
    request.params.insert("profile", profile);
    request
}

fn assemble_query(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    let term = match builder.state.q.as_ref() {
        None => Some(MATCH_ALL_QUERY.to_string()),
        Some(q) if q.is_blank() => Some(MATCH_ALL_QUERY.to_string()),
        // Structured queries have no textual form for this API.
        Some(QueryInput::Fields(_)) => None,
        Some(QueryInput::Text(text)) => match builder.search_scope_field() {
            Some(field) => Some(format!("{field}:{text}")),
            None => Some(text.clone()),
        },
    };
    if let Some(term) = term {
        append_to_query(&mut request.params, &term);
    }
    request
}

fn append_to_query(params: &mut ApiParams, term: &str) {
    if term.trim().is_empty() {
        return;
    }
    let existing_blank = params.get("query").is_none_or(ParamValue::is_blank);
    let existing = params.get("query").map(ParamValue::to_string).unwrap_or_default();
    if term == MATCH_ALL_QUERY && !existing_blank {
        return;
    }
    let query = if existing_blank { format!("{existing}{term}") } else { format!("{existing} {term}") };
    params.insert("query", query);
}

fn append_filter_terms(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    if let Some(terms) = builder.state.qf.as_ref() {
        request.params.append_to_list("qf", terms.iter().cloned());
    }
    request
}

fn translate_facet_filters(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    for (field, values) in &builder.state.f {
        if is_standalone_facet(field) {
            continue;
        }
        if !builder.request_facet_fields().any(|facet| &facet.key == field) {
            debug!("Facet filter {} is not a requestable facet, skipping", field);
            continue;
        }
        request
            .params
            .append_to_list("qf", values.iter().map(|value| format!("{field}:{}", quote_facet_value(field, value))));
    }
    request
}

fn translate_query_facets(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    for (field, values) in &builder.state.f {
        let Some(facet) = builder.config.facet_field(field) else {
            continue;
        };
        if !builder.is_query_facet_applied(facet) {
            continue;
        }
        let Some(query) = facet.query.as_ref() else {
            continue;
        };
        for value in values.iter().filter(|value| !value.trim().is_empty()) {
            match query.get(value) {
                Some(item) => request.overlay_params.push(item.fq.clone()),
                None => debug!("Query facet {} has no item for value {:?}, skipping", field, value),
            }
        }
    }
    request
}

fn extract_standalone_facets(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    for field in STANDALONE_FACETS {
        if let Some(values) = builder.state.facet_values(field) {
            request.params.insert(field.to_lowercase(), values.join(","));
        }
    }
    request
}

fn declare_facets(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    let mut keys: Vec<&str> = Vec::new();
    for facet in builder.request_facet_fields() {
        if !keys.contains(&facet.key.as_str()) {
            keys.push(&facet.key);
        }
    }
    request.params.insert("facet", keys.join(","));

    for facet in builder.request_facet_fields() {
        if let Some(limit) = builder.facet_limit_for(facet) {
            request.params.insert(format!("f.{}.facet.limit", facet.field_name()), limit);
        }
    }
    request
}

fn apply_paging(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    let configured_rows = request
        .params
        .get("rows")
        .and_then(ParamValue::as_int)
        .and_then(|rows| u64::try_from(rows).ok());
    let rows = builder.rows_or(configured_rows);
    request.params.insert("rows", rows);

    request.params.insert("start", builder.start_for(rows));
    request
}

fn apply_sort(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    request.params.insert("sort", builder.state.sort.clone().unwrap_or_default());
    request
}

fn apply_endpoint_override(mut request: ApiRequest, builder: &SearchBuilder<'_>) -> ApiRequest {
    if let Some(api_url) = builder.state.api_url.as_ref() {
        request.params.insert("api_url", api_url.clone());
    }
    request
}

fn flatten_overlays(mut request: ApiRequest, _builder: &SearchBuilder<'_>) -> ApiRequest {
    let overlay_params = std::mem::take(&mut request.overlay_params);
    if !overlay_params.is_empty() {
        debug!("Merging {} overlay parameter sets", overlay_params.len());
    }
    overlay_params.flatten_into(&mut request.params);
    request
}
