use common::api_params::{ApiParams, ParamValue};

pub const DEFAULT_EUROPEANA_API_URL: &str = "https://api.europeana.eu/record/v2/search.json";

pub fn get_europeana_api_url() -> String {
    std::env::var("EUROPEANA_API_URL").unwrap_or(DEFAULT_EUROPEANA_API_URL.to_string())
}

/// Splits the `api_url` override off the parameters. Returns the endpoint
/// to call and the remaining query-string pairs.
pub fn split_endpoint(params: &ApiParams, default_url: String) -> (String, Vec<(String, String)>) {
    let mut params = params.clone();
    let url = match params.remove("api_url") {
        Some(ParamValue::Text(url)) if !url.trim().is_empty() => url,
        _ => default_url,
    };
    (url, params.to_query_pairs())
}

pub async fn europeana_search(params: &ApiParams) -> anyhow::Result<serde_json::Value> {
    let (url, query) = split_endpoint(params, get_europeana_api_url());
    tracing::info!("SEARCH REQUEST: {} ({} params)", url, query.len());
    let t0 = std::time::Instant::now();

    let client = reqwest::Client::new();
    let response = client.get(&url).query(&query).send().await?;
    let status = response.status();
    let response_txt = response.text().await?;
    if status.is_client_error() || status.is_server_error() {
        anyhow::bail!("Error: {}: {}", status, response_txt);
    }
    let dt_ms = t0.elapsed().as_millis();
    tracing::info!("SEARCH RESPONSE: len = {} ({}ms)", response_txt.len(), dt_ms);

    let response: serde_json::Value = serde_json::from_str(&response_txt)?;
    Ok(response)
}
