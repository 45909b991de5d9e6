use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("font catalog API key is not configured")]
    MissingApiKey,

    #[error("font catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("font catalog answered {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontFamily {
    pub family: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    items: Vec<FontFamily>,
}

/// Fetches the web-font listing and keeps only family and variants.
pub async fn fetch_catalog(
    client: &Client,
    url: &str,
    api_key: Option<&str>,
) -> Result<Vec<FontFamily>, CatalogError> {
    let api_key = api_key.ok_or(CatalogError::MissingApiKey)?;

    let response = client
        .get(url)
        .query(&[("key", api_key)])
        .timeout(CATALOG_TIMEOUT)
        .send()
        .await
        // The request URL carries the key; keep it out of logged errors.
        .map_err(|e| CatalogError::Request(e.without_url()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Status(status));
    }

    let body: CatalogResponse = response
        .json()
        .await
        .map_err(|e| CatalogError::Request(e.without_url()))?;
    Ok(body.items)
}
