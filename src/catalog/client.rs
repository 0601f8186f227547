use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;

use crate::models::{ArtworksResponse, RecordBatch};

use super::error::FetchError;

/// Anything that can turn a page index into a record batch. The production
/// implementation talks HTTP; tests swap in canned pages.
pub trait CatalogSource: Send + Sync {
    fn fetch_page(&self, page: u32) -> Result<RecordBatch, FetchError>;
}

/// Blocking HTTP client for the public artworks endpoint.
pub struct HttpCatalog {
    client: Client,
    api_base_url: String,
}

impl HttpCatalog {
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn page_url(&self, page: u32) -> String {
        page_url(&self.api_base_url, page)
    }
}

impl CatalogSource for HttpCatalog {
    fn fetch_page(&self, page: u32) -> Result<RecordBatch, FetchError> {
        let url = self.page_url(page);
        debug!(%url, "requesting catalog page");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport { page, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|source| FetchError::Transport { page, source })?;
        parse_page(page, &body)
    }
}

/// `{base}/artworks?page=P`
pub fn page_url(api_base_url: &str, page: u32) -> String {
    format!("{}/artworks?page={page}", api_base_url.trim_end_matches('/'))
}

/// Decode a listing body. A missing or non-array `data` field counts as a
/// malformed response.
pub fn parse_page(page: u32, body: &str) -> Result<RecordBatch, FetchError> {
    let response: ArtworksResponse =
        serde_json::from_str(body).map_err(|source| FetchError::Malformed { page, source })?;
    Ok(RecordBatch {
        page,
        records: response.data,
        pagination: response.pagination,
    })
}
