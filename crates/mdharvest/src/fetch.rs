//! HTTP page fetching

use crate::error::HarvestError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::debug;

/// Descriptive client identifier sent with every request
pub const DEFAULT_USER_AGENT: &str = "Everruns MdHarvest/1.0 (documentation harvester)";

/// Total request timeout
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Accept header favoring textual content we can convert
const ACCEPT_HEADER: &str = "text/html, text/markdown, text/plain, */*;q=0.8";

/// HTTP client for fetching source pages
///
/// One client is built per run and reused across URLs.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build the fetch client with default headers and timeout
    pub fn new() -> Result<Self, HarvestError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| HarvestError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// GET a URL and return the body as text
    ///
    /// Timeouts, connection failures, and non-2xx statuses all fail with
    /// the underlying cause in the message.
    pub async fn fetch_page(&self, url: &str) -> Result<String, HarvestError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(HarvestError::extraction(
                url,
                "invalid URL: must start with http:// or https://",
            ));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HarvestError::extraction(url, describe_transport_error(&e)))?;

        let response = response.error_for_status().map_err(|e| {
            let status = e
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            HarvestError::extraction(url, format!("HTTP status {}", status))
        })?;

        debug!(url, status = response.status().as_u16(), "fetched page");

        response
            .text()
            .await
            .map_err(|e| HarvestError::extraction(url, format!("failed to read body: {}", e)))
    }
}

/// Turn a reqwest failure into an operator-readable cause
fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out after 30 seconds".to_string()
    } else if e.is_connect() {
        format!("failed to connect: {}", e)
    } else {
        format!("request failed: {}", e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_http_scheme() {
        let fetcher = PageFetcher::new().unwrap();
        let err = fetcher.fetch_page("ftp://example.com/file").await.unwrap_err();
        assert!(err.to_string().contains("http:// or https://"));
    }

    #[tokio::test]
    async fn test_connect_failure_reported() {
        let fetcher = PageFetcher::new().unwrap();
        // Port 1 should refuse the connection immediately
        let err = fetcher.fetch_page("http://127.0.0.1:1/").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:1"));
        assert!(msg.starts_with("Extraction failed"));
    }
}
