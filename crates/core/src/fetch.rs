//! Source-page fetching.
//!
//! Retrieves the raw HTML of a news page. In the full deployment the page
//! arrives pre-rendered from a headless browser; this module is the direct
//! path used by the CLI and the place network failures are mapped onto the
//! caller-facing error taxonomy: unreachable host, missing page, and
//! access denied are distinct, actionable outcomes.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::{RecorteError, Result};

/// HTTP client configuration for fetching source pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent string; a browser-like value avoids trivial bot blocks.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

/// Fetches the HTML of a source page.
///
/// # Errors
///
/// - [`RecorteError::InvalidUrl`] for unparseable or non-http(s) URLs
/// - [`RecorteError::Timeout`] when the request exceeds the configured timeout
/// - [`RecorteError::UpstreamUnreachable`] for DNS/connection failures
/// - [`RecorteError::UpstreamNotFound`] for HTTP 404
/// - [`RecorteError::UpstreamAccessDenied`] for HTTP 401/403
pub async fn fetch_page(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = Url::parse(url).map_err(|e| RecorteError::InvalidUrl(e.to_string()))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(RecorteError::InvalidUrl(format!(
            "unsupported scheme '{}'; only http and https are allowed",
            parsed_url.scheme()
        )));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(RecorteError::HttpError)?;

    debug!(url, "fetching source page");

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7")
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                RecorteError::Timeout { timeout: config.timeout }
            } else if e.is_connect() || e.is_request() {
                RecorteError::UpstreamUnreachable(url.to_string())
            } else {
                RecorteError::HttpError(e)
            }
        })?;

    match response.status() {
        StatusCode::NOT_FOUND => return Err(RecorteError::UpstreamNotFound(url.to_string())),
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => {
            return Err(RecorteError::UpstreamAccessDenied(url.to_string()));
        }
        _ => {}
    }

    let content = response.text().await?;

    debug!(url, bytes = content.len(), "source page fetched");
    Ok(content)
}
