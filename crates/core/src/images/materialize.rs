//! Image fetching and embedding.
//!
//! Harvested URLs are fetched concurrently (bounded in flight) with a
//! browser-like request profile and converted into embeddable payloads.
//! A failing image is logged and skipped; one bad URL never aborts the
//! batch, and the survivors keep their original relative order.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use futures::future::join_all;
use reqwest::Client;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Configuration for image materialization.
#[derive(Debug, Clone)]
pub struct MaterializeConfig {
    /// Per-request timeout in seconds.
    pub timeout: u64,
    /// Maximum concurrent fetches against the origin.
    pub max_in_flight: usize,
    /// User-Agent sent with every image request.
    pub user_agent: String,
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self {
            timeout: 15,
            max_in_flight: 4,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

/// A fetched image ready for embedding.
#[derive(Debug, Clone)]
pub struct MaterializedImage {
    /// The URL the image was fetched from.
    pub url: String,
    /// Declared content type of the response.
    pub content_type: String,
    /// Raw image bytes.
    pub data: Vec<u8>,
}

impl MaterializedImage {
    /// Encodes the image as a `data:` URL for inline embedding.
    pub fn to_data_url(&self) -> String {
        let encoded_capacity = base64::encoded_len(self.data.len(), false).unwrap_or(0);
        let mut encoded = String::with_capacity(encoded_capacity + 30 + self.content_type.len());

        encoded.push_str("data:");
        encoded.push_str(&self.content_type);
        encoded.push_str(";base64,");
        base64::engine::general_purpose::STANDARD.encode_string(&self.data, &mut encoded);

        encoded
    }
}

/// Fetches each URL and returns the successfully materialized images.
///
/// Output preserves the relative order of the input list; its length is at
/// most the input length. Per-URL failures (timeout, 4xx/5xx, body errors)
/// are logged and skipped.
pub async fn materialize_images(urls: &[String], config: &MaterializeConfig) -> Vec<MaterializedImage> {
    if urls.is_empty() {
        return Vec::new();
    }

    let client = match Client::builder().timeout(Duration::from_secs(config.timeout)).build() {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "could not build HTTP client; skipping all images");
            return Vec::new();
        }
    };

    let semaphore = Arc::new(Semaphore::new(config.max_in_flight.max(1)));

    let futures = urls.iter().map(|url| {
        let client = client.clone();
        let semaphore = Arc::clone(&semaphore);
        let user_agent = config.user_agent.clone();
        let url = url.clone();

        async move {
            let _permit = semaphore.acquire_owned().await.ok()?;
            fetch_one(&client, &url, &user_agent).await
        }
    });

    // join_all keeps result order aligned with the input; failures collapse
    // to None and drop out here.
    join_all(futures).await.into_iter().flatten().collect()
}

/// Fetches a single image with a browser-like header profile.
async fn fetch_one(client: &Client, url: &str, user_agent: &str) -> Option<MaterializedImage> {
    debug!(url, "fetching image");

    let response = client
        .get(url)
        .header("User-Agent", user_agent)
        .header("Accept", "image/avif,image/webp,image/apng,image/svg+xml,image/*,*/*;q=0.8")
        .header("Accept-Language", "pt-BR,pt;q=0.9,en-US;q=0.8,en;q=0.7")
        .header("Referer", url)
        .send()
        .await;

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!(url, error = %e, "image fetch failed; skipping");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(url, status = %response.status(), "image fetch rejected; skipping");
        return None;
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/jpeg")
        .to_string();

    let data = match response.bytes().await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            warn!(url, error = %e, "image body read failed; skipping");
            return None;
        }
    };

    if data.is_empty() {
        warn!(url, "image response was empty; skipping");
        return None;
    }

    debug!(url, bytes = data.len(), "image materialized");
    Some(MaterializedImage { url: url.to_string(), content_type, data })
}
