//! The article pipeline.
//!
//! Ties the stages together: parse → extract → (date, images) → materialize
//! → assemble. This is the main entry point of the crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use recorte_core::Pipeline;
//!
//! # async fn example() -> recorte_core::Result<()> {
//! let pipeline = Pipeline::new();
//! let article = pipeline.fetch_and_process("https://news.example/story").await?;
//! println!("{}", article.title);
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use crate::article::ArticleDocument;
use crate::assemble::assemble_document;
use crate::dates::resolve_published_date;
use crate::extract::{ExtractConfig, extract_article};
use crate::fetch::{FetchConfig, fetch_page};
use crate::images::{HarvestPolicy, MaterializeConfig, harvest_image_urls, materialize_images};
use crate::parse::Document;
use crate::{RecorteError, Result};

/// Configuration for the whole pipeline.
///
/// Each stage keeps its own config; this struct only aggregates them.
///
/// # Example
///
/// ```rust
/// use recorte_core::PipelineConfig;
///
/// let config = PipelineConfig::builder()
///     .max_images_in_flight(2)
///     .image_timeout(10)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Content extraction settings.
    pub extract: ExtractConfig,
    /// Image discovery policy.
    pub harvest: HarvestPolicy,
    /// Image fetching settings.
    pub materialize: MaterializeConfig,
    /// Source-page fetching settings.
    pub fetch: FetchConfig,
}

impl PipelineConfig {
    /// Creates a new builder for PipelineConfig.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }
}

/// Builder for [`PipelineConfig`].
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: PipelineConfig::default() }
    }

    /// Sets the minimum extraction score threshold.
    pub fn min_score(mut self, value: f64) -> Self {
        self.config.extract.min_score_threshold = value;
        self
    }

    /// Sets the character threshold for content candidates.
    pub fn char_threshold(mut self, value: usize) -> Self {
        self.config.extract.char_threshold = value;
        self
    }

    /// Replaces the image discovery policy.
    pub fn harvest_policy(mut self, value: HarvestPolicy) -> Self {
        self.config.harvest = value;
        self
    }

    /// Sets the maximum concurrent image fetches.
    pub fn max_images_in_flight(mut self, value: usize) -> Self {
        self.config.materialize.max_in_flight = value;
        self
    }

    /// Sets the per-image fetch timeout in seconds.
    pub fn image_timeout(mut self, value: u64) -> Self {
        self.config.materialize.timeout = value;
        self
    }

    /// Sets the source-page fetch timeout in seconds.
    pub fn fetch_timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The article extraction and normalization pipeline.
///
/// A `Pipeline` holds only configuration; every call is independent and
/// stateless, so one instance can serve concurrent requests. Dropping the
/// returned future cancels the whole request; no partial document is ever
/// produced.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Creates a pipeline with default settings.
    pub fn new() -> Self {
        Self { config: PipelineConfig::default() }
    }

    /// Creates a pipeline with a custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline over already-rendered page HTML.
    ///
    /// # Errors
    ///
    /// - [`RecorteError::InvalidUrl`] when `url` cannot be parsed
    /// - [`RecorteError::ExtractionFailed`] when no article content is found
    /// - [`RecorteError::AssemblyFailed`] when the article has no title
    pub async fn process(&self, html: &str, url: &str) -> Result<ArticleDocument> {
        // The DOM stage is synchronous and completes before any await so
        // the Document (which is not Send) never crosses a suspension
        // point.
        let (extracted, published_date, image_urls) = {
            let doc = Document::parse_with_url(html, url)?;

            let extracted = extract_article(&doc, &self.config.extract)?;
            let published_date = resolve_published_date(&doc);

            let base_url = doc
                .base_url()
                .cloned()
                .ok_or_else(|| RecorteError::InvalidUrl(url.to_string()))?;
            let image_urls = harvest_image_urls(&doc, &base_url, &self.config.harvest);

            (extracted, published_date, image_urls)
        };

        debug!(
            urls = image_urls.len(),
            date = published_date.as_deref().unwrap_or("none"),
            "page analyzed"
        );

        let images = materialize_images(&image_urls, &self.config.materialize).await;

        assemble_document(extracted, published_date, &images, url)
    }

    /// Fetches a page and runs the pipeline over it.
    pub async fn fetch_and_process(&self, url: &str) -> Result<ArticleDocument> {
        let html = fetch_page(url, &self.config.fetch).await?;
        self.process(&html, url).await
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the default pipeline over rendered HTML.
///
/// Convenience wrapper around [`Pipeline::process`].
pub async fn process(html: &str, url: &str) -> Result<ArticleDocument> {
    Pipeline::new().process(html, url).await
}

/// Fetches a URL and runs the default pipeline over the response.
///
/// Convenience wrapper around [`Pipeline::fetch_and_process`].
pub async fn fetch_and_process(url: &str) -> Result<ArticleDocument> {
    Pipeline::new().fetch_and_process(url).await
}
