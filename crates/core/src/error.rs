//! Error types for recorte operations.
//!
//! This module defines the main error type [`RecorteError`] which represents
//! all possible errors that can occur while fetching a page, extracting its
//! article content, and assembling the final document.
//!
//! # Example
//!
//! ```rust
//! use recorte_core::{RecorteError, Result};
//!
//! fn check_page(html: &str) -> Result<()> {
//!     if html.is_empty() {
//!         return Err(RecorteError::ExtractionFailed { score: 0.0, threshold: 10.0 });
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Main error type for the article pipeline.
///
/// Whole-pipeline failures (no content, no title, source unreachable) abort
/// the request with a specific, user-actionable message. Per-item failures
/// (a single image fetch, a single date source) are absorbed where they
/// occur and never surface through this enum.
#[derive(Error, Debug)]
pub enum RecorteError {
    /// The content heuristic found no viable article on the page.
    ///
    /// Returned when no candidate element reaches the minimum score
    /// threshold. Typical for pages that are only navigation, ads, or
    /// link lists.
    #[error("could not isolate article content (score {score:.1} below threshold {threshold:.1})")]
    ExtractionFailed { score: f64, threshold: f64 },

    /// The extracted article has no usable title.
    ///
    /// A title is mandatory for the final document; assembly refuses to
    /// produce an untitled article.
    #[error("article has no title; cannot assemble document")]
    AssemblyFailed,

    /// The source page could not be reached at the network level.
    ///
    /// DNS failures, refused connections, and similar transport problems.
    #[error("could not reach the source page: {0}")]
    UpstreamUnreachable(String),

    /// The source page does not exist (HTTP 404).
    #[error("source page not found: {0}")]
    UpstreamNotFound(String),

    /// The source site refused the request (HTTP 401/403).
    ///
    /// Some sites block automated clients; the caller may retry with
    /// manually supplied content instead.
    #[error("access denied by the source site: {0}")]
    UpstreamAccessDenied(String),

    /// Request timeout.
    #[error("request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, usually an invalid CSS selector.
    #[error("failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Other HTTP request errors from reqwest.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// File I/O errors (branding assets, output files).
    #[error("I/O error: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Result type alias for RecorteError.
pub type Result<T> = std::result::Result<T, RecorteError>;
