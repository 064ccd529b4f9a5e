//! The canonical article document produced by the pipeline.
//!
//! [`ArticleDocument`] is the single output type of an extraction request:
//! cleaned content plus the metadata the print renderer needs. It is built
//! once by the assembler, never mutated afterwards, and consumed exactly
//! once by the rendering step.

use serde::Serialize;

/// The complete, print-ready representation of one news article.
///
/// Invariants established by assembly:
/// - `title` is non-empty,
/// - `content` contains no empty block elements, no images without a
///   resolvable `src`, and no `<iframe>`/`<noscript>` blocks,
/// - `published_date` is `DD/MM/YYYY` when the source date was parseable,
///   otherwise the raw best-effort string from the page.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleDocument {
    /// Article headline.
    pub title: String,

    /// Author line, when one was detected.
    pub byline: Option<String>,

    /// Short description or lead paragraph, when one was detected.
    pub excerpt: Option<String>,

    /// Sanitized article body as an HTML fragment.
    pub content: String,

    /// Publication date, normalized to `DD/MM/YYYY` where possible.
    pub published_date: Option<String>,

    /// Origin identifier shown in the document footer (the source URL).
    pub site_name: String,

    /// URL the article was extracted from.
    pub source_url: String,
}

impl ArticleDocument {
    /// Length of the content fragment in characters.
    pub fn length(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArticleDocument {
        ArticleDocument {
            title: "Headline".to_string(),
            byline: Some("Ana Reporter".to_string()),
            excerpt: None,
            content: "<p>Body text.</p>".to_string(),
            published_date: Some("05/01/2024".to_string()),
            site_name: "https://news.example/story".to_string(),
            source_url: "https://news.example/story".to_string(),
        }
    }

    #[test]
    fn test_length_counts_chars() {
        let doc = sample();
        assert_eq!(doc.length(), doc.content.chars().count());
    }

    #[test]
    fn test_serialization() {
        let doc = sample();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains(r#""title":"Headline""#));
        assert!(json.contains(r#""byline":"Ana Reporter""#));
        assert!(json.contains(r#""published_date":"05/01/2024""#));
        assert!(json.contains(r#""source_url":"https://news.example/story""#));
    }
}
