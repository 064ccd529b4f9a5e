//! HTML parsing and DOM querying.
//!
//! This module provides the [`Document`] and [`Element`] types used by the
//! extractor, the date resolver, and the image harvester to navigate a page
//! with CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use recorte_core::parse::Document;
//!
//! let html = r#"<html><body><h1>Title</h1><p class="lead">Text</p></body></html>"#;
//! let doc = Document::parse(html).unwrap();
//! let leads = doc.select("p.lead").unwrap();
//! assert_eq!(leads[0].text(), "Text");
//! ```

use scraper::{Html, Selector};
use url::Url;

use crate::{RecorteError, Result};

/// A parsed HTML page, optionally anchored to its source URL.
///
/// The base URL is what relative image sources are resolved against; parse
/// with [`Document::parse_with_url`] whenever the page origin is known.
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string with no base URL.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: None })
    }

    /// Parses HTML and records the page's source URL as the base for
    /// relative-URL resolution.
    ///
    /// # Errors
    ///
    /// Returns [`RecorteError::InvalidUrl`] if `url` cannot be parsed.
    pub fn parse_with_url(html: &str, url: &str) -> Result<Self> {
        let base_url = Url::parse(url).map_err(|e| RecorteError::InvalidUrl(e.to_string()))?;
        let html = Html::parse_document(html);
        Ok(Self { html, base_url: Some(base_url) })
    }

    /// The base URL this document was parsed with, if any.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RecorteError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| RecorteError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Content of the `<title>` element, if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Concatenation of all text nodes in the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

/// A wrapper around scraper's ElementRef.
///
/// Represents a single node in the document tree and exposes the attribute,
/// text, and sub-query operations the pipeline needs.
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// HTML content inside this element, excluding its own tags.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// HTML content including this element's own tags.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Value of an attribute, or `None` if absent.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Parent element, or `None` at the tree root.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element
            .parent()
            .and_then(scraper::ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`RecorteError::HtmlParseError`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel =
            Selector::parse(selector).map_err(|e| RecorteError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }
}
