//! The document handed to the external PDF renderer.
//!
//! The pipeline's output is an [`ArticleDocument`]; this module turns it
//! into the deterministic HTML document the headless renderer rasterizes,
//! and derives the page-margin configuration from the customer's branding
//! assets. Branding never touches content; its presence only changes the
//! margins that make room for header/footer artwork.

use std::path::Path;

use base64::Engine;
use serde::Serialize;

use crate::article::ArticleDocument;

/// Customer branding artwork, loaded as opaque byte blobs.
#[derive(Debug, Clone, Default)]
pub struct Branding {
    /// Header artwork (PNG bytes), shown at the top of every page.
    pub header: Option<Vec<u8>>,
    /// Footer artwork (PNG bytes), shown at the bottom of every page.
    pub footer: Option<Vec<u8>>,
}

impl Branding {
    /// Loads `header.png` and `footer.png` from a customer directory.
    ///
    /// Missing files are treated as absent artwork, not errors, since a customer
    /// may brand only one edge of the page.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            header: std::fs::read(dir.join("header.png")).ok(),
            footer: std::fs::read(dir.join("footer.png")).ok(),
        }
    }

    /// Header artwork as a `data:` URL for the renderer's header template.
    pub fn header_data_url(&self) -> Option<String> {
        self.header.as_deref().map(png_data_url)
    }

    /// Footer artwork as a `data:` URL for the renderer's footer template.
    pub fn footer_data_url(&self) -> Option<String> {
        self.footer.as_deref().map(png_data_url)
    }
}

fn png_data_url(bytes: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Page margins for the renderer, as CSS length strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMargins {
    pub top: String,
    pub bottom: String,
    pub left: String,
    pub right: String,
}

/// Derives page margins from branding presence.
///
/// Header artwork narrows the top margin to `85px`, footer artwork the
/// bottom to `65px`; unbranded edges keep the default `20mm`.
pub fn page_margins(branding: &Branding) -> PageMargins {
    PageMargins {
        top: if branding.header.is_some() { "85px".to_string() } else { "20mm".to_string() },
        bottom: if branding.footer.is_some() { "65px".to_string() } else { "20mm".to_string() },
        left: "20mm".to_string(),
        right: "20mm".to_string(),
    }
}

/// Renders the print HTML document for an article.
///
/// The output is self-contained: images arrive embedded as `data:` URLs in
/// the content, and the stylesheet hides any residual empty elements or
/// src-less images as a second line of defense behind the sanitizer.
pub fn render_print_html(article: &ArticleDocument) -> String {
    let byline = article
        .byline
        .as_deref()
        .map(|b| format!("<p class=\"byline\">Por {}</p>", escape_html(b)))
        .unwrap_or_default();
    let date = article
        .published_date
        .as_deref()
        .map(|d| format!("<div class=\"metadata\"><span>{}</span></div>", escape_html(d)))
        .unwrap_or_default();
    let excerpt = article
        .excerpt
        .as_deref()
        .map(|e| format!("<div class=\"excerpt\">{}</div>", escape_html(e)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
      line-height: 1.8;
      color: #333;
      background: #fff;
      padding: 20px 40px;
    }}
    .article-header {{ margin-bottom: 40px; padding-bottom: 20px; border-bottom: 3px solid #2563eb; }}
    h1 {{ font-size: 36px; font-weight: 700; color: #1e293b; margin-bottom: 16px; line-height: 1.3; }}
    .metadata {{ font-size: 14px; color: #64748b; margin-top: 12px; }}
    .byline {{ font-style: italic; color: #475569; margin-bottom: 8px; }}
    .excerpt {{ font-size: 18px; color: #475569; margin-bottom: 30px; font-weight: 500; line-height: 1.6; }}
    article img {{ width: 100%; height: auto; margin: 30px 0; border-radius: 8px; }}
    article p:empty,
    article div:empty,
    article section:empty,
    article figure:empty,
    article picture:empty,
    img[src=""],
    img:not([src]) {{
      display: none !important;
      margin: 0 !important;
      padding: 0 !important;
      height: 0 !important;
    }}
    article p {{ margin-bottom: 20px; font-size: 16px; text-align: justify; }}
    article h2 {{ font-size: 24px; font-weight: 600; color: #1e293b; margin-top: 40px; margin-bottom: 16px; }}
    article h3 {{ font-size: 20px; font-weight: 600; color: #334155; margin-top: 30px; margin-bottom: 12px; }}
    article ul, article ol {{ margin: 20px 0; padding-left: 30px; }}
    article blockquote {{ border-left: 4px solid #2563eb; padding-left: 20px; margin: 30px 0; font-style: italic; color: #475569; }}
    article a {{ color: #2563eb; text-decoration: none; border-bottom: 1px solid #93c5fd; }}
    .article-footer {{ margin-top: 60px; padding-top: 30px; border-top: 2px solid #e2e8f0; font-size: 14px; color: #64748b; text-align: center; }}
    .source-link {{ display: block; margin-top: 10px; word-break: break-all; }}
    @media print {{ body {{ padding: 20px; }} }}
  </style>
</head>
<body>
    <header class="article-header">
      <h1>{title}</h1>
      {byline}
      {date}
    </header>

    {excerpt}

    <article>
      {content}
    </article>

    <footer class="article-footer">
      <p><strong>Fonte original:</strong></p>
      <a href="{source_url}" class="source-link">{source_url}</a>
    </footer>
</body>
</html>"#,
        title = escape_html(&article.title),
        byline = byline,
        date = date,
        excerpt = excerpt,
        content = article.content,
        source_url = escape_html(&article.source_url),
    )
}

/// Escapes text for interpolation into HTML attribute/element positions.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article() -> ArticleDocument {
        ArticleDocument {
            title: "Headline & More".to_string(),
            byline: Some("Ana".to_string()),
            excerpt: Some("Lead text.".to_string()),
            content: "<p>Body.</p>".to_string(),
            published_date: Some("05/01/2024".to_string()),
            site_name: "https://news.example/story".to_string(),
            source_url: "https://news.example/story".to_string(),
        }
    }

    #[test]
    fn test_render_includes_all_sections() {
        let html = render_print_html(&article());
        assert!(html.contains("Headline &amp; More"));
        assert!(html.contains("Por Ana"));
        assert!(html.contains("05/01/2024"));
        assert!(html.contains("Lead text."));
        assert!(html.contains("<p>Body.</p>"));
        assert!(html.contains("https://news.example/story"));
    }

    #[test]
    fn test_render_omits_absent_sections() {
        let mut doc = article();
        doc.byline = None;
        doc.excerpt = None;
        doc.published_date = None;

        let html = render_print_html(&doc);
        assert!(!html.contains("class=\"byline\""));
        assert!(!html.contains("class=\"excerpt\""));
        assert!(!html.contains("class=\"metadata\""));
    }

    #[test]
    fn test_margins_without_branding() {
        let margins = page_margins(&Branding::default());
        assert_eq!(margins.top, "20mm");
        assert_eq!(margins.bottom, "20mm");
    }

    #[test]
    fn test_margins_with_branding() {
        let branding = Branding { header: Some(vec![1]), footer: Some(vec![2]) };
        let margins = page_margins(&branding);
        assert_eq!(margins.top, "85px");
        assert_eq!(margins.bottom, "65px");
        assert_eq!(margins.left, "20mm");
        assert_eq!(margins.right, "20mm");
    }

    #[test]
    fn test_margins_with_header_only() {
        let branding = Branding { header: Some(vec![1]), footer: None };
        let margins = page_margins(&branding);
        assert_eq!(margins.top, "85px");
        assert_eq!(margins.bottom, "20mm");
    }

    #[test]
    fn test_branding_data_urls() {
        let branding = Branding { header: Some(vec![1, 2, 3]), footer: None };
        assert_eq!(branding.header_data_url(), Some("data:image/png;base64,AQID".to_string()));
        assert_eq!(branding.footer_data_url(), None);
    }

    #[test]
    fn test_branding_from_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let branding = Branding::from_dir(dir.path());
        assert!(branding.header.is_none());
        assert!(branding.footer.is_none());
    }

    #[test]
    fn test_branding_from_dir_loads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("header.png"), [9, 9]).unwrap();
        let branding = Branding::from_dir(dir.path());
        assert_eq!(branding.header, Some(vec![9, 9]));
        assert!(branding.footer.is_none());
    }
}
