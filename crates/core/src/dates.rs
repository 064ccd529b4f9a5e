//! Publication-date resolution.
//!
//! News pages declare dates in several competing conventions. Resolution
//! tries each source in strict priority order and returns the first
//! non-empty match:
//!
//! 1. published-date meta tags
//! 2. JSON-LD blocks carrying `datePublished`/`publishedDate`
//! 3. visible date elements, `datetime` attribute first, then text
//!
//! Whatever text is found is normalized to `DD/MM/YYYY` when it parses as a
//! calendar date; otherwise the trimmed raw text is kept. A page with no
//! date at all resolves to `None`, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::debug;

use crate::parse::Document;

/// Meta-tag selectors checked first, in order.
const META_SELECTORS: &[&str] = &[
    r#"meta[property="article:published_time"]"#,
    r#"meta[property="og:published_time"]"#,
    r#"meta[name="publish_date"]"#,
    r#"meta[name="pubdate"]"#,
    r#"meta[name="date"]"#,
    r#"meta[property="datePublished"]"#,
];

/// Visible-element selectors checked last, in order.
const DATE_SELECTORS: &[&str] = &[
    "time[datetime]",
    ".entry-date",
    ".post-date",
    ".published",
    ".date",
    ".article-date",
    r#"[class*="date"]"#,
    r#"[class*="time"]"#,
];

/// Textual date formats attempted after the machine-readable ones.
const TEXT_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%B %d, %Y", "%d %B %Y"];

/// Resolves the publication date of a page.
///
/// Returns the normalized date string, or `None` when no source yields any
/// text.
pub fn resolve_published_date(doc: &Document) -> Option<String> {
    for selector in META_SELECTORS {
        if let Ok(elements) = doc.select(selector)
            && let Some(meta) = elements.first()
            && let Some(content) = meta.attr("content")
            && !content.trim().is_empty()
        {
            debug!(selector = *selector, content, "date found in meta tag");
            return Some(format_date(content));
        }
    }

    if let Ok(scripts) = doc.select(r#"script[type="application/ld+json"]"#) {
        for script in scripts {
            let text = script.text();
            let Ok(value) = serde_json::from_str::<serde_json::Value>(text.trim()) else {
                continue;
            };
            if let Some(date) = value
                .get("datePublished")
                .or_else(|| value.get("publishedDate"))
                .and_then(|d| d.as_str())
                && !date.trim().is_empty()
            {
                debug!(date, "date found in JSON-LD");
                return Some(format_date(date));
            }
        }
    }

    for selector in DATE_SELECTORS {
        if let Ok(elements) = doc.select(selector)
            && let Some(element) = elements.first()
        {
            let text = element.text();
            let datetime = element.attr("datetime").map(str::to_string).unwrap_or(text);
            if !datetime.trim().is_empty() {
                debug!(selector = *selector, value = %datetime.trim(), "date found in page element");
                return Some(format_date(&datetime));
            }
        }
    }

    debug!("no publication date found");
    None
}

/// Normalizes a raw date string to `DD/MM/YYYY`.
///
/// Parsing order: RFC 3339 / RFC 2822, bare ISO date and datetime, then the
/// textual formats (numeric forms are read day-first). If nothing parses, a
/// `dd/mm/yyyy`-shaped substring is zero-padded; failing that, the trimmed
/// input is returned unchanged.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.format("%d/%m/%Y").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return dt.format("%d/%m/%Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return dt.format("%d/%m/%Y").to_string();
        }
    }
    for fmt in TEXT_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return date.format("%d/%m/%Y").to_string();
        }
    }

    let slash_re = Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap();
    if let Some(caps) = slash_re.captures(trimmed) {
        return format!("{:0>2}/{:0>2}/{}", &caps[1], &caps[2], &caps[3]);
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-01-05", "05/01/2024")]
    #[case("2024-01-15T10:30:00Z", "15/01/2024")]
    #[case("2024-01-15T10:30:00-03:00", "15/01/2024")]
    #[case("2024-01-15T10:30:00", "15/01/2024")]
    #[case("7/3/2024", "07/03/2024")]
    #[case("07/03/2024", "07/03/2024")]
    #[case("March 7, 2024", "07/03/2024")]
    #[case("7 March 2024", "07/03/2024")]
    #[case("publicado em 7/3/2024 às 10h", "07/03/2024")]
    fn test_format_date(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_date(input), expected);
    }

    #[test]
    fn test_format_date_unparseable_returns_trimmed_raw() {
        assert_eq!(format_date("  yesterday afternoon  "), "yesterday afternoon");
    }

    #[test]
    fn test_meta_tag_wins_over_json_ld() {
        let html = r#"
            <html><head>
            <meta property="article:published_time" content="2024-01-05">
            <script type="application/ld+json">{"datePublished": "2024-06-06"}</script>
            </head><body></body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(resolve_published_date(&doc), Some("05/01/2024".to_string()));
    }

    #[test]
    fn test_json_ld_when_no_meta() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">{"datePublished": "2024-06-06"}</script>
            </head><body></body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(resolve_published_date(&doc), Some("06/06/2024".to_string()));
    }

    #[test]
    fn test_malformed_json_ld_skipped_not_fatal() {
        let html = r#"
            <html><head>
            <script type="application/ld+json">{ broken</script>
            <script type="application/ld+json">{"datePublished": "2024-02-01"}</script>
            </head><body></body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(resolve_published_date(&doc), Some("01/02/2024".to_string()));
    }

    #[test]
    fn test_time_element_datetime_attr_preferred() {
        let html = r#"
            <html><body>
            <time datetime="2024-03-20T14:00:00Z">20 de março de 2024</time>
            </body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(resolve_published_date(&doc), Some("20/03/2024".to_string()));
    }

    #[test]
    fn test_visible_element_text_fallback() {
        let html = r#"<html><body><span class="post-date">12/11/2023</span></body></html>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(resolve_published_date(&doc), Some("12/11/2023".to_string()));
    }

    #[test]
    fn test_no_date_resolves_to_none() {
        let html = "<html><body><p>No dates here.</p></body></html>";
        let doc = Document::parse(html).unwrap();
        assert_eq!(resolve_published_date(&doc), None);
    }
}
