//! Recursive cleanup of extracted article markup.
//!
//! Extraction leaves behind lazy-load skeletons, embed containers, and
//! nested wrapper elements that become empty once their children are
//! removed. The sanitizer applies a fixed rule set repeatedly until a full
//! pass no longer changes the output length, so emptied wrappers exposed by
//! one pass are caught by the next.
//!
//! Rules:
//! - drop `<img>` tags with an empty or missing `src`
//! - drop `<iframe>` and `<noscript>` blocks entirely
//! - drop block elements whose content is only whitespace, `&nbsp;`, or
//!   line breaks
//! - collapse 3+ consecutive `<br>` tags to 2
//! - collapse 3+ consecutive blank lines to 1
//!
//! Every rule only removes or shrinks markup, so each pass is strictly
//! non-length-increasing and the loop converges.

use regex::Regex;

/// Block-level tags eligible for empty-element removal.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "figure", "picture", "span", "article", "header", "footer", "aside", "nav", "main",
];

/// Configuration for the sanitizer's convergence loop.
#[derive(Debug, Clone)]
pub struct SanitizeConfig {
    /// Upper bound on convergence passes. Convergence normally happens in
    /// as many passes as the deepest nesting of empty wrappers.
    pub max_passes: usize,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self { max_passes: 32 }
    }
}

/// Sanitizes an HTML fragment with the default pass bound.
pub fn sanitize_content(html: &str) -> String {
    sanitize_content_with(html, &SanitizeConfig::default())
}

/// Sanitizes an HTML fragment, applying the rule set until the output
/// length stops changing or `max_passes` is reached.
pub fn sanitize_content_with(html: &str, config: &SanitizeConfig) -> String {
    let img_re = Regex::new(r"<img[^>]*>").unwrap();
    let empty_src_re = Regex::new(r#"src\s*=\s*(?:""|'')"#).unwrap();
    let has_src_re = Regex::new(r"\bsrc\s*=").unwrap();
    let iframe_re = Regex::new(r"(?is)<iframe[^>]*>.*?</iframe\s*>").unwrap();
    let noscript_re = Regex::new(r"(?is)<noscript[^>]*>.*?</noscript\s*>").unwrap();
    let br_run_re = Regex::new(r"(?i)(?:<br\s*/?\s*>\s*){3,}").unwrap();
    let blank_lines_re = Regex::new(r"\n[ \t]*\n[ \t]*(?:\n[ \t]*)+").unwrap();

    // The regex crate has no backreferences, so empty-block matching is one
    // expression per tag rather than <(p|div|...)>...</\1>.
    let empty_block_res: Vec<Regex> = BLOCK_TAGS
        .iter()
        .map(|tag| {
            Regex::new(&format!(
                r"(?i)<{tag}(?:\s[^>]*)?>(?:\s|&nbsp;|<br\s*/?\s*>)*</{tag}\s*>"
            ))
            .unwrap()
        })
        .collect();

    let mut result = html.to_string();
    let mut previous_len = usize::MAX;
    let mut passes = 0;

    while result.len() != previous_len && passes < config.max_passes {
        previous_len = result.len();
        passes += 1;

        result = img_re
            .replace_all(&result, |caps: &regex::Captures| {
                let tag = caps.get(0).map(|m| m.as_str()).unwrap_or("");
                if !has_src_re.is_match(tag) || empty_src_re.is_match(tag) {
                    String::new()
                } else {
                    tag.to_string()
                }
            })
            .to_string();

        result = iframe_re.replace_all(&result, "").to_string();
        result = noscript_re.replace_all(&result, "").to_string();

        for re in &empty_block_res {
            result = re.replace_all(&result, "").to_string();
        }

        result = br_run_re.replace_all(&result, "<br><br>").to_string();
        result = blank_lines_re.replace_all(&result, "\n\n").to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_img_without_src() {
        let html = r#"<p>Text</p><img alt="broken"><img src="ok.jpg">"#;
        let result = sanitize_content(html);
        assert!(!result.contains("broken"));
        assert!(result.contains("ok.jpg"));
    }

    #[test]
    fn test_removes_img_with_empty_src() {
        let html = r#"<img src=""><img src=''><img src="real.png">"#;
        let result = sanitize_content(html);
        assert_eq!(result.matches("<img").count(), 1);
        assert!(result.contains("real.png"));
    }

    #[test]
    fn test_removes_iframe_and_noscript() {
        let html = r#"<p>Before</p><iframe src="https://ads.example"></iframe><noscript><img src="t.gif"></noscript><p>After</p>"#;
        let result = sanitize_content(html);
        assert!(!result.contains("iframe"));
        assert!(!result.contains("noscript"));
        assert!(result.contains("Before"));
        assert!(result.contains("After"));
    }

    #[test]
    fn test_removes_empty_blocks() {
        let html = r#"<p></p><div>   </div><figure>&nbsp;</figure><span><br></span><p>Kept</p>"#;
        let result = sanitize_content(html);
        assert!(!result.contains("<div>"));
        assert!(!result.contains("<figure>"));
        assert!(!result.contains("<span>"));
        assert_eq!(result.trim(), "<p>Kept</p>");
    }

    #[test]
    fn test_removes_nested_empty_wrappers() {
        // Inner removal empties the outer wrappers; only later passes see that.
        let html = r#"<div><section><figure><img src=""></figure></section></div><p>Real</p>"#;
        let result = sanitize_content(html);
        assert_eq!(result, "<p>Real</p>");
    }

    #[test]
    fn test_collapses_br_runs() {
        let html = "<p>a</p><br><br><br><br><p>b</p>";
        let result = sanitize_content(html);
        assert!(result.contains("<br><br>"));
        assert!(!result.contains("<br><br><br>"));
    }

    #[test]
    fn test_collapses_blank_lines() {
        let html = "<p>a</p>\n\n\n\n<p>b</p>";
        let result = sanitize_content(html);
        assert!(result.contains("\n\n"));
        assert!(!result.contains("\n\n\n"));
    }

    #[test]
    fn test_idempotent_on_clean_input() {
        let html = "<p>Plain paragraph.</p><p>Another, with an <a href=\"x\">inline link</a>.</p>";
        let once = sanitize_content(html);
        let twice = sanitize_content(&once);
        assert_eq!(once, html);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_idempotent_after_convergence() {
        let html = r#"<div><p></p><p>Kept, with text.</p><iframe src="e"></iframe></div>"#;
        let once = sanitize_content(html);
        let twice = sanitize_content(&once);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_never_increases_length() {
        let inputs = [
            "<p>short</p>",
            "<div><div><div></div></div></div>",
            "<br><br><br><br><br>",
            "<p>text</p>\n\n\n\n\n<p>more</p>",
        ];
        for input in inputs {
            let result = sanitize_content(input);
            assert!(result.len() <= input.len(), "grew for {:?}", input);
        }
    }

    #[test]
    fn test_preserves_non_empty_content() {
        let html = r#"<div class="wrapper"><p>Paragraph with content.</p></div>"#;
        let result = sanitize_content(html);
        assert_eq!(result, html);
    }

    #[test]
    fn test_pass_bound_respected() {
        let config = SanitizeConfig { max_passes: 1 };
        // One pass removes the figure; the now-empty section would need a
        // second pass, so it survives under this bound.
        let html = "<section><figure> </figure></section>";
        let result = sanitize_content_with(html, &config);
        assert!(result.contains("<section>"));
    }
}
