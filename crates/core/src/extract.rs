//! Article content extraction.
//!
//! The extractor isolates the primary article subtree from a full page.
//! Block-level candidates are scored (see [`crate::scoring`]), scores
//! propagate from text blocks to their ancestors so prose-dense containers
//! rise above their own paragraphs, and the highest-scoring subtree's
//! serialized HTML becomes the article body. Title, byline, and excerpt
//! come from the priority fallbacks in [`crate::headline`].
//!
//! Extraction is a pure function of the input document; the source DOM is
//! never modified.

use std::collections::HashMap;

use tracing::debug;

use crate::parse::{Document, Element};
use crate::scoring::{ScoreConfig, ScoreResult, calculate_score};
use crate::{RecorteError, Result};

/// Configuration for content extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Minimum score the top candidate must reach.
    pub min_score_threshold: f64,
    /// Minimum character count for typical content; candidates holding less
    /// than a tenth of this are not scored at all.
    pub char_threshold: usize,
    /// Maximum elements to scan before giving up on the rest of the page.
    pub max_elements: usize,
    /// Scoring configuration.
    pub score: ScoreConfig,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_score_threshold: 10.0,
            char_threshold: 500,
            max_elements: 1000,
            score: ScoreConfig::default(),
        }
    }
}

/// The result of content extraction.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Detected headline, when any source yields one.
    pub title: Option<String>,
    /// Detected author line.
    pub byline: Option<String>,
    /// Detected description or lead paragraph.
    pub excerpt: Option<String>,
    /// Serialized HTML of the winning subtree.
    pub content: String,
    /// Character length of the content.
    pub length: usize,
}

/// A candidate element with its (possibly boosted) score.
#[derive(Debug, Clone)]
struct Candidate<'a> {
    element: Element<'a>,
    score_result: ScoreResult,
}

impl<'a> Candidate<'a> {
    fn new(element: Element<'a>, score_result: ScoreResult) -> Self {
        Self { element, score_result }
    }

    fn score(&self) -> f64 {
        self.score_result.final_score
    }
}

/// Tags that are considered potential content containers.
const CANDIDATE_TAGS: &[&str] = &["div", "article", "section", "main", "p", "td", "blockquote"];

/// Tags whose scores propagate upward to their ancestors.
const TEXT_BLOCK_TAGS: &[&str] = &["p", "td", "blockquote"];

/// Extracts the main article content from a document.
///
/// # Errors
///
/// Returns [`RecorteError::ExtractionFailed`] when no candidate reaches the
/// minimum score threshold, meaning the page has no article-like content block.
pub fn extract_article(doc: &Document, config: &ExtractConfig) -> Result<ExtractedContent> {
    let mut candidates: HashMap<String, Candidate<'_>> = HashMap::new();
    let max_elements = if config.max_elements == 0 { usize::MAX } else { config.max_elements };
    let mut scanned = 0usize;

    for tag in CANDIDATE_TAGS {
        if let Ok(elements) = doc.select(tag) {
            for element in elements {
                if scanned >= max_elements {
                    break;
                }
                scanned += 1;

                let tag_name = element.tag_name();
                let text = element.text();
                if !matches!(tag_name.as_str(), "article" | "section" | "main")
                    && text.chars().count() < config.char_threshold / 10
                {
                    continue;
                }

                let score_result = calculate_score(&element, &config.score);
                candidates
                    .entry(candidate_key(&element))
                    .or_insert_with(|| Candidate::new(element, score_result));
            }
        }
    }

    propagate_scores(&mut candidates, &config.score);

    let mut ranked: Vec<Candidate<'_>> = candidates.into_values().collect();
    ranked.sort_by(|a, b| compare_candidates(b, a));

    let Some(top) = ranked.first() else {
        return Err(RecorteError::ExtractionFailed { score: 0.0, threshold: config.min_score_threshold });
    };

    if top.score() < config.min_score_threshold {
        return Err(RecorteError::ExtractionFailed { score: top.score(), threshold: config.min_score_threshold });
    }

    debug!(
        tag = %top.element.tag_name(),
        score = top.score(),
        "content candidate selected"
    );

    let content = top.element.outer_html();
    let length = content.chars().count();

    Ok(ExtractedContent {
        title: doc.extract_title(),
        byline: doc.extract_byline(),
        excerpt: doc.extract_excerpt(),
        content,
        length,
    })
}

/// Propagates text-block scores to their ancestors.
///
/// Parents receive half the block's score and grandparents a third, so the
/// container holding many good paragraphs outranks any single paragraph.
fn propagate_scores<'a>(candidates: &mut HashMap<String, Candidate<'a>>, score_config: &ScoreConfig) {
    let blocks: Vec<(Element<'a>, f64)> = candidates
        .values()
        .filter(|c| TEXT_BLOCK_TAGS.contains(&c.element.tag_name().as_str()))
        .map(|c| (c.element.clone(), c.score()))
        .collect();

    for (block, block_score) in blocks {
        if block_score <= 0.0 {
            continue;
        }

        if let Some(parent) = block.parent() {
            boost_candidate(candidates, &parent, block_score / 2.0, score_config);

            if let Some(grandparent) = parent.parent() {
                boost_candidate(candidates, &grandparent, block_score / 3.0, score_config);
            }
        }
    }
}

/// Adds `boost` to an ancestor's score, scoring it first if it was not
/// already a candidate.
fn boost_candidate<'a>(
    candidates: &mut HashMap<String, Candidate<'a>>, element: &Element<'a>, boost: f64, score_config: &ScoreConfig,
) {
    if matches!(element.tag_name().as_str(), "html" | "head") {
        return;
    }

    let key = candidate_key(element);
    let entry = candidates
        .entry(key)
        .or_insert_with(|| Candidate::new(element.clone(), calculate_score(element, score_config)));
    entry.score_result.final_score += boost;
}

/// Stable identity for an element: tag name plus a bounded prefix of its
/// serialized HTML.
fn candidate_key(element: &Element<'_>) -> String {
    let html = element.outer_html();
    let prefix: String = html.chars().take(200).collect();
    format!("{}-{}", element.tag_name(), prefix)
}

fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>) -> std::cmp::Ordering {
    let score_order = a.score().partial_cmp(&b.score()).unwrap_or(std::cmp::Ordering::Equal);
    if score_order != std::cmp::Ordering::Equal {
        return score_order;
    }

    let tag_order = candidate_priority(&a.element.tag_name()).cmp(&candidate_priority(&b.element.tag_name()));
    if tag_order != std::cmp::Ordering::Equal {
        return tag_order;
    }

    let a_len = a.element.text().chars().count();
    let b_len = b.element.text().chars().count();
    a_len.cmp(&b_len)
}

fn candidate_priority(tag_name: &str) -> u8 {
    match tag_name {
        "article" | "main" | "section" => 3,
        "div" => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE_PAGE: &str = r#"
        <html>
            <head><title>Big Story</title></head>
            <body>
                <div class="sidebar"><p>Short sidebar text with little substance here.</p></div>
                <article class="main-content">
                    <h1>Article Title</h1>
                    <p>This is a long paragraph with lots of content to ensure it meets the
                    character threshold. It continues with more text, more content, commas,
                    and even more text to increase the character count for the scoring pass.</p>
                    <p>Another paragraph with substantial content. It has multiple sentences,
                    commas for density, and enough text to be considered meaningful article
                    content by the scoring heuristic.</p>
                </article>
            </body>
        </html>
    "#;

    #[test]
    fn test_extracts_article_container() {
        let doc = Document::parse(ARTICLE_PAGE).unwrap();
        let extracted = extract_article(&doc, &ExtractConfig::default()).unwrap();

        assert!(extracted.content.contains("long paragraph"));
        assert!(extracted.content.contains("Another paragraph"));
        assert!(!extracted.content.contains("sidebar text"));
        assert_eq!(extracted.length, extracted.content.chars().count());
    }

    #[test]
    fn test_extracted_title() {
        let doc = Document::parse(ARTICLE_PAGE).unwrap();
        let extracted = extract_article(&doc, &ExtractConfig::default()).unwrap();
        assert_eq!(extracted.title, Some("Big Story".to_string()));
    }

    #[test]
    fn test_container_outranks_single_paragraph() {
        let doc = Document::parse(ARTICLE_PAGE).unwrap();
        let extracted = extract_article(&doc, &ExtractConfig::default()).unwrap();
        // Both paragraphs must land in the output, not just the best one.
        assert!(extracted.content.contains("<h1>"));
    }

    #[test]
    fn test_nav_only_page_fails_extraction() {
        let html = r##"
            <html>
                <body>
                    <nav class="menu">
                        <a href="#">Link 1</a><a href="#">Link 2</a><a href="#">Link 3</a>
                    </nav>
                    <div class="sidebar">
                        Sidebar with some links and navigation only.
                        <a href="#">Nav Link</a><a href="#">Another Link</a>
                    </div>
                </body>
            </html>
        "##;
        let doc = Document::parse(html).unwrap();
        let result = extract_article(&doc, &ExtractConfig::default());

        assert!(matches!(result, Err(RecorteError::ExtractionFailed { .. })));
        if let Err(RecorteError::ExtractionFailed { score, threshold }) = result {
            assert!(score < threshold);
        }
    }

    #[test]
    fn test_empty_page_fails_extraction() {
        let doc = Document::parse("<html><body></body></html>").unwrap();
        let result = extract_article(&doc, &ExtractConfig::default());
        assert!(matches!(result, Err(RecorteError::ExtractionFailed { .. })));
    }

    #[test]
    fn test_bare_paragraph_page_keeps_all_paragraphs() {
        let html = r#"
            <html><body>
                <p>First paragraph of a plain page, with commas, extra words, and a
                reasonable amount of text so that scoring registers the block, counts
                its characters, and treats the paragraph as genuine article prose.</p>
                <p>Second paragraph, also substantial, with more commas, details, and
                enough length to propagate score upward, so the shared parent element
                accumulates enough points to win over any single paragraph.</p>
                <p>Third paragraph, adding further prose, more commas, and additional
                characters, which pushes the parent container comfortably past the
                minimum score threshold used by the extraction heuristic.</p>
            </body></html>
        "#;
        let doc = Document::parse(html).unwrap();
        let extracted = extract_article(&doc, &ExtractConfig::default()).unwrap();

        assert!(extracted.content.contains("First paragraph"));
        assert!(extracted.content.contains("Second paragraph"));
        assert!(extracted.content.contains("Third paragraph"));
    }

    #[test]
    fn test_extraction_does_not_modify_source() {
        let doc = Document::parse(ARTICLE_PAGE).unwrap();
        let before = doc.select("article").unwrap()[0].outer_html();
        let _ = extract_article(&doc, &ExtractConfig::default()).unwrap();
        let after = doc.select("article").unwrap()[0].outer_html();
        assert_eq!(before, after);
    }
}
