//! Candidate scoring for article content detection.
//!
//! Block-level elements are scored by tag semantics, class/id hints, text
//! density, and link density. The extractor keeps the highest-scoring
//! subtree as the article body.

use crate::parse::Element;
use regex::Regex;

/// Configuration for the content scoring heuristic.
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Weight for positive class/ID patterns
    pub positive_weight: f64,
    /// Weight for negative class/ID patterns
    pub negative_weight: f64,
    /// Maximum content density score from character count
    pub max_char_density_score: f64,
    /// Maximum content density score from comma count
    pub max_comma_density_score: f64,
    /// Characters per point for content density scoring
    pub chars_per_point: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            positive_weight: 25.0,
            negative_weight: -25.0,
            max_char_density_score: 3.0,
            max_comma_density_score: 3.0,
            chars_per_point: 100,
        }
    }
}

/// Result of scoring an element.
#[derive(Debug, Clone)]
pub struct ScoreResult {
    /// The element's tag name
    pub tag_name: String,
    /// Base score from tag type
    pub base_score: f64,
    /// Weight adjustment from class/ID patterns
    pub class_weight: f64,
    /// Content density score
    pub content_density: f64,
    /// Link density (0.0 to 1.0)
    pub link_density: f64,
    /// Final calculated score
    pub final_score: f64,
}

/// Base score for an element from its tag name.
///
/// Tags that usually wrap article prose score positive; navigation,
/// header/footer, and list chrome score negative:
/// - ARTICLE: +10, SECTION: +8, MAIN: +8, DIV: +5
/// - TD, BLOCKQUOTE: +3
/// - FORM, ADDRESS, OL, UL, DL, DD, DT, LI: -3
/// - H1-H6, TH, HEADER, FOOTER, NAV, ASIDE: -5
pub fn base_tag_score(element: &Element<'_>) -> f64 {
    match element.tag_name().as_str() {
        "article" => 10.0,
        "section" | "main" => 8.0,
        "div" => 5.0,
        "td" | "blockquote" => 3.0,
        "form" | "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" | "aside" => -5.0,
        _ => 0.0,
    }
}

/// Positive patterns that suggest an element contains the article body
const POSITIVE_PATTERNS: &str = r"(?i)(article|body|content|entry|hentry|main|news|page|post|story|text|materia|noticia)";

/// Negative patterns that suggest an element is page chrome, not content
const NEGATIVE_PATTERNS: &str = r"(?i)(banner|breadcrumbs?|combx|comment|community|disqus|extra|foot|header|menu|newsletter|related|remark|rss|share|shoutbox|sidebar|social|sponsor|ad-break|agegate|pagination|pager|popup|promo|widget)";

/// Class/ID weight adjustment for an element.
///
/// Returns `positive_weight` when the id or any class token matches a
/// positive pattern, `negative_weight` on a negative match, 0.0 otherwise.
/// The id is checked before classes and positive matches win within each.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let positive_regex = Regex::new(POSITIVE_PATTERNS).unwrap();
    let negative_regex = Regex::new(NEGATIVE_PATTERNS).unwrap();

    if let Some(id) = element.attr("id") {
        if positive_regex.is_match(id) {
            return config.positive_weight;
        }
        if negative_regex.is_match(id) {
            return config.negative_weight;
        }
    }

    if let Some(class) = element.attr("class") {
        for class_name in class.split_whitespace() {
            if positive_regex.is_match(class_name) {
                return config.positive_weight;
            }
            if negative_regex.is_match(class_name) {
                return config.negative_weight;
            }
        }
    }

    0.0
}

/// Content density score from text length and comma count.
///
/// More text and more commas both indicate prose rather than navigation.
pub fn content_density_score(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let text = element.text();
    let char_score = ((text.chars().count() / config.chars_per_point) as f64).min(config.max_char_density_score);
    let comma_count = text.matches(',').count();
    let comma_score = (comma_count as f64).min(config.max_comma_density_score);

    char_score + comma_score
}

/// Ratio of link text characters to total text characters.
///
/// Returns 0.0 (no links) to 1.0 (all text inside links).
pub fn link_density(element: &Element<'_>) -> f64 {
    let text = element.text();
    let text_length = text.chars().count();

    if text_length == 0 {
        return 0.0;
    }

    let link_text_length = element
        .select("a")
        .unwrap_or_default()
        .iter()
        .map(|link| link.text().chars().count())
        .sum::<usize>();

    link_text_length as f64 / text_length as f64
}

/// Final score for an element.
///
/// Combines base tag score, class/ID weight, and content density, then
/// multiplies by a link-density penalty. The penalty is halved for elements
/// that carry a positive content pattern or hold substantial prose, so a
/// long article with inline links is not mistaken for a menu.
pub fn calculate_score(element: &Element<'_>, config: &ScoreConfig) -> ScoreResult {
    let tag_name = element.tag_name();
    let base_score = base_tag_score(element);
    let class_weight = class_id_weight(element, config);
    let content_density = content_density_score(element, config);
    let ld = link_density(element);
    let raw_score = base_score + class_weight + content_density;

    let text_length = element.text().chars().count();
    let has_positive_pattern = class_weight > 0.0;
    let is_content_rich = text_length > 500;

    let link_penalty = if has_positive_pattern || is_content_rich { 1.0 - (ld * 0.5) } else { 1.0 - ld };

    let final_score = raw_score * link_penalty;

    ScoreResult { tag_name, base_score, class_weight, content_density, link_density: ld, final_score }
}
