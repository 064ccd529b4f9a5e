//! Article image discovery.
//!
//! Finds the images that belong to the article body, preferring the
//! highest-quality source each `<img>` declares. Selector tiers are tried
//! in fixed priority order and the first tier that yields any accepted
//! candidate wins and tiers are never merged, since the generic fallback
//! would otherwise drown a page's featured figure in sidebar noise.
//!
//! Every tunable here (tier selectors, the attribute chain, the icon
//! threshold, the rejection pattern lists) is plain data on
//! [`HarvestPolicy`] rather than logic, so filter tuning never means code
//! changes.

use regex::Regex;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use crate::parse::{Document, Element};

/// Policy data driving image discovery and filtering.
#[derive(Debug, Clone)]
pub struct HarvestPolicy {
    /// Selector tiers in priority order; first tier with any accepted
    /// candidate wins.
    pub selector_tiers: Vec<Vec<String>>,
    /// Attributes that may carry a srcset, checked in order.
    pub srcset_attrs: Vec<String>,
    /// Single-URL attributes, checked in order when no srcset resolves.
    pub attr_chain: Vec<String>,
    /// Images with BOTH declared dimensions under these values are treated
    /// as icons. Missing dimensions never disqualify.
    pub min_icon_width: u32,
    pub min_icon_height: u32,
    /// URL substrings that mark tracking pixels, spacers, and ad paths.
    pub reject_url_substrings: Vec<String>,
    /// Regex over the URL for logo/icon/avatar/emoji file names.
    pub reject_url_pattern: String,
    /// Regex over the class attribute for widget/banner/ad prefixes.
    pub reject_class_pattern: String,
    /// Regex over the alt text for advertisement wording.
    pub reject_alt_pattern: String,
}

impl Default for HarvestPolicy {
    fn default() -> Self {
        let tier = |selectors: &[&str]| selectors.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            selector_tiers: vec![
                tier(&[
                    "figure.post-thumbnail img",
                    ".post-thumbnail img",
                    "figure img",
                    ".featured-image img",
                    ".wp-post-image",
                ]),
                tier(&[
                    "article img",
                    ".entry-content img",
                    ".post-content img",
                    ".article-content img",
                    ".content img",
                    "main img",
                    ".post img",
                    r#"[class*="content"] img"#,
                    r#"[class*="article"] img"#,
                    r#"[class*="post"] img"#,
                ]),
                tier(&["img"]),
            ],
            srcset_attrs: vec!["srcset".to_string(), "data-srcset".to_string()],
            attr_chain: [
                "data-full-url",
                "data-large-file",
                "data-original-src",
                "data-hires",
                "data-full-src",
                "src",
                "data-src",
                "data-lazy-src",
                "data-original",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            min_icon_width: 80,
            min_icon_height: 80,
            reject_url_substrings: ["tracking", "pixel", "spacer.", "blank.", "/logo/", "/icon/", "/widget/", "/ads/", "/ad-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            reject_url_pattern: r"/(logo|icon|avatar|emoji)s?\.".to_string(),
            reject_class_pattern: r"\b(logo-|icon-|widget-|banner-|ad-|sidebar-)".to_string(),
            reject_alt_pattern: r"\b(publicidade|anúncio|propaganda|advertisement)\b".to_string(),
        }
    }
}

/// Compiled form of the policy's pattern fields.
struct PolicyMatchers {
    url_pattern: Option<Regex>,
    class_pattern: Option<Regex>,
    alt_pattern: Option<Regex>,
}

impl PolicyMatchers {
    fn compile(policy: &HarvestPolicy) -> Self {
        Self {
            url_pattern: Regex::new(&policy.reject_url_pattern).ok(),
            class_pattern: Regex::new(&policy.reject_class_pattern).ok(),
            alt_pattern: Regex::new(&policy.reject_alt_pattern).ok(),
        }
    }
}

/// Discovers article image URLs from a parsed page.
///
/// Returns absolute URLs, de-duplicated, in first-seen order. An empty list
/// is a valid result.
pub fn harvest_image_urls(doc: &Document, base_url: &Url, policy: &HarvestPolicy) -> Vec<String> {
    let matchers = PolicyMatchers::compile(policy);

    for (tier_index, tier) in policy.selector_tiers.iter().enumerate() {
        let mut accepted: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for selector in tier {
            let Ok(elements) = doc.select(selector) else {
                continue;
            };
            for img in elements {
                let Some(url) = resolve_best_source(&img, base_url, policy) else {
                    continue;
                };
                if let Some(reason) = rejection_reason(&img, &url, policy, &matchers) {
                    debug!(url = %url, reason, "image candidate rejected");
                    continue;
                }
                if seen.insert(url.clone()) {
                    accepted.push(url);
                }
            }
        }

        if !accepted.is_empty() {
            debug!(tier = tier_index, count = accepted.len(), "images found");
            return accepted;
        }
    }

    debug!("no qualifying images on page");
    Vec::new()
}

/// Resolves the best-quality source URL for one `<img>` element.
///
/// A srcset entry with the largest declared width wins; otherwise the
/// attribute chain is walked in order.
fn resolve_best_source(img: &Element<'_>, base_url: &Url, policy: &HarvestPolicy) -> Option<String> {
    for attr in &policy.srcset_attrs {
        if let Some(srcset) = img.attr(attr)
            && let Some(best) = parse_srcset_largest(srcset, base_url)
        {
            return Some(best);
        }
    }

    for attr in &policy.attr_chain {
        if let Some(raw) = img.attr(attr) {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            if raw.starts_with("data:") {
                return None;
            }
            if let Some(resolved) = resolve_url(raw, base_url) {
                return Some(resolved);
            }
        }
    }

    None
}

/// Picks the srcset entry with the largest declared width.
///
/// Entries without a `<n>w` descriptor are ignored; density (`2x`)
/// descriptors carry no usable size information.
fn parse_srcset_largest(srcset: &str, base_url: &Url) -> Option<String> {
    let mut best_url: Option<String> = None;
    let mut best_width = 0u32;

    for chunk in srcset.split(',') {
        let part = chunk.trim();
        if part.is_empty() {
            continue;
        }
        let mut bits = part.split_whitespace();
        let Some(raw_url) = bits.next() else { continue };
        let Some(descriptor) = bits.next() else { continue };
        let Some(width) = descriptor
            .strip_suffix('w')
            .and_then(|w| w.parse::<u32>().ok())
        else {
            continue;
        };

        if width > best_width
            && let Some(resolved) = resolve_url(raw_url, base_url)
        {
            best_width = width;
            best_url = Some(resolved);
        }
    }

    best_url
}

/// Normalizes a raw source to an absolute http(s) URL against the base.
///
/// `Url::join` covers protocol-relative, root-relative, and relative forms.
fn resolve_url(raw: &str, base_url: &Url) -> Option<String> {
    let joined = base_url.join(raw.trim()).ok()?;
    if !matches!(joined.scheme(), "http" | "https") {
        return None;
    }
    Some(joined.to_string())
}

/// Checks one resolved candidate against the policy's filter rules.
///
/// Returns the rejection reason, or `None` when the image is accepted.
fn rejection_reason(
    img: &Element<'_>, url: &str, policy: &HarvestPolicy, matchers: &PolicyMatchers,
) -> Option<&'static str> {
    let lower_url = url.to_lowercase();

    if policy
        .reject_url_substrings
        .iter()
        .any(|s| lower_url.contains(s.as_str()))
    {
        return Some("tracking or ad path");
    }

    if let Some(re) = &matchers.url_pattern
        && re.is_match(&lower_url)
    {
        return Some("logo or icon file name");
    }

    if let Some(re) = &matchers.class_pattern
        && let Some(class) = img.attr("class")
        && re.is_match(&class.to_lowercase())
    {
        return Some("widget or banner class");
    }

    if let Some(re) = &matchers.alt_pattern
        && let Some(alt) = img.attr("alt")
        && re.is_match(&alt.to_lowercase())
    {
        return Some("advertisement alt text");
    }

    // Only declared dimensions disqualify; lazy-loaded images frequently
    // omit them entirely.
    if let (Some(width), Some(height)) = (dimension_attr(img, "width"), dimension_attr(img, "height"))
        && width > 0
        && height > 0
        && width < policy.min_icon_width
        && height < policy.min_icon_height
    {
        return Some("declared icon dimensions");
    }

    None
}

fn dimension_attr(img: &Element<'_>, name: &str) -> Option<u32> {
    img.attr(name)?.trim().trim_end_matches("px").parse::<u32>().ok()
}
