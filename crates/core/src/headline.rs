//! Title, byline, and excerpt detection.
//!
//! Each field is resolved through a fixed priority chain over JSON-LD,
//! meta tags, and visible elements. The first non-empty source wins.

use crate::parse::Document;

impl Document {
    /// Extract the headline with priority fallback:
    /// 1. JSON-LD `headline`
    /// 2. Open Graph `og:title`
    /// 3. Twitter `twitter:title`
    /// 4. `<title>` element
    /// 5. First `<h1>` element
    pub fn extract_title(&self) -> Option<String> {
        if let Some(json_ld) = self.extract_json_ld()
            && let Some(headline) = json_ld.get("headline")
            && let Some(value) = headline.as_str()
        {
            return Some(value.trim().to_string());
        }

        if let Some(title) = self.get_meta_content("og:title") {
            return Some(title);
        }

        if let Some(title) = self.get_meta_content("twitter:title") {
            return Some(title);
        }

        if let Some(title) = self.title() {
            let title = title.trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }

        if let Ok(elements) = self.select("h1")
            && let Some(first) = elements.first()
        {
            let text = first.text();
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }

        None
    }

    /// Extract the byline with priority fallback:
    /// 1. JSON-LD `author` (string, object, or array form)
    /// 2. Meta `author`
    /// 3. `[rel="author"]` link text
    /// 4. `[itemprop="author"]` text
    /// 5. Class patterns containing "author" or "byline"
    pub fn extract_byline(&self) -> Option<String> {
        if let Some(json_ld) = self.extract_json_ld()
            && let Some(author) = json_ld.get("author")
            && let Some(name) = author_name_from_json_ld(author)
        {
            return Some(name);
        }

        if let Some(author) = self.get_meta_content("author") {
            return Some(author);
        }

        for selector in ["[rel=\"author\"]", "[itemprop=\"author\"]"] {
            if let Ok(elements) = self.select(selector)
                && let Some(first) = elements.first()
            {
                let text = first.text();
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
        }

        for pattern in ["author", "byline"] {
            let selector = format!("[class*=\"{}\"]", pattern);
            if let Ok(elements) = self.select(&selector) {
                for el in elements.iter().take(3) {
                    let text = el.text();
                    let text = text.trim();
                    if !text.is_empty() && text.len() < 100 {
                        return Some(text.to_string());
                    }
                }
            }
        }

        None
    }

    /// Extract the excerpt with priority fallback:
    /// 1. JSON-LD `description`
    /// 2. Open Graph `og:description`
    /// 3. Meta `description`
    /// 4. First substantial paragraph, truncated to 300 characters
    pub fn extract_excerpt(&self) -> Option<String> {
        if let Some(json_ld) = self.extract_json_ld()
            && let Some(desc) = json_ld.get("description")
            && let Some(value) = desc.as_str()
        {
            return Some(value.trim().to_string());
        }

        if let Some(desc) = self.get_meta_content("og:description") {
            return Some(desc);
        }

        if let Some(desc) = self.get_meta_content("description") {
            return Some(desc);
        }

        if let Ok(elements) = self.select("p") {
            for el in elements.iter().take(5) {
                let text = el.text();
                let text = text.trim();
                if text.len() > 50 {
                    let excerpt = if text.len() > 300 {
                        let cut = text
                            .char_indices()
                            .take_while(|(i, _)| *i < 300)
                            .last()
                            .map(|(i, c)| i + c.len_utf8())
                            .unwrap_or(text.len());
                        format!("{}...", &text[..cut])
                    } else {
                        text.to_string()
                    };
                    return Some(excerpt);
                }
            }
        }

        None
    }

    /// Meta tag content by `name` or `property` attribute.
    pub(crate) fn get_meta_content(&self, attr: &str) -> Option<String> {
        for key in ["name", "property"] {
            let selector = format!("meta[{}=\"{}\"]", key, attr);
            if let Ok(elements) = self.select(&selector)
                && let Some(el) = elements.first()
                && let Some(content) = el.attr("content")
            {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }

        None
    }

    /// First parseable JSON-LD block from the document head or body.
    pub(crate) fn extract_json_ld(&self) -> Option<serde_json::Value> {
        if let Ok(elements) = self.select("script[type=\"application/ld+json\"]") {
            for el in elements.iter() {
                let text = el.text();
                let json_str = text.trim();
                if let Ok(value) = serde_json::from_str::<serde_json::Value>(json_str) {
                    return Some(value);
                }
            }
        }
        None
    }
}

/// Author name from a JSON-LD author field, which appears as a bare string,
/// a Person object, or an array of either.
fn author_name_from_json_ld(author: &serde_json::Value) -> Option<String> {
    if let Some(name) = author.as_str() {
        return Some(name.to_string());
    }

    if let Some(obj) = author.as_object()
        && let Some(name) = obj.get("name")
        && let Some(name_str) = name.as_str()
    {
        return Some(name_str.to_string());
    }

    if let Some(arr) = author.as_array()
        && let Some(first) = arr.first()
    {
        return author_name_from_json_ld(first);
    }

    None
}
