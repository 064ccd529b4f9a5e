//! Final document assembly.
//!
//! Merges the extractor output, the resolved date, and the materialized
//! images into one [`ArticleDocument`]. The downloaded images replace
//! whatever the extractor kept inline, because they are the highest-quality
//! variants: they are injected as a block right after the first paragraph
//! (or at the top when no paragraph boundary exists). Sanitization runs as
//! the last step, so the merged content honors the document invariants.

use tracing::debug;

use crate::article::ArticleDocument;
use crate::extract::ExtractedContent;
use crate::images::MaterializedImage;
use crate::sanitize::sanitize_content;
use crate::{RecorteError, Result};

/// Builds the final article document.
///
/// # Errors
///
/// Returns [`RecorteError::AssemblyFailed`] when the extractor yielded no
/// usable title. A title is mandatory for the print document.
pub fn assemble_document(
    extracted: ExtractedContent, published_date: Option<String>, images: &[MaterializedImage], source_url: &str,
) -> Result<ArticleDocument> {
    let title = extracted
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(RecorteError::AssemblyFailed)?
        .to_string();

    let content = if images.is_empty() {
        extracted.content
    } else {
        debug!(count = images.len(), "inserting downloaded images into content");
        insert_image_block(&extracted.content, images)
    };

    let content = sanitize_content(&content).trim().to_string();

    Ok(ArticleDocument {
        title,
        byline: extracted.byline,
        excerpt: extracted.excerpt,
        content,
        published_date,
        site_name: source_url.to_string(),
        source_url: source_url.to_string(),
    })
}

/// Injects the image block after the first closing `</p>`, or before all
/// content when no paragraph boundary exists.
fn insert_image_block(content: &str, images: &[MaterializedImage]) -> String {
    let block = images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            format!(
                r#"<img src="{}" style="width: 100%; height: auto; margin: 30px 0;" alt="Imagem {}" />"#,
                image.to_data_url(),
                index + 1
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    match content.find("</p>") {
        Some(end) => {
            let split = end + "</p>".len();
            format!("{}\n{}\n{}", &content[..split], block, &content[split..])
        }
        None => format!("{}\n{}", block, content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(title: Option<&str>, content: &str) -> ExtractedContent {
        ExtractedContent {
            title: title.map(str::to_string),
            byline: Some("Ana Reporter".to_string()),
            excerpt: None,
            content: content.to_string(),
            length: content.chars().count(),
        }
    }

    fn image() -> MaterializedImage {
        MaterializedImage {
            url: "https://site.com/img/a.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_missing_title_fails_assembly() {
        let result = assemble_document(extracted(None, "<p>Body</p>"), None, &[], "https://s.example");
        assert!(matches!(result, Err(RecorteError::AssemblyFailed)));
    }

    #[test]
    fn test_blank_title_fails_assembly() {
        let result = assemble_document(extracted(Some("   "), "<p>Body</p>"), None, &[], "https://s.example");
        assert!(matches!(result, Err(RecorteError::AssemblyFailed)));
    }

    #[test]
    fn test_no_images_leaves_content_unchanged() {
        let doc = assemble_document(
            extracted(Some("Title"), "<p>First.</p><p>Second.</p>"),
            None,
            &[],
            "https://s.example",
        )
        .unwrap();
        assert_eq!(doc.content, "<p>First.</p><p>Second.</p>");
        assert!(!doc.content.contains("data:"));
    }

    #[test]
    fn test_images_inserted_after_first_paragraph() {
        let doc = assemble_document(
            extracted(Some("Title"), "<p>First.</p><p>Second.</p>"),
            None,
            &[image()],
            "https://s.example",
        )
        .unwrap();

        let img_pos = doc.content.find("data:image/jpeg").unwrap();
        let first_p = doc.content.find("</p>").unwrap();
        let second_p = doc.content.rfind("<p>").unwrap();
        assert!(img_pos > first_p);
        assert!(img_pos < second_p);
    }

    #[test]
    fn test_images_prepended_without_paragraph_boundary() {
        let doc = assemble_document(
            extracted(Some("Title"), "<div>No paragraphs here at all.</div>"),
            None,
            &[image()],
            "https://s.example",
        )
        .unwrap();
        assert!(doc.content.starts_with("<img src=\"data:image/jpeg"));
    }

    #[test]
    fn test_merged_content_is_sanitized() {
        let doc = assemble_document(
            extracted(
                Some("Title"),
                "<p>Keep.</p><p></p><iframe src=\"x\"></iframe><img src=\"\">",
            ),
            None,
            &[image()],
            "https://s.example",
        )
        .unwrap();

        assert!(!doc.content.contains("iframe"));
        assert!(!doc.content.contains("<p></p>"));
        assert!(!doc.content.contains("src=\"\""));
        assert!(doc.content.contains("Keep."));
        assert!(doc.content.contains("data:image/jpeg"));
    }

    #[test]
    fn test_metadata_carried_through() {
        let doc = assemble_document(
            extracted(Some("  Title  "), "<p>Body.</p>"),
            Some("05/01/2024".to_string()),
            &[],
            "https://news.example/story",
        )
        .unwrap();

        assert_eq!(doc.title, "Title");
        assert_eq!(doc.byline, Some("Ana Reporter".to_string()));
        assert_eq!(doc.published_date, Some("05/01/2024".to_string()));
        assert_eq!(doc.site_name, "https://news.example/story");
        assert_eq!(doc.source_url, "https://news.example/story");
    }
}
