pub mod article;
pub mod assemble;
pub mod dates;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod headline;
pub mod images;
pub mod parse;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod scoring;

pub use article::ArticleDocument;
pub use assemble::assemble_document;
pub use dates::{format_date, resolve_published_date};
pub use error::{RecorteError, Result};
#[doc(hidden)]
pub use extract::ExtractedContent;
pub use extract::{ExtractConfig, extract_article};
pub use fetch::{FetchConfig, fetch_page};
pub use images::{
    HarvestPolicy, MaterializeConfig, MaterializedImage, harvest_image_urls, materialize_images,
};
pub use parse::Document;
pub use pipeline::{Pipeline, PipelineConfig, PipelineConfigBuilder, fetch_and_process, process};
pub use render::{Branding, PageMargins, page_margins, render_print_html};
pub use sanitize::{SanitizeConfig, sanitize_content, sanitize_content_with};
#[doc(hidden)]
pub use scoring::{ScoreConfig, ScoreResult, base_tag_score, calculate_score, content_density_score, link_density};
