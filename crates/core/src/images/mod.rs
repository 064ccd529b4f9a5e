//! Image discovery and materialization.

pub mod harvest;
pub mod materialize;

pub use harvest::{HarvestPolicy, harvest_image_urls};
pub use materialize::{MaterializeConfig, MaterializedImage, materialize_images};
