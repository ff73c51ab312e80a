//! The create-post flow and the image importer it delegates to.

pub mod image_importer;
pub mod post_creator;

pub use image_importer::ImageImporter;
pub use post_creator::PostCreator;
