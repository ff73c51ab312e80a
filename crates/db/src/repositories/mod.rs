//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod media_asset_repo;
pub mod post_meta_repo;
pub mod post_repo;

pub use media_asset_repo::MediaAssetRepo;
pub use post_meta_repo::PostMetaRepo;
pub use post_repo::PostRepo;
