//! Media library entity model and DTOs.

use draftpost_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `media_assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaAsset {
    pub id: DbId,
    pub post_id: Option<DbId>,
    pub original_filename: String,
    /// Path relative to the media root, always `/`-separated.
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub width: i32,
    pub height: i32,
    pub created_at: Timestamp,
}

/// DTO for registering a stored file as a media asset.
#[derive(Debug, Clone)]
pub struct CreateMediaAsset {
    pub post_id: DbId,
    pub original_filename: String,
    pub file_path: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub width: i32,
    pub height: i32,
}
