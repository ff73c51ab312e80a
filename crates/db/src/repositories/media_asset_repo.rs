//! Repository for the `media_assets` table.

use draftpost_core::types::DbId;
use sqlx::PgPool;

use crate::models::media_asset::{CreateMediaAsset, MediaAsset};

const COLUMNS: &str = "id, post_id, original_filename, file_path, mime_type, size_bytes, \
                       width, height, created_at";

/// Provides persistence for media library entries.
pub struct MediaAssetRepo;

impl MediaAssetRepo {
    /// Insert a new media asset, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMediaAsset,
    ) -> Result<MediaAsset, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_assets
                (post_id, original_filename, file_path, mime_type, size_bytes, width, height)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(input.post_id)
            .bind(&input.original_filename)
            .bind(&input.file_path)
            .bind(&input.mime_type)
            .bind(input.size_bytes)
            .bind(input.width)
            .bind(input.height)
            .fetch_one(pool)
            .await
    }

    /// Delete a media asset, returning the removed row if it existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<MediaAsset>, sqlx::Error> {
        let query = format!("DELETE FROM media_assets WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List assets owned by a post, newest first.
    pub async fn list_by_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<MediaAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_assets
             WHERE post_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }
}
