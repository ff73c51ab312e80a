//! Repository for the `post_meta` table.

use draftpost_core::types::DbId;
use sqlx::PgPool;

use crate::models::post_meta::PostMeta;

const COLUMNS: &str = "id, post_id, meta_key, meta_value, created_at, updated_at";

/// Provides key/value meta storage for posts.
pub struct PostMetaRepo;

impl PostMetaRepo {
    /// Insert or overwrite the value stored under `key` for a post.
    pub async fn upsert(
        pool: &PgPool,
        post_id: DbId,
        key: &str,
        value: &str,
    ) -> Result<PostMeta, sqlx::Error> {
        let query = format!(
            "INSERT INTO post_meta (post_id, meta_key, meta_value)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_post_meta_post_key
             DO UPDATE SET meta_value = EXCLUDED.meta_value, updated_at = now()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PostMeta>(&query)
            .bind(post_id)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }

    /// Fetch a single meta value.
    pub async fn get(
        pool: &PgPool,
        post_id: DbId,
        key: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT meta_value FROM post_meta WHERE post_id = $1 AND meta_key = $2")
                .bind(post_id)
                .bind(key)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(value,)| value))
    }

    /// List all meta rows for a post, ordered by key.
    pub async fn list_by_post(pool: &PgPool, post_id: DbId) -> Result<Vec<PostMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM post_meta
             WHERE post_id = $1
             ORDER BY meta_key"
        );
        sqlx::query_as::<_, PostMeta>(&query)
            .bind(post_id)
            .fetch_all(pool)
            .await
    }
}
