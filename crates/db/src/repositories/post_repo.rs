//! Repository for the `posts` table.

use draftpost_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::{CreateDraftPost, Post, POST_STATUS_DRAFT, POST_TYPE_POST};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, title, content, status, post_type, featured_media_id, created_at, updated_at";

/// Provides persistence for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new draft post, returning the created row.
    pub async fn create_draft(
        pool: &PgPool,
        input: &CreateDraftPost,
    ) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (title, content, status, post_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(POST_STATUS_DRAFT)
            .bind(POST_TYPE_POST)
            .fetch_one(pool)
            .await
    }

    /// Find a post by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set the featured image of a post. Returns `true` if the post exists.
    pub async fn set_featured_media(
        pool: &PgPool,
        id: DbId,
        media_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE posts SET featured_media_id = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(media_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a post by ID. Meta rows cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
