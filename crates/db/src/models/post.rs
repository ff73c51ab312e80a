//! Post entity model and DTOs.

use draftpost_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Status assigned to every post created by this service.
pub const POST_STATUS_DRAFT: &str = "draft";

/// Post type assigned to every post created by this service.
pub const POST_TYPE_POST: &str = "post";

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub status: String,
    pub post_type: String,
    pub featured_media_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a draft post. Fields must already be sanitized.
#[derive(Debug, Clone)]
pub struct CreateDraftPost {
    pub title: String,
    pub content: String,
}
