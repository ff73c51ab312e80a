use draftpost_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `post_meta` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostMeta {
    pub id: DbId,
    pub post_id: DbId,
    pub meta_key: String,
    pub meta_value: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
