//! Success payloads returned by API handlers.

use draftpost_core::types::DbId;
use serde::Serialize;

/// Message returned alongside the new post's id.
pub const POST_CREATED_MESSAGE: &str = "Post created successfully";

/// `{ "success": "...", "post_id": N }` returned by `create-post`.
#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub success: &'static str,
    pub post_id: DbId,
}

impl CreatePostResponse {
    pub fn created(post_id: DbId) -> Self {
        Self {
            success: POST_CREATED_MESSAGE,
            post_id,
        }
    }
}
