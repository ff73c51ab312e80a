//! [`ContentStore`] backed by PostgreSQL.

use async_trait::async_trait;
use draftpost_core::ports::{ContentStore, NewDraft, PortError};
use draftpost_core::types::DbId;

use crate::models::post::CreateDraftPost;
use crate::repositories::{PostMetaRepo, PostRepo};
use crate::DbPool;

/// Stores posts and their meta fields through the repository layer.
#[derive(Clone)]
pub struct PgContentStore {
    pool: DbPool,
}

impl PgContentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn storage(err: sqlx::Error) -> PortError {
    PortError::Storage(err.to_string())
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn create_draft(&self, draft: &NewDraft) -> Result<DbId, PortError> {
        let input = CreateDraftPost {
            title: draft.title.clone(),
            content: draft.content.clone(),
        };
        let post = PostRepo::create_draft(&self.pool, &input)
            .await
            .map_err(storage)?;
        tracing::debug!(post_id = post.id, "Draft post inserted");
        Ok(post.id)
    }

    async fn set_meta(&self, post_id: DbId, key: &str, value: &str) -> Result<(), PortError> {
        PostMetaRepo::upsert(&self.pool, post_id, key, value)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn set_featured_image(&self, post_id: DbId, asset_id: DbId) -> Result<(), PortError> {
        let updated = PostRepo::set_featured_media(&self.pool, post_id, asset_id)
            .await
            .map_err(storage)?;
        if updated {
            Ok(())
        } else {
            Err(PortError::Storage(format!("post {post_id} does not exist")))
        }
    }

    async fn delete_draft(&self, post_id: DbId) -> Result<(), PortError> {
        PostRepo::delete(&self.pool, post_id)
            .await
            .map_err(storage)?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), PortError> {
        crate::health_check(&self.pool).await.map_err(storage)
    }
}
