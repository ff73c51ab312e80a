//! Create a draft post from a validated submission.
//!
//! Each step is a hard gate; a failure ends the request and nothing done
//! before it is rolled back:
//!
//! 1. Normalise `img_url` and probe it with HEAD (status 200, image type).
//! 2. Insert the draft with a plain-text title and a safe-HTML body.
//! 3. Store the three SEO meta fields (failures are logged, not surfaced).
//! 4. Import the image and set it as the featured image.
//!
//! When step 4 fails the draft stays behind without an image, unless
//! draft cleanup is enabled. Cleanup also discards an asset that was
//! imported but could not be attached.

use std::sync::Arc;

use draftpost_core::error::CoreError;
use draftpost_core::image_probe::{check_probe, normalize_image_url};
use draftpost_core::ports::{AssetImporter, ContentStore, NewDraft, PortError, RemoteFetcher};
use draftpost_core::sanitize::{sanitize_post_html, sanitize_text_field};
use draftpost_core::submission::Submission;
use draftpost_core::types::DbId;

/// Orchestrates the create-post flow over injected collaborators.
pub struct PostCreator {
    store: Arc<dyn ContentStore>,
    fetcher: Arc<dyn RemoteFetcher>,
    importer: Arc<dyn AssetImporter>,
    delete_draft_on_image_failure: bool,
}

impl PostCreator {
    pub fn new(
        store: Arc<dyn ContentStore>,
        fetcher: Arc<dyn RemoteFetcher>,
        importer: Arc<dyn AssetImporter>,
    ) -> Self {
        Self {
            store,
            fetcher,
            importer,
            delete_draft_on_image_failure: false,
        }
    }

    /// Delete the draft again when the image import fails.
    pub fn with_draft_cleanup(mut self, enabled: bool) -> Self {
        self.delete_draft_on_image_failure = enabled;
        self
    }

    /// Run the flow and return the new post's id.
    pub async fn create(&self, submission: &Submission) -> Result<DbId, CoreError> {
        let img_url = normalize_image_url(&submission.img_url).inspect_err(|_| {
            tracing::warn!(url = %submission.img_url, "Rejected image URL with unsupported form");
        })?;

        self.verify_image(&img_url).await?;

        let draft = NewDraft {
            title: sanitize_text_field(&submission.title),
            content: sanitize_post_html(&submission.description),
        };
        let post_id = self.store.create_draft(&draft).await.map_err(|e| {
            tracing::error!(error = %e, "Draft post creation failed");
            CoreError::PostCreation
        })?;

        for (key, raw) in submission.meta_fields() {
            let value = sanitize_text_field(raw);
            if let Err(e) = self.store.set_meta(post_id, key, &value).await {
                tracing::warn!(post_id, key, error = %e, "Failed to store meta field");
            }
        }

        let asset_id = match self.importer.import(&img_url, post_id).await {
            Ok(asset_id) => asset_id,
            Err(e) => return Err(self.image_failed(post_id, &img_url, None, e).await),
        };
        if let Err(e) = self.store.set_featured_image(post_id, asset_id).await {
            return Err(self.image_failed(post_id, &img_url, Some(asset_id), e).await);
        }

        tracing::info!(post_id, asset_id, "Draft post created");
        Ok(post_id)
    }

    /// HEAD the image URL and check the status and content type.
    async fn verify_image(&self, url: &str) -> Result<(), CoreError> {
        let probe = self.fetcher.head(url).await.map_err(|e| {
            tracing::warn!(url, error = %e, "Image URL unreachable");
            CoreError::InvalidImageUrl
        })?;

        check_probe(&probe).inspect_err(|e| {
            tracing::warn!(
                url,
                status = probe.status,
                content_type = probe.content_type.as_deref().unwrap_or(""),
                reason = %e,
                "Image URL rejected"
            );
        })
    }

    /// Log an import or attach failure and run the optional cleanup.
    async fn image_failed(
        &self,
        post_id: DbId,
        url: &str,
        asset_id: Option<DbId>,
        error: PortError,
    ) -> CoreError {
        tracing::error!(post_id, url, asset_id, error = %error, "Image upload failed");
        if !self.delete_draft_on_image_failure {
            return CoreError::ImageUpload;
        }

        if let Some(asset_id) = asset_id {
            match self.importer.discard(asset_id).await {
                Ok(()) => tracing::info!(post_id, asset_id, "Discarded unattached media asset"),
                Err(e) => tracing::error!(post_id, asset_id, error = %e, "Failed to discard media asset"),
            }
        }
        match self.store.delete_draft(post_id).await {
            Ok(()) => tracing::info!(post_id, "Discarded draft after image failure"),
            Err(e) => tracing::error!(post_id, error = %e, "Failed to discard draft"),
        }
        CoreError::ImageUpload
    }
}
