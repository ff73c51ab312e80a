//! Capability traits the create-post flow is wired against.
//!
//! Production implementations live in `draftpost-db` (PostgreSQL) and
//! `draftpost-api` (reqwest, filesystem media library). Tests substitute
//! in-memory fakes.

use async_trait::async_trait;
use tempfile::TempPath;

use crate::image_probe::ProbeResponse;
use crate::types::DbId;

/// Error reported by a capability implementation.
///
/// These never reach the client verbatim; the request flow logs them and
/// maps them to a fixed [`CoreError`](crate::error::CoreError).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Network-level failure (DNS, connect, TLS, timeout, redirect limit).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote server answered with a non-success status.
    #[error("remote returned HTTP {0}")]
    Status(u16),

    /// The remote body exceeded the configured download cap.
    #[error("remote body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    /// The storage layer rejected or failed the operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// A downloaded file is not an acceptable media asset.
    #[error("invalid media: {0}")]
    InvalidMedia(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Already-sanitized fields for a new draft post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDraft {
    pub title: String,
    pub content: String,
}

/// A remote resource saved to a temporary file.
///
/// The file is deleted when `path` is dropped, including when the future
/// holding it is cancelled. Persisting it is up to the [`MediaLibrary`].
#[derive(Debug)]
pub struct DownloadedFile {
    pub path: TempPath,
    pub size: u64,
}

/// Post storage: drafts, meta fields, featured image reference.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Insert a new post with status `draft`, returning its id.
    async fn create_draft(&self, draft: &NewDraft) -> Result<DbId, PortError>;

    /// Store a meta field, overwriting any existing value for the key.
    async fn set_meta(&self, post_id: DbId, key: &str, value: &str) -> Result<(), PortError>;

    /// Point the post's featured image at a media asset.
    async fn set_featured_image(&self, post_id: DbId, asset_id: DbId) -> Result<(), PortError>;

    /// Remove a draft and everything hanging off it.
    async fn delete_draft(&self, post_id: DbId) -> Result<(), PortError>;

    /// Cheap connectivity check used by the health endpoint.
    async fn health_check(&self) -> Result<(), PortError>;
}

/// Outbound HTTP used to probe and fetch the remote image.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Issue a HEAD request, following at most
    /// [`MAX_REDIRECTS`](crate::image_probe::MAX_REDIRECTS) redirects.
    async fn head(&self, url: &str) -> Result<ProbeResponse, PortError>;

    /// Stream the resource into a new temporary file.
    async fn download_to_temp(&self, url: &str) -> Result<DownloadedFile, PortError>;
}

/// Managed media storage.
#[async_trait]
pub trait MediaLibrary: Send + Sync {
    /// Take ownership of a downloaded file and record it as an asset of
    /// `owner_id`.
    ///
    /// On error nothing is left inside the library and the temporary file
    /// is gone.
    async fn register(
        &self,
        file: DownloadedFile,
        filename: &str,
        owner_id: DbId,
    ) -> Result<DbId, PortError>;

    /// Delete an asset's record and its stored file. Unknown ids are a no-op.
    async fn remove(&self, asset_id: DbId) -> Result<(), PortError>;
}

/// Fetch a remote image and register it as a media asset.
#[async_trait]
pub trait AssetImporter: Send + Sync {
    async fn import(&self, url: &str, owner_id: DbId) -> Result<DbId, PortError>;

    /// Undo a successful [`import`](AssetImporter::import).
    async fn discard(&self, asset_id: DbId) -> Result<(), PortError>;
}
