use std::sync::Arc;

use draftpost_core::ports::ContentStore;

use crate::config::ServerConfig;
use crate::services::PostCreator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (token, timeouts, media root).
    pub config: Arc<ServerConfig>,
    /// Post storage, also used by the health check.
    pub content_store: Arc<dyn ContentStore>,
    /// The create-post flow wired to its collaborators.
    pub post_creator: Arc<PostCreator>,
}
