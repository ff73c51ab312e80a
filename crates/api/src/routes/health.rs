use std::path::PathBuf;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency is usable, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Whether downloads can be written under the media root.
    pub media_writable: bool,
}

/// GET /health -- reports database reachability and media storage.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = state.content_store.health_check().await.is_ok();
    let media_writable = can_write(state.config.incoming_dir()).await;

    let status = if db_healthy && media_writable {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_writable,
    })
}

/// Create and drop a scratch file in `dir`.
async fn can_write(dir: PathBuf) -> bool {
    tokio::task::spawn_blocking(move || tempfile::tempfile_in(dir).is_ok())
        .await
        .unwrap_or(false)
}

/// Mount health check routes (root level, outside the versioned namespace).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
