//! Handlers for the `/create-post` resource.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use draftpost_core::auth::bearer_matches;
use draftpost_core::error::CoreError;
use draftpost_core::submission::Submission;

use crate::error::AppResult;
use crate::response::CreatePostResponse;
use crate::state::AppState;

/// Largest request body read after authentication.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// POST /draft-post-creator/v1/create-post
///
/// The token is checked before the body is read. An unreadable, oversized
/// or malformed body is treated as an empty submission, so it surfaces as a
/// missing `title` instead of a framework rejection.
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> AppResult<Json<CreatePostResponse>> {
    let auth = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    if !bearer_matches(auth, &state.config.api_token) {
        tracing::warn!(has_header = auth.is_some(), "Rejected create-post request: bad credentials");
        return Err(CoreError::Unauthorized.into());
    }

    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Create-post body not read");
            Bytes::new()
        });

    let submission = Submission::from_body(&body).inspect_err(|e| {
        tracing::warn!(reason = %e, "Rejected create-post request: invalid payload");
    })?;

    let post_id = state.post_creator.create(&submission).await?;
    Ok(Json(CreatePostResponse::created(post_id)))
}
