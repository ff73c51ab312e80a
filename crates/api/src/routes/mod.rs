pub mod health;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/draft-post-creator/v1` route tree.
///
/// ```text
/// /create-post          create a draft post (POST, bearer token)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/create-post", post(handlers::posts::create_post))
}
