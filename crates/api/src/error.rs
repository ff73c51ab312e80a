use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use draftpost_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce the `{ "error": "..." }` bodies
/// the endpoint contract fixes. Internal causes are logged where they occur
/// and never reach the response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level outcome from `draftpost_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Core(core) => match core {
                CoreError::Unauthorized => StatusCode::UNAUTHORIZED,
                CoreError::MissingField(_)
                | CoreError::InvalidImageUrl
                | CoreError::ImageUrlStatus(_)
                | CoreError::NotAnImage => StatusCode::BAD_REQUEST,
                CoreError::PostCreation | CoreError::ImageUpload => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
