/// Terminal outcomes of a create-post request.
///
/// The `Display` text of each variant is the exact `error` string returned
/// to the client, so changing a message is an API change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid image URL.")]
    InvalidImageUrl,

    #[error("Image URL returned status code {0}")]
    ImageUrlStatus(u16),

    #[error("URL does not point to a valid image.")]
    NotAnImage,

    #[error("Post creation failed")]
    PostCreation,

    #[error("Image upload failed")]
    ImageUpload,
}

impl CoreError {
    /// Whether the failure was caused by the caller's input rather than by
    /// this service or its storage.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CoreError::PostCreation | CoreError::ImageUpload)
    }
}
