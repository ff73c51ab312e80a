//! Rules applied to the remote image before and after it is fetched.
//!
//! Provides URL normalisation, evaluation of the HEAD probe result, and
//! filename extraction for the downloaded asset.

use crate::error::CoreError;

/// Maximum number of redirects followed by the HEAD probe and the download.
pub const MAX_REDIRECTS: usize = 5;

/// Filename used when the URL path has no usable last segment.
pub const DEFAULT_FILENAME: &str = "download";

/// Outcome of a HEAD request against the image URL, after redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// Final HTTP status code.
    pub status: u16,
    /// Raw `Content-Type` header value, if the server sent one.
    pub content_type: Option<String>,
}

/// Trim an image URL and check that it is an absolute http(s) URL.
///
/// Returns [`CoreError::InvalidImageUrl`] otherwise, which is the same
/// outcome as an unreachable host.
pub fn normalize_image_url(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    let has_host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'));
    if has_host {
        Ok(trimmed.to_string())
    } else {
        Err(CoreError::InvalidImageUrl)
    }
}

/// Decide whether a probe result points at an image.
///
/// The status must be exactly 200, and the `Content-Type` must contain the
/// substring `image` as sent by the server (no case folding).
pub fn check_probe(probe: &ProbeResponse) -> Result<(), CoreError> {
    if probe.status != 200 {
        return Err(CoreError::ImageUrlStatus(probe.status));
    }
    match probe.content_type.as_deref() {
        Some(ct) if ct.contains("image") => Ok(()),
        _ => Err(CoreError::NotAnImage),
    }
}

/// Extract a filename from a URL by taking the last path segment.
///
/// Query string and fragment are ignored. Falls back to
/// [`DEFAULT_FILENAME`] if the path ends with `/` or is empty.
pub fn filename_from_url(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let path = without_fragment.split('?').next().unwrap_or(without_fragment);
    let after_scheme = path.split_once("://").map_or(path, |(_, rest)| rest);

    // The first segment after the scheme is the host, never a filename.
    match after_scheme.split_once('/') {
        Some((_, rest)) => match rest.rsplit('/').next() {
            Some(seg) if !seg.is_empty() => seg.to_string(),
            _ => DEFAULT_FILENAME.to_string(),
        },
        None => DEFAULT_FILENAME.to_string(),
    }
}
