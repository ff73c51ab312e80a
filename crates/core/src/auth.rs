//! Shared-secret bearer token check.

use std::fmt;

use sha2::{Digest, Sha256};

/// Scheme prefix expected in the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// A configured secret whose `Debug` output never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Check an `Authorization` header value against the configured secret.
///
/// The header must be exactly `"Bearer " + secret`. No trimming or case
/// folding is applied, so extra whitespace or a lowercase scheme is rejected.
/// The token part is compared through SHA-256 digests with a fold over every
/// byte, so timing does not depend on where the first mismatch is or on the
/// length of the supplied token.
pub fn bearer_matches(header: Option<&str>, secret: &Secret) -> bool {
    let Some(token) = header.and_then(|h| h.strip_prefix(BEARER_PREFIX)) else {
        return false;
    };
    let provided = Sha256::digest(token.as_bytes());
    let expected = Sha256::digest(secret.expose().as_bytes());
    constant_time_eq(&provided, &expected)
}

/// Constant-time byte slice comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
