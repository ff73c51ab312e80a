use std::path::PathBuf;
use std::time::Duration;

use draftpost_core::auth::Secret;

/// Name of the directory under the media root that holds in-flight downloads.
const INCOMING_DIR: &str = ".incoming";

/// Server configuration loaded from environment variables.
///
/// Everything except the API token has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`). Must exceed twice
    /// `remote_timeout_secs` so the HEAD probe and the download time out
    /// before the whole request does.
    pub request_timeout_secs: u64,
    /// Bearer token callers must present.
    pub api_token: Secret,
    /// Timeout for the image HEAD probe and the download (default: `15`).
    pub remote_timeout_secs: u64,
    /// Largest image body accepted by the download (default: 20 MiB).
    pub max_image_bytes: u64,
    /// Root directory of the media library (default: `./media`).
    pub media_root: PathBuf,
    /// Delete the draft again when the image import fails (default: `false`).
    pub delete_draft_on_image_failure: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `60`                    |
    /// | `DRAFT_POST_API_TOKEN`          | required                |
    /// | `REMOTE_TIMEOUT_SECS`           | `15`                    |
    /// | `MAX_IMAGE_BYTES`               | `20971520`              |
    /// | `MEDIA_ROOT`                    | `./media`               |
    /// | `DELETE_DRAFT_ON_IMAGE_FAILURE` | `false`                 |
    ///
    /// Panics on missing or unparsable values; misconfiguration should stop
    /// the server before it binds.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let api_token = Secret::new(
            std::env::var("DRAFT_POST_API_TOKEN").expect("DRAFT_POST_API_TOKEN must be set"),
        );
        assert!(!api_token.is_empty(), "DRAFT_POST_API_TOKEN must not be empty");

        let remote_timeout_secs: u64 = std::env::var("REMOTE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("REMOTE_TIMEOUT_SECS must be a valid u64");

        let max_image_bytes: u64 = std::env::var("MAX_IMAGE_BYTES")
            .unwrap_or_else(|_| "20971520".into())
            .parse()
            .expect("MAX_IMAGE_BYTES must be a valid u64");

        let media_root =
            PathBuf::from(std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".into()));

        let delete_draft_on_image_failure = parse_bool(
            &std::env::var("DELETE_DRAFT_ON_IMAGE_FAILURE").unwrap_or_else(|_| "false".into()),
        )
        .expect("DELETE_DRAFT_ON_IMAGE_FAILURE must be true or false");

        let config = Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            api_token,
            remote_timeout_secs,
            max_image_bytes,
            media_root,
            delete_draft_on_image_failure,
        };
        if let Err(msg) = config.validate() {
            panic!("{msg}");
        }
        config
    }

    /// Check constraints that span more than one setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs <= self.remote_timeout_secs.saturating_mul(2) {
            return Err(format!(
                "REQUEST_TIMEOUT_SECS ({}) must be greater than twice REMOTE_TIMEOUT_SECS ({})",
                self.request_timeout_secs, self.remote_timeout_secs
            ));
        }
        Ok(())
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// Scratch directory for downloads. Kept inside the media root so a
    /// finished download can be renamed into place.
    pub fn incoming_dir(&self) -> PathBuf {
        self.media_root.join(INCOMING_DIR)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
