//! [`RemoteFetcher`] over reqwest.
//!
//! One client serves both the HEAD probe and the download. It follows at
//! most [`MAX_REDIRECTS`] redirects and every request is bounded by the
//! configured timeout.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use draftpost_core::image_probe::{ProbeResponse, MAX_REDIRECTS};
use draftpost_core::ports::{DownloadedFile, PortError, RemoteFetcher};
use reqwest::header::CONTENT_TYPE;
use tokio::io::AsyncWriteExt;

const USER_AGENT: &str = concat!("draftpost/", env!("CARGO_PKG_VERSION"));

/// Fetches remote images with a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
    temp_dir: PathBuf,
    max_bytes: u64,
}

impl HttpFetcher {
    /// Build a fetcher that writes downloads into `temp_dir`.
    pub fn new(timeout: Duration, temp_dir: PathBuf, max_bytes: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            temp_dir,
            max_bytes,
        })
    }

    /// Stream the response body into `file`, enforcing the size cap.
    async fn write_body(
        &self,
        mut response: reqwest::Response,
        file: &mut tokio::fs::File,
    ) -> Result<u64, PortError> {
        let mut size: u64 = 0;

        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            size += chunk.len() as u64;
            if size > self.max_bytes {
                return Err(PortError::TooLarge {
                    limit: self.max_bytes,
                });
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        Ok(size)
    }
}

/// Describe a reqwest failure without leaking the full error chain upstream.
fn transport(e: reqwest::Error) -> PortError {
    if e.is_timeout() {
        PortError::Transport("request timed out".into())
    } else if e.is_redirect() {
        PortError::Transport("too many redirects".into())
    } else if e.is_connect() {
        PortError::Transport(format!("connection failed: {e}"))
    } else {
        PortError::Transport(e.to_string())
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn head(&self, url: &str) -> Result<ProbeResponse, PortError> {
        let response = self.client.head(url).send().await.map_err(transport)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            content_type,
        })
    }

    async fn download_to_temp(&self, url: &str) -> Result<DownloadedFile, PortError> {
        let response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortError::Status(status.as_u16()));
        }
        if response
            .content_length()
            .is_some_and(|len| len > self.max_bytes)
        {
            return Err(PortError::TooLarge {
                limit: self.max_bytes,
            });
        }

        // `path` removes the file when dropped, so an error or a cancelled
        // request leaves nothing in the temp directory.
        let (file, path) = tempfile::Builder::new()
            .prefix("draftpost-")
            .suffix(".tmp")
            .tempfile_in(&self.temp_dir)?
            .into_parts();
        let mut file = tokio::fs::File::from_std(file);
        let size = self.write_body(response, &mut file).await?;

        Ok(DownloadedFile { path, size })
    }
}
