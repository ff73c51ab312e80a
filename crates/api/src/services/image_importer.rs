//! Download a remote image and hand it to the media library.

use std::sync::Arc;

use async_trait::async_trait;
use draftpost_core::image_probe::filename_from_url;
use draftpost_core::ports::{AssetImporter, MediaLibrary, PortError, RemoteFetcher};
use draftpost_core::types::DbId;

/// [`AssetImporter`] composed of a fetcher and a media library.
///
/// Each step is attempted once. The temporary download belongs to the
/// library once handed over, and is removed by dropping it otherwise.
pub struct ImageImporter {
    fetcher: Arc<dyn RemoteFetcher>,
    library: Arc<dyn MediaLibrary>,
}

impl ImageImporter {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, library: Arc<dyn MediaLibrary>) -> Self {
        Self { fetcher, library }
    }
}

#[async_trait]
impl AssetImporter for ImageImporter {
    async fn import(&self, url: &str, owner_id: DbId) -> Result<DbId, PortError> {
        let file = self.fetcher.download_to_temp(url).await?;
        let filename = filename_from_url(url);

        let asset_id = self.library.register(file, &filename, owner_id).await?;
        tracing::debug!(asset_id, post_id = owner_id, %filename, "Media asset registered");
        Ok(asset_id)
    }

    async fn discard(&self, asset_id: DbId) -> Result<(), PortError> {
        self.library.remove(asset_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use draftpost_core::image_probe::ProbeResponse;
    use draftpost_core::ports::DownloadedFile;

    use super::*;

    /// Writes a small file into a scratch directory on every download.
    struct ScratchFetcher {
        dir: PathBuf,
        fail: bool,
    }

    #[async_trait]
    impl RemoteFetcher for ScratchFetcher {
        async fn head(&self, _url: &str) -> Result<ProbeResponse, PortError> {
            unreachable!("the importer never probes")
        }

        async fn download_to_temp(&self, _url: &str) -> Result<DownloadedFile, PortError> {
            if self.fail {
                return Err(PortError::Status(404));
            }
            let path = tempfile::NamedTempFile::new_in(&self.dir)?.into_temp_path();
            tokio::fs::write(&path, b"bytes").await?;
            Ok(DownloadedFile { path, size: 5 })
        }
    }

    /// Records what it was asked to register and remove.
    struct RecordingLibrary {
        result: Result<DbId, ()>,
        calls: Mutex<Vec<(String, DbId)>>,
        removed: Mutex<Vec<DbId>>,
    }

    impl RecordingLibrary {
        fn new(result: Result<DbId, ()>) -> Self {
            Self {
                result,
                calls: Mutex::new(Vec::new()),
                removed: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MediaLibrary for RecordingLibrary {
        async fn register(
            &self,
            file: DownloadedFile,
            filename: &str,
            owner_id: DbId,
        ) -> Result<DbId, PortError> {
            self.calls
                .lock()
                .unwrap()
                .push((filename.to_string(), owner_id));
            match self.result {
                Ok(id) => {
                    file.path.keep().map_err(|e| PortError::Io(e.error))?;
                    Ok(id)
                }
                Err(()) => Err(PortError::InvalidMedia("not an image".into())),
            }
        }

        async fn remove(&self, asset_id: DbId) -> Result<(), PortError> {
            self.removed.lock().unwrap().push(asset_id);
            Ok(())
        }
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    fn importer(fetcher: ScratchFetcher, library: Arc<RecordingLibrary>) -> ImageImporter {
        ImageImporter::new(Arc::new(fetcher), library)
    }

    #[tokio::test]
    async fn successful_import_returns_asset_id() {
        let dir = tempfile::tempdir().unwrap();
        let library = Arc::new(RecordingLibrary::new(Ok(77)));
        let importer = importer(
            ScratchFetcher {
                dir: dir.path().to_path_buf(),
                fail: false,
            },
            Arc::clone(&library),
        );

        let id = importer
            .import("https://example.com/img/cat.jpg?size=large", 12)
            .await
            .unwrap();

        assert_eq!(id, 77);
        assert_eq!(
            library.calls.lock().unwrap().as_slice(),
            &[("cat.jpg".to_string(), 12)]
        );
        assert_eq!(entries(dir.path()), 1);
    }

    #[tokio::test]
    async fn failed_registration_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let library = Arc::new(RecordingLibrary::new(Err(())));
        let importer = importer(
            ScratchFetcher {
                dir: dir.path().to_path_buf(),
                fail: false,
            },
            library,
        );

        let result = importer.import("https://example.com/cat.jpg", 1).await;

        assert_matches!(result, Err(PortError::InvalidMedia(_)));
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn failed_download_skips_registration() {
        let dir = tempfile::tempdir().unwrap();
        let library = Arc::new(RecordingLibrary::new(Ok(1)));
        let importer = importer(
            ScratchFetcher {
                dir: dir.path().to_path_buf(),
                fail: true,
            },
            Arc::clone(&library),
        );

        let result = importer.import("https://example.com/cat.jpg", 1).await;

        assert_matches!(result, Err(PortError::Status(404)));
        assert!(library.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn discard_delegates_to_library() {
        let dir = tempfile::tempdir().unwrap();
        let library = Arc::new(RecordingLibrary::new(Ok(1)));
        let importer = importer(
            ScratchFetcher {
                dir: dir.path().to_path_buf(),
                fail: false,
            },
            Arc::clone(&library),
        );

        importer.discard(41).await.unwrap();

        assert_eq!(library.removed.lock().unwrap().as_slice(), &[41]);
    }
}
