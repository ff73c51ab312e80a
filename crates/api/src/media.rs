//! Filesystem media library.
//!
//! Registered files are moved to `<media_root>/<YYYY>/<MM>/<name>` and
//! recorded in the `media_assets` table. Only files whose header decodes as
//! PNG, JPEG, GIF or WebP are accepted.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use draftpost_core::image_probe::DEFAULT_FILENAME;
use draftpost_core::ports::{DownloadedFile, MediaLibrary, PortError};
use draftpost_core::types::DbId;
use draftpost_db::models::media_asset::CreateMediaAsset;
use draftpost_db::repositories::MediaAssetRepo;
use draftpost_db::DbPool;
use image::ImageFormat;

/// Formats the library accepts.
const ACCEPTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Upper bound on `name-N.ext` candidates tried before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Format and pixel size read from an image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageInfo {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

/// [`MediaLibrary`] storing files under a root directory.
pub struct FsMediaLibrary {
    root: PathBuf,
    pool: DbPool,
}

impl FsMediaLibrary {
    pub fn new(root: PathBuf, pool: DbPool) -> Self {
        Self { root, pool }
    }
}

#[async_trait]
impl MediaLibrary for FsMediaLibrary {
    async fn register(
        &self,
        file: DownloadedFile,
        filename: &str,
        owner_id: DbId,
    ) -> Result<DbId, PortError> {
        let DownloadedFile { path, size } = file;

        let probe_path = path.to_path_buf();
        let info = tokio::task::spawn_blocking(move || probe_image(&probe_path))
            .await
            .map_err(|e| PortError::Storage(format!("image probe task failed: {e}")))??;
        let width = i32::try_from(info.width)
            .map_err(|_| PortError::InvalidMedia("image too wide".into()))?;
        let height = i32::try_from(info.height)
            .map_err(|_| PortError::InvalidMedia("image too tall".into()))?;

        let subdir = chrono::Utc::now().format("%Y/%m").to_string();
        let dir = self.root.join(&subdir);
        tokio::fs::create_dir_all(&dir).await?;

        let name = with_extension(&sanitize_file_name(filename), info.extension());
        let dest = reserve_destination(&dir, &name).await?;
        if let Err(e) = path.persist(&dest) {
            let _ = tokio::fs::remove_file(&dest).await;
            return Err(e.error.into());
        }

        let stored_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());
        let input = CreateMediaAsset {
            post_id: owner_id,
            original_filename: filename.to_string(),
            file_path: format!("{subdir}/{stored_name}"),
            mime_type: info.mime_type().to_string(),
            size_bytes: i64::try_from(size).unwrap_or(i64::MAX),
            width,
            height,
        };

        match MediaAssetRepo::create(&self.pool, &input).await {
            Ok(asset) => {
                tracing::info!(
                    asset_id = asset.id,
                    post_id = owner_id,
                    path = %asset.file_path,
                    "Media asset stored"
                );
                Ok(asset.id)
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&dest).await;
                Err(PortError::Storage(e.to_string()))
            }
        }
    }

    async fn remove(&self, asset_id: DbId) -> Result<(), PortError> {
        let Some(asset) = MediaAssetRepo::delete(&self.pool, asset_id)
            .await
            .map_err(|e| PortError::Storage(e.to_string()))?
        else {
            return Ok(());
        };

        match tokio::fs::remove_file(self.root.join(&asset.file_path)).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tracing::info!(asset_id, path = %asset.file_path, "Media asset removed");
        Ok(())
    }
}

/// Read the format and dimensions from a file header without decoding
/// the pixels.
pub fn probe_image(path: &Path) -> Result<ImageInfo, PortError> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| PortError::InvalidMedia("unrecognised file format".into()))?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(PortError::InvalidMedia(format!(
            "unsupported image format {format:?}"
        )));
    }
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| PortError::InvalidMedia(e.to_string()))?;
    Ok(ImageInfo {
        format,
        width,
        height,
    })
}

/// Restrict a filename to `[A-Za-z0-9._-]`, replacing runs of anything else
/// with a single `-`. Leading dots and dashes are dropped.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let trimmed = out.trim_start_matches(|c: char| c == '.' || c == '-');
    if trimmed.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Append `.ext` when the name has no extension.
pub fn with_extension(name: &str, ext: &str) -> String {
    if Path::new(name).extension().is_some() {
        name.to_string()
    } else {
        format!("{name}.{ext}")
    }
}

/// Claim a free filename in `dir` by creating it empty.
///
/// Tries `name`, then `stem-1.ext`, `stem-2.ext`, ... The returned path
/// exists, so a concurrent registration cannot pick the same one.
pub async fn reserve_destination(dir: &Path, name: &str) -> std::io::Result<PathBuf> {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    for n in 0..MAX_NAME_ATTEMPTS {
        let candidate = match (n, ext) {
            (0, _) => name.to_string(),
            (n, Some(ext)) => format!("{stem}-{n}.{ext}"),
            (n, None) => format!("{stem}-{n}"),
        };
        let path = dir.join(candidate);
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(_) => return Ok(path),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }

    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!("no free filename for {name}"),
    ))
}
