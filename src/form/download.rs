use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::error::{GenerationError, Result};

pub fn download_filename(at: DateTime<Utc>) -> String {
    format!("generated-image-{}.png", at.timestamp_millis())
}

/// Decode an inline `data:<mime>;base64,<payload>` image. Returns `None` for
/// anything that is not a data URL so the caller fetches it instead.
pub fn decode_data_url(url: &str) -> Option<Result<Vec<u8>>> {
    let rest = url.strip_prefix("data:")?;
    let decoded = match rest.split_once(',') {
        Some((meta, payload)) if meta.ends_with(";base64") => STANDARD
            .decode(payload.trim())
            .map_err(|e| GenerationError::DownloadError(format!("invalid base64 image: {}", e))),
        Some(_) => Err(GenerationError::DownloadError(
            "only base64 data URLs are supported".into(),
        )),
        None => Err(GenerationError::DownloadError("malformed data URL".into())),
    };
    Some(decoded)
}

/// Temporary file holding image bytes until they are persisted under their
/// final name. Dropping an unpersisted stage removes the file.
struct StagedImage {
    path: PathBuf,
    persisted: bool,
}

impl StagedImage {
    async fn write(path: PathBuf, bytes: &[u8]) -> Result<Self> {
        let staged = Self {
            path,
            persisted: false,
        };
        tokio::fs::write(&staged.path, bytes).await?;
        Ok(staged)
    }

    async fn persist(mut self, target: &Path) -> Result<()> {
        tokio::fs::rename(&self.path, target).await?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for StagedImage {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Save `bytes` into `dir` as `generated-image-<millis>.png`.
pub async fn save_image(dir: &Path, bytes: &[u8]) -> Result<PathBuf> {
    if bytes.is_empty() {
        return Err(GenerationError::DownloadError("image is empty".into()));
    }

    let filename = download_filename(Utc::now());
    let target = dir.join(&filename);
    let staging = dir.join(format!(".{}.part", filename));

    let staged = StagedImage::write(staging, bytes).await?;
    staged.persist(&target).await?;

    Ok(target)
}
