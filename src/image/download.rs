use super::{codec, mime};
use crate::Result;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

pub const DOWNLOAD_PREFIX: &str = "generated-image";

/// Decodes a generated image and writes it to
/// `<dir>/generated-image-<unix millis>.<ext>`.
pub fn save_download(image_b64: &str, dir: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
    let bytes = codec::decode(image_b64)?;

    fs::create_dir_all(dir)?;
    let filename = format!(
        "{}-{}.{}",
        DOWNLOAD_PREFIX,
        now.timestamp_millis(),
        mime::extension_for(&bytes)
    );
    let path = dir.join(filename);
    fs::write(&path, &bytes)?;

    tracing::info!("Saved image ({} bytes) to {}", bytes.len(), path.display());
    Ok(path)
}
