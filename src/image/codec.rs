use super::mime;
use crate::models::UploadedImage;
use crate::{Error, Result};
use base64::Engine as _;
use std::path::Path;

/// Upload size ceiling (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Base64-encodes an image after checking its declared type and size.
///
/// The result is a bare payload, never a `data:` URI.
pub fn encode(bytes: &[u8], mime_type: &str) -> Result<String> {
    if !mime::is_allowed(mime_type) {
        return Err(Error::UnsupportedMediaType(mime_type.to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(Error::PayloadTooLarge {
            size: bytes.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(base64::engine::general_purpose::STANDARD.encode(bytes))
}

/// Decodes a bare base64 payload or a `data:<mime>;base64,<payload>` URI.
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    let payload = strip_data_uri(encoded.trim());
    Ok(base64::engine::general_purpose::STANDARD.decode(payload)?)
}

fn strip_data_uri(encoded: &str) -> &str {
    if encoded.starts_with("data:") {
        if let Some((_, payload)) = encoded.split_once(',') {
            return payload;
        }
    }
    encoded
}

impl UploadedImage {
    /// Validates raw upload bytes. The sniffed type wins over `declared_mime`
    /// when the two disagree.
    pub fn from_bytes(bytes: &[u8], declared_mime: &str, filename: &str) -> Result<Self> {
        let mime_type = match mime::sniff_image_mime(bytes) {
            Some(sniffed) => sniffed,
            None => return Err(Error::UnsupportedMediaType(declared_mime.to_string())),
        };
        if !mime::is_allowed(declared_mime) {
            return Err(Error::UnsupportedMediaType(declared_mime.to_string()));
        }

        let data = encode(bytes, mime_type)?;
        tracing::debug!(
            "Accepted upload '{}' ({} bytes, {})",
            filename,
            bytes.len(),
            mime_type
        );

        Ok(Self {
            data,
            mime_type: mime_type.to_string(),
            filename: filename.to_string(),
        })
    }

    /// Reads and validates an image file, detecting its type from content.
    pub fn from_path(path: &Path) -> Result<Self> {
        let size = std::fs::metadata(path)?.len();
        let bytes = if size as usize > MAX_UPLOAD_BYTES {
            // Only the header is needed to report the type before the size.
            let mut header = vec![0u8; 16];
            let mut file = std::fs::File::open(path)?;
            let read = std::io::Read::read(&mut file, &mut header)?;
            header.truncate(read);
            header
        } else {
            std::fs::read(path)?
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let mime_type = mime::sniff_image_mime(&bytes).ok_or_else(|| {
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            Error::UnsupportedMediaType(extension)
        })?;

        if size as usize > MAX_UPLOAD_BYTES {
            return Err(Error::PayloadTooLarge {
                size: size as usize,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        Self::from_bytes(&bytes, mime_type, &filename)
    }
}
