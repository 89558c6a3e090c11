pub const IMAGE_JPEG: &str = "image/jpeg";
pub const IMAGE_PNG: &str = "image/png";
pub const IMAGE_WEBP: &str = "image/webp";

/// Upload allow-list.
pub const ALLOWED_MIME_TYPES: [&str; 3] = [IMAGE_JPEG, IMAGE_PNG, IMAGE_WEBP];

pub fn is_allowed(mime_type: &str) -> bool {
    let normalized = mime_type.trim().to_ascii_lowercase();
    let normalized = if normalized == "image/jpg" {
        IMAGE_JPEG.to_string()
    } else {
        normalized
    };
    ALLOWED_MIME_TYPES.contains(&normalized.as_str())
}

/// Detects an allowed image type from its magic bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some(IMAGE_JPEG),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(IMAGE_PNG),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some(IMAGE_WEBP),
        _ => None,
    }
}

/// File extension for a download; unknown payloads are saved as PNG.
pub fn extension_for(bytes: &[u8]) -> &'static str {
    match sniff_image_mime(bytes) {
        Some(IMAGE_JPEG) => "jpg",
        Some(IMAGE_WEBP) => "webp",
        Some(_) => "png",
        None => {
            tracing::warn!(
                "Unrecognized image format (first 4 bytes: {:02X?}), saving as png",
                &bytes[..bytes.len().min(4)]
            );
            "png"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        assert_eq!(
            sniff_image_mime(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]),
            Some(IMAGE_PNG)
        );
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(IMAGE_JPEG));
    }

    #[test]
    fn test_detect_webp() {
        assert_eq!(
            sniff_image_mime(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            Some(IMAGE_WEBP)
        );
    }

    #[test]
    fn test_unknown_is_none() {
        assert_eq!(sniff_image_mime(&[0x47, 0x49, 0x46, 0x38]), None);
        assert_eq!(sniff_image_mime(&[]), None);
    }

    #[test]
    fn test_allow_list() {
        assert!(is_allowed("image/png"));
        assert!(is_allowed("IMAGE/JPEG"));
        assert!(is_allowed("image/jpg"));
        assert!(!is_allowed("image/gif"));
        assert!(!is_allowed("application/pdf"));
    }

    #[test]
    fn test_extension_falls_back_to_png() {
        assert_eq!(extension_for(&[0xFF, 0xD8, 0xFF, 0xE0]), "jpg");
        assert_eq!(extension_for(&[0x00, 0x01]), "png");
    }
}
