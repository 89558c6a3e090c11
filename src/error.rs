//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API key is missing")]
    MissingCredential,

    #[error("Prompt is empty")]
    MissingPrompt,

    #[error("Image-to-image mode requires an uploaded image")]
    MissingImage,

    #[error("Unsupported media type: {0} (expected JPEG, PNG or WebP)")]
    UnsupportedMediaType(String),

    #[error("Image is too large: {size} bytes (limit {limit} bytes)")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Non-success response from the remote service. Displays the remote
    /// message verbatim.
    #[error("{message}")]
    Remote { message: String, status: Option<u16> },

    #[error("No image data found in response")]
    NoImageInResponse,

    #[error("A generation is already in progress")]
    Busy,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl Error {
    /// Pre-network input checks: missing key, prompt or image.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingCredential | Error::MissingPrompt | Error::MissingImage
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_displays_message_verbatim() {
        let err = Error::Remote {
            message: "invalid key".to_string(),
            status: Some(403),
        };
        assert_eq!(err.to_string(), "invalid key");
    }

    #[test]
    fn test_validation_grouping() {
        assert!(Error::MissingCredential.is_validation());
        assert!(Error::MissingPrompt.is_validation());
        assert!(Error::MissingImage.is_validation());
        assert!(!Error::NoImageInResponse.is_validation());
        assert!(!Error::Busy.is_validation());
    }
}
