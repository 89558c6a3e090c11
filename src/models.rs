//! Data models and structures
//!
//! Defines the session values shared by the store, the request builder and
//! the orchestrator, plus environment configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.trim().is_empty()
    }

    /// Key with everything past the first four characters hidden. Keys too
    /// short to keep anything back are hidden entirely.
    pub fn masked(&self) -> String {
        if self.is_empty() {
            return "(not set)".to_string();
        }
        if self.api_key.chars().count() <= 4 {
            return "…".to_string();
        }
        let visible: String = self.api_key.chars().take(4).collect();
        format!("{}…", visible)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub auto_enhance: bool,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    #[default]
    TextToImage,
    ImageToImage,
}

impl GenerationMode {
    pub fn requires_image(self) -> bool {
        matches!(self, GenerationMode::ImageToImage)
    }
}

/// A validated source image, held as base64 without any data-URI prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub data: String,
    pub mime_type: String,
    pub filename: String,
}

/// Editable state owned by the caller. Each generation works on a clone.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub prompt: String,
    pub mode: GenerationMode,
    pub image: Option<UploadedImage>,
}

impl Session {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn attach_image(&mut self, image: UploadedImage) {
        self.image = Some(image);
    }

    /// Drops the image but leaves `mode` alone; an image-to-image session
    /// without an image fails validation with `MissingImage`.
    pub fn clear_image(&mut self) {
        self.image = None;
    }
}

/// Successful generation: the image as base64 plus the prompt actually sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub image_b64: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

// Configuration
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ENHANCE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub base_url: String,
    pub image_model: String,
    pub text_model: String,
    pub enhance_timeout: Duration,
    pub preferences_path: PathBuf,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let enhance_timeout_secs = match std::env::var("ENHANCE_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                crate::Error::Config(format!("ENHANCE_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_ENHANCE_TIMEOUT.as_secs(),
        };

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            image_model: std::env::var("IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
            text_model: std::env::var("TEXT_MODEL")
                .unwrap_or_else(|_| DEFAULT_TEXT_MODEL.to_string()),
            enhance_timeout: Duration::from_secs(enhance_timeout_secs),
            preferences_path: std::env::var("PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_preferences_path()),
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("output")),
        })
    }
}

fn default_preferences_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".image-studio")
        .join("preferences.json")
}
