//! Generation request assembly
//!
//! Builds the `generateContent` payload for an image generation from the
//! final prompt and, in image-to-image mode, the uploaded source image.
//! Building is pure; validation of the inputs is a separate step so the
//! orchestrator can reject a request before any network call is made.

use crate::ai::gemini::types::{Content, InlineData, Part};
use crate::models::{Credentials, GenerationMode, UploadedImage};
use crate::{Error, Result};
use serde::Serialize;

pub const MODALITY_TEXT: &str = "TEXT";
pub const MODALITY_IMAGE: &str = "IMAGE";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    #[serde(skip)]
    pub mode: GenerationMode,
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub response_modalities: Vec<String>,
}

impl GenerationRequest {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.contents.iter().flat_map(|content| content.parts.iter())
    }

    /// Text of the leading prompt part.
    pub fn prompt(&self) -> &str {
        match self.parts().next() {
            Some(Part::Text { text }) => text,
            _ => "",
        }
    }

    pub fn inline_images(&self) -> Vec<&InlineData> {
        self.parts()
            .filter_map(|part| match part {
                Part::InlineData { inline_data } => Some(inline_data),
                _ => None,
            })
            .collect()
    }
}

/// Assembles the payload. The prompt is always the first part; the source
/// image is attached only in image-to-image mode, labelled with its own
/// detected mime type.
pub fn build(
    mode: GenerationMode,
    final_prompt: &str,
    uploaded_image: Option<&UploadedImage>,
) -> GenerationRequest {
    let mut parts = vec![Part::text(final_prompt)];

    if mode.requires_image() {
        if let Some(image) = uploaded_image {
            parts.push(Part::inline_image(
                image.mime_type.clone(),
                image.data.clone(),
            ));
        }
    }

    GenerationRequest {
        mode,
        contents: vec![Content { role: None, parts }],
        generation_config: ImageGenerationConfig {
            response_modalities: vec![MODALITY_TEXT.to_string(), MODALITY_IMAGE.to_string()],
        },
    }
}

/// Pre-network checks, in order: credential, prompt, image.
pub fn validate(
    credentials: &Credentials,
    mode: GenerationMode,
    prompt: &str,
    has_image: bool,
) -> Result<()> {
    if credentials.is_empty() {
        return Err(Error::MissingCredential);
    }
    if prompt.trim().is_empty() {
        return Err(Error::MissingPrompt);
    }
    if mode.requires_image() && !has_image {
        return Err(Error::MissingImage);
    }
    Ok(())
}
