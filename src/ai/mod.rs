//! Remote model integration for prompt enhancement and image generation
//!
//! Provides interfaces to Gemini's `generateContent` API: a best-effort text
//! call that rewrites the user's prompt, and the image generation call.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiEnhanceClient, GeminiImageClient};
pub use mock::{MockEnhancer, MockImageGenerator};

use crate::models::Credentials;
use crate::request::GenerationRequest;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PromptEnhancementService: Send + Sync {
    /// Rewrites `prompt`. Any failure is returned to the caller.
    async fn rewrite_prompt(&self, prompt: &str, credentials: &Credentials) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Returns the base64 payload of the first generated image.
    async fn generate(
        &self,
        request: &GenerationRequest,
        credentials: &Credentials,
    ) -> Result<String>;
}

/// Best-effort enhancement. Returns `prompt` unchanged when either input is
/// empty (without calling out) or when the rewrite fails for any reason.
pub async fn enhance(
    service: &dyn PromptEnhancementService,
    prompt: &str,
    credentials: &Credentials,
) -> String {
    if prompt.trim().is_empty() || credentials.is_empty() {
        return prompt.to_string();
    }

    match service.rewrite_prompt(prompt, credentials).await {
        Ok(enhanced) => {
            tracing::info!(
                "Enhanced prompt ({} -> {} chars)",
                prompt.len(),
                enhanced.len()
            );
            enhanced
        }
        Err(e) => {
            tracing::warn!("Prompt enhancement failed, using original prompt: {}", e);
            prompt.to_string()
        }
    }
}
