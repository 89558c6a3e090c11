use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentResponse, Part};
use crate::ai::PromptEnhancementService;
use crate::models::{Credentials, DEFAULT_ENHANCE_TIMEOUT};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

const MAX_OUTPUT_TOKENS: u32 = 256;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Serialize)]
struct EnhanceRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: EnhanceGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnhanceGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Rewrites prompts through a Gemini text model.
pub struct GeminiEnhanceClient {
    http: GeminiHttpClient,
}

impl GeminiEnhanceClient {
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, reqwest::Client::new())
    }

    pub fn new_with_client(model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, Some(DEFAULT_ENHANCE_TIMEOUT), client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(Some(timeout));
        self
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        match response.first_candidate_parts().first() {
            Some(Part::Text { text }) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
            _ => None,
        }
    }
}

#[async_trait]
impl PromptEnhancementService for GeminiEnhanceClient {
    async fn rewrite_prompt(&self, prompt: &str, credentials: &Credentials) -> Result<String> {
        let request = EnhanceRequest {
            contents: vec![Content::user(vec![Part::text(prompts::render(
                prompts::ENHANCE,
                &[("prompt", prompt)],
            ))])],
            generation_config: EnhanceGenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        tracing::debug!("Requesting prompt enhancement from {}", self.http.model());
        let response: GenerateContentResponse = self
            .http
            .generate_content(&request, &credentials.api_key)
            .await?;

        Self::extract_text(&response).ok_or_else(|| Error::Remote {
            message: "No text in Gemini enhancement response".to_string(),
            status: None,
        })
    }
}
