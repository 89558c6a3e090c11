use super::client::GeminiHttpClient;
use super::types::{GenerateContentResponse, Part};
use crate::ai::ImageGenerationService;
use crate::models::Credentials;
use crate::request::{self, GenerationRequest};
use crate::{Error, Result};
use async_trait::async_trait;

/// Image generation over `generateContent`. No request timeout is set beyond
/// the transport default, and nothing is retried.
pub struct GeminiImageClient {
    http: GeminiHttpClient,
}

impl GeminiImageClient {
    pub fn new(model: String) -> Self {
        Self::new_with_client(model, reqwest::Client::new())
    }

    pub fn new_with_client(model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(model, None, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn extract_image(response: &GenerateContentResponse) -> Option<String> {
        response.first_candidate_parts().iter().find_map(|p| match p {
            Part::InlineData { inline_data } if !inline_data.data.is_empty() => {
                tracing::debug!(
                    "Gemini returned image with mime_type: {}",
                    inline_data.mime_type
                );
                Some(inline_data.data.clone())
            }
            _ => None,
        })
    }
}

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
        credentials: &Credentials,
    ) -> Result<String> {
        request::validate(
            credentials,
            request.mode,
            request.prompt(),
            !request.inline_images().is_empty(),
        )?;

        tracing::debug!(
            "Sending image generation request to {} ({:?})",
            self.http.model(),
            request.mode
        );
        let response: GenerateContentResponse = self
            .http
            .generate_content(request, &credentials.api_key)
            .await?;

        Self::extract_image(&response).ok_or_else(|| {
            tracing::warn!("Gemini response contained no inline image data");
            Error::NoImageInResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use crate::models::{GenerationMode, UploadedImage};
    use wiremock::matchers::body_partial_json;
    use wiremock::{MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

    fn make_client(server: &MockServer) -> GeminiImageClient {
        GeminiImageClient::new(DEFAULT_MODEL.to_string()).with_base_url(server.uri())
    }

    fn text_request(prompt: &str) -> GenerationRequest {
        request::build(GenerationMode::TextToImage, prompt, None)
    }

    #[tokio::test]
    async fn test_generate_returns_first_inline_payload() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [
                            { "text": "Here is your image" },
                            { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } },
                            { "inlineData": { "mimeType": "image/png", "data": "c2Vjb25k" } }
                        ]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let image = client
            .generate(&text_request("a dream"), &Credentials::new("key"))
            .await
            .unwrap();
        assert_eq!(image, "iVBORw0KGgo=");
    }

    #[tokio::test]
    async fn test_generate_rejects_text_only_response() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "no image here" }] }
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client
            .generate(&text_request("a dream"), &Credentials::new("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoImageInResponse));
    }

    #[tokio::test]
    async fn test_generate_ignores_later_candidates() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "declined" }] } },
                    { "content": { "parts": [{ "inlineData": { "mimeType": "image/png", "data": "QUJD" } }] } }
                ]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client
            .generate(&text_request("a dream"), &Credentials::new("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoImageInResponse));
    }

    #[tokio::test]
    async fn test_api_error_uses_remote_message() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED" }
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client
            .generate(&text_request("a dream"), &Credentials::new("key"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Remote { ref message, status: Some(429) } if message == "quota exceeded"
        ));
    }

    #[tokio::test]
    async fn test_api_error_without_body_reports_status() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = make_client(&server);
        let err = client
            .generate(&text_request("a dream"), &Credentials::new("key"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503");
    }

    #[tokio::test]
    async fn test_validation_happens_before_network() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = make_client(&server);

        let err = client
            .generate(&text_request("a dream"), &Credentials::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingCredential));

        let err = client
            .generate(&text_request(""), &Credentials::new("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingPrompt));

        let no_image = request::build(GenerationMode::ImageToImage, "winter", None);
        let err = client
            .generate(&no_image, &Credentials::new("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingImage));
    }

    #[tokio::test]
    async fn test_image_to_image_sends_inline_part_and_modalities() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_partial_json(serde_json::json!({
                "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
            })))
            .and(wiremock::matchers::body_string_contains(
                "\"inlineData\":{\"mimeType\":\"image/webp\",\"data\":\"UklGRg==\"}",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "inlineData": { "mimeType": "image/png", "data": "QUJD" } }]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = UploadedImage {
            data: "UklGRg==".to_string(),
            mime_type: "image/webp".to_string(),
            filename: "src.webp".to_string(),
        };
        let request = request::build(GenerationMode::ImageToImage, "make it winter", Some(&source));

        let client = make_client(&server);
        let image = client
            .generate(&request, &Credentials::new("key"))
            .await
            .unwrap();
        assert_eq!(image, "QUJD");
    }
}
