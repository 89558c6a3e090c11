use super::{ImageGenerationService, PromptEnhancementService};
use crate::models::Credentials;
use crate::request::GenerationRequest;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub struct MockEnhancer {
    responses: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockEnhancer {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptEnhancementService for MockEnhancer {
    async fn rewrite_prompt(&self, prompt: &str, _credentials: &Credentials) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Remote {
                message: "Mock enhancement failure".to_string(),
                status: Some(500),
            });
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            Ok(format!("Enhanced: {}", prompt))
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

/// Records every request it receives and answers with canned payloads.
#[derive(Clone)]
pub struct MockImageGenerator {
    image_responses: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    delay: Option<Duration>,
}

impl MockImageGenerator {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Sleep before answering, to keep a call in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_image_response(self, image_b64: String) -> Self {
        self.image_responses.lock().unwrap().push(image_b64);
        self
    }

    /// Fail every call with a remote error carrying `message`.
    pub fn with_remote_error(self, message: String) -> Self {
        *self.failure.lock().unwrap() = Some(message);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
        _credentials: &Credentials,
    ) -> Result<String> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Remote {
                message,
                status: None,
            });
        }

        let responses = self.image_responses.lock().unwrap();
        if responses.is_empty() {
            // base64 of the PNG signature
            Ok("iVBORw0KGgo=".to_string())
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
