//! OpenAI-compatible chat completion client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::api::{ApiErrorBody, ApiMessage, ApiRequest, ApiResponse};
use crate::error::GeneratorError;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One prompt for the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Text-generation capability.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Generated text, already trimmed. Errors on any failure.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GeneratorError>;
}

/// Client for `/v1/chat/completions` style endpoints.
pub struct OpenAiClient {
    api_key: String,
    api_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string())
    }

    /// Create a client for a custom endpoint (for OpenAI-compatible APIs).
    pub fn with_url(api_key: String, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_request(&self, request: &CompletionRequest) -> ApiRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ApiMessage::system(system.clone()));
        }
        messages.push(ApiMessage::user(request.prompt.clone()));

        ApiRequest {
            model: request.model.clone(),
            messages,
            max_tokens: Some(request.max_tokens),
            temperature: Some(request.temperature),
        }
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<reqwest::Response, GeneratorError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(api_request)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);

        Err(match status {
            401 | 403 => GeneratorError::AuthenticationFailed(message),
            429 => GeneratorError::RateLimited(message),
            _ => GeneratorError::ApiError { status, message },
        })
    }
}

#[async_trait]
impl TextCompletion for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GeneratorError> {
        let api_request = self.build_request(&request);
        debug!("Requesting completion from {} ({})", self.api_url, request.model);

        let response = self.send_request(&api_request).await?;
        let api_response: ApiResponse = response.json().await?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| GeneratorError::MalformedResponse("no content in first choice".to_string()))
    }
}
