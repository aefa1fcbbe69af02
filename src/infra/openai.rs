use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::{AppConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::error::GenerationError;
use crate::services::GenerationService;

const API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const KEY_PREFIX: &str = "sk-";
const MIN_KEY_LEN: usize = 21;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TEMPERATURE: f64 = 0.7;

/// Chat-completion client. Construction validates the configured key before
/// any network I/O; each `generate` call performs exactly one HTTP attempt.
#[derive(Debug)]
pub struct OpenAiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(GenerationError::ConfigMissing)?;

        if !is_valid_key_format(api_key) {
            return Err(GenerationError::ConfigInvalid);
        }

        Ok(Self {
            http: Client::new(),
            endpoint: API_ENDPOINT.to_string(),
            api_key: api_key.to_string(),
            model: config
                .openai_model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: config.openai_max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        })
    }

    #[cfg(test)]
    fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }
}

fn is_valid_key_format(api_key: &str) -> bool {
    api_key.starts_with(KEY_PREFIX) && api_key.len() >= MIN_KEY_LEN
}

fn classify_transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        error!("chat-completion request timed out");
        GenerationError::Timeout
    } else {
        error!(error = %err, "failed to reach the AI provider");
        GenerationError::NetworkFailure(err.to_string())
    }
}

#[async_trait]
impl GenerationService for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        info!(
            model = %self.model,
            max_tokens = self.max_tokens,
            prompt_len = prompt.len(),
            "calling chat-completion endpoint"
        );

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("AI provider rate limit reached");
            return Err(GenerationError::RateLimited);
        }
        if status == StatusCode::UNAUTHORIZED {
            error!("AI provider rejected the configured API key");
            return Err(GenerationError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            error!(%status, body = %body, "chat-completion request failed");
            return Err(GenerationError::NetworkFailure(format!(
                "provider responded with {status}"
            )));
        }

        // A success status with the wrong envelope shape is still a failure
        // for this contract.
        let envelope: ChatResponse = response.json().await.map_err(|err| {
            error!(error = %err, "chat-completion envelope is unreadable");
            GenerationError::MalformedResponse(format!("unreadable provider envelope: {err}"))
        })?;

        let content = envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .map(|message| message.content)
            .ok_or_else(|| {
                error!("chat-completion envelope has no message content");
                GenerationError::MalformedResponse(
                    "provider envelope has no message content".to_string(),
                )
            })?;

        info!(response_len = content.len(), "chat-completion call succeeded");
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}
