//! Chat-completions client for OpenAI-compatible endpoints.
use std::time::Duration;

use async_trait::async_trait;
use outreach_core::{CompletionError, CompletionRequest, CompletionService};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, LlmConfig};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Completion service backed by `POST {base_url}/chat/completions`
pub struct OpenAiClient {
    http: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn new(config: &LlmConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("outreach/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{}/chat/completions", config.base_url),
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout(self.timeout)
        } else {
            CompletionError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatRequest {
            model: &request.options.model,
            messages,
            temperature: request.options.temperature,
            max_tokens: request.options.max_output_tokens,
        };

        tracing::debug!(endpoint = %self.endpoint, model = %request.options.model, "sending completion request");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                CompletionError::RateLimited(message)
            } else {
                CompletionError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| CompletionError::Malformed(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::Malformed("response has no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(CompletionError::Empty);
        }
        Ok(content)
    }
}
