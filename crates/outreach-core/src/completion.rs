//! Completion-service boundary.
//!
//! Any provider that maps a prompt to generated text can back the
//! pipeline. The client is built once and shared read-only across
//! stages and runs.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generation options sent with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Model identifier (e.g. "gpt-4o-mini")
    pub model: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_output_tokens: 2048,
            temperature: 0.7,
        }
    }
}

/// One prompt submitted on behalf of a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Rendered agent role, sent as the system message
    pub system: Option<String>,
    pub prompt: String,
    pub options: CompletionOptions,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompletionError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed completion: {0}")]
    Malformed(String),

    #[error("empty completion")]
    Empty,
}

impl CompletionError {
    /// Worth retrying with backoff
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_) | Self::Transport(_) | Self::Timeout(_)
        )
    }
}

/// Text-completion capability used by every stage
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}
