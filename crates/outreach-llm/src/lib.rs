//! Outreach LLM: OpenAI-compatible completion client and its
//! environment configuration.

pub mod client;
pub mod config;

pub use client::OpenAiClient;
pub use config::{ConfigError, LlmConfig};
