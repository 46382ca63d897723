//! Completion-service configuration, read once from the process
//! environment at startup.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `OPENAI_API_KEY` | required |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `OUTREACH_MODEL` | `gpt-4o-mini` |
//! | `OUTREACH_TEMPERATURE` | `0.7` |
//! | `OUTREACH_MAX_TOKENS` | `2048` |
//! | `OUTREACH_TIMEOUT_SECS` | `120` |
//! | `OUTREACH_MAX_RETRIES` | `0` |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use outreach_core::{CompletionOptions, ExecutorConfig, RetryPolicy};
use thiserror::Error;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set; the completion service cannot be reached without it")]
    MissingCredential(&'static str),
    #[error("{var} has invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub options: CompletionOptions,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl LlmConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential(API_KEY_VAR))?;

        let base_url = lookup("OPENAI_BASE_URL")
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let defaults = CompletionOptions::default();
        let options = CompletionOptions {
            model: lookup("OUTREACH_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.model),
            temperature: parse_var(&lookup, "OUTREACH_TEMPERATURE", defaults.temperature)?,
            max_output_tokens: parse_var(&lookup, "OUTREACH_MAX_TOKENS", defaults.max_output_tokens)?,
        };

        let timeout_secs: u64 = parse_var(&lookup, "OUTREACH_TIMEOUT_SECS", 120)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "OUTREACH_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            api_key,
            base_url,
            options,
            timeout: Duration::from_secs(timeout_secs),
            max_retries: parse_var(&lookup, "OUTREACH_MAX_RETRIES", 0)?,
        })
    }

    /// Executor settings derived from this configuration
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            options: self.options.clone(),
            call_timeout: self.timeout,
            retry: RetryPolicy::with_retries(self.max_retries),
            ..ExecutorConfig::default()
        }
    }
}

impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Parse an optional variable, falling back to `default` when unset
pub fn parse_var<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
    }
}
