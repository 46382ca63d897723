//! Scripted completion service for tests.
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::completion::{CompletionError, CompletionRequest, CompletionService};

enum Reply {
    Text(String),
    Fail(CompletionError),
    Hang(Duration),
}

/// Answers calls from a script in order, then falls back to a fixed text.
/// Every request is recorded.
pub struct StubCompletion {
    script: Mutex<VecDeque<Reply>>,
    fallback: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: "stub completion".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Text returned once the script runs out
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = text.into();
        self
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Reply::Text(text.into()))
    }

    pub fn fail(self, error: CompletionError) -> Self {
        self.push(Reply::Fail(error))
    }

    /// Sleep before answering with the fallback
    pub fn hang(self, duration: Duration) -> Self {
        self.push(Reply::Hang(duration))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn push(self, reply: Reply) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
        self
    }
}

impl Default for StubCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let next = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match next {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(error)) => Err(error),
            Some(Reply::Hang(duration)) => {
                tokio::time::sleep(duration).await;
                Ok(self.fallback.clone())
            }
            None => Ok(self.fallback.clone()),
        }
    }
}
