//! Stage Executor: renders one stage, calls the completion service and
//! captures the result.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use outreach_prompts::render;

use crate::artifact::write_artifact;
use crate::completion::{CompletionError, CompletionOptions, CompletionRequest, CompletionService};
use crate::context::PipelineContext;
use crate::data_model::{PipelineInput, StageDefinition, StageResult};
use crate::error::{StageExecutionError, StageFailure};

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Bounded retry for transient completion failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first; 0 means a single attempt
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_backoff: Duration::from_millis(500),
        }
    }

    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::none()
        }
    }

    /// Delay before retry number `retry` (1-based), doubling each time
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(factor).min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub options: CompletionOptions,
    /// Upper bound on a single completion call
    pub call_timeout: Duration,
    pub retry: RetryPolicy,
    /// Directory the terminal artifact is written into
    pub output_dir: PathBuf,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            options: CompletionOptions::default(),
            call_timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

pub struct StageExecutor {
    client: Arc<dyn CompletionService>,
    config: ExecutorConfig,
}

impl StageExecutor {
    pub fn new(client: Arc<dyn CompletionService>, config: ExecutorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run one stage against the results gathered so far.
    ///
    /// Only the stages named in `depends_on` are read from `context`.
    /// An empty completion counts as a failure.
    pub async fn execute(
        &self,
        stage: &StageDefinition,
        input: &PipelineInput,
        context: &PipelineContext,
    ) -> Result<StageResult, StageExecutionError> {
        let start = Instant::now();
        let fail = |cause: StageFailure| StageExecutionError::new(stage.name.as_str(), cause);

        let mut vars = input.variables();
        let mut dependencies = Vec::with_capacity(stage.depends_on.len());
        for dep in &stage.depends_on {
            let result = context
                .get(dep)
                .ok_or_else(|| fail(StageFailure::MissingDependency(dep.clone())))?;
            vars.insert(dep.as_str(), result.output_text.as_str());
            dependencies.push(result);
        }

        let system_prompt = stage
            .role
            .system_prompt(&vars)
            .map_err(|e| fail(e.into()))?;
        let task = render(&stage.prompt_template, &vars).map_err(|e| fail(e.into()))?;
        let expected = render(&stage.expected_output, &vars).map_err(|e| fail(e.into()))?;
        let rendered_prompt = assemble_prompt(&dependencies, &task, &expected);

        let request = CompletionRequest {
            system: Some(system_prompt.clone()),
            prompt: rendered_prompt.clone(),
            options: self.config.options.clone(),
        };

        tracing::info!(stage = %stage.name, context_stages = dependencies.len(), "stage started");
        let (output_text, attempts) = self
            .complete_with_retry(&stage.name, &request)
            .await
            .map_err(fail)?;

        let artifact = match &stage.output_file {
            Some(file_name) => {
                let path = write_artifact(&self.config.output_dir, file_name, &output_text)
                    .await
                    .map_err(|source| {
                        fail(StageFailure::Artifact {
                            path: self.config.output_dir.join(file_name),
                            source,
                        })
                    })?;
                Some(path)
            }
            None => None,
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        tracing::info!(stage = %stage.name, latency_ms, attempts, "stage finished");

        Ok(StageResult {
            stage_name: stage.name.clone(),
            system_prompt,
            rendered_prompt,
            output_text,
            latency_ms,
            attempts,
            artifact,
        })
    }

    async fn complete_with_retry(
        &self,
        stage: &str,
        request: &CompletionRequest,
    ) -> Result<(String, u32), StageFailure> {
        let retry = self.config.retry;
        let mut attempts = 0;

        loop {
            attempts += 1;
            match self.complete_once(request).await {
                Ok(text) => return Ok((text, attempts)),
                Err(err) if err.is_transient() && attempts <= retry.max_retries => {
                    let delay = retry.backoff(attempts);
                    tracing::warn!(stage, attempts, ?delay, error = %err, "retrying completion");
                    tokio::time::sleep(delay).await;
                }
                Err(source) => return Err(StageFailure::Completion { source, attempts }),
            }
        }
    }

    async fn complete_once(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let timeout = self.config.call_timeout;
        let text = tokio::time::timeout(timeout, self.client.complete(request))
            .await
            .map_err(|_| CompletionError::Timeout(timeout))??;

        if text.trim().is_empty() {
            return Err(CompletionError::Empty);
        }
        Ok(text)
    }
}

/// Frame each dependency output under its stage name, then the task.
pub fn assemble_prompt(dependencies: &[&StageResult], task: &str, expected_output: &str) -> String {
    let mut prompt = String::new();

    if !dependencies.is_empty() {
        prompt.push_str("# Context\n\n");
        for result in dependencies {
            prompt.push_str(&format!("## {}\n\n{}\n\n", result.stage_name, result.output_text));
        }
    }

    prompt.push_str("# Task\n\n");
    prompt.push_str(task.trim());

    let expected_output = expected_output.trim();
    if !expected_output.is_empty() {
        prompt.push_str("\n\n# Expected output\n\n");
        prompt.push_str(expected_output);
    }

    prompt
}
