//! Pipeline Runner: executes the stages in their fixed order, chaining
//! each output into the context of later stages.
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::completion::CompletionService;
use crate::context::PipelineContext;
use crate::data_model::{PipelineInput, StageDefinition, StageProof};
use crate::error::PipelineError;
use crate::stage::{ExecutorConfig, StageExecutor};

/// Shared flag checked before each stage starts
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything one successful run produced
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub context: PipelineContext,
    pub proofs: Vec<StageProof>,
    pub artifact: Option<PathBuf>,
}

impl PipelineRun {
    /// Output text of the terminal stage
    pub fn output(&self) -> &str {
        self.context
            .last()
            .map(|r| r.output_text.as_str())
            .unwrap_or_default()
    }
}

pub struct PipelineRunner {
    stages: Vec<StageDefinition>,
    executor: StageExecutor,
    pipeline_id: String,
}

impl PipelineRunner {
    /// Validate the stage list and bind it to a completion client.
    ///
    /// Stage names must be unique and distinct from the input keys,
    /// dependencies must run earlier, placeholders may only name input
    /// keys or declared dependencies, and only the terminal stage may
    /// persist an artifact.
    pub fn new(
        stages: Vec<StageDefinition>,
        client: Arc<dyn CompletionService>,
        config: ExecutorConfig,
    ) -> Result<Self, PipelineError> {
        validate(&stages)?;

        let pipeline_id = stages
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join("→");

        Ok(Self {
            stages,
            executor: StageExecutor::new(client, config),
            pipeline_id,
        })
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    /// Where the terminal stage writes its artifact, if it writes one
    pub fn artifact_path(&self) -> Option<PathBuf> {
        let file_name = self.stages.last()?.output_file.as_ref()?;
        Some(self.executor.config().output_dir.join(file_name))
    }

    /// Run every stage and return the terminal stage's output text
    pub async fn run(&self, input: &PipelineInput) -> Result<String, PipelineError> {
        let run = self.execute(input, &CancelToken::new()).await?;
        Ok(run.output().to_string())
    }

    /// Run every stage, keeping the full context and per-stage proofs.
    ///
    /// The first stage failure aborts the run; nothing after it executes.
    pub async fn execute(
        &self,
        input: &PipelineInput,
        cancel: &CancelToken,
    ) -> Result<PipelineRun, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline", %run_id, pipeline = %self.pipeline_id);

        async move {
            let started_at = Utc::now();
            tracing::info!(target_company = %input.target_company(), "pipeline started");

            let mut context = PipelineContext::new();
            let mut proofs = Vec::with_capacity(self.stages.len());

            for stage in &self.stages {
                if cancel.is_cancelled() {
                    tracing::warn!(stage = %stage.name, "pipeline cancelled");
                    return Err(PipelineError::Cancelled {
                        before_stage: stage.name.clone(),
                    });
                }

                let result = self
                    .executor
                    .execute(stage, input, &context)
                    .await
                    .map_err(|err| {
                        tracing::error!(stage = %err.stage, error = %err.cause, "pipeline aborted");
                        PipelineError::from(err)
                    })?;

                proofs.push(StageProof::from_result(&result));
                context.push(result);
            }

            let artifact = context.results().iter().rev().find_map(|r| r.artifact.clone());
            let finished_at = Utc::now();
            tracing::info!(
                elapsed_ms = (finished_at - started_at).num_milliseconds(),
                "pipeline finished"
            );

            Ok(PipelineRun {
                run_id,
                started_at,
                finished_at,
                context,
                proofs,
                artifact,
            })
        }
        .instrument(span)
        .await
    }
}

fn validate(stages: &[StageDefinition]) -> Result<(), PipelineError> {
    let invalid = |msg: String| -> Result<(), PipelineError> {
        Err(PipelineError::InvalidDefinition(msg))
    };

    if stages.is_empty() {
        return invalid("pipeline has no stages".to_string());
    }

    let input_keys = PipelineInput::keys();
    let last = stages.len() - 1;
    let mut seen: Vec<&str> = Vec::with_capacity(stages.len());

    for (index, stage) in stages.iter().enumerate() {
        let name = stage.name.as_str();

        if name.trim().is_empty() {
            return invalid(format!("stage #{} has an empty name", index + 1));
        }
        if input_keys.contains(&name) {
            return invalid(format!("stage name `{}` collides with an input field", name));
        }
        if seen.contains(&name) {
            return invalid(format!("stage `{}` is defined twice", name));
        }

        for dep in &stage.depends_on {
            if !seen.contains(&dep.as_str()) {
                return invalid(format!(
                    "stage `{}` depends on `{}`, which does not run before it",
                    name, dep
                ));
            }
        }

        for placeholder in stage.placeholders() {
            let known = input_keys.contains(&placeholder)
                || stage.depends_on.iter().any(|d| d == placeholder);
            if !known {
                return invalid(format!(
                    "stage `{}` references unknown placeholder `{}`",
                    name, placeholder
                ));
            }
        }

        if stage.output_file.is_some() && index != last {
            return invalid(format!(
                "stage `{}` persists an artifact but is not the terminal stage",
                name
            ));
        }

        seen.push(name);
    }

    Ok(())
}
