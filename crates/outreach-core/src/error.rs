//! Unified Error Model
use std::path::PathBuf;

use outreach_prompts::TemplateError;
use thiserror::Error;

use crate::completion::CompletionError;

/// Why a single stage failed
#[derive(Debug, Error)]
pub enum StageFailure {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("completion failed after {attempts} attempt(s): {source}")]
    Completion {
        #[source]
        source: CompletionError,
        attempts: u32,
    },

    #[error("dependency `{0}` has no result in the pipeline context")]
    MissingDependency(String),

    #[error("failed to write artifact {}: {source}", .path.display())]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A stage failure tagged with the stage that raised it
#[derive(Debug, Error)]
#[error("stage `{stage}` failed: {cause}")]
pub struct StageExecutionError {
    pub stage: String,
    #[source]
    pub cause: StageFailure,
}

impl StageExecutionError {
    pub fn new(stage: impl Into<String>, cause: impl Into<StageFailure>) -> Self {
        Self {
            stage: stage.into(),
            cause: cause.into(),
        }
    }
}

/// The only error a pipeline caller needs to handle
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("STAGE/{}: {}", .0.stage, .0.cause)]
    Stage(#[from] StageExecutionError),

    #[error("INPUT/{0}")]
    InvalidInput(String),

    #[error("CANCELLED/before stage `{before_stage}`")]
    Cancelled { before_stage: String },

    #[error("DEFINITION/{0}")]
    InvalidDefinition(String),
}

impl PipelineError {
    /// Name of the failing stage, when a stage failed
    pub fn stage(&self) -> Option<&str> {
        match self {
            Self::Stage(err) => Some(&err.stage),
            Self::Cancelled { before_stage } => Some(before_stage),
            _ => None,
        }
    }
}
