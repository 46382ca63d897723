//! Outreach Core: stage model, executor and sequential runner
//!
//! A pipeline is an ordered list of [`StageDefinition`]s. Each stage
//! renders its prompt from the [`PipelineInput`] plus the outputs of the
//! stages it depends on, sends it to a [`CompletionService`], and hands
//! its output to every later stage. The first failure aborts the run.

pub mod artifact;
pub mod completion;
pub mod context;
pub mod data_model;
pub mod error;
pub mod runner;
pub mod stage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use completion::{CompletionError, CompletionOptions, CompletionRequest, CompletionService};
pub use context::PipelineContext;
pub use data_model::{AgentRole, PipelineInput, StageDefinition, StageProof, StageResult};
pub use error::{PipelineError, StageExecutionError, StageFailure};
pub use runner::{CancelToken, PipelineRun, PipelineRunner};
pub use stage::{ExecutorConfig, RetryPolicy, StageExecutor};

/// Engine version reported by the API
pub const OUTREACH_VERSION: &str = "1.0.0";
