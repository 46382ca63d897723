//! Pipeline Context: results of the stages completed so far
use serde::Serialize;

use crate::data_model::StageResult;

/// Ordered stage results, appended as stages complete
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineContext {
    results: Vec<StageResult>,
}

impl PipelineContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the runner appends, once per completed stage.
    pub(crate) fn push(&mut self, result: StageResult) {
        self.results.push(result);
    }

    pub fn get(&self, stage: &str) -> Option<&StageResult> {
        self.results.iter().find(|r| r.stage_name == stage)
    }

    pub fn results(&self) -> &[StageResult] {
        &self.results
    }

    pub fn last(&self) -> Option<&StageResult> {
        self.results.last()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.stage_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
