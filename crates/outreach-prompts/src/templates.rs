//! Stage-text files.
//!
//! Lets a deployment replace the role and prompt text of the built-in
//! stages without touching code:
//!
//! ```yaml
//! version: "1.0"
//! stages:
//!   research:
//!     goal: "Profile {target_company} for an enterprise sale"
//!     prompt: "Summarize {target_company} ..."
//! ```
//!
//! Every field is optional; omitted fields keep the built-in text.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::TemplateError;

/// Top-level stage-text file structure
#[derive(Debug, Clone, Deserialize)]
pub struct StageTextFile {
    pub version: String,
    #[serde(default)]
    pub stages: BTreeMap<String, StageText>,
}

/// Replacement text for one stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageText {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub backstory: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
}

impl StageTextFile {
    /// Load a stage-text file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| TemplateError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Parse stage text from YAML content
    pub fn from_yaml(yaml: &str) -> Result<Self, TemplateError> {
        serde_yaml::from_str(yaml).map_err(|e| TemplateError::Parse(e.to_string()))
    }

    pub fn get(&self, stage: &str) -> Option<&StageText> {
        self.stages.get(stage)
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.keys().map(String::as_str).collect()
    }
}
