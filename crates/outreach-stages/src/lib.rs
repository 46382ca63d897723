//! Outreach Stages: the four built-in stage definitions.
//!
//! # Pipeline Flow
//!
//! ```text
//! research → org_structure → contacts → strategy → buyer_contact.md
//!    ↓             ↓             ↓           ↓
//! overview    departments    role table   outreach plan
//! ```
//!
//! Each stage receives the output of every stage before it as context.
//! Role and prompt text can be replaced per deployment with a YAML
//! stage-text file; the order and dependencies cannot.

pub mod company_researcher;
pub mod contact_finder;
pub mod org_structure_analyst;
pub mod sales_strategist;

use std::path::Path;

use outreach_core::StageDefinition;
use outreach_prompts::{StageTextFile, TemplateError};
use thiserror::Error;

pub use sales_strategist::ARTIFACT_FILE;

#[derive(Debug, Error)]
pub enum StagesError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("stage file overrides unknown stage `{0}`")]
    UnknownStage(String),
}

/// Stage names in execution order
pub const STAGE_NAMES: [&str; 4] = [
    company_researcher::NAME,
    org_structure_analyst::NAME,
    contact_finder::NAME,
    sales_strategist::NAME,
];

/// The standard four-stage pipeline
pub fn default_stages() -> Vec<StageDefinition> {
    vec![
        company_researcher::definition(),
        org_structure_analyst::definition(),
        contact_finder::definition(),
        sales_strategist::definition(),
    ]
}

/// Built-in stages, with text overrides applied when a file is given
pub fn load_stages(overrides: Option<&Path>) -> Result<Vec<StageDefinition>, StagesError> {
    let mut stages = default_stages();
    if let Some(path) = overrides {
        let file = StageTextFile::load(path)?;
        apply_overrides(&mut stages, &file)?;
        tracing::info!(path = %path.display(), stages = file.stages.len(), "stage text overrides loaded");
    }
    Ok(stages)
}

/// Replace role and prompt text from a stage-text file.
///
/// Placeholder rules are checked later, when the runner is built.
pub fn apply_overrides(
    stages: &mut [StageDefinition],
    file: &StageTextFile,
) -> Result<(), StagesError> {
    for name in file.stage_names() {
        if !stages.iter().any(|s| s.name == name) {
            return Err(StagesError::UnknownStage(name.to_string()));
        }
    }

    for stage in stages.iter_mut() {
        let Some(text) = file.get(&stage.name) else {
            continue;
        };

        if let Some(role) = &text.role {
            stage.role.role = role.clone();
        }
        if let Some(goal) = &text.goal {
            stage.role.goal = goal.clone();
        }
        if let Some(backstory) = &text.backstory {
            stage.role.backstory = backstory.clone();
        }
        if let Some(prompt) = &text.prompt {
            stage.prompt_template = prompt.clone();
        }
        if let Some(expected) = &text.expected_output {
            stage.expected_output = expected.clone();
        }
    }

    Ok(())
}
