//! Data Model: PipelineInput, StageDefinition, StageResult, StageProof
use std::path::PathBuf;

use outreach_prompts::{placeholders, render, TemplateError, Variables};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Placeholder name for the company being prospected
pub const TARGET_COMPANY: &str = "target_company";
/// Placeholder name for the product being sold
pub const OUR_PRODUCT: &str = "our_product";

/// The two user-supplied strings, validated once per run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineInput {
    target_company: String,
    our_product: String,
}

impl PipelineInput {
    /// Trims both fields and rejects empty ones
    pub fn new(target_company: &str, our_product: &str) -> Result<Self, PipelineError> {
        let target_company = target_company.trim();
        let our_product = our_product.trim();

        if target_company.is_empty() {
            return Err(PipelineError::InvalidInput(
                "target company must not be empty".to_string(),
            ));
        }
        if our_product.is_empty() {
            return Err(PipelineError::InvalidInput(
                "product description must not be empty".to_string(),
            ));
        }

        Ok(Self {
            target_company: target_company.to_string(),
            our_product: our_product.to_string(),
        })
    }

    pub fn target_company(&self) -> &str {
        &self.target_company
    }

    pub fn our_product(&self) -> &str {
        &self.our_product
    }

    /// Placeholder mapping seeded with the input fields
    pub fn variables(&self) -> Variables {
        Variables::new()
            .with(TARGET_COMPANY, self.target_company.as_str())
            .with(OUR_PRODUCT, self.our_product.as_str())
    }

    /// Placeholder names every stage may reference
    pub fn keys() -> [&'static str; 2] {
        [TARGET_COMPANY, OUR_PRODUCT]
    }
}

/// The persona a stage speaks as
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRole {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl AgentRole {
    /// Render the system message for this role
    pub fn system_prompt(&self, vars: &Variables) -> Result<String, TemplateError> {
        let role = render(&self.role, vars)?;
        let goal = render(&self.goal, vars)?;
        let backstory = render(&self.backstory, vars)?;
        Ok(format!(
            "You are the {}.\n\nGoal: {}\n\n{}",
            role.trim(),
            goal.trim(),
            backstory.trim()
        ))
    }
}

/// Static definition of one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDefinition {
    /// Unique stage name, also the heading of its output in later prompts
    pub name: String,
    pub role: AgentRole,
    pub prompt_template: String,
    /// Description of the deliverable, appended to the prompt
    pub expected_output: String,
    /// Earlier stages whose output this stage receives as context
    pub depends_on: Vec<String>,
    /// File the output is persisted to (terminal stage only)
    pub output_file: Option<String>,
}

impl StageDefinition {
    /// Every placeholder referenced by the role, prompt and expected output
    pub fn placeholders(&self) -> Vec<&str> {
        let sources = [
            self.role.role.as_str(),
            self.role.goal.as_str(),
            self.role.backstory.as_str(),
            self.prompt_template.as_str(),
            self.expected_output.as_str(),
        ];

        let mut names: Vec<&str> = Vec::new();
        for source in sources {
            for name in placeholders(source) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

/// Output of one executed stage
#[derive(Debug, Clone, Serialize)]
pub struct StageResult {
    pub stage_name: String,
    pub system_prompt: String,
    pub rendered_prompt: String,
    pub output_text: String,
    pub latency_ms: u64,
    pub attempts: u32,
    pub artifact: Option<PathBuf>,
}

/// Compact, hash-based record of a stage for run reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageProof {
    pub stage: String,
    pub prompt_hash: String,
    pub output_hash: String,
    pub latency_ms: u64,
    pub attempts: u32,
}

impl StageProof {
    pub fn from_result(result: &StageResult) -> Self {
        Self {
            stage: result.stage_name.clone(),
            prompt_hash: hash_text(&result.rendered_prompt),
            output_hash: hash_text(&result.output_text),
            latency_ms: result.latency_ms,
            attempts: result.attempts,
        }
    }
}

fn hash_text(text: &str) -> String {
    format!("blake3:{}", blake3::hash(text.as_bytes()).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_is_trimmed() {
        let input = PipelineInput::new("  Globex ", "AI CRM\n").unwrap();
        assert_eq!(input.target_company(), "Globex");
        assert_eq!(input.our_product(), "AI CRM");

        let vars = input.variables();
        assert_eq!(vars.get(TARGET_COMPANY), Some("Globex"));
        assert_eq!(vars.get(OUR_PRODUCT), Some("AI CRM"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            PipelineInput::new("   ", "AI CRM"),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            PipelineInput::new("Globex", ""),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_system_prompt_renders_role() {
        let role = AgentRole {
            role: "Company Researcher".to_string(),
            goal: "Understand {target_company}".to_string(),
            backstory: "You read annual reports for fun.".to_string(),
        };
        let input = PipelineInput::new("Acme", "Widget").unwrap();

        let system = role.system_prompt(&input.variables()).unwrap();
        assert!(system.starts_with("You are the Company Researcher."));
        assert!(system.contains("Goal: Understand Acme"));
    }

    #[test]
    fn test_definition_placeholders_deduplicated() {
        let stage = StageDefinition {
            name: "research".to_string(),
            role: AgentRole {
                role: "Researcher".to_string(),
                goal: "Study {target_company}".to_string(),
                backstory: String::new(),
            },
            prompt_template: "{target_company} and {our_product}".to_string(),
            expected_output: "Notes on {research_scope}".to_string(),
            depends_on: Vec::new(),
            output_file: None,
        };

        assert_eq!(
            stage.placeholders(),
            vec!["target_company", "our_product", "research_scope"]
        );
    }

    #[test]
    fn test_proof_hashes() {
        let result = StageResult {
            stage_name: "research".to_string(),
            system_prompt: String::new(),
            rendered_prompt: "prompt".to_string(),
            output_text: "output".to_string(),
            latency_ms: 12,
            attempts: 1,
            artifact: None,
        };

        let proof = StageProof::from_result(&result);
        assert!(proof.prompt_hash.starts_with("blake3:"));
        assert_ne!(proof.prompt_hash, proof.output_hash);
        assert_eq!(proof.latency_ms, 12);
    }
}
