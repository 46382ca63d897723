//! Outreach prompts: placeholder rendering and stage-text files.
//!
//! Every stage prompt is a static template with single-brace
//! placeholders. Rendering is strict: a placeholder without a value
//! fails the render instead of leaking `{name}` into the model input.
//!
//! # Example
//!
//! ```
//! use outreach_prompts::{render, Variables};
//!
//! let vars = Variables::new()
//!     .with("target_company", "Acme")
//!     .with("our_product", "Widget");
//!
//! let prompt = render("Sell {our_product} to {target_company}.", &vars).unwrap();
//! assert_eq!(prompt, "Sell Widget to Acme.");
//! ```

pub mod renderer;
pub mod templates;

pub use renderer::{placeholders, render, Template, Variables};
pub use templates::{StageText, StageTextFile};

use thiserror::Error;

/// Errors raised while loading or rendering prompt text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("missing placeholder `{name}`")]
    MissingPlaceholder { name: String },
    #[error("stage file load failed: {0}")]
    Load(String),
    #[error("stage file parse failed: {0}")]
    Parse(String),
}
