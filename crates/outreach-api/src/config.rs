//! Server settings read from the environment.
use std::path::PathBuf;

use outreach_llm::config::parse_var;
use outreach_llm::ConfigError;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address (`OUTREACH_ADDR`)
    pub addr: String,
    /// Directory for the persisted strategy (`OUTREACH_OUTPUT_DIR`)
    pub output_dir: PathBuf,
    /// Optional stage-text overrides (`OUTREACH_STAGES_FILE`)
    pub stages_file: Option<PathBuf>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr: String = parse_var(&lookup, "OUTREACH_ADDR", "0.0.0.0:8501".to_string())?;
        let output_dir: PathBuf = parse_var(&lookup, "OUTREACH_OUTPUT_DIR", PathBuf::from("."))?;
        let stages_file = lookup("OUTREACH_STAGES_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            output_dir,
            stages_file,
        })
    }
}
