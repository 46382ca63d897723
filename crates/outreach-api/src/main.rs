//! Binary entrypoint for the outreach server.
use anyhow::Context;
use outreach_api::{run, ApiConfig};
use outreach_llm::LlmConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Credentials are checked here, before any request is served.
    let llm = LlmConfig::from_env().context("completion service configuration")?;
    let api = ApiConfig::from_env().context("server configuration")?;

    run(llm, api).await
}
