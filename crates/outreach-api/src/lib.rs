//! Outreach API: browser page and JSON endpoints over the pipeline
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod ui;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use outreach_core::{CancelToken, ExecutorConfig, PipelineRunner};
use outreach_llm::{LlmConfig, OpenAiClient};
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;

use metrics::Metrics;
use ui::PageRenderer;

/// Shared across requests; the runner and its client are read-only
#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<PipelineRunner>,
    pub pages: Arc<PageRenderer>,
    pub metrics: Arc<Metrics>,
    /// Set on shutdown so in-flight runs stop before their next stage
    pub shutdown: CancelToken,
}

impl AppState {
    pub fn new(runner: PipelineRunner) -> anyhow::Result<Self> {
        Ok(Self {
            runner: Arc::new(runner),
            pages: Arc::new(PageRenderer::new().context("compiling page template")?),
            metrics: Arc::new(Metrics::new().context("registering metrics")?),
            shutdown: CancelToken::new(),
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit))
        .route("/v1/outreach", post(handlers::outreach))
        .route("/v1/outreach/download", post(handlers::download))
        .route("/v1/artifact", get(handlers::latest_artifact))
        .route("/v1/stages", get(handlers::list_stages))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the pipeline from configuration and serve until Ctrl-C
pub async fn run(llm: LlmConfig, api: ApiConfig) -> anyhow::Result<()> {
    let stages = outreach_stages::load_stages(api.stages_file.as_deref())
        .context("loading stage definitions")?;
    let client = OpenAiClient::new(&llm)?;
    let config = ExecutorConfig {
        output_dir: api.output_dir.clone(),
        ..llm.executor_config()
    };
    let runner = PipelineRunner::new(stages, Arc::new(client), config)?;

    let state = AppState::new(runner)?;
    let shutdown = state.shutdown.clone();
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&api.addr)
        .await
        .with_context(|| format!("failed to bind {}", api.addr))?;

    tracing::info!(addr = %api.addr, model = %llm.options.model, "outreach server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal(cancel: CancelToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
    cancel.cancel();
}
