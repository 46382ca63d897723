//! API Handlers
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use outreach_core::{PipelineError, PipelineInput, PipelineRun, OUTREACH_VERSION};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::ui::PageView;
use crate::AppState;

/// File name offered to the browser for downloads
pub const DOWNLOAD_FILE_NAME: &str = "sales_contacts.md";

#[derive(Debug, Default, Deserialize)]
pub struct OutreachForm {
    #[serde(default)]
    pub target_company: String,
    #[serde(default)]
    pub our_product: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub markdown: String,
}

pub async fn index(State(state): State<AppState>) -> Response {
    page(&state, &PageView::default())
}

pub async fn submit(State(state): State<AppState>, Form(form): Form<OutreachForm>) -> Response {
    let mut view = PageView {
        target_company: form.target_company.clone(),
        our_product: form.our_product.clone(),
        ..PageView::default()
    };

    match PipelineInput::new(&form.target_company, &form.our_product) {
        Err(_) => view.warning = Some("Please fill in all fields".to_string()),
        Ok(input) => match run_pipeline(&state, &input).await {
            Ok(run) => view.markdown = Some(run.output().to_string()),
            Err(err) => view.error = Some(err.to_string()),
        },
    }

    page(&state, &view)
}

pub async fn outreach(
    State(state): State<AppState>,
    Json(request): Json<OutreachForm>,
) -> (StatusCode, Json<Value>) {
    let input = match PipelineInput::new(&request.target_company, &request.our_product) {
        Ok(input) => input,
        Err(err) => return error_response(&err),
    };

    match run_pipeline(&state, &input).await {
        Ok(run) => (
            StatusCode::OK,
            Json(json!({
                "run_id": run.run_id,
                "pipeline": state.runner.pipeline_id(),
                "started_at": run.started_at,
                "finished_at": run.finished_at,
                "markdown": run.output(),
                "artifact": run.artifact,
                "stages": run.proofs,
            })),
        ),
        Err(err) => error_response(&err),
    }
}

pub async fn download(Form(form): Form<DownloadForm>) -> Response {
    if form.markdown.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "nothing to download").into_response();
    }
    markdown_attachment(form.markdown)
}

/// The strategy persisted by the most recent run
pub async fn latest_artifact(State(state): State<AppState>) -> Response {
    let Some(path) = state.runner.artifact_path() else {
        return (StatusCode::NOT_FOUND, "pipeline does not persist an artifact").into_response();
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(markdown) => markdown_attachment(markdown),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "no strategy has been generated yet").into_response()
        }
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "failed to read artifact");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read artifact").into_response()
        }
    }
}

pub async fn list_stages(State(state): State<AppState>) -> Json<Value> {
    let stages: Vec<Value> = state
        .runner
        .stages()
        .iter()
        .map(|stage| {
            json!({
                "name": stage.name,
                "role": stage.role.role,
                "depends_on": stage.depends_on,
                "output_file": stage.output_file,
            })
        })
        .collect();

    Json(json!({
        "pipeline": state.runner.pipeline_id(),
        "stages": stages,
    }))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": OUTREACH_VERSION })),
    )
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn run_pipeline(state: &AppState, input: &PipelineInput) -> Result<PipelineRun, PipelineError> {
    let result = state.runner.execute(input, &state.shutdown).await;
    match &result {
        Ok(run) => state.metrics.record_success(&run.proofs),
        Err(err) => {
            tracing::warn!(error = %err, "outreach run failed");
            state.metrics.record_failure();
        }
    }
    result
}

fn error_response(err: &PipelineError) -> (StatusCode, Json<Value>) {
    let status = match err {
        PipelineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PipelineError::Stage(_) => StatusCode::BAD_GATEWAY,
        PipelineError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PipelineError::InvalidDefinition(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(json!({ "error": err.to_string(), "stage": err.stage() })),
    )
}

fn page(state: &AppState, view: &PageView) -> Response {
    match state.pages.render(view) {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
        }
    }
}

fn markdown_attachment(markdown: String) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME);
    (
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        markdown,
    )
        .into_response()
}
