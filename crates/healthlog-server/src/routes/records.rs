//! Record parsing routes.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use healthlog_core::{Domain, ExtractHint};
use healthlog_runtime::RecordDraft;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/records/parse", post(parse))
        .route("/records/status", get(status))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub text: String,
    #[serde(default)]
    pub body_weight_kg: Option<f64>,
    /// Restrict extraction to one domain.
    #[serde(default)]
    pub hint: Option<Domain>,
    #[serde(default)]
    pub record_mode: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub drafts: Vec<RecordDraft>,
    pub duration_ms: u64,
}

async fn parse(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ParseRequest>,
) -> impl IntoResponse {
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "text is required" })),
        )
            .into_response();
    }

    let start = Instant::now();
    let hint = ExtractHint {
        domain: req.hint,
        record_mode: req.record_mode,
    };
    let drafts = state
        .orchestrator()
        .ingest(&req.text, req.body_weight_kg, hint)
        .await;

    Json(ParseResponse {
        drafts,
        duration_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}

async fn status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let resolved = state.llm_config.read().resolve_provider();
    let pipeline = &state.config.pipeline;

    Json(serde_json::json!({
        "llmAvailable": resolved.is_some() && pipeline.use_model,
        "llmProvider": resolved.as_ref().map(|s| s.provider.to_string()),
        "model": resolved.as_ref().map(|s| s.model.clone()),
        "confidenceFloor": pipeline.confidence_floor,
        "modelTimeoutMs": pipeline.model_timeout.as_millis() as u64,
    }))
}
