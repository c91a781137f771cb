//! LLM provider configuration routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tracing::error;

use healthlog_llm::{LLMConfigResponse, LLMConfigUpdate};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/llm/config", get(get_config).put(update_config))
}

async fn get_config(State(state): State<Arc<AppState>>) -> Json<LLMConfigResponse> {
    Json(state.llm_config.read().to_response())
}

async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<LLMConfigUpdate>,
) -> impl IntoResponse {
    let response = {
        let mut config = state.llm_config.write();
        config.apply_update(&update);
        if let Err(e) = config.save() {
            error!("Failed to save LLM config: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("Failed to save config: {}", e) })),
            )
                .into_response();
        }
        config.to_response()
    };

    state.reload_orchestrator();
    (StatusCode::OK, Json(response)).into_response()
}
