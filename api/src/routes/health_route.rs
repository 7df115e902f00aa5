//! GET /health: model backend probe.

use std::sync::Arc;

use ai_model_service::HealthStatus;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub variant: &'static str,
    #[serde(flatten)]
    pub status: HealthStatus,
}

/// 200 when the backend serves the model, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let status = state.qa.model().health().await;
    let code = if status.ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        code,
        Json(HealthResponse {
            variant: state.variant().as_str(),
            status,
        }),
    )
}
