//! POST /generate: answers a question about one item.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::generate::generate_request::{GenerateRequest, GenerateResponse},
};

/// Handler: POST /generate
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/generate \
///   -H 'content-type: application/json' \
///   -d '{"itemType":"diamondpickaxe","question":"Who crafted the Diamond Pickaxe?"}'
/// ```
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerateResponse>> {
    let Json(body) = payload?;
    let query = body.into_query()?;

    let answer = state.qa.answer(&query).await?;

    Ok(Json(answer.into()))
}
