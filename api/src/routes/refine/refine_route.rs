//! POST /refine: restates an initial answer as a complete sentence.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::refine::refine_request::{RefineRequest, RefineResponse},
};

/// Handler: POST /refine
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5000/refine \
///   -H 'content-type: application/json' \
///   -d '{"question":"Who crafted the Diamond Pickaxe?","initialAnswer":"Steve"}'
/// ```
pub async fn refine(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RefineRequest>, JsonRejection>,
) -> AppResult<Json<RefineResponse>> {
    let Json(body) = payload?;
    let (question, initial_answer) = body.into_parts()?;

    let refined_response = state.qa.refine(&question, &initial_answer).await?;

    Ok(Json(RefineResponse { refined_response }))
}
