use serde::{Deserialize, Serialize};

use crate::{error_handler::AppError, routes::generate::generate_request::required};

/// Request payload for /refine.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    #[serde(default)]
    pub question: Option<String>,
    /// Answer to restate, usually a previous /generate response.
    #[serde(default, alias = "initial_answer")]
    pub initial_answer: Option<String>,
}

impl RefineRequest {
    /// `(question, initial_answer)`, both non-blank.
    pub fn into_parts(self) -> Result<(String, String), AppError> {
        match (required(self.question), required(self.initial_answer)) {
            (Some(q), Some(a)) => Ok((q, a)),
            _ => Err(AppError::BadRequest(
                "Missing required fields: question and initialAnswer".into(),
            )),
        }
    }
}

/// Response payload for /refine.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineResponse {
    pub refined_response: String,
}
