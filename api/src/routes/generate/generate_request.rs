use item_qa::{Answer, Query};
use serde::{Deserialize, Serialize};

use crate::error_handler::AppError;

/// Request payload for /generate.
///
/// Fields are optional at the serde level so a missing field is reported as
/// 400 with a readable message instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Item identifier, e.g. `diamondpickaxe`.
    #[serde(default, alias = "item_type")]
    pub item_type: Option<String>,
    /// Natural language question.
    #[serde(default)]
    pub question: Option<String>,
}

impl GenerateRequest {
    pub fn into_query(self) -> Result<Query, AppError> {
        let item_type = required(self.item_type);
        let question = required(self.question);
        match (item_type, question) {
            (Some(item_type), Some(question)) => Ok(Query::new(item_type, question)),
            _ => Err(AppError::BadRequest(
                "Missing required fields: itemType and question".into(),
            )),
        }
    }
}

/// Non-blank value, trimmed.
pub(crate) fn required(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Response payload for /generate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_snippet: Option<String>,
    /// Seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<f64>,
}

impl From<Answer> for GenerateResponse {
    fn from(a: Answer) -> Self {
        Self {
            response: a.response,
            initial_response: a.initial_response,
            context_snippet: a.context_snippet,
            time_taken: a.time_taken,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_are_missing() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"itemType":"  ","question":"Who?"}"#).unwrap();
        assert!(matches!(req.into_query(), Err(AppError::BadRequest(_))));

        let req: GenerateRequest = serde_json::from_str(r#"{"question":"Who?"}"#).unwrap();
        assert!(req.into_query().is_err());
    }

    #[test]
    fn accepts_snake_case_alias() {
        let req: GenerateRequest =
            serde_json::from_str(r#"{"item_type":"veganfur","question":" What is it? "}"#)
                .unwrap();
        let q = req.into_query().unwrap();
        assert_eq!(q, Query::new("veganfur", "What is it?"));
    }
}
