//! Typed error for the item-qa crate.

use ai_model_service::AiModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ItemQaError {
    /// The identifier is not in the catalog.
    #[error("Unknown item type: {0}")]
    UnknownItem(String),

    /// The identifier is known but its context file cannot be used.
    #[error("Context not found for item `{item}`: {reason}")]
    ContextUnavailable { item: String, reason: String },

    /// The catalog file is missing, unreadable or malformed (startup).
    #[error("Invalid item catalog {path}: {reason}")]
    Catalog { path: String, reason: String },

    /// A configuration value could not be used (startup).
    #[error("Invalid configuration in {var}: {reason}")]
    Config { var: &'static str, reason: String },

    /// Inference failed in the model backend.
    #[error(transparent)]
    Model(#[from] AiModelError),
}

impl ItemQaError {
    /// `true` for the "no answer possible" cases a caller maps to 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ItemQaError::UnknownItem(_) | ItemQaError::ContextUnavailable { .. }
        )
    }
}
