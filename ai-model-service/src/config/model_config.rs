use crate::config::model_provider::ModelProvider;

/// Connection settings for the model backend.
///
/// Task-specific knobs (answer length, sampling) are not part of this struct:
/// they travel with each [`crate::ModelRequest`].
///
/// # Examples
///
/// ```
/// use ai_model_service::{ModelConfig, ModelProvider};
///
/// let cfg = ModelConfig {
///     provider: ModelProvider::HuggingFace,
///     model: "deepset/roberta-base-squad2".to_string(),
///     endpoint: "https://api-inference.huggingface.co".to_string(),
///     api_key: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.base_url(), "https://api-inference.huggingface.co");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// The runtime hosting the model.
    pub provider: ModelProvider,

    /// Model identifier (e.g., `"google/flan-t5-large"`, `"llama3.2"`).
    pub model: String,

    /// Base URL of the runtime.
    pub endpoint: String,

    /// Optional bearer token (Hugging Face).
    pub api_key: Option<String>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl ModelConfig {
    /// Endpoint without surrounding whitespace and trailing slashes.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}
