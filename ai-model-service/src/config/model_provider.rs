use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Represents the runtime (backend) that hosts the pretrained model.
///
/// # Examples
///
/// ```
/// use ai_model_service::ModelProvider;
///
/// let provider: ModelProvider = "ollama".parse().unwrap();
/// assert_eq!(provider, ModelProvider::Ollama);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelProvider {
    /// Hugging Face Inference API (or any server speaking the same protocol,
    /// e.g. a self-hosted inference endpoint).
    HuggingFace,
    /// Local Ollama runtime.
    Ollama,
}

impl ModelProvider {
    /// Stable lowercase name used in config and health output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::HuggingFace => "huggingface",
            ModelProvider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" | "hugging-face" => Ok(ModelProvider::HuggingFace),
            "ollama" => Ok(ModelProvider::Ollama),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
