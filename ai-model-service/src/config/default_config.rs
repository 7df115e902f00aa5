//! Model backend config loaded from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `MODEL_PROVIDER`     = `huggingface` (default) or `ollama`
//! - `MODEL_NAME`         = model identifier; defaults to the variant's model
//!   for Hugging Face, mandatory for Ollama
//! - `MODEL_TIMEOUT_SECS` = optional request timeout (u64, default 120)
//!
//! Hugging Face:
//! - `MODEL_ENDPOINT` = base URL (default `https://api-inference.huggingface.co`)
//! - `HF_API_TOKEN`   = optional bearer token
//!
//! Ollama:
//! - `MODEL_ENDPOINT`, `OLLAMA_URL` or `OLLAMA_PORT` = endpoint (mandatory)

use crate::{
    config::{model_config::ModelConfig, model_provider::ModelProvider},
    error_handler::{
        AiModelError, ConfigError, Result, env_opt, opt_u64, validate_http_endpoint,
    },
};

/// Public Hugging Face Inference API.
pub const HF_DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co";

/// Model calls may wait for a cold model to load, so the default is generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Builds a [`ModelConfig`] from the process environment.
///
/// `default_model` is used when `MODEL_NAME` is unset and the provider is
/// Hugging Face (the model ids there are the upstream pipeline ids).
///
/// # Errors
/// Any [`ConfigError`] described in [`config_from_vars`].
pub fn config_from_env(default_model: &str) -> Result<ModelConfig> {
    config_from_vars(env_opt, default_model)
}

/// Builds a [`ModelConfig`] from an arbitrary variable lookup.
///
/// `var` must return `None` for unset or empty variables.
///
/// # Errors
/// - [`ConfigError::UnsupportedProvider`] for an unknown `MODEL_PROVIDER`
/// - [`ConfigError::MissingVar`] when Ollama is selected without a model or endpoint
/// - [`ConfigError::EmptyModel`] when the resolved model name is blank
/// - [`ConfigError::InvalidNumber`] / [`ConfigError::InvalidFormat`] for malformed values
pub fn config_from_vars<F>(var: F, default_model: &str) -> Result<ModelConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match var("MODEL_PROVIDER") {
        Some(p) => p.parse::<ModelProvider>()?,
        None => ModelProvider::HuggingFace,
    };

    let (model, endpoint, api_key) = match provider {
        ModelProvider::HuggingFace => (
            var("MODEL_NAME").unwrap_or_else(|| default_model.to_string()),
            var("MODEL_ENDPOINT").unwrap_or_else(|| HF_DEFAULT_ENDPOINT.to_string()),
            var("HF_API_TOKEN"),
        ),
        ModelProvider::Ollama => (
            var("MODEL_NAME").ok_or(ConfigError::MissingVar("MODEL_NAME"))?,
            ollama_endpoint(&var)?,
            None,
        ),
    };

    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }
    validate_http_endpoint("MODEL_ENDPOINT", &endpoint)?;

    let timeout_secs = opt_u64("MODEL_TIMEOUT_SECS", var("MODEL_TIMEOUT_SECS").as_deref())?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(ModelConfig {
        provider,
        model: model.trim().to_string(),
        endpoint,
        api_key,
        timeout_secs: Some(timeout_secs),
    })
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `MODEL_ENDPOINT`
/// 2. `OLLAMA_URL`
/// 3. `OLLAMA_PORT` → `http://localhost:{port}`
fn ollama_endpoint<F>(var: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = var("MODEL_ENDPOINT").or_else(|| var("OLLAMA_URL")) {
        return Ok(url);
    }
    if let Some(port) = var("OLLAMA_PORT") {
        port.parse::<u16>().map_err(|_| ConfigError::InvalidNumber {
            var: "OLLAMA_PORT",
            reason: "expected u16 (1..=65535)",
        })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Err(AiModelError::Config(ConfigError::MissingVar(
        "MODEL_ENDPOINT, OLLAMA_URL or OLLAMA_PORT",
    )))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn huggingface_defaults() {
        let cfg = config_from_vars(vars(&[]), "deepset/roberta-base-squad2").unwrap();
        assert_eq!(cfg.provider, ModelProvider::HuggingFace);
        assert_eq!(cfg.model, "deepset/roberta-base-squad2");
        assert_eq!(cfg.endpoint, HF_DEFAULT_ENDPOINT);
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.timeout_secs, Some(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn huggingface_overrides() {
        let cfg = config_from_vars(
            vars(&[
                ("MODEL_NAME", "google/flan-t5-base"),
                ("MODEL_ENDPOINT", "http://127.0.0.1:8080"),
                ("HF_API_TOKEN", "hf_secret"),
                ("MODEL_TIMEOUT_SECS", "15"),
            ]),
            "ignored",
        )
        .unwrap();
        assert_eq!(cfg.model, "google/flan-t5-base");
        assert_eq!(cfg.endpoint, "http://127.0.0.1:8080");
        assert_eq!(cfg.api_key.as_deref(), Some("hf_secret"));
        assert_eq!(cfg.timeout_secs, Some(15));
    }

    #[test]
    fn ollama_requires_model_name() {
        let err = config_from_vars(
            vars(&[("MODEL_PROVIDER", "ollama"), ("OLLAMA_PORT", "11434")]),
            "google/flan-t5-large",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AiModelError::Config(ConfigError::MissingVar("MODEL_NAME"))
        ));
    }

    #[test]
    fn ollama_endpoint_from_port() {
        let cfg = config_from_vars(
            vars(&[
                ("MODEL_PROVIDER", "ollama"),
                ("MODEL_NAME", "llama3.2"),
                ("OLLAMA_PORT", "11500"),
            ]),
            "unused",
        )
        .unwrap();
        assert_eq!(cfg.provider, ModelProvider::Ollama);
        assert_eq!(cfg.endpoint, "http://localhost:11500");
    }

    #[test]
    fn ollama_rejects_bad_port() {
        let err = config_from_vars(
            vars(&[
                ("MODEL_PROVIDER", "ollama"),
                ("MODEL_NAME", "llama3.2"),
                ("OLLAMA_PORT", "not-a-port"),
            ]),
            "unused",
        )
        .unwrap_err();
        assert!(err.to_string().contains("OLLAMA_PORT"));
    }

    #[test]
    fn unknown_provider_and_bad_endpoint() {
        assert!(config_from_vars(vars(&[("MODEL_PROVIDER", "tensorflow")]), "m").is_err());
        assert!(config_from_vars(vars(&[("MODEL_ENDPOINT", "localhost")]), "m").is_err());
    }
}
