//! Health probes for the model backends.
//!
//! - Ollama: `GET {endpoint}/api/tags` (best-effort model existence check)
//! - Hugging Face: `GET {endpoint}/status/{model}` (best-effort load state)
//!
//! The returned [`HealthStatus`] is JSON-serializable and suitable for a
//! `/health` endpoint. [`HealthService::check`] is resilient and never fails
//! (errors mapped to `ok=false`). Provider-specific probes (`try_*`) return a
//! strict `Result`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::model_config::ModelConfig;
use crate::config::model_provider::ModelProvider;
use crate::error_handler::{AiModelError, ProviderError, make_snippet, transport_error};

/// A serializable health snapshot for a single backend/model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    /// Backend/provider (e.g., "huggingface", "ollama").
    pub provider: String,
    /// Target endpoint base URL.
    pub endpoint: String,
    /// Model identifier relevant to the probe.
    pub model: Option<String>,
    /// Overall health flag.
    pub ok: bool,
    /// Measured HTTP latency in milliseconds for the probe.
    pub latency_ms: u128,
    /// Short human-readable message with details.
    pub message: String,
}

impl HealthStatus {
    pub fn ok(
        provider: &str,
        endpoint: &str,
        model: Option<&str>,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.to_string(),
            endpoint: endpoint.to_string(),
            model: model.map(str::to_string),
            ok: true,
            latency_ms,
            message: message.into(),
        }
    }

    pub fn fail(
        provider: &str,
        endpoint: &str,
        model: Option<&str>,
        latency_ms: u128,
        message: impl Into<String>,
    ) -> Self {
        Self {
            ok: false,
            ..Self::ok(provider, endpoint, model, latency_ms, message)
        }
    }
}

/// A health checker that reuses a single HTTP client.
pub struct HealthService {
    client: reqwest::Client,
    default_timeout: Duration,
}

impl HealthService {
    /// Creates a new health service with an optional client timeout (seconds).
    ///
    /// # Errors
    /// Returns [`AiModelError::HttpTransport`] if the HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiModelError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        debug!(
            default_timeout_secs = timeout.as_secs(),
            "HealthService initialized"
        );

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Checks health for a model config, routing to the provider-specific probe.
    ///
    /// Never returns an error. Any failure is converted to
    /// `HealthStatus { ok: false, message: ... }`.
    pub async fn check(&self, cfg: &ModelConfig) -> HealthStatus {
        let start = Instant::now();
        let result = match cfg.provider {
            ModelProvider::Ollama => self.try_probe_ollama(cfg).await,
            ModelProvider::HuggingFace => self.try_probe_huggingface(cfg).await,
        };

        match result {
            Ok(mut status) => {
                if status.latency_ms == 0 {
                    status.latency_ms = start.elapsed().as_millis();
                }
                info!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    model = %status.model.as_deref().unwrap_or("n/a"),
                    ok = status.ok,
                    latency_ms = status.latency_ms,
                    "health probe completed"
                );
                status
            }
            Err(err) => {
                let status = HealthStatus::fail(
                    cfg.provider.as_str(),
                    &cfg.endpoint,
                    Some(&cfg.model),
                    start.elapsed().as_millis(),
                    err.to_string(),
                );
                warn!(
                    provider = %status.provider,
                    endpoint = %status.endpoint,
                    model = %status.model.as_deref().unwrap_or("n/a"),
                    latency_ms = status.latency_ms,
                    message = %status.message,
                    "health probe failed"
                );
                status
            }
        }
    }

    /// Strict Ollama probe.
    ///
    /// - `GET {endpoint}/api/tags`
    /// - Ensure 2xx
    /// - Best-effort: verify `cfg.model` exists in the returned tags
    async fn try_probe_ollama(&self, cfg: &ModelConfig) -> Result<HealthStatus, AiModelError> {
        let url = format!("{}/api/tags", cfg.base_url());
        let (latency, resp) = self.get(cfg, &url, None).await?;

        // Expected minimal JSON: { "models": [ { "name": "<model>" }, ... ] }
        #[derive(serde::Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(serde::Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        let provider = cfg.provider.as_str();
        let status = match resp.json::<Tags>().await {
            Ok(Tags {
                models: Some(models),
            }) => {
                // Ollama lists `name:tag`; a bare name means `:latest`.
                let wanted = &cfg.model;
                let exists = models.iter().any(|m| {
                    m.name == *wanted || m.name.strip_suffix(":latest") == Some(wanted.as_str())
                });
                if exists {
                    HealthStatus::ok(
                        provider,
                        &cfg.endpoint,
                        Some(&cfg.model),
                        latency,
                        "Ollama is healthy; model is available",
                    )
                } else {
                    HealthStatus::fail(
                        provider,
                        &cfg.endpoint,
                        Some(&cfg.model),
                        latency,
                        "Ollama is up, but model not found in /api/tags",
                    )
                }
            }
            Ok(Tags { models: None }) => HealthStatus::ok(
                provider,
                &cfg.endpoint,
                Some(&cfg.model),
                latency,
                "Ollama is healthy; tags response without `models` field",
            ),
            Err(e) => {
                warn!(
                    endpoint = %cfg.endpoint,
                    model = %cfg.model,
                    error = %e,
                    "failed to decode /api/tags; treating server as reachable"
                );
                HealthStatus::ok(
                    provider,
                    &cfg.endpoint,
                    Some(&cfg.model),
                    latency,
                    format!("Ollama is reachable; failed to decode /api/tags: {e}"),
                )
            }
        };
        Ok(status)
    }

    /// Strict Hugging Face probe.
    ///
    /// - `GET {endpoint}/status/{model}` (bearer token when configured)
    /// - Ensure 2xx
    /// - Best-effort: report the `state` field (`Loaded`, `Loadable`, ...)
    async fn try_probe_huggingface(
        &self,
        cfg: &ModelConfig,
    ) -> Result<HealthStatus, AiModelError> {
        let url = format!("{}/status/{}", cfg.base_url(), cfg.model);
        let (latency, resp) = self.get(cfg, &url, cfg.api_key.as_deref()).await?;

        // Expected minimal JSON: { "loaded": bool, "state": "Loaded" }
        #[derive(serde::Deserialize)]
        struct ModelStatus {
            loaded: Option<bool>,
            state: Option<String>,
        }

        let provider = cfg.provider.as_str();
        let status = match resp.json::<ModelStatus>().await {
            Ok(st) => {
                let state = st.state.unwrap_or_else(|| "unknown".to_string());
                HealthStatus::ok(
                    provider,
                    &cfg.endpoint,
                    Some(&cfg.model),
                    latency,
                    format!(
                        "model endpoint reachable; state={state}, loaded={}",
                        st.loaded.unwrap_or(false)
                    ),
                )
            }
            Err(e) => HealthStatus::ok(
                provider,
                &cfg.endpoint,
                Some(&cfg.model),
                latency,
                format!("model endpoint reachable; failed to decode status: {e}"),
            ),
        };
        Ok(status)
    }

    async fn get(
        &self,
        cfg: &ModelConfig,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<(u128, reqwest::Response), AiModelError> {
        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(self.default_timeout)
            .min(self.default_timeout);

        debug!(provider = %cfg.provider, model = %cfg.model, "GET {}", url);

        let mut req = self.client.get(url).timeout(timeout);
        if let Some(token) = bearer {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let start = Instant::now();
        let resp = req.send().await.map_err(|e| transport_error(e, timeout))?;
        let latency = start.elapsed().as_millis();

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(%url, %status, %snippet, latency_ms = latency, "health probe returned non-success status");
            return Err(ProviderError::HttpStatus {
                status,
                url: url.to_string(),
                snippet,
            }
            .into());
        }

        Ok((latency, resp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(provider: ModelProvider, endpoint: &str, model: &str) -> ModelConfig {
        ModelConfig {
            provider,
            model: model.to_string(),
            endpoint: endpoint.to_string(),
            api_key: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn ollama_latest_tag_counts_as_available() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[{"name":"llama3.2:latest"}]}"#)
            .create_async()
            .await;

        let health = HealthService::new(Some(5)).unwrap();
        let status = health
            .check(&cfg(ModelProvider::Ollama, &server.url(), "llama3.2"))
            .await;
        assert!(status.ok, "{}", status.message);
        assert_eq!(status.provider, "ollama");
    }

    #[tokio::test]
    async fn ollama_missing_model_is_not_ok() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/tags")
            .with_status(200)
            .with_body(r#"{"models":[{"name":"mistral:7b"}]}"#)
            .create_async()
            .await;

        let health = HealthService::new(Some(5)).unwrap();
        let status = health
            .check(&cfg(ModelProvider::Ollama, &server.url(), "llama3.2"))
            .await;
        assert!(!status.ok);
    }

    #[tokio::test]
    async fn huggingface_status_reports_state() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/status/google/flan-t5-base")
            .with_status(200)
            .with_body(r#"{"loaded":true,"state":"Loaded","compute_type":"gpu"}"#)
            .create_async()
            .await;

        let health = HealthService::new(Some(5)).unwrap();
        let status = health
            .check(&cfg(
                ModelProvider::HuggingFace,
                &server.url(),
                "google/flan-t5-base",
            ))
            .await;
        assert!(status.ok);
        assert!(status.message.contains("state=Loaded"));
    }

    #[tokio::test]
    async fn server_error_maps_to_failed_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/status/google/flan-t5-base")
            .with_status(500)
            .create_async()
            .await;

        let health = HealthService::new(Some(5)).unwrap();
        let status = health
            .check(&cfg(
                ModelProvider::HuggingFace,
                &server.url(),
                "google/flan-t5-base",
            ))
            .await;
        assert!(!status.ok);
        assert!(status.message.contains("500"));
    }
}
