//! The model object shared by every request.
//!
//! - Construct once at startup, wrap in `Arc`, and pass clones to dependents.
//! - Holds exactly one backend client, chosen by [`ModelConfig::provider`].
//! - [`ModelService::ensure_ready`] is the blocking start-up step that
//!   replaces "loading the model": it waits for the runtime to report the
//!   model and fails hard otherwise.

use std::time::Instant;

use async_trait::async_trait;
use tracing::{error, info};

use crate::{
    config::{model_config::ModelConfig, model_provider::ModelProvider},
    error_handler::{AiModelError, ProviderError, Result},
    health_service::{HealthService, HealthStatus},
    model::{InferenceModel, ModelOutput, ModelRequest},
    services::{hf_inference_service::HfInferenceService, ollama_service::OllamaService},
};

enum Backend {
    HuggingFace(HfInferenceService),
    Ollama(OllamaService),
}

/// Read-only model service backed by an external inference runtime.
pub struct ModelService {
    cfg: ModelConfig,
    backend: Backend,
    health: HealthService,
}

impl ModelService {
    /// Creates the service and its HTTP clients. Does not touch the network.
    ///
    /// # Errors
    /// Returns [`AiModelError`] if a client cannot be built from `cfg`.
    pub fn new(cfg: ModelConfig) -> Result<Self> {
        let backend = match cfg.provider {
            ModelProvider::HuggingFace => {
                Backend::HuggingFace(HfInferenceService::new(cfg.clone())?)
            }
            ModelProvider::Ollama => Backend::Ollama(OllamaService::new(cfg.clone())?),
        };
        let health = HealthService::new(Some(10))?;

        Ok(Self {
            cfg,
            backend,
            health,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.cfg
    }

    /// Probes the backend once and fails unless it reports the model as usable.
    ///
    /// # Errors
    /// Returns [`ProviderError::Unavailable`] carrying the probe message when the
    /// backend is unreachable or does not serve the model.
    pub async fn ensure_ready(&self) -> Result<HealthStatus> {
        info!(
            provider = %self.cfg.provider,
            model = %self.cfg.model,
            endpoint = %self.cfg.endpoint,
            "Loading model..."
        );
        let start = Instant::now();
        let status = self.health.check(&self.cfg).await;

        if status.ok {
            info!(
                model = %self.cfg.model,
                elapsed_ms = start.elapsed().as_millis(),
                "Model ready"
            );
            Ok(status)
        } else {
            error!(model = %self.cfg.model, message = %status.message, "Model loading failed");
            Err(AiModelError::from(ProviderError::Unavailable(format!(
                "model `{}` is not available: {}",
                self.cfg.model, status.message
            ))))
        }
    }
}

#[async_trait]
impl InferenceModel for ModelService {
    fn model_name(&self) -> &str {
        &self.cfg.model
    }

    async fn infer(&self, request: ModelRequest<'_>) -> Result<ModelOutput> {
        match &self.backend {
            Backend::HuggingFace(cli) => cli.run(request).await,
            Backend::Ollama(cli) => cli.run(request).await,
        }
    }

    async fn health(&self) -> HealthStatus {
        self.health.check(&self.cfg).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GenerationParams;

    fn hf(endpoint: &str) -> ModelConfig {
        ModelConfig {
            provider: ModelProvider::HuggingFace,
            model: "google/flan-t5-base".to_string(),
            endpoint: endpoint.to_string(),
            api_key: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn dispatches_to_configured_backend() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/models/google/flan-t5-base")
            .with_status(200)
            .with_body(r#"[{"generated_text":"Steve crafted it"}]"#)
            .create_async()
            .await;

        let svc = ModelService::new(hf(&server.url())).unwrap();
        let params = GenerationParams::default();
        let out = svc
            .infer(ModelRequest::Generate {
                prompt: "Who crafted it?",
                params: &params,
            })
            .await
            .unwrap();
        assert_eq!(out.text, "Steve crafted it");
        assert_eq!(svc.model_name(), "google/flan-t5-base");
    }

    #[tokio::test]
    async fn ensure_ready_fails_when_backend_is_down() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/status/google/flan-t5-base")
            .with_status(404)
            .with_body(r#"{"error":"Model not found"}"#)
            .create_async()
            .await;

        let svc = ModelService::new(hf(&server.url())).unwrap();
        let err = svc.ensure_ready().await.unwrap_err();
        assert!(err.to_string().contains("is not available"));
    }
}
