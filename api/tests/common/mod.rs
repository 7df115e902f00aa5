#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use ai_model_service::{
    AiModelError, HealthStatus, InferenceModel, ModelOutput, ModelRequest,
    error_handler::ProviderError,
};
use api::core::app_state::AppState;
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use item_qa::{ItemQa, ItemQaConfig, ModelVariant, catalog::ItemCatalog};
use serde_json::Value;

/// Answers every request with the same output, or fails.
pub struct StubModel {
    reply: Result<ModelOutput, String>,
    healthy: bool,
}

impl StubModel {
    pub fn replying(out: ModelOutput) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(out),
            healthy: true,
        })
    }

    pub fn failing(msg: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(msg.to_string()),
            healthy: false,
        })
    }
}

#[async_trait]
impl InferenceModel for StubModel {
    fn model_name(&self) -> &str {
        "stub"
    }

    async fn infer(&self, _request: ModelRequest<'_>) -> ai_model_service::Result<ModelOutput> {
        match &self.reply {
            Ok(out) => Ok(out.clone()),
            Err(msg) => Err(AiModelError::from(ProviderError::Unavailable(msg.clone()))),
        }
    }

    async fn health(&self) -> HealthStatus {
        if self.healthy {
            HealthStatus::ok("stub", "memory", Some("stub"), 1, "ready")
        } else {
            HealthStatus::fail("stub", "memory", Some("stub"), 1, "backend down")
        }
    }
}

/// The repository's `items/` fixtures.
pub fn items_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../items")
}

pub fn app(variant: ModelVariant, model: Arc<StubModel>) -> Router {
    let (catalog, overrides) = ItemCatalog::load(items_dir(), None).unwrap();
    let cfg = ItemQaConfig::new(variant, catalog).with_overrides(overrides);
    api::build_router(AppState::new(ItemQa::new(model, cfg)))
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
