//! Access layer for the pretrained NLP models behind the item Q&A server.
//!
//! The models themselves are hosted by an external runtime. This crate only
//! knows how to reach them:
//! - [`services::hf_inference_service::HfInferenceService`]: Hugging Face
//!   Inference API compatible servers (question answering, summarization,
//!   text2text generation);
//! - [`services::ollama_service::OllamaService`]: a local Ollama server.
//!
//! [`model_service::ModelService`] picks the backend from a
//! [`config::model_config::ModelConfig`] and exposes it through the
//! [`model::InferenceModel`] trait, which is what the rest of the workspace
//! depends on.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod model;
pub mod model_service;
pub mod services;
pub mod telemetry;

pub use config::{model_config::ModelConfig, model_provider::ModelProvider};
pub use error_handler::{AiModelError, Result};
pub use health_service::HealthStatus;
pub use model::{GenerationParams, InferenceModel, ModelOutput, ModelRequest, SpanParams};
pub use model_service::ModelService;
