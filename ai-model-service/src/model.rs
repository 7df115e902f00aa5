//! Provider-agnostic inference contract.
//!
//! Three task shapes cover every server variant: extractive question
//! answering, summarization and text2text generation. Backends map them onto
//! their own wire formats.

use async_trait::async_trait;
use serde::Serialize;

use crate::{error_handler::Result, health_service::HealthStatus};

/// Parameters for extractive (span) question answering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanParams {
    /// Upper bound on the answer span length, in model tokens.
    pub max_answer_len: u32,
    /// Let the model return an empty answer when the context has none.
    pub handle_impossible_answer: bool,
}

impl Default for SpanParams {
    fn default() -> Self {
        Self {
            max_answer_len: 50,
            handle_impossible_answer: true,
        }
    }
}

/// Decoding parameters for generative tasks.
///
/// `None` fields are not sent, leaving the runtime default in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_length: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    pub do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
}

/// One inference call.
#[derive(Debug, Clone, Copy)]
pub enum ModelRequest<'a> {
    /// Copy an answer span out of `context`.
    ExtractSpan {
        question: &'a str,
        context: &'a str,
        params: &'a SpanParams,
    },
    /// Summarize `input` (used with an instructional prompt as input).
    Summarize {
        input: &'a str,
        params: &'a GenerationParams,
    },
    /// Free text2text generation conditioned on `prompt`.
    Generate {
        prompt: &'a str,
        params: &'a GenerationParams,
    },
}

impl ModelRequest<'_> {
    /// Short task label for logs.
    pub fn task(&self) -> &'static str {
        match self {
            ModelRequest::ExtractSpan { .. } => "question-answering",
            ModelRequest::Summarize { .. } => "summarization",
            ModelRequest::Generate { .. } => "text2text-generation",
        }
    }
}

/// Raw model output before any post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelOutput {
    pub text: String,
    /// Confidence reported by the model, when the task/runtime has one.
    pub score: Option<f32>,
}

impl ModelOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
        }
    }

    pub fn scored(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score: Some(score),
        }
    }
}

/// A loaded model the request handlers can call.
///
/// Implementations are constructed once at startup and shared read-only
/// (`Arc<dyn InferenceModel>`).
#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Model identifier, for logs and health output.
    fn model_name(&self) -> &str;

    /// Runs one inference call.
    async fn infer(&self, request: ModelRequest<'_>) -> Result<ModelOutput>;

    /// Probes the backend. Never fails: problems are reported as `ok = false`.
    async fn health(&self) -> HealthStatus;
}
