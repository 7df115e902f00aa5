//! Model variants and their fixed behavior profiles.
//!
//! A variant bundles everything that used to differ between the standalone
//! servers: default model, prompt family, budgets, decoding parameters,
//! guard thresholds and which optional response fields are filled in.

use std::{fmt, str::FromStr};

use ai_model_service::{GenerationParams, SpanParams};

use crate::{error::ItemQaError, postprocess::AnswerRules, prompt::TEXT2TEXT_PREAMBLE};

/// Which server flavor this process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelVariant {
    #[default]
    Extractive,
    Summarization,
    Text2Text,
    Text2TextRefine,
    Text2TextChained,
}

/// How the model is prompted and which task endpoint it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptFamily {
    Extractive,
    Summarization,
    Text2Text,
}

/// Fixed per-variant behavior. `context_budget` and the confidence threshold
/// can be overridden from the environment; everything else is constant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantProfile {
    pub family: PromptFamily,
    /// Context budget in whitespace units.
    pub context_budget: usize,
    /// Max summarization prompt size in units; larger prompts are answered
    /// with the canned "too long" message without calling the model.
    pub prompt_limit: Option<usize>,
    pub rules: AnswerRules,
    pub span: SpanParams,
    pub generation: GenerationParams,
    pub refine_generation: GenerationParams,
    /// Add `contextSnippet` to answers.
    pub include_snippet: bool,
    /// Run refinement after the first answer and report both.
    pub chain_refinement: bool,
    /// Serve `POST /refine`.
    pub refine_endpoint: bool,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 5] = [
        ModelVariant::Extractive,
        ModelVariant::Summarization,
        ModelVariant::Text2Text,
        ModelVariant::Text2TextRefine,
        ModelVariant::Text2TextChained,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Extractive => "extractive",
            ModelVariant::Summarization => "summarization",
            ModelVariant::Text2Text => "text2text",
            ModelVariant::Text2TextRefine => "text2text-refine",
            ModelVariant::Text2TextChained => "text2text-chained",
        }
    }

    /// Model used when `MODEL_NAME` is not set.
    pub fn default_model(&self) -> &'static str {
        match self {
            ModelVariant::Extractive => "deepset/roberta-base-squad2",
            ModelVariant::Summarization => "facebook/bart-large-cnn",
            ModelVariant::Text2Text => "google/flan-t5-base",
            ModelVariant::Text2TextRefine | ModelVariant::Text2TextChained => {
                "google/flan-t5-large"
            }
        }
    }

    pub fn profile(&self) -> VariantProfile {
        match self {
            ModelVariant::Extractive => VariantProfile {
                family: PromptFamily::Extractive,
                context_budget: 450,
                prompt_limit: None,
                rules: AnswerRules {
                    min_confidence: Some(0.1),
                    min_answer_chars: 2,
                    echo_guard: true,
                    preamble: None,
                    sentence_case: false,
                },
                span: SpanParams::default(),
                generation: GenerationParams::default(),
                refine_generation: refine_params(),
                include_snippet: false,
                chain_refinement: false,
                refine_endpoint: false,
            },
            ModelVariant::Summarization => VariantProfile {
                family: PromptFamily::Summarization,
                context_budget: 800,
                prompt_limit: Some(1024),
                rules: AnswerRules {
                    min_confidence: None,
                    min_answer_chars: 5,
                    echo_guard: true,
                    preamble: None,
                    sentence_case: false,
                },
                span: SpanParams::default(),
                generation: GenerationParams {
                    max_length: 50,
                    min_length: Some(10),
                    do_sample: false,
                    ..GenerationParams::default()
                },
                refine_generation: refine_params(),
                include_snippet: false,
                chain_refinement: false,
                refine_endpoint: false,
            },
            ModelVariant::Text2Text
            | ModelVariant::Text2TextRefine
            | ModelVariant::Text2TextChained => VariantProfile {
                family: PromptFamily::Text2Text,
                context_budget: 512,
                prompt_limit: None,
                rules: AnswerRules {
                    min_confidence: None,
                    min_answer_chars: 1,
                    echo_guard: false,
                    preamble: Some(TEXT2TEXT_PREAMBLE.to_string()),
                    sentence_case: true,
                },
                span: SpanParams::default(),
                generation: GenerationParams {
                    max_length: 150,
                    min_length: None,
                    do_sample: true,
                    temperature: Some(0.7),
                    top_k: Some(30),
                    top_p: Some(0.9),
                    repetition_penalty: Some(1.0),
                },
                refine_generation: refine_params(),
                include_snippet: true,
                chain_refinement: *self == ModelVariant::Text2TextChained,
                refine_endpoint: *self == ModelVariant::Text2TextRefine,
            },
        }
    }
}

fn refine_params() -> GenerationParams {
    GenerationParams {
        max_length: 150,
        min_length: None,
        do_sample: true,
        temperature: Some(0.6),
        top_k: Some(30),
        top_p: Some(0.9),
        repetition_penalty: Some(1.0),
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = ItemQaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v = s.trim().to_ascii_lowercase().replace('_', "-");
        match v.as_str() {
            "extractive" | "qa" => Ok(ModelVariant::Extractive),
            "summarization" | "summary" => Ok(ModelVariant::Summarization),
            "text2text" => Ok(ModelVariant::Text2Text),
            "text2text-refine" => Ok(ModelVariant::Text2TextRefine),
            "text2text-chained" => Ok(ModelVariant::Text2TextChained),
            _ => Err(ItemQaError::Config {
                var: "MODEL_VARIANT",
                reason: format!(
                    "unsupported variant `{s}` (expected one of: {})",
                    ModelVariant::ALL.map(|v| v.as_str()).join(", ")
                ),
            }),
        }
    }
}
