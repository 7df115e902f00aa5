//! Question answering over fixed item descriptions.
//!
//! Public API: [`ItemQa`]. For every query it resolves the item's context
//! file, cuts it to the variant's budget, prompts the model, applies the
//! answer guards and, for the chained variant, refines the first answer.

pub mod catalog;
pub mod cfg;
pub mod postprocess;
pub mod prompt;
pub mod truncate;
pub mod variant;

mod api_types;
mod error;

pub use api_types::{Answer, Query};
pub use cfg::ItemQaConfig;
pub use error::ItemQaError;
pub use variant::{ModelVariant, PromptFamily, VariantProfile};

use std::{sync::Arc, time::Instant};

use ai_model_service::{InferenceModel, ModelRequest};
use tracing::{info, warn};

/// Request pipeline around one shared model. Cheap to clone.
#[derive(Clone)]
pub struct ItemQa {
    model: Arc<dyn InferenceModel>,
    cfg: Arc<ItemQaConfig>,
}

impl ItemQa {
    pub fn new(model: Arc<dyn InferenceModel>, cfg: ItemQaConfig) -> Self {
        Self {
            model,
            cfg: Arc::new(cfg),
        }
    }

    pub fn variant(&self) -> ModelVariant {
        self.cfg.variant
    }

    pub fn config(&self) -> &ItemQaConfig {
        &self.cfg
    }

    pub fn model(&self) -> &Arc<dyn InferenceModel> {
        &self.model
    }

    /// Answers one query.
    ///
    /// # Errors
    /// - [`ItemQaError::UnknownItem`] / [`ItemQaError::ContextUnavailable`]
    ///   before any model call;
    /// - [`ItemQaError::Model`] when inference fails.
    pub async fn answer(&self, query: &Query) -> Result<Answer, ItemQaError> {
        let profile = &self.cfg.profile;
        info!(
            variant = %self.cfg.variant,
            item = %query.item_type,
            question = %query.question,
            "Processing question"
        );

        let raw = self.cfg.catalog.load_context(&query.item_type).await?;
        let context = self.fit_context(&raw);
        let context_snippet = profile.include_snippet.then(|| truncate::snippet(context));

        let start = Instant::now();
        let first = self.produce(&query.question, context).await?;
        let (response, initial_response) = if profile.chain_refinement {
            let refined = self.refine(&query.question, &first).await?;
            (refined, Some(first))
        } else {
            (first, None)
        };
        let elapsed = start.elapsed().as_secs_f64();

        info!(
            item = %query.item_type,
            elapsed_s = elapsed,
            response = %response,
            "Answer generated"
        );

        Ok(Answer {
            response,
            initial_response,
            context_snippet,
            time_taken: profile.chain_refinement.then_some(elapsed),
        })
    }

    /// Restates `initial_answer` as a complete sentence.
    ///
    /// # Errors
    /// [`ItemQaError::Model`] when inference fails.
    pub async fn refine(&self, question: &str, initial_answer: &str) -> Result<String, ItemQaError> {
        let prompt = prompt::refinement_prompt(question, initial_answer);
        let output = self
            .model
            .infer(ModelRequest::Generate {
                prompt: &prompt,
                params: &self.cfg.profile.refine_generation,
            })
            .await?;
        let refined = postprocess::process_refinement(&self.cfg.messages, output);
        info!(refined = %refined, "Refined answer");
        Ok(refined)
    }

    fn fit_context<'a>(&self, raw: &'a str) -> &'a str {
        let budget = self.cfg.profile.context_budget;
        let fitted = truncate::truncate_units(raw, budget);
        if fitted.len() < raw.len() {
            info!(
                original_units = truncate::count_units(raw),
                budget, "Context truncated"
            );
        }
        fitted
    }

    async fn produce(&self, question: &str, context: &str) -> Result<String, ItemQaError> {
        let profile = &self.cfg.profile;
        let messages = &self.cfg.messages;

        let output = match profile.family {
            PromptFamily::Extractive => {
                self.model
                    .infer(ModelRequest::ExtractSpan {
                        question,
                        context,
                        params: &profile.span,
                    })
                    .await?
            }
            PromptFamily::Summarization => {
                let input = prompt::summarization_prompt(context, question);
                if self.over_limit(&input) {
                    return Ok(messages.prompt_too_long.clone());
                }
                self.model
                    .infer(ModelRequest::Summarize {
                        input: &input,
                        params: &profile.generation,
                    })
                    .await?
            }
            PromptFamily::Text2Text => {
                let input = prompt::text2text_prompt(context, question);
                self.model
                    .infer(ModelRequest::Generate {
                        prompt: &input,
                        params: &profile.generation,
                    })
                    .await?
            }
        };

        let score = output.score;
        let processed = postprocess::process_answer(&profile.rules, messages, question, output);
        if let Some(guard) = processed.guard {
            warn!(?guard, ?score, "Model answer replaced by canned response");
        }
        Ok(processed.text)
    }

    fn over_limit(&self, prompt: &str) -> bool {
        let Some(limit) = self.cfg.profile.prompt_limit else {
            return false;
        };
        let units = truncate::count_units(prompt);
        if units > limit {
            warn!(units, limit, "Prompt exceeds model input limit");
            return true;
        }
        false
    }
}
