//! Client for Hugging Face Inference API compatible servers.
//!
//! One endpoint per model: `POST {endpoint}/models/{model}`. The task is
//! implied by the model; the payload shape follows the task:
//!
//! | task                   | `inputs`                    | response                            |
//! |------------------------|-----------------------------|-------------------------------------|
//! | question-answering     | `{question, context}`       | `{answer, score, start, end}`       |
//! | summarization          | text                        | `[{summary_text}]`                  |
//! | text2text-generation   | text                        | `[{generated_text}]`                |
//!
//! `options.wait_for_model = true` makes the server block while a cold model
//! loads instead of answering 503.

use std::time::Duration;

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{model_config::ModelConfig, model_provider::ModelProvider},
    error_handler::{
        AiModelError, ConfigError, ProviderError, Result, make_snippet, transport_error,
    },
    model::{ModelOutput, ModelRequest},
};

/// Thin client for one Hugging Face hosted model.
#[derive(Debug)]
pub struct HfInferenceService {
    client: reqwest::Client,
    cfg: ModelConfig,
    url_model: String,
    timeout: Duration,
}

impl HfInferenceService {
    /// Creates a new [`HfInferenceService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] if `cfg.provider` is not Hugging Face
    /// - [`ConfigError::InvalidFormat`] if the API key cannot be used as a header
    /// - [`AiModelError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: ModelConfig) -> Result<Self> {
        if cfg.provider != ModelProvider::HuggingFace {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.to_string()).into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = cfg.api_key.as_deref() {
            let value = header::HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| {
                ConfigError::InvalidFormat {
                    var: "HF_API_TOKEN",
                    reason: "not a valid header value",
                }
            })?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let url_model = format!("{}/models/{}", cfg.base_url(), cfg.model);

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            authenticated = cfg.api_key.is_some(),
            "HfInferenceService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_model,
            timeout,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.cfg
    }

    /// Runs one inference call against the model endpoint.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`ProviderError::Decode`] / [`ProviderError::EmptyOutput`] for unusable payloads
    /// - [`AiModelError::HttpTransport`] / [`AiModelError::Timeout`] for client errors
    #[instrument(skip_all, fields(model = %self.cfg.model, task = request.task()))]
    pub async fn run(&self, request: ModelRequest<'_>) -> Result<ModelOutput> {
        match request {
            ModelRequest::ExtractSpan {
                question,
                context,
                params,
            } => {
                let body = HfRequest {
                    inputs: QaInputs { question, context },
                    parameters: params,
                    options: HfOptions::default(),
                };
                let out: OneOrMany<QaAnswer> = self.post(&body).await?;
                let best = out.into_first().ok_or(ProviderError::EmptyOutput)?;
                Ok(ModelOutput::scored(best.answer, best.score))
            }
            ModelRequest::Summarize { input, params } => {
                let body = HfRequest {
                    inputs: input,
                    parameters: params,
                    options: HfOptions::default(),
                };
                let out: OneOrMany<SummaryItem> = self.post(&body).await?;
                let first = out.into_first().ok_or(ProviderError::EmptyOutput)?;
                Ok(ModelOutput::text(first.summary_text))
            }
            ModelRequest::Generate { prompt, params } => {
                let body = HfRequest {
                    inputs: prompt,
                    parameters: params,
                    options: HfOptions::default(),
                };
                let out: OneOrMany<GeneratedItem> = self.post(&body).await?;
                let first = out.into_first().ok_or(ProviderError::EmptyOutput)?;
                Ok(ModelOutput::text(first.generated_text))
            }
        }
    }

    async fn post<B, T>(&self, body: &B) -> Result<T>
    where
        B: Serialize,
        T: for<'de> Deserialize<'de>,
    {
        debug!("POST {}", self.url_model);
        let resp = self
            .client
            .post(&self.url_model)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(url = %self.url_model, %status, %snippet, "inference request failed");
            return Err(AiModelError::from(ProviderError::HttpStatus {
                status,
                url: self.url_model.clone(),
                snippet,
            }));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            ProviderError::Decode(format!("serde error: {e}; body: {}", make_snippet(&text)))
                .into()
        })
    }
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
struct HfRequest<'a, I, P>
where
    I: Serialize,
    P: Serialize,
{
    inputs: I,
    parameters: &'a P,
    options: HfOptions,
}

#[derive(Debug, Serialize)]
struct QaInputs<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct HfOptions {
    wait_for_model: bool,
    use_cache: bool,
}

impl Default for HfOptions {
    fn default() -> Self {
        Self {
            wait_for_model: true,
            use_cache: false,
        }
    }
}

/// Some deployments wrap single results in a list, some do not.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::One(v) => Some(v),
            OneOrMany::Many(v) => v.into_iter().next(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QaAnswer {
    answer: String,
    score: f32,
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedItem {
    generated_text: String,
}
