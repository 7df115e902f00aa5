//! Lightweight Ollama client for text generation.
//!
//! - `POST {endpoint}/api/generate`: synchronous generation (`stream=false`)
//!
//! Ollama has no dedicated question-answering or summarization task, so every
//! [`ModelRequest`] is rendered into a single prompt. Extractive requests are
//! sent as a bare context/question pair and report no confidence score.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{model_config::ModelConfig, model_provider::ModelProvider},
    error_handler::{
        AiModelError, ConfigError, ProviderError, Result, make_snippet, transport_error,
    },
    model::{GenerationParams, ModelOutput, ModelRequest},
};

/// Thin client for Ollama.
#[derive(Debug)]
pub struct OllamaService {
    client: reqwest::Client,
    cfg: ModelConfig,
    url_generate: String,
    timeout: Duration,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] if `cfg.provider` is not Ollama
    /// - [`AiModelError::HttpTransport`] if HTTP client cannot be built
    pub fn new(cfg: ModelConfig) -> Result<Self> {
        if cfg.provider != ModelProvider::Ollama {
            return Err(ConfigError::UnsupportedProvider(cfg.provider.to_string()).into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let url_generate = format!("{}/api/generate", cfg.base_url());

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OllamaService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
            timeout,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.cfg
    }

    /// Runs one inference call by rendering the request into a prompt.
    #[instrument(skip_all, fields(model = %self.cfg.model, task = request.task()))]
    pub async fn run(&self, request: ModelRequest<'_>) -> Result<ModelOutput> {
        let text = match request {
            ModelRequest::ExtractSpan {
                question,
                context,
                params,
            } => {
                let prompt = format!("{context}\n\nQuestion: {question}\nAnswer:");
                let options = GenerateOptions {
                    temperature: Some(0.0),
                    num_predict: Some(params.max_answer_len),
                    ..Default::default()
                };
                self.generate(&prompt, options).await?
            }
            ModelRequest::Summarize { input, params }
            | ModelRequest::Generate {
                prompt: input,
                params,
            } => {
                self.generate(input, GenerateOptions::from_params(params))
                    .await?
            }
        };
        Ok(ModelOutput::text(text))
    }

    /// Performs a **non-streaming** generation request via `/api/generate`.
    ///
    /// # Errors
    /// - [`ProviderError::HttpStatus`] for non-2xx responses
    /// - [`AiModelError::HttpTransport`] / [`AiModelError::Timeout`] for client errors
    /// - [`ProviderError::Decode`] if response cannot be parsed
    pub async fn generate(&self, prompt: &str, options: GenerateOptions) -> Result<String> {
        let body = GenerateRequest {
            model: &self.cfg.model,
            prompt,
            stream: false,
            options: Some(options),
        };

        debug!("POST {}", self.url_generate);
        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            error!(url = %self.url_generate, %status, %snippet, "generate request failed");
            return Err(AiModelError::from(ProviderError::HttpStatus {
                status,
                url: self.url_generate.clone(),
                snippet,
            }));
        }

        let out: GenerateResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                return transport_error(e, self.timeout);
            }
            ProviderError::Decode(format!("serde error: {e}; ensure `stream=false` is used"))
                .into()
        })?;

        Ok(out.response)
    }
}

/* ==========================
HTTP payloads & options
========================== */

/// Request body for `/api/generate` (non-streaming).
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

impl GenerateOptions {
    /// Maps pipeline-style decoding parameters onto Ollama options.
    ///
    /// Greedy decoding (`do_sample = false`) becomes `temperature = 0`.
    pub fn from_params(p: &GenerationParams) -> Self {
        Self {
            temperature: if p.do_sample { p.temperature } else { Some(0.0) },
            top_k: p.top_k,
            top_p: p.top_p,
            repeat_penalty: p.repetition_penalty,
            num_predict: Some(p.max_length),
        }
    }
}

/// Response body for `/api/generate`.
///
/// Minimal shape: the generated text is in `response`.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SpanParams;

    fn cfg(endpoint: &str) -> ModelConfig {
        ModelConfig {
            provider: ModelProvider::Ollama,
            model: "llama3.2".to_string(),
            endpoint: endpoint.to_string(),
            api_key: None,
            timeout_secs: Some(5),
        }
    }

    #[test]
    fn greedy_params_force_zero_temperature() {
        let p = GenerationParams {
            max_length: 50,
            do_sample: false,
            temperature: Some(0.7),
            ..Default::default()
        };
        let o = GenerateOptions::from_params(&p);
        assert_eq!(o.temperature, Some(0.0));
        assert_eq!(o.num_predict, Some(50));
    }

    #[tokio::test]
    async fn extractive_request_is_rendered_as_bare_pair() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/generate")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model":"llama3.2","stream":false,
                    "prompt":"Steve made it.\n\nQuestion: Who?\nAnswer:"}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"model":"llama3.2","response":" Steve","done":true}"#)
            .create_async()
            .await;

        let svc = OllamaService::new(cfg(&server.url())).unwrap();
        let params = SpanParams::default();
        let out = svc
            .run(ModelRequest::ExtractSpan {
                question: "Who?",
                context: "Steve made it.",
                params: &params,
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(out.text, " Steve");
        assert_eq!(out.score, None);
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(404)
            .with_body(r#"{"error":"model 'llama3.2' not found"}"#)
            .create_async()
            .await;

        let svc = OllamaService::new(cfg(&server.url())).unwrap();
        let err = svc
            .generate("hi", GenerateOptions::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    /// Accepts connections and never answers.
    async fn stalled_endpoint() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn stalled_server_reports_configured_timeout() {
        let mut c = cfg(&stalled_endpoint().await);
        c.timeout_secs = Some(1);
        let svc = OllamaService::new(c).unwrap();

        let err = svc
            .generate("hi", GenerateOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AiModelError::Timeout(d) if d == Duration::from_secs(1)));
        assert!(err.to_string().contains("timed out after 1s"));
    }
}
