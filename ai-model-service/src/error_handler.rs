//! Unified error handling for `ai-model-service`.
//!
//! This module exposes a single top-level error type [`AiModelError`] for the
//! whole library, and groups domain-specific errors in nested enums
//! ([`ConfigError`], [`ProviderError`]). Small helpers for reading/validating
//! environment variables are provided and return the unified [`Result<T>`]
//! alias.
//!
//! All messages include the suffix `[AI Model Service]` to simplify
//! attribution in logs.

use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiModelError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `ai-model-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiModelError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider-side failures (HTTP status, payload decoding, unsupported task).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[AI Model Service] transport error: {0}")]
    HttpTransport(reqwest::Error),

    /// Operation exceeded the configured timeout.
    #[error("[AI Model Service] operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for AiModelError {
    fn from(err: reqwest::Error) -> Self {
        AiModelError::HttpTransport(err)
    }
}

/// Maps a client error, reporting timeouts with the configured duration.
///
/// reqwest does not carry the duration on the error, so callers pass the
/// timeout their client was built with.
pub fn transport_error(err: reqwest::Error, timeout: Duration) -> AiModelError {
    if err.is_timeout() {
        AiModelError::Timeout(timeout)
    } else {
        AiModelError::HttpTransport(err)
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI Model Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (like ports, limits, timeouts).
    #[error("[AI Model Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `MODEL_TIMEOUT_SECS`, `OLLAMA_PORT`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Unsupported provider in `MODEL_PROVIDER`.
    #[error("[AI Model Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[AI Model Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `MODEL_ENDPOINT`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// Model name was empty.
    #[error("[AI Model Service] model name must not be empty")]
    EmptyModel,
}

/* ------------------------------------------------------------------------- */
/* Provider errors                                                           */
/* ------------------------------------------------------------------------- */

/// Failure reported by (or while talking to) a model provider.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[AI Model Service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[AI Model Service] decode error: {0}")]
    Decode(String),

    /// The backend is up but does not serve the model (startup readiness).
    #[error("[AI Model Service] model unavailable: {0}")]
    Unavailable(String),

    /// The model answered, but with nothing usable (e.g. an empty list).
    #[error("[AI Model Service] empty model output")]
    EmptyOutput,
}

/// Trims a response body to a short single-line snippet for error messages.
pub fn make_snippet(body: &str) -> String {
    body.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(240)
        .collect()
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Reads an optional, non-empty environment variable.
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an optional `u64` value read from variable `var`.
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the value is set but not a
/// valid `u64`.
pub fn opt_u64(var: &'static str, value: Option<&str>) -> Result<Option<u64>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse::<u64>().map(Some).map_err(|_| {
            AiModelError::from(ConfigError::InvalidNumber {
                var,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/// Parses an optional boolean flag (`true/false/1/0/yes/no/on/off`).
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] for any other value.
pub fn opt_bool(var: &'static str, value: Option<&str>) -> Result<Option<bool>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_bool(v).map(Some).ok_or_else(|| {
            AiModelError::from(ConfigError::InvalidFormat {
                var,
                reason: "expected a boolean (true/false)",
            })
        }),
        None => Ok(None),
    }
}

/// [`opt_bool`] over the process environment.
pub fn env_opt_bool(name: &'static str) -> Result<Option<bool>> {
    opt_bool(name, env_opt(name).as_deref())
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers (return unified `Result<T>`)                           */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_requires_http_scheme() {
        assert!(validate_http_endpoint("MODEL_ENDPOINT", "http://localhost:11434").is_ok());
        assert!(validate_http_endpoint("MODEL_ENDPOINT", " https://example.org").is_ok());
        let err = validate_http_endpoint("MODEL_ENDPOINT", "localhost:11434").unwrap_err();
        assert!(err.to_string().contains("MODEL_ENDPOINT"));
    }

    #[test]
    fn numbers_and_flags() {
        assert_eq!(opt_u64("MODEL_TIMEOUT_SECS", Some(" 30 ")).unwrap(), Some(30));
        assert_eq!(opt_u64("MODEL_TIMEOUT_SECS", Some("")).unwrap(), None);
        assert!(opt_u64("MODEL_TIMEOUT_SECS", Some("-1")).is_err());
        assert_eq!(opt_bool("MODEL_STARTUP_CHECK", None).unwrap(), None);
        assert!(opt_bool("MODEL_STARTUP_CHECK", Some("maybe")).is_err());
    }

    #[test]
    fn bool_values() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let body = format!("line one\n  line two\n{}", "x".repeat(500));
        let s = make_snippet(&body);
        assert!(s.starts_with("line one line two "));
        assert_eq!(s.chars().count(), 240);
    }
}
