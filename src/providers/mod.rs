//! Generation service abstraction layer.
//!
//! Defines the [`GenerationService`] trait behind which the language model
//! sits. The core pipelines only ever see two operations:
//!
//! - [`GenerationService::extract`] — schema-constrained structured output
//! - [`GenerationService::narrate`] — free-text output
//!
//! so the live provider can be swapped for a canned stub in tests.
//! One provider is implemented: [`openai::OpenAiGenerator`], speaking the
//! OpenAI-compatible `/v1/chat/completions` wire format.

use async_trait::async_trait;
use regex::Regex;

pub mod openai;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by generation providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP transport failure, including request timeouts.
    #[error("generation request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Upstream provider responded with an error status.
    #[error("provider returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        body: String,
    },
    /// Response body did not match the expected wire shape.
    #[error("provider response parse error: {0}")]
    Parse(String),
    /// A schema-constrained call produced output that violates the schema.
    #[error("provider output violates the requested schema: {0}")]
    SchemaViolation(String),
}

impl ProviderError {
    /// Whether the failure is an authentication problem (caller credential).
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 401 | 403, .. })
    }

    /// Whether the provider rejected the call for quota or rate-limit reasons.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::HttpStatus { status: 429, .. })
    }

    /// Whether the request-level timeout elapsed before a response arrived.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }

    /// Whether the failure is a transport-level network problem (not a timeout).
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Request(e) if !e.is_timeout())
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a structured error.
///
/// # Errors
///
/// Returns `ProviderError::Request` on transport failure,
/// `ProviderError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, ProviderError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ProviderError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

/// Collapse whitespace, redact credential-shaped substrings, cap length.
///
/// Error bodies end up in logs and API error strings; they must never carry
/// a leaked key back to the caller.
fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"sk-[A-Za-z0-9_\-]{20,}",
        r"AIza[A-Za-z0-9_\-]{30,}",
        r"Bearer [A-Za-z0-9_\-\.]{16,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Core generation service interface.
///
/// Implementations must be `Send + Sync` so pipelines can run concurrently
/// on the async runtime. Both calls are stateless: no conversation history
/// is carried between invocations.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Request a structured object conforming to `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::SchemaViolation`] when the provider cannot
    /// produce a conforming object, and transport/status errors otherwise.
    async fn extract(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;

    /// Request free-form text.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on API, network, or parse failure.
    async fn narrate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// The model identifier string this service is instantiated for.
    fn model_id(&self) -> &str;
}
