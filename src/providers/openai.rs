//! OpenAI-compatible provider using the `/v1/chat/completions` API.
//!
//! Structured extraction uses the `response_format: json_schema` contract so
//! the provider itself enforces the output schema; narration is a plain text
//! completion.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{check_http_response, GenerationService, ProviderError};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
const DEFAULT_MAX_TOKENS: u32 = 2048;

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions API request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages — always a single user message here.
    pub messages: Vec<ChatMessage>,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Structured-output contract, present only for extraction calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<Value>,
}

/// A message in chat format.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct ChatMessage {
    /// Role (`user`).
    pub role: String,
    /// Plain text content.
    pub content: String,
}

/// Chat completions API response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    /// Response choices.
    pub choices: Vec<ChatChoice>,
    /// Model that served the response.
    pub model: Option<String>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// Assistant message for this choice.
    pub message: ChatResponseMessage,
    /// Why generation stopped.
    pub finish_reason: Option<String>,
}

/// Assistant message in a response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    /// Text content.
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// OpenAI-compatible generation service.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiGenerator {
    /// Create a new generator with a request-level timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
            model,
            client,
        })
    }

    async fn send(&self, body: &ChatRequest) -> Result<String, ProviderError> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        let raw = check_http_response(response).await?;

        let parsed: ChatResponse = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Parse(format!("invalid chat response: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::Parse("response contained no text content".to_owned()))
    }
}

/// Build the `response_format` object for a schema-constrained call.
#[doc(hidden)]
pub fn build_response_format(name: &str, schema: &Value) -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": name,
            "strict": true,
            "schema": schema,
        }
    })
}

#[async_trait::async_trait]
impl GenerationService for OpenAiGenerator {
    async fn extract(&self, prompt: &str, schema: &Value) -> Result<Value, ProviderError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_owned(),
                content: prompt.to_owned(),
            }],
            max_tokens: DEFAULT_MAX_TOKENS,
            response_format: Some(build_response_format("task_extraction", schema)),
        };

        let content = self.send(&body).await?;

        // With `strict: true` the provider guarantees schema conformance;
        // anything unparsable here is a contract violation, not a parse bug.
        serde_json::from_str(&content)
            .map_err(|e| ProviderError::SchemaViolation(format!("{e}: {content}")))
    }

    async fn narrate(&self, prompt: &str) -> Result<String, ProviderError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_owned(),
                content: prompt.to_owned(),
            }],
            max_tokens: DEFAULT_MAX_TOKENS,
            response_format: None,
        };
        self.send(&body).await
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_format_wraps_schema() {
        let schema = json!({"type": "object"});
        let format = build_response_format("task_extraction", &schema);
        assert_eq!(format["type"], "json_schema");
        assert_eq!(format["json_schema"]["name"], "task_extraction");
        assert_eq!(format["json_schema"]["strict"], true);
        assert_eq!(format["json_schema"]["schema"]["type"], "object");
    }

    #[test]
    fn request_serialization_omits_absent_response_format() {
        let body = ChatRequest {
            model: "m".to_owned(),
            messages: vec![ChatMessage {
                role: "user".to_owned(),
                content: "hello".to_owned(),
            }],
            max_tokens: 16,
            response_format: None,
        };
        let json = serde_json::to_string(&body).expect("should serialize");
        assert!(!json.contains("response_format"));
    }

    #[test]
    fn generator_trims_trailing_slash_and_reports_model() {
        let generator = OpenAiGenerator::new(
            "https://api.openai.com/".to_owned(),
            "test-key".to_owned(),
            "gpt-4o-mini".to_owned(),
            Duration::from_secs(30),
        )
        .expect("client should build");
        assert_eq!(generator.model_id(), "gpt-4o-mini");
        assert_eq!(generator.base_url, "https://api.openai.com");
    }
}
