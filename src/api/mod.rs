//! Boundary payload contract for the two operations.
//!
//! Transport framing is out of scope — these types and functions define
//! only the request/response payloads and the classification of every
//! failure into a reported status. The CLI binary is one transport; an
//! HTTP server would reuse the same contract unchanged.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::analyze::{self, AnalyzeError};
use crate::extract::{self, ExtractError};
use crate::providers::GenerationService;
use crate::store::{StoreError, TaskStore};
use crate::types::{AnalysisResult, Period, TaskDraft};

// ---------------------------------------------------------------------------
// Statuses and errors
// ---------------------------------------------------------------------------

/// Reported status class for a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorStatus {
    /// Caller mistake: malformed body, failed validation, retryable
    /// extraction-contract failure.
    BadRequest,
    /// Authentication failure, including generation-service credential
    /// rejection.
    Unauthorized,
    /// Generation-service quota or rate limit.
    TooManyRequests,
    /// Generation call exceeded the request-level timeout.
    GatewayTimeout,
    /// Network-level failure reaching the generation service.
    ServiceUnavailable,
    /// Everything else, reported opaquely.
    Internal,
}

/// A classified operation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Status class the transport should report.
    pub status: ErrorStatus,
    /// Human-readable reason included in the response body.
    pub message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: ErrorStatus::BadRequest,
            message: message.into(),
        }
    }

    /// Opaque internal configuration error for a missing credential.
    ///
    /// Full detail goes to server-side logs only.
    pub fn missing_credential() -> Self {
        error!("generation service API key is not configured");
        Self {
            status: ErrorStatus::Internal,
            message: "service configuration error".to_owned(),
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::Validation(v) => Self::bad_request(v.to_string()),
            ExtractError::SchemaViolation(_) => {
                Self::bad_request("could not understand the task, please rephrase and retry")
            }
            ExtractError::InvalidExtractedDate(_) => Self::bad_request(e.to_string()),
            ExtractError::Provider(p) => classify_provider(&p),
        }
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        match e {
            AnalyzeError::Provider(p) => classify_provider(&p),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { id } => Self::bad_request(format!("task not found: {id}")),
            other => {
                error!(error = %other, "store operation failed");
                Self {
                    status: ErrorStatus::Internal,
                    message: "internal error".to_owned(),
                }
            }
        }
    }
}

fn classify_provider(e: &crate::providers::ProviderError) -> ApiError {
    error!(error = %e, "generation service call failed");
    let status = if e.is_auth() {
        ErrorStatus::Unauthorized
    } else if e.is_rate_limited() {
        ErrorStatus::TooManyRequests
    } else if e.is_timeout() {
        ErrorStatus::GatewayTimeout
    } else if e.is_network() {
        ErrorStatus::ServiceUnavailable
    } else {
        ErrorStatus::Internal
    };
    let message = match status {
        ErrorStatus::Unauthorized => "generation service rejected the credential",
        ErrorStatus::TooManyRequests => "generation service quota exceeded, try again later",
        ErrorStatus::GatewayTimeout => "generation service timed out",
        ErrorStatus::ServiceUnavailable => "generation service is unreachable",
        _ => "internal error",
    };
    ApiError {
        status,
        message: message.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Successful normalize-task response data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedTask {
    /// Clamped title.
    pub title: String,
    /// Clamped description.
    pub description: String,
    /// Combined due instant, ISO-8601.
    pub due_date: String,
    /// Resolved priority.
    pub priority: String,
    /// Resolved category.
    pub category: String,
}

impl From<&TaskDraft> for NormalizedTask {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            due_date: draft.due_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            priority: draft.priority.as_str().to_owned(),
            category: draft.category.as_str().to_owned(),
        }
    }
}

/// Envelope every operation responds with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    /// Operation succeeded.
    Success {
        /// Always true.
        success: bool,
        /// Operation result.
        data: T,
    },
    /// Operation failed.
    Failure {
        /// Always false.
        success: bool,
        /// Human-readable reason.
        error: String,
    },
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result.
    pub fn ok(data: T) -> Self {
        Self::Success {
            success: true,
            data,
        }
    }

    /// Wrap a classified failure.
    pub fn failure(error: &ApiError) -> Self {
        Self::Failure {
            success: false,
            error: error.message.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------------------

/// Parse a normalize-task request body: `{ "input": string }`.
///
/// # Errors
///
/// Returns a bad-request [`ApiError`] for malformed JSON or a missing or
/// non-string `input`.
pub fn parse_normalize_request(body: &str) -> Result<String, ApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|_| ApiError::bad_request("malformed request body"))?;
    match value.get("input") {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(ApiError::bad_request("`input` must be a string")),
    }
}

/// Parse an analyze-tasks request body: `{ "period": "today" | "week" }`.
///
/// # Errors
///
/// Returns a bad-request [`ApiError`] for malformed JSON or an invalid
/// `period`.
pub fn parse_analyze_request(body: &str) -> Result<Period, ApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|_| ApiError::bad_request("malformed request body"))?;
    value
        .get("period")
        .and_then(Value::as_str)
        .and_then(Period::parse)
        .ok_or_else(|| ApiError::bad_request("`period` must be \"today\" or \"week\""))
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Normalize-task operation: free-form text in, task-creation payload out.
///
/// The draft is returned to the caller for persistence; nothing is stored
/// here, so a failed normalization never leaves a partial task behind.
///
/// # Errors
///
/// Returns an [`ApiError`] classified per the failure taxonomy.
pub async fn normalize_task(
    service: &dyn GenerationService,
    now: NaiveDateTime,
    input: &str,
) -> Result<TaskDraft, ApiError> {
    let draft = extract::normalize_task(service, now, input).await?;
    Ok(draft)
}

/// Analyze-tasks operation: reads the owner's snapshot and produces an
/// [`AnalysisResult`].
///
/// Zero-task and zero-in-period cases are successes carrying the canned
/// result, not errors.
///
/// # Errors
///
/// Returns an [`ApiError`] for store read failures and classified
/// generation-service failures.
pub async fn analyze_tasks(
    service: &dyn GenerationService,
    store: &dyn TaskStore,
    owner_id: &str,
    now: NaiveDateTime,
    period: Period,
) -> Result<AnalysisResult, ApiError> {
    let snapshot = store.list(owner_id).await?;
    let result = analyze::analyze_tasks(service, now, period, &snapshot).await?;
    Ok(result)
}
