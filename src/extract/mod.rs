//! Natural-language → structured-task normalization pipeline.
//!
//! Stages: input validation → prompt construction with resolved date
//! anchors → schema-constrained extraction via the generation service →
//! deterministic post-processing and correction. The pipeline is stateless;
//! the reference instant is captured once by the caller and threaded
//! through every stage, so no stage ever reads a wall clock.

pub mod anchors;
pub mod input;
pub mod keywords;
pub mod postprocess;
pub mod prompt;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, info};

use crate::providers::{GenerationService, ProviderError};
use crate::types::{ExtractionResult, TaskDraft};

use self::anchors::DateAnchors;
use self::input::ValidationError;

/// Failures of the normalization pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Input failed validation; the reason is reported verbatim.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The generation service did not produce a schema-conforming object.
    ///
    /// Not silently recovered — structural correctness is enforced by the
    /// service contract, and the caller is asked to retry.
    #[error("extraction output did not conform to the schema: {0}")]
    SchemaViolation(String),
    /// The extracted due date does not parse as `YYYY-MM-DD`.
    #[error("extracted due date {0:?} is not a valid date, please retry")]
    InvalidExtractedDate(String),
    /// The generation service call itself failed.
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for ExtractError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::SchemaViolation(detail) => Self::SchemaViolation(detail),
            other => Self::Provider(other),
        }
    }
}

/// Run the full normalization pipeline for one free-form input.
///
/// `now` is the single reference instant for the whole operation: the
/// anchor table, the prompt's "today", and the past-date correction all
/// derive from it.
///
/// # Errors
///
/// Returns [`ExtractError`] on validation failure, provider failure, schema
/// violation, or an unparsable extracted date. Nothing is persisted here;
/// the returned [`TaskDraft`] is the caller's to store.
pub async fn normalize_task(
    service: &dyn GenerationService,
    now: NaiveDateTime,
    raw_input: &str,
) -> Result<TaskDraft, ExtractError> {
    let normalized = input::normalize(raw_input);
    input::validate(&normalized)?;

    let anchors = DateAnchors::resolve(now.date());
    let prompt_text = prompt::build_extraction_prompt(&anchors, &normalized);
    let schema = prompt::extraction_schema();

    debug!(model = service.model_id(), chars = normalized.chars().count(), "extracting task");
    let object = service.extract(&prompt_text, &schema).await?;

    let raw: ExtractionResult = serde_json::from_value(object)
        .map_err(|e| ExtractError::SchemaViolation(e.to_string()))?;

    let draft = postprocess::finalize(raw, now.date())?;
    info!(
        due_at = %draft.due_at,
        priority = draft.priority.as_str(),
        category = draft.category.as_str(),
        "task normalized"
    );
    Ok(draft)
}
