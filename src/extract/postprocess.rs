//! Validation and repair of raw extraction output.
//!
//! The generation service guarantees the output *shape*; this module
//! guarantees the output *content*: dates are sane and never in the past,
//! times are strict `HH:MM`, text fields fit their bounds, and enum fields
//! always resolve. Every correction is silent towards the caller but logged.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use super::ExtractError;
use crate::types::{Category, ExtractionResult, Priority, TaskDraft};

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Substitute title when the extracted one is unusable.
pub const TITLE_PLACEHOLDER: &str = "새 작업";

/// Substitute time when the extracted one is not strict `HH:MM`.
pub const TIME_FALLBACK: &str = "09:00";

const ELLIPSIS: &str = "...";

/// Validate and repair a raw extraction result into a task-creation payload.
///
/// `today` must be the same reference date the prompt was built with.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidExtractedDate`] when `due_date` does not
/// parse — an unparsable date signals a deeper extraction failure and the
/// caller should ask the user to retry, not silently correct.
pub fn finalize(raw: ExtractionResult, today: NaiveDate) -> Result<TaskDraft, ExtractError> {
    // 1. Date sanity.
    let parsed = NaiveDate::parse_from_str(raw.due_date.trim(), "%Y-%m-%d")
        .map_err(|_| ExtractError::InvalidExtractedDate(raw.due_date.clone()))?;

    // 2. Past-date correction: snap to today, never to a "smarter" future
    // occurrence.
    let due_date = if parsed < today {
        warn!(extracted = %parsed, corrected = %today, "past due date snapped to today");
        today
    } else {
        parsed
    };

    // 3. Time format fallback.
    let due_time = match parse_strict_time(&raw.due_time) {
        Some(t) => t,
        None => {
            debug!(extracted = %raw.due_time, fallback = TIME_FALLBACK, "invalid due time replaced");
            parse_strict_time(TIME_FALLBACK)
                .ok_or_else(|| ExtractError::InvalidExtractedDate(TIME_FALLBACK.to_owned()))?
        }
    };

    // 4. Title clamp.
    let title = clamp_title(&raw.title);

    // 5. Description clamp.
    let description = clamp_text(
        raw.description.as_deref().unwrap_or("").trim(),
        MAX_DESCRIPTION_CHARS,
    );

    // 6. Enum defaults. The schema contract normally prevents this path.
    let priority = match raw.priority.as_deref().and_then(Priority::parse) {
        Some(p) => p,
        None => {
            debug!(extracted = ?raw.priority, "unrecognised priority defaulted to medium");
            Priority::Medium
        }
    };
    let category = match raw.category.as_deref().and_then(Category::parse) {
        Some(c) => c,
        None => {
            debug!(extracted = ?raw.category, "unrecognised category defaulted to personal");
            Category::Personal
        }
    };

    // 7. Combine into one absolute local instant.
    let due_at = NaiveDateTime::new(due_date, due_time);

    Ok(TaskDraft {
        title,
        description,
        due_at,
        priority,
        category,
    })
}

/// Parse strict `HH:MM` with hour 00–23 and minute 00–59.
///
/// Rejects everything else, including single-digit hours like `"9:00"`.
fn parse_strict_time(s: &str) -> Option<NaiveTime> {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    if !bytes[0].is_ascii_digit()
        || !bytes[1].is_ascii_digit()
        || !bytes[3].is_ascii_digit()
        || !bytes[4].is_ascii_digit()
    {
        return None;
    }
    let hour: u32 = s.get(0..2)?.parse().ok()?;
    let minute: u32 = s.get(3..5)?.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn clamp_title(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() < 2 {
        debug!(extracted = %trimmed, "unusable title replaced with placeholder");
        return TITLE_PLACEHOLDER.to_owned();
    }
    clamp_text(trimmed, MAX_TITLE_CHARS)
}

/// Truncate to `max` characters total, ellipsis included, when over `max`.
fn clamp_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
