//! Periodic analytics pipeline.
//!
//! Statistical aggregation over one owner's task snapshot → narrative
//! prompt → model-assisted generation → fallback synthesis when the
//! response cannot be parsed. After the zero-task short-circuit, this
//! pipeline never fails on response shape — only on provider transport.

pub mod prompt;
pub mod resolve;
pub mod stats;

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, info};

use crate::providers::{GenerationService, ProviderError};
use crate::types::{AnalysisResult, Period, Task};

use self::stats::{PeriodStats, PeriodWindow};

/// Failures of the analytics pipeline.
///
/// Response-shape problems never appear here; they are recovered locally by
/// the fallback synthesis.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The generation service call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Run the full analytics pipeline over one owner's task snapshot.
///
/// `tasks` is the owner's complete snapshot, captured at call start; the
/// window filter happens here. Zero tasks overall, or zero in the resolved
/// window, short-circuit to a canned result with no model call.
///
/// # Errors
///
/// Returns [`AnalyzeError::Provider`] when the generation call fails. A
/// malformed response body is not an error — the deterministic fallback
/// covers it.
pub async fn analyze_tasks(
    service: &dyn GenerationService,
    now: NaiveDateTime,
    period: Period,
    tasks: &[Task],
) -> Result<AnalysisResult, AnalyzeError> {
    if tasks.is_empty() {
        info!(period = period.as_str(), "no tasks at all, returning canned analysis");
        return Ok(resolve::empty_period_result(period, false));
    }

    let window = PeriodWindow::resolve(period, now);
    let in_window = stats::tasks_in_window(tasks, &window);
    if in_window.is_empty() {
        info!(period = period.as_str(), "no tasks in period, returning canned analysis");
        return Ok(resolve::empty_period_result(period, true));
    }

    let period_stats = PeriodStats::aggregate(&in_window, now);
    let prompt_text = prompt::build_analysis_prompt(period, &window, &period_stats, &in_window, now);

    debug!(
        model = service.model_id(),
        total = period_stats.total,
        "requesting narrative analysis"
    );
    let text = service.narrate(&prompt_text).await?;

    Ok(resolve::resolve_response(&text, &period_stats, &in_window))
}
