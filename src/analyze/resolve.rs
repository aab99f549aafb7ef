//! Analysis response resolution and deterministic fallback synthesis.
//!
//! The narrative response is requested as free text, so models wrap it in
//! code fences often enough that stripping them is part of the contract.
//! When the payload still does not parse, the caller gets a fallback built
//! from the aggregated statistics — never a hard failure.

use tracing::warn;

use super::stats::PeriodStats;
use crate::types::{AnalysisResult, Period, Priority, Task};

/// Maximum urgent items carried in a result.
pub const MAX_URGENT_TASKS: usize = 5;

/// Resolve the model's free-text response into an [`AnalysisResult`].
///
/// Strips incidental code-fence markers, parses as JSON, and on any parse
/// failure synthesizes the deterministic fallback. Total: always returns a
/// usable result.
pub fn resolve_response(text: &str, stats: &PeriodStats, tasks: &[Task]) -> AnalysisResult {
    let stripped = strip_code_fences(text);
    match serde_json::from_str::<AnalysisResult>(stripped) {
        Ok(mut result) => {
            result.urgent_tasks.truncate(MAX_URGENT_TASKS);
            result
        }
        Err(e) => {
            warn!(error = %e, "analysis response unparsable, using fallback synthesis");
            fallback_analysis(stats, tasks)
        }
    }
}

/// Remove leading/trailing code-fence lines, if present.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Synthesize an analysis directly from the statistics.
///
/// Used when the model's response cannot be parsed. Urgent items come
/// mechanically from incomplete high-priority records, most recently due
/// first as listed.
pub fn fallback_analysis(stats: &PeriodStats, tasks: &[Task]) -> AnalysisResult {
    let urgent_tasks: Vec<String> = tasks
        .iter()
        .filter(|t| !t.completed && t.priority == Priority::High)
        .take(MAX_URGENT_TASKS)
        .map(|t| t.title.clone())
        .collect();

    AnalysisResult {
        summary: format!(
            "이번 기간에 총 {}개의 작업 중 {}개를 완료했어요 (완료율 {:.1}%). 남은 작업은 {}개입니다.",
            stats.total, stats.completed, stats.completion_rate, stats.pending
        ),
        urgent_tasks,
        insights: vec![
            format!(
                "완료율 {:.1}%는 지금까지의 흐름을 보여줘요. 작은 진전도 진전입니다.",
                stats.completion_rate
            ),
            format!(
                "기한이 지난 작업이 {}개 있어요. 먼저 처리하면 부담이 줄어듭니다.",
                stats.overdue
            ),
        ],
        recommendations: vec![
            "우선순위가 높은 작업부터 하나씩 끝내보세요.".to_owned(),
            "비슷한 작업은 시간대를 묶어서 처리하면 집중이 쉬워져요.".to_owned(),
        ],
    }
}

/// Canned result for a period with no tasks, returned without a model call.
pub fn empty_period_result(period: Period, has_any_tasks: bool) -> AnalysisResult {
    let summary = match (period, has_any_tasks) {
        (Period::Today, true) => "오늘 예정된 작업이 없어요.".to_owned(),
        (Period::Week, true) => "이번 주에 예정된 작업이 없어요.".to_owned(),
        (_, false) => "아직 등록된 작업이 없어요.".to_owned(),
    };
    AnalysisResult {
        summary,
        urgent_tasks: vec![],
        insights: vec![
            "새로운 시작에 좋은 때예요.".to_owned(),
            "작업을 하나 등록하면 분석이 함께 시작됩니다.".to_owned(),
        ],
        recommendations: vec![
            "가장 먼저 떠오르는 할 일을 한 줄로 적어보세요.".to_owned(),
            "작게 시작하는 것이 꾸준함의 비결이에요.".to_owned(),
        ],
    }
}
