//! Narrative analysis prompt construction.
//!
//! Embeds the resolved window, the aggregated statistics, and the raw
//! filtered task list, plus a period-specific analytical angle. The output
//! contract is stated in prose because the response mixes narrative text
//! with structure and is parsed leniently on the way back.

use std::fmt::Write as _;

use chrono::NaiveDateTime;

use super::stats::{PeriodStats, PeriodWindow};
use crate::types::{format_instant, Period, Priority, Task};

/// Build the analysis prompt for one period snapshot.
pub fn build_analysis_prompt(
    period: Period,
    window: &PeriodWindow,
    stats: &PeriodStats,
    tasks: &[Task],
    now: NaiveDateTime,
) -> String {
    let mut prompt = String::with_capacity(4096);

    let _ = write!(
        prompt,
        "You are a thoughtful productivity coach. Analyze one user's tasks for the\n\
         period below and write an encouraging, concrete assessment.\n\
         \n\
         Period: {period} ({start} .. {end})\n\
         Current time: {now}\n",
        period = period.as_str(),
        start = format_instant(window.start),
        end = format_instant(window.end),
        now = format_instant(now),
    );

    prompt.push_str("\nSTATISTICS:\n");
    let _ = writeln!(
        prompt,
        "- total {}, completed {}, pending {}, completion rate {:.1}%",
        stats.total, stats.completed, stats.pending, stats.completion_rate
    );
    for level in Priority::ALL {
        let counts = stats.priority(level);
        let _ = writeln!(
            prompt,
            "- priority {}: {} total, {} completed",
            level.as_str(),
            counts.total,
            counts.completed
        );
    }
    for (category, counts) in &stats.by_category {
        let _ = writeln!(
            prompt,
            "- category {}: {} total, {} completed",
            category.as_str(),
            counts.total,
            counts.completed
        );
    }
    let _ = writeln!(
        prompt,
        "- overdue {}, due today {}, due in morning {}, afternoon {}, evening {}",
        stats.overdue, stats.due_today, stats.morning, stats.afternoon, stats.evening
    );

    prompt.push_str("\nTASKS:\n");
    for task in tasks {
        let due = task
            .due_at
            .map(format_instant)
            .unwrap_or_else(|| "no due time".to_owned());
        let _ = writeln!(
            prompt,
            "- [{done}] {title} | {desc} | due {due} | {priority}/{category} | created {created}",
            done = if task.completed { "x" } else { " " },
            title = task.title,
            desc = if task.description.is_empty() { "-" } else { &task.description },
            priority = task.priority.as_str(),
            category = task.category.as_str(),
            created = format_instant(task.created_at),
        );
    }

    prompt.push_str(match period {
        Period::Today => {
            "\nANGLE: focus on what remains of today — which pending tasks to tackle\n\
             in the remaining hours, and in what order.\n"
        }
        Period::Week => {
            "\nANGLE: focus on the weekly pattern — which days and time slots carried\n\
             the load, and what to plan differently next week.\n"
        }
    });

    prompt.push_str(
        "\nRespond with exactly one JSON object, no other text:\n\
         {\n\
           \"summary\": string,\n\
           \"urgentTasks\": string[],  // at most 5; incomplete high-priority or\n\
                                       // overdue/near-due items, most important first;\n\
                                       // empty array when none apply\n\
           \"insights\": string[],     // 3-6 entries: completion-rate framing,\n\
                                       // time-management and productivity patterns,\n\
                                       // encouraging tone\n\
           \"recommendations\": string[] // 3-6 entries: concrete and actionable —\n\
                                       // priority order, time blocks, motivational close\n\
         }\n",
    );

    prompt
}
