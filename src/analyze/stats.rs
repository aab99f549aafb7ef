//! Period window resolution and statistical aggregation over task records.
//!
//! Pure computation: a resolved local-calendar window, a filter over one
//! owner's task snapshot, and the counts/rates/distributions the analysis
//! prompt and the deterministic fallback are built from.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::types::{Category, Period, Priority, Task};

/// A resolved analysis window, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    /// First instant of the window.
    pub start: NaiveDateTime,
    /// Last instant of the window.
    pub end: NaiveDateTime,
}

impl PeriodWindow {
    /// Resolve the window for a period selector and reference instant.
    ///
    /// Today → [00:00:00 today, 23:59:59.999 today]. Week → [Monday
    /// 00:00:00, Sunday 23:59:59.999] of the current week — the week starts
    /// on Monday regardless of locale weekday numbering.
    pub fn resolve(period: Period, now: NaiveDateTime) -> Self {
        let today = now.date();
        let (first_day, last_day) = match period {
            Period::Today => (today, today),
            Period::Week => {
                let back = u64::from(today.weekday().num_days_from_monday());
                let monday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
                let sunday = monday.checked_add_days(Days::new(6)).unwrap_or(monday);
                (monday, sunday)
            }
        };
        Self {
            start: first_day.and_hms_opt(0, 0, 0).unwrap_or(now),
            end: last_day.and_hms_milli_opt(23, 59, 59, 999).unwrap_or(now),
        }
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Filter a task snapshot to those due inside the window.
///
/// Tasks with no due instant are excluded from the period entirely.
pub fn tasks_in_window(tasks: &[Task], window: &PeriodWindow) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.due_at.is_some_and(|due| window.contains(due)))
        .cloned()
        .collect()
}

/// A total/completed pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Tasks counted.
    pub total: usize,
    /// Completed tasks among them.
    pub completed: usize,
}

impl Counts {
    fn add(&mut self, completed: bool) {
        self.total = self.total.saturating_add(1);
        if completed {
            self.completed = self.completed.saturating_add(1);
        }
    }
}

/// Aggregated statistics for one resolved window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodStats {
    /// Tasks due inside the window.
    pub total: usize,
    /// Completed tasks.
    pub completed: usize,
    /// Incomplete tasks.
    pub pending: usize,
    /// Completion percentage, one decimal place. Zero when total is zero.
    pub completion_rate: f64,
    /// High-priority total/completed pair.
    pub high: Counts,
    /// Medium-priority total/completed pair.
    pub medium: Counts,
    /// Low-priority total/completed pair.
    pub low: Counts,
    /// Per-category total/completed pairs, keyed by category label.
    pub by_category: BTreeMap<Category, Counts>,
    /// Tasks due strictly before the reference instant and not completed.
    pub overdue: usize,
    /// Tasks due on the reference calendar date.
    pub due_today: usize,
    /// Tasks due with hour in [6, 12).
    pub morning: usize,
    /// Tasks due with hour in [12, 18).
    pub afternoon: usize,
    /// Tasks due with hour in [18, 24).
    pub evening: usize,
}

impl PeriodStats {
    /// Aggregate over tasks already filtered into the window.
    ///
    /// One pass; zero-task input produces all-zero stats without division
    /// errors.
    pub fn aggregate(in_window: &[Task], now: NaiveDateTime) -> Self {
        let mut stats = Self::default();

        for task in in_window {
            stats.total = stats.total.saturating_add(1);
            if task.completed {
                stats.completed = stats.completed.saturating_add(1);
            } else {
                stats.pending = stats.pending.saturating_add(1);
            }

            match task.priority {
                Priority::High => stats.high.add(task.completed),
                Priority::Medium => stats.medium.add(task.completed),
                Priority::Low => stats.low.add(task.completed),
            }
            stats
                .by_category
                .entry(task.category)
                .or_default()
                .add(task.completed);

            let Some(due) = task.due_at else { continue };
            if due < now && !task.completed {
                stats.overdue = stats.overdue.saturating_add(1);
            }
            if due.date() == now.date() {
                stats.due_today = stats.due_today.saturating_add(1);
            }
            match due.time().hour() {
                6..=11 => stats.morning = stats.morning.saturating_add(1),
                12..=17 => stats.afternoon = stats.afternoon.saturating_add(1),
                18..=23 => stats.evening = stats.evening.saturating_add(1),
                _ => {}
            }
        }

        if stats.total > 0 {
            stats.completion_rate =
                (as_f64(stats.completed) * 1000.0 / as_f64(stats.total)).round() / 10.0;
        }

        stats
    }

    /// The total/completed pair for one priority level.
    pub fn priority(&self, level: Priority) -> Counts {
        match level {
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }
}

/// Count as f64 for rate arithmetic. Counts are far below `u32::MAX`.
fn as_f64(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}
