//! Calendar anchor resolution for relative date expressions.
//!
//! Given a reference date, computes the fixed table of named anchors the
//! extraction prompt maps relative expressions onto ("tomorrow", "this
//! friday", "next monday", ...). Pure arithmetic over [`NaiveDate`] in the
//! local calendar — time of day and time zone never shift an anchor.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// All weekdays in Monday-first order, paired with prompt labels.
pub const WEEKDAYS: [(Weekday, &str, &str); 7] = [
    (Weekday::Mon, "monday", "월요일"),
    (Weekday::Tue, "tuesday", "화요일"),
    (Weekday::Wed, "wednesday", "수요일"),
    (Weekday::Thu, "thursday", "목요일"),
    (Weekday::Fri, "friday", "금요일"),
    (Weekday::Sat, "saturday", "토요일"),
    (Weekday::Sun, "sunday", "일요일"),
];

/// Resolved calendar anchors for one reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateAnchors {
    /// The reference date itself.
    pub today: NaiveDate,
    /// Reference date + 1 day.
    pub tomorrow: NaiveDate,
    /// Reference date + 2 days.
    pub day_after_tomorrow: NaiveDate,
}

impl DateAnchors {
    /// Resolve the anchor table for a reference date.
    pub fn resolve(today: NaiveDate) -> Self {
        Self {
            today,
            tomorrow: add_days(today, 1),
            day_after_tomorrow: add_days(today, 2),
        }
    }

    /// The next occurrence of `target` within the current week window.
    ///
    /// If the target weekday has not yet passed this week (its Monday-first
    /// number is ≥ today's), this is today plus the difference; otherwise it
    /// wraps into the following week. Never before today.
    pub fn this_weekday(&self, target: Weekday) -> NaiveDate {
        let today_num = u64::from(self.today.weekday().num_days_from_monday());
        let target_num = u64::from(target.num_days_from_monday());
        let diff = if target_num >= today_num {
            target_num.saturating_sub(today_num)
        } else {
            7u64.saturating_add(target_num).saturating_sub(today_num)
        };
        add_days(self.today, diff)
    }

    /// `this_weekday(target)` plus seven days.
    pub fn next_weekday(&self, target: Weekday) -> NaiveDate {
        add_days(self.this_weekday(target), 7)
    }

    /// English name of the reference weekday, lowercase.
    pub fn weekday_name(&self) -> &'static str {
        weekday_label(self.today.weekday()).0
    }

    /// Year of the reference date.
    pub fn year(&self) -> i32 {
        self.today.year()
    }

    /// Month of the reference date (1–12).
    pub fn month(&self) -> u32 {
        self.today.month()
    }

    /// Day of month of the reference date (1–31).
    pub fn day(&self) -> u32 {
        self.today.day()
    }
}

/// English and Korean labels for a weekday.
pub fn weekday_label(day: Weekday) -> (&'static str, &'static str) {
    match day {
        Weekday::Mon => ("monday", "월요일"),
        Weekday::Tue => ("tuesday", "화요일"),
        Weekday::Wed => ("wednesday", "수요일"),
        Weekday::Thu => ("thursday", "목요일"),
        Weekday::Fri => ("friday", "금요일"),
        Weekday::Sat => ("saturday", "토요일"),
        Weekday::Sun => ("sunday", "일요일"),
    }
}

/// Date arithmetic that cannot leave the calendar.
///
/// `checked_add_days` only fails at the far end of the supported range;
/// falling back to the input keeps the function total.
fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(date)
}
