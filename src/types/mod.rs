//! Core domain types shared across the extraction and analysis pipelines.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Urgent or important work.
    High,
    /// Default level when nothing in the text signals urgency or leisure.
    Medium,
    /// Leisure or low-stakes work.
    Low,
}

impl Priority {
    /// All priority levels, in display order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Returns the string representation stored in SQLite and used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parse a stored or extracted value, case-insensitively.
    ///
    /// Returns `None` for unrecognised values — the post-processor substitutes
    /// [`Priority::Medium`] rather than failing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Task category.
///
/// Four values are canonical everywhere: schema, store, and prompt all
/// enumerate exactly this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Job, projects, meetings, reports.
    Work,
    /// Errands, family, social life.
    Personal,
    /// Courses, exams, reading.
    Study,
    /// Exercise, medical appointments, rest.
    Health,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 4] = [Self::Work, Self::Personal, Self::Study, Self::Health];

    /// Returns the string representation stored in SQLite and used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Personal => "personal",
            Self::Study => "study",
            Self::Health => "health",
        }
    }

    /// Parse a stored or extracted value, case-insensitively.
    ///
    /// Returns `None` for unrecognised values — the post-processor substitutes
    /// [`Category::Personal`] rather than failing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "work" => Some(Self::Work),
            "personal" => Some(Self::Personal),
            "study" => Some(Self::Study),
            "health" => Some(Self::Health),
            _ => None,
        }
    }
}

/// A persisted task record, exclusively owned by `owner_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique identifier, assigned at creation.
    pub id: String,
    /// Identifier of the owning user. Every read/write is scoped to it.
    pub owner_id: String,
    /// Non-empty title, at most 100 characters after post-processing.
    pub title: String,
    /// Optional description, at most 500 characters. Empty string permitted.
    pub description: String,
    /// Combined due date+time as a local wall-clock instant.
    pub due_at: Option<NaiveDateTime>,
    /// Priority level.
    pub priority: Priority,
    /// Category.
    pub category: Category,
    /// Completion flag, defaults to false.
    pub completed: bool,
    /// Creation instant, immutable.
    pub created_at: NaiveDateTime,
}

/// A validated task-creation payload produced by the extraction pipeline.
///
/// The pipeline never persists anything itself; the caller turns a draft
/// into a [`Task`] via the store only after the whole operation succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    /// Title, guaranteed non-empty and at most 100 characters.
    pub title: String,
    /// Description, possibly empty, at most 500 characters.
    pub description: String,
    /// Combined due date+time.
    pub due_at: NaiveDateTime,
    /// Priority, never missing.
    pub priority: Priority,
    /// Category, never missing.
    pub category: Category,
}

/// Raw structured output from the generation service, before post-processing.
///
/// Transient: corrected in place by the post-processor, combined into a
/// [`TaskDraft`], then discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionResult {
    /// Extracted title, unclamped.
    pub title: String,
    /// Extracted description, possibly absent.
    #[serde(default)]
    pub description: Option<String>,
    /// Calendar date in `YYYY-MM-DD` form.
    pub due_date: String,
    /// Clock time in `HH:MM` form.
    pub due_time: String,
    /// Priority as emitted by the model.
    #[serde(default)]
    pub priority: Option<String>,
    /// Category as emitted by the model.
    #[serde(default)]
    pub category: Option<String>,
}

/// A caller-selected analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// The current calendar day.
    Today,
    /// The current Monday–Sunday week.
    Week,
}

impl Period {
    /// Returns the string representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
        }
    }

    /// Parse a request value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            _ => None,
        }
    }
}

/// Narrative analysis over one period, produced by the model or the fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// One-paragraph summary of the period.
    pub summary: String,
    /// Up to five urgent items, ordered by importance. Empty when none apply.
    pub urgent_tasks: Vec<String>,
    /// Three to six observations, encouraging in tone.
    pub insights: Vec<String>,
    /// Three to six concrete, actionable suggestions.
    pub recommendations: Vec<String>,
}

/// Format a local instant the way prompts and payloads render timestamps.
pub fn format_instant(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Format a calendar date as `YYYY-MM-DD`.
pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
