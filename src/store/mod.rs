//! Owner-scoped task record store boundary.
//!
//! The core pipelines treat storage as an opaque collaborator: simple CRUD
//! with an ownership filter, behind the [`TaskStore`] trait. One
//! implementation is provided, [`sqlite::SqliteTaskStore`].

pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::types::{Task, TaskDraft};

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No task with this id exists for the requesting owner.
    #[error("task not found: {id}")]
    NotFound {
        /// The requested task id.
        id: String,
    },

    /// An invalid enum value was read from the database.
    #[error("invalid {field} value: {value:?}")]
    InvalidEnum {
        /// Which column contained the bad value.
        field: &'static str,
        /// The unexpected value.
        value: String,
    },

    /// A stored timestamp did not parse.
    #[error("invalid stored timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// Owner-scoped task persistence.
///
/// Every operation is filtered to `owner_id`; no task is ever visible to,
/// or mutable by, another owner. Concurrency control on concurrent writes
/// to the same task is the implementation's concern, treated as an atomic
/// owner-scoped update at this boundary.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persist a draft as a new task owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    async fn create(
        &self,
        owner_id: &str,
        draft: &TaskDraft,
        now: NaiveDateTime,
    ) -> Result<Task, StoreError>;

    /// List all tasks for one owner.
    ///
    /// Ordered by due instant ascending with undated tasks last, then by
    /// creation instant descending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or a row is corrupt.
    async fn list(&self, owner_id: &str) -> Result<Vec<Task>, StoreError>;

    /// Set the completion flag on one task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no matching owner-scoped task
    /// exists.
    async fn set_completed(
        &self,
        owner_id: &str,
        id: &str,
        completed: bool,
    ) -> Result<(), StoreError>;

    /// Delete one task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no matching owner-scoped task
    /// exists.
    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError>;
}
