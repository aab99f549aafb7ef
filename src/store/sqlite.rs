//! SQLite-backed task store using `sqlx`.
//!
//! Schema is bootstrapped on open. Reads and writes go directly through the
//! connection pool; the due/created ordering is applied client-side because
//! "NULLs last, then created descending" is simpler in Rust than in SQL
//! portable across SQLite versions.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{StoreError, TaskStore};
use crate::types::{Category, Priority, Task, TaskDraft};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS tasks (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    due_at      TEXT,
    priority    TEXT NOT NULL CHECK (priority IN ('high', 'medium', 'low')),
    category    TEXT NOT NULL CHECK (category IN ('work', 'personal', 'study', 'health')),
    completed   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner_id);
";

/// SQLite-backed [`TaskStore`].
#[derive(Debug, Clone)]
pub struct SqliteTaskStore {
    db: SqlitePool,
}

impl SqliteTaskStore {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] when the pool cannot be created or
    /// the schema bootstrap fails.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let db = SqlitePoolOptions::new().connect_with(options).await?;
        Self::from_pool(db).await
    }

    /// Open an in-memory database (tests).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on pool or schema failure.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(db).await
    }

    async fn from_pool(db: SqlitePool) -> Result<Self, StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&db).await?;
        info!("task store schema ensured");
        Ok(Self { db })
    }
}

fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| StoreError::InvalidTimestamp(s.to_owned()))
}

fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Result<Task, StoreError> {
    let priority_raw: String = row.try_get("priority")?;
    let priority = Priority::parse(&priority_raw).ok_or(StoreError::InvalidEnum {
        field: "priority",
        value: priority_raw,
    })?;

    let category_raw: String = row.try_get("category")?;
    let category = Category::parse(&category_raw).ok_or(StoreError::InvalidEnum {
        field: "category",
        value: category_raw,
    })?;

    let due_raw: Option<String> = row.try_get("due_at")?;
    let due_at = due_raw.as_deref().map(parse_timestamp).transpose()?;

    let created_raw: String = row.try_get("created_at")?;

    Ok(Task {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        due_at,
        priority,
        category,
        completed: row.try_get::<i64, _>("completed")? != 0,
        created_at: parse_timestamp(&created_raw)?,
    })
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn create(
        &self,
        owner_id: &str,
        draft: &TaskDraft,
        now: NaiveDateTime,
    ) -> Result<Task, StoreError> {
        let task = Task {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_owned(),
            title: draft.title.clone(),
            description: draft.description.clone(),
            due_at: Some(draft.due_at),
            priority: draft.priority,
            category: draft.category,
            completed: false,
            created_at: now,
        };

        sqlx::query(
            "INSERT INTO tasks (id, owner_id, title, description, due_at, priority, category, completed, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
        )
        .bind(&task.id)
        .bind(&task.owner_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_at.map(format_timestamp))
        .bind(task.priority.as_str())
        .bind(task.category.as_str())
        .bind(format_timestamp(task.created_at))
        .execute(&self.db)
        .await?;

        Ok(task)
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query("SELECT * FROM tasks WHERE owner_id = ?1")
            .bind(owner_id)
            .fetch_all(&self.db)
            .await?;

        let mut tasks = rows
            .iter()
            .map(row_to_task)
            .collect::<Result<Vec<_>, _>>()?;

        // Due ascending, undated last; ties broken by newest first.
        tasks.sort_by(|a, b| match (a.due_at, b.due_at) {
            (Some(x), Some(y)) => x.cmp(&y).then(b.created_at.cmp(&a.created_at)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        });

        Ok(tasks)
    }

    async fn set_completed(
        &self,
        owner_id: &str,
        id: &str,
        completed: bool,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE tasks SET completed = ?1 WHERE id = ?2 AND owner_id = ?3",
        )
        .bind(i64::from(completed))
        .bind(id)
        .bind(owner_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id: id.to_owned() });
        }
        Ok(())
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id: id.to_owned() });
        }
        Ok(())
    }
}
