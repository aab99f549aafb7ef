//! SQLite task store tests against an in-memory database.

use chrono::{NaiveDate, NaiveDateTime};

use tasklens::store::sqlite::SqliteTaskStore;
use tasklens::store::{StoreError, TaskStore};
use tasklens::types::{Category, Priority, TaskDraft};

fn at(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, d)
        .expect("valid date")
        .and_hms_opt(h, 0, 0)
        .expect("valid time")
}

fn draft(title: &str, due: NaiveDateTime) -> TaskDraft {
    TaskDraft {
        title: title.to_owned(),
        description: "메모".to_owned(),
        due_at: due,
        priority: Priority::Medium,
        category: Category::Work,
    }
}

#[tokio::test]
async fn create_then_list_round_trips_every_field() {
    let store = SqliteTaskStore::open_in_memory().await.expect("open");
    let created = store
        .create("owner", &draft("보고서 제출하기", at(12, 15)), at(10, 9))
        .await
        .expect("create");

    assert!(!created.id.is_empty());
    assert!(!created.completed);

    let listed = store.list("owner").await.expect("list");
    assert_eq!(listed.len(), 1);
    let task = &listed[0];
    assert_eq!(task.id, created.id);
    assert_eq!(task.title, "보고서 제출하기");
    assert_eq!(task.description, "메모");
    assert_eq!(task.due_at, Some(at(12, 15)));
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.category, Category::Work);
    assert_eq!(task.created_at, at(10, 9));
}

#[tokio::test]
async fn list_orders_by_due_ascending_then_newest_created() {
    let store = SqliteTaskStore::open_in_memory().await.expect("open");
    store
        .create("owner", &draft("later", at(14, 9)), at(10, 8))
        .await
        .expect("create");
    store
        .create("owner", &draft("sooner", at(11, 9)), at(10, 9))
        .await
        .expect("create");
    store
        .create("owner", &draft("same-due-older", at(11, 9)), at(10, 7))
        .await
        .expect("create");

    let titles: Vec<String> = store
        .list("owner")
        .await
        .expect("list")
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["sooner", "same-due-older", "later"]);
}

#[tokio::test]
async fn owners_never_see_each_others_tasks() {
    let store = SqliteTaskStore::open_in_memory().await.expect("open");
    let theirs = store
        .create("alice", &draft("alice task", at(11, 9)), at(10, 9))
        .await
        .expect("create");
    store
        .create("bob", &draft("bob task", at(11, 9)), at(10, 9))
        .await
        .expect("create");

    let bob_list = store.list("bob").await.expect("list");
    assert_eq!(bob_list.len(), 1);
    assert_eq!(bob_list[0].title, "bob task");

    // Cross-owner mutation is a not-found, not a silent success.
    let err = store
        .set_completed("bob", &theirs.id, true)
        .await
        .expect_err("must not touch another owner's task");
    assert!(matches!(err, StoreError::NotFound { .. }));

    let err = store
        .delete("bob", &theirs.id)
        .await
        .expect_err("must not delete another owner's task");
    assert!(matches!(err, StoreError::NotFound { .. }));

    let alice_list = store.list("alice").await.expect("list");
    assert!(!alice_list[0].completed);
}

#[tokio::test]
async fn set_completed_flips_the_flag_both_ways() {
    let store = SqliteTaskStore::open_in_memory().await.expect("open");
    let task = store
        .create("owner", &draft("t", at(11, 9)), at(10, 9))
        .await
        .expect("create");

    store
        .set_completed("owner", &task.id, true)
        .await
        .expect("complete");
    assert!(store.list("owner").await.expect("list")[0].completed);

    store
        .set_completed("owner", &task.id, false)
        .await
        .expect("reopen");
    assert!(!store.list("owner").await.expect("list")[0].completed);
}

#[tokio::test]
async fn delete_removes_the_task() {
    let store = SqliteTaskStore::open_in_memory().await.expect("open");
    let task = store
        .create("owner", &draft("t", at(11, 9)), at(10, 9))
        .await
        .expect("create");

    store.delete("owner", &task.id).await.expect("delete");
    assert!(store.list("owner").await.expect("list").is_empty());
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let store = SqliteTaskStore::open_in_memory().await.expect("open");

    let err = store
        .set_completed("owner", "no-such-id", true)
        .await
        .expect_err("should fail");
    assert!(matches!(err, StoreError::NotFound { ref id } if id == "no-such-id"));

    let err = store
        .delete("owner", "no-such-id")
        .await
        .expect_err("should fail");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn open_creates_the_database_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tasks.db");
    let path_str = path.to_string_lossy().into_owned();

    let store = SqliteTaskStore::open(&path_str).await.expect("open");
    store
        .create("owner", &draft("persisted", at(11, 9)), at(10, 9))
        .await
        .expect("create");
    assert!(path.exists());

    // A second open against the same file sees the row.
    let reopened = SqliteTaskStore::open(&path_str).await.expect("reopen");
    assert_eq!(reopened.list("owner").await.expect("list").len(), 1);
}
