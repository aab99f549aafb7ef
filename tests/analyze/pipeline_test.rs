//! Analytics pipeline tests with a stubbed generation service.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use tasklens::analyze::{analyze_tasks, AnalyzeError};
use tasklens::providers::{GenerationService, ProviderError};
use tasklens::types::{Category, Period, Priority, Task};

/// Narration stub with a call counter for short-circuit assertions.
struct NarratorStub {
    response: Result<String, u16>,
    calls: AtomicUsize,
}

impl NarratorStub {
    fn returning(text: &str) -> Self {
        Self {
            response: Ok(text.to_owned()),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for NarratorStub {
    async fn extract(&self, _prompt: &str, _schema: &Value) -> Result<Value, ProviderError> {
        Err(ProviderError::Parse("extract not stubbed".to_owned()))
    }

    async fn narrate(&self, _prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(ProviderError::HttpStatus {
                status: *status,
                body: "stub failure".to_owned(),
            }),
        }
    }

    fn model_id(&self) -> &str {
        "narrator-stub"
    }
}

fn at(d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, d)
        .expect("valid date")
        .and_hms_opt(h, 0, 0)
        .expect("valid time")
}

fn task(due: Option<NaiveDateTime>, priority: Priority, completed: bool) -> Task {
    Task {
        id: "t".to_owned(),
        owner_id: "owner".to_owned(),
        title: "발표 준비".to_owned(),
        description: String::new(),
        due_at: due,
        priority,
        category: Category::Work,
        completed,
        created_at: at(1, 8),
    }
}

#[tokio::test]
async fn zero_tasks_returns_canned_result_without_model_call() {
    let service = NarratorStub::returning("unused");
    let result = analyze_tasks(&service, at(12, 9), Period::Today, &[])
        .await
        .expect("should succeed");

    assert!(result.summary.contains("등록된 작업이 없어요"));
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn zero_in_period_returns_canned_result_without_model_call() {
    // Owner has a task, but it is due next day relative to the window.
    let service = NarratorStub::returning("unused");
    let tasks = vec![task(Some(at(13, 10)), Priority::Medium, false)];

    let result = analyze_tasks(&service, at(12, 9), Period::Today, &tasks)
        .await
        .expect("should succeed");

    assert!(result.summary.contains("오늘"));
    assert!(result.urgent_tasks.is_empty());
    assert_eq!(service.call_count(), 0, "no generation call may be made");
}

#[tokio::test]
async fn parsable_response_is_returned_as_is() {
    let service = NarratorStub::returning(
        r#"{"summary":"바쁜 하루였어요","urgentTasks":["발표 준비"],"insights":["i1","i2","i3"],"recommendations":["r1","r2","r3"]}"#,
    );
    let tasks = vec![task(Some(at(12, 15)), Priority::High, false)];

    let result = analyze_tasks(&service, at(12, 9), Period::Today, &tasks)
        .await
        .expect("should succeed");

    assert_eq!(result.summary, "바쁜 하루였어요");
    assert_eq!(result.urgent_tasks, vec!["발표 준비"]);
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn fenced_response_is_stripped_and_parsed() {
    let service = NarratorStub::returning(
        "```json\n{\"summary\":\"ok\",\"urgentTasks\":[],\"insights\":[],\"recommendations\":[]}\n```",
    );
    let tasks = vec![task(Some(at(12, 15)), Priority::Medium, false)];

    let result = analyze_tasks(&service, at(12, 9), Period::Today, &tasks)
        .await
        .expect("should succeed");
    assert_eq!(result.summary, "ok");
}

#[tokio::test]
async fn unparsable_response_falls_back_instead_of_failing() {
    let service = NarratorStub::returning("Here's my analysis of your week!");
    let tasks = vec![
        task(Some(at(12, 10)), Priority::High, false),
        task(Some(at(12, 14)), Priority::Medium, false),
        task(Some(at(12, 19)), Priority::Low, false),
    ];

    let result = analyze_tasks(&service, at(12, 9), Period::Today, &tasks)
        .await
        .expect("fallback must never fail");

    assert!(result.summary.contains('3'), "summary carries the literal total");
    assert_eq!(result.urgent_tasks, vec!["발표 준비"]);
    assert!(!result.recommendations.is_empty());
}

#[tokio::test]
async fn week_window_includes_the_whole_monday_to_sunday_span() {
    let service = NarratorStub::returning("not json, forces fallback");
    // Reference Wednesday 2024-06-12; Monday the 10th and Sunday the 16th
    // are both inside the week window, the 17th is not.
    let tasks = vec![
        task(Some(at(10, 9)), Priority::Medium, true),
        task(Some(at(16, 22)), Priority::Medium, false),
        task(Some(at(17, 9)), Priority::Medium, false),
    ];

    let result = analyze_tasks(&service, at(12, 12), Period::Week, &tasks)
        .await
        .expect("should succeed");
    assert!(result.summary.contains('2'), "two tasks are in the week");
}

#[tokio::test]
async fn provider_failure_propagates_as_analyze_error() {
    let service = NarratorStub::failing(503);
    let tasks = vec![task(Some(at(12, 15)), Priority::Medium, false)];

    let err = analyze_tasks(&service, at(12, 9), Period::Today, &tasks)
        .await
        .expect_err("should fail");
    let AnalyzeError::Provider(p) = err;
    assert!(matches!(p, ProviderError::HttpStatus { status: 503, .. }));
}
