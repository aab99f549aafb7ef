//! Pipeline behavior tests with a stubbed generation service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use tasklens::extract::{normalize_task, ExtractError};
use tasklens::providers::{GenerationService, ProviderError};

/// Generation service stub returning a canned extraction object.
///
/// Records the prompt it was called with and counts calls so tests can
/// assert on prompt content and on short-circuit paths.
struct StubService {
    object: Value,
    calls: AtomicUsize,
    last_prompt: Mutex<String>,
}

impl StubService {
    fn returning(object: Value) -> Self {
        Self {
            object,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(String::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for StubService {
    async fn extract(&self, prompt: &str, _schema: &Value) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_prompt.lock() {
            *guard = prompt.to_owned();
        }
        Ok(self.object.clone())
    }

    async fn narrate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Parse("narrate not stubbed".to_owned()))
    }

    fn model_id(&self) -> &str {
        "stub"
    }
}

/// Stub that always fails with a given HTTP status.
struct FailingService {
    status: u16,
}

#[async_trait]
impl GenerationService for FailingService {
    async fn extract(&self, _prompt: &str, _schema: &Value) -> Result<Value, ProviderError> {
        Err(ProviderError::HttpStatus {
            status: self.status,
            body: "stub failure".to_owned(),
        })
    }

    async fn narrate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::HttpStatus {
            status: self.status,
            body: "stub failure".to_owned(),
        })
    }

    fn model_id(&self) -> &str {
        "failing-stub"
    }
}

fn monday_morning() -> NaiveDateTime {
    // 2024-06-10 is a Monday.
    NaiveDate::from_ymd_opt(2024, 6, 10)
        .expect("valid date")
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
}

fn conforming_object() -> Value {
    json!({
        "title": "프로젝트 발표 준비",
        "description": "발표 자료 준비.",
        "due_date": "2024-06-11",
        "due_time": "15:00",
        "priority": "medium",
        "category": "work"
    })
}

#[tokio::test]
async fn pipeline_produces_draft_from_conforming_output() {
    let service = StubService::returning(conforming_object());
    let draft = normalize_task(&service, monday_morning(), "내일 오후 3시까지 프로젝트 발표 준비하기")
        .await
        .expect("should normalize");

    assert_eq!(draft.title, "프로젝트 발표 준비");
    assert_eq!(
        draft.due_at,
        NaiveDate::from_ymd_opt(2024, 6, 11)
            .expect("valid")
            .and_hms_opt(15, 0, 0)
            .expect("valid")
    );
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn prompt_carries_resolved_anchors_and_normalized_input() {
    let service = StubService::returning(conforming_object());
    normalize_task(&service, monday_morning(), "  내일   회의  ")
        .await
        .expect("should normalize");

    let prompt = service.last_prompt.lock().expect("lock").clone();
    assert!(prompt.contains("TODAY is 2024-06-10"));
    assert!(prompt.contains("tomorrow / 내일 → 2024-06-11"));
    assert!(prompt.contains("내일 회의"), "input should be normalized before embedding");
    assert!(!prompt.contains("  내일"), "raw whitespace should not survive");
}

#[tokio::test]
async fn validation_failure_short_circuits_without_a_model_call() {
    let service = StubService::returning(conforming_object());

    let err = normalize_task(&service, monday_morning(), "   ")
        .await
        .expect_err("should fail validation");
    assert!(matches!(err, ExtractError::Validation(_)));

    let err = normalize_task(&service, monday_morning(), "!!!")
        .await
        .expect_err("should fail validation");
    assert!(matches!(err, ExtractError::Validation(_)));

    assert_eq!(service.call_count(), 0, "no model call on invalid input");
}

#[tokio::test]
async fn non_conforming_object_is_a_schema_violation() {
    // Missing required fields entirely.
    let service = StubService::returning(json!({"wrong": true}));
    let err = normalize_task(&service, monday_morning(), "내일 회의")
        .await
        .expect_err("should fail");
    assert!(matches!(err, ExtractError::SchemaViolation(_)));
}

#[tokio::test]
async fn past_date_from_model_is_snapped_to_today() {
    let mut object = conforming_object();
    object["due_date"] = json!("2024-06-01");
    let service = StubService::returning(object);

    let draft = normalize_task(&service, monday_morning(), "회의 준비")
        .await
        .expect("should normalize");
    assert_eq!(
        draft.due_at.date(),
        NaiveDate::from_ymd_opt(2024, 6, 10).expect("valid")
    );
}

#[tokio::test]
async fn unparsable_date_from_model_asks_for_retry() {
    let mut object = conforming_object();
    object["due_date"] = json!("sometime soon");
    let service = StubService::returning(object);

    let err = normalize_task(&service, monday_morning(), "회의 준비")
        .await
        .expect_err("should fail");
    assert!(matches!(err, ExtractError::InvalidExtractedDate(_)));
}

#[tokio::test]
async fn provider_failures_propagate_classified() {
    let service = FailingService { status: 429 };
    let err = normalize_task(&service, monday_morning(), "회의 준비")
        .await
        .expect_err("should fail");
    match err {
        ExtractError::Provider(p) => assert!(p.is_rate_limited()),
        other => panic!("expected provider error, got {other:?}"),
    }
}
