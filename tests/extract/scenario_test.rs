//! End-to-end scenarios through the boundary contract.
//!
//! The generation service is stubbed with output consistent with the
//! prompt's rules; the assertions cover what the deterministic scaffolding
//! guarantees about the resulting payload.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};

use tasklens::api::{self, ErrorStatus, NormalizedTask};
use tasklens::providers::{GenerationService, ProviderError};
use tasklens::types::{Category, Priority};

struct CannedService {
    object: Value,
}

#[async_trait]
impl GenerationService for CannedService {
    async fn extract(&self, _prompt: &str, _schema: &Value) -> Result<Value, ProviderError> {
        Ok(self.object.clone())
    }

    async fn narrate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Parse("narrate not stubbed".to_owned()))
    }

    fn model_id(&self) -> &str {
        "canned"
    }
}

fn monday() -> NaiveDateTime {
    // 2024-06-10 is a Monday.
    NaiveDate::from_ymd_opt(2024, 6, 10)
        .expect("valid date")
        .and_hms_opt(8, 30, 0)
        .expect("valid time")
}

#[tokio::test]
async fn tomorrow_afternoon_presentation_scenario() {
    // "내일 오후 3시까지 프로젝트 발표 준비하기" — relative date, explicit
    // hour, work-vocabulary keywords, no urgency keyword.
    let service = CannedService {
        object: json!({
            "title": "프로젝트 발표 준비",
            "description": "내일 오후 3시까지 발표 자료를 준비해야 해요.",
            "due_date": "2024-06-11",
            "due_time": "15:00",
            "priority": "medium",
            "category": "work"
        }),
    };

    let input = api::parse_normalize_request(
        r#"{"input":"내일 오후 3시까지 프로젝트 발표 준비하기"}"#,
    )
    .expect("should parse");
    let draft = api::normalize_task(&service, monday(), &input)
        .await
        .expect("should normalize");

    assert_eq!(draft.priority, Priority::Medium);
    assert_eq!(draft.category, Category::Work);

    let payload = NormalizedTask::from(&draft);
    assert_eq!(payload.due_date, "2024-06-11T15:00:00");
    assert_eq!(payload.priority, "medium");
    assert_eq!(payload.category, "work");
}

#[tokio::test]
async fn urgent_report_without_date_scenario() {
    // "급하게 보고서 제출하기" — urgency keyword, work keyword, no date or
    // time expression: today at 09:00.
    let service = CannedService {
        object: json!({
            "title": "보고서 제출",
            "description": "급히 제출해야 하는 보고서.",
            "due_date": "2024-06-10",
            "due_time": "09:00",
            "priority": "high",
            "category": "work"
        }),
    };

    let draft = api::normalize_task(&service, monday(), "급하게 보고서 제출하기")
        .await
        .expect("should normalize");

    assert_eq!(draft.priority, Priority::High);
    assert_eq!(draft.category, Category::Work);
    assert_eq!(
        draft.due_at,
        NaiveDate::from_ymd_opt(2024, 6, 10)
            .expect("valid")
            .and_hms_opt(9, 0, 0)
            .expect("valid")
    );
}

#[tokio::test]
async fn overlong_input_reports_bad_request_with_length() {
    let service = CannedService { object: json!({}) };
    let long_input = "가".repeat(501);

    let err = api::normalize_task(&service, monday(), &long_input)
        .await
        .expect_err("should fail");
    assert_eq!(err.status, ErrorStatus::BadRequest);
    assert!(err.message.contains("501"));
}
