//! Extraction prompt construction and the structured output schema.
//!
//! The language model does the actual natural-language understanding; this
//! module's job is to pin down everything deterministic around it — the
//! resolved anchor table, the mapping rules, and the exact output contract.

use std::fmt::Write as _;

use serde_json::{json, Value};

use super::anchors::{weekday_label, DateAnchors, WEEKDAYS};
use super::keywords::{render_category_rules, render_priority_rules};
use crate::types::format_date;

/// JSON Schema for the extraction output.
///
/// Passed to the generation service as a hard contract: the provider must
/// produce a conforming object or the call fails.
pub fn extraction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {
                "type": "string",
                "description": "Concise task title, 10-30 characters"
            },
            "description": {
                "type": "string",
                "description": "One or two sentences of inferred context"
            },
            "due_date": {
                "type": "string",
                "pattern": "^\\d{4}-\\d{2}-\\d{2}$",
                "description": "Due date in YYYY-MM-DD"
            },
            "due_time": {
                "type": "string",
                "pattern": "^\\d{2}:\\d{2}$",
                "description": "Due time in 24-hour HH:MM"
            },
            "priority": {
                "type": "string",
                "enum": ["high", "medium", "low"]
            },
            "category": {
                "type": "string",
                "enum": ["work", "personal", "study", "health"]
            }
        },
        "required": ["title", "description", "due_date", "due_time", "priority", "category"],
        "additionalProperties": false
    })
}

/// Build the extraction prompt for one normalized input.
pub fn build_extraction_prompt(anchors: &DateAnchors, input: &str) -> String {
    let today = format_date(anchors.today);
    let mut prompt = String::with_capacity(4096);

    let _ = write!(
        prompt,
        "You convert a free-form task description into one structured task record.\n\
         \n\
         TODAY is {today} ({weekday}), year {year}, month {month}, day {day}.\n\
         Never produce any date earlier than {today}. If the text mentions no date\n\
         expression at all, the due date is {today} — never any other default.\n",
        weekday = anchors.weekday_name(),
        year = anchors.year(),
        month = anchors.month(),
        day = anchors.day(),
    );

    prompt.push_str("\nDATE RULES — relative expressions resolve to these exact dates:\n");
    let _ = writeln!(
        prompt,
        "- today / 오늘 → {}",
        format_date(anchors.today)
    );
    let _ = writeln!(
        prompt,
        "- tomorrow / 내일 → {}",
        format_date(anchors.tomorrow)
    );
    let _ = writeln!(
        prompt,
        "- day after tomorrow / 모레 → {}",
        format_date(anchors.day_after_tomorrow)
    );
    for (day, english, korean) in WEEKDAYS {
        let _ = writeln!(
            prompt,
            "- this {english} / 이번주 {korean} → {}",
            format_date(anchors.this_weekday(day))
        );
    }
    for (day, english, korean) in WEEKDAYS {
        let _ = writeln!(
            prompt,
            "- next {english} / 다음주 {korean} → {}",
            format_date(anchors.next_weekday(day))
        );
    }

    prompt.push_str(
        "\nTIME RULES:\n\
         - A specific hour (12-hour with AM/PM or 오전/오후, or 24-hour) maps to exact 24-hour HH:MM.\n\
         - morning / 아침 / 오전 → 09:00\n\
         - lunch / 점심 → 12:00\n\
         - afternoon / 오후 → 14:00\n\
         - evening / 저녁 → 18:00\n\
         - night / 밤 → 21:00\n\
         - No time expression at all → 09:00\n",
    );

    prompt.push_str("\nPRIORITY RULES:\n");
    prompt.push_str(&render_priority_rules());
    prompt.push_str("\n\nCATEGORY RULES:\n");
    prompt.push_str(&render_category_rules());

    prompt.push_str(
        "\n\nTITLE AND DESCRIPTION:\n\
         - Title: the core action, 10-30 characters, drop particles and filler words.\n\
         - Description: always add one or two sentences of context inferred from the\n\
           text. Never leave it empty when any plausible context can be inferred.\n",
    );

    prompt.push_str("\nEXAMPLES:\n");
    push_example(
        &mut prompt,
        "내일 오후 3시까지 프로젝트 발표 준비하기",
        &json!({
            "title": "프로젝트 발표 준비",
            "description": "내일 오후 3시까지 마쳐야 하는 프로젝트 발표 자료 준비.",
            "due_date": format_date(anchors.tomorrow),
            "due_time": "15:00",
            "priority": "medium",
            "category": "work"
        }),
    );
    push_example(
        &mut prompt,
        "급하게 보고서 제출하기",
        &json!({
            "title": "보고서 제출",
            "description": "급히 제출해야 하는 보고서.",
            "due_date": today,
            "due_time": "09:00",
            "priority": "high",
            "category": "work"
        }),
    );
    let friday = anchors.this_weekday(chrono::Weekday::Fri);
    let (_, friday_korean) = weekday_label(chrono::Weekday::Fri);
    push_example(
        &mut prompt,
        &format!("이번주 {friday_korean} 저녁에 친구랑 약속"),
        &json!({
            "title": "친구와 저녁 약속",
            "description": format!("이번주 {friday_korean} 저녁 친구와의 약속."),
            "due_date": format_date(friday),
            "due_time": "18:00",
            "priority": "low",
            "category": "personal"
        }),
    );
    push_example(
        &mut prompt,
        "buy groceries",
        &json!({
            "title": "buy groceries",
            "description": "Grocery shopping; no date mentioned, so it is due today.",
            "due_date": today,
            "due_time": "09:00",
            "priority": "medium",
            "category": "personal"
        }),
    );

    let _ = write!(
        prompt,
        "\nINPUT:\n{input}\n\n\
         Produce exactly one JSON object matching the schema. No other text."
    );

    prompt
}

fn push_example(prompt: &mut String, input: &str, expected: &Value) {
    let _ = writeln!(prompt, "Input: {input}");
    let _ = writeln!(prompt, "Output: {expected}");
}
