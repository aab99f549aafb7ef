//! Canonical keyword rule tables for priority and category classification.
//!
//! Single source of truth: the extraction prompt renders its keyword rules
//! from these tables so the prose and the enumerated defaults can never
//! drift apart. Korean and English vocabularies are both listed because
//! inputs arrive in either language.

use crate::types::{Category, Priority};

/// Ordered priority keyword buckets, first match wins in the prompt rules.
pub const PRIORITY_RULES: [(&[&str], Priority); 2] = [
    (
        &[
            "급하게", "급한", "긴급", "빨리", "중요한", "꼭", "반드시", "마감", "urgent",
            "asap", "important", "deadline", "critical",
        ],
        Priority::High,
    ),
    (
        &[
            "여유", "천천히", "나중에", "언젠가", "틈날 때", "someday", "whenever",
            "leisurely", "eventually",
        ],
        Priority::Low,
    ),
];

/// Default priority when no bucket matches.
pub const PRIORITY_DEFAULT: Priority = Priority::Medium;

/// Category keyword buckets.
pub const CATEGORY_RULES: [(&[&str], Category); 4] = [
    (
        &[
            "회의", "보고서", "발표", "프로젝트", "업무", "출장", "미팅", "거래처",
            "meeting", "report", "presentation", "project", "client", "deadline",
        ],
        Category::Work,
    ),
    (
        &[
            "장보기", "약속", "생일", "모임", "집안일", "쇼핑", "친구", "가족",
            "errand", "birthday", "shopping", "family", "friend",
        ],
        Category::Personal,
    ),
    (
        &[
            "공부", "시험", "강의", "과제", "독서", "자격증", "수업", "study", "exam",
            "lecture", "homework", "reading", "course",
        ],
        Category::Study,
    ),
    (
        &[
            "운동", "병원", "헬스", "요가", "러닝", "진료", "약", "검진", "workout",
            "doctor", "gym", "hospital", "medication",
        ],
        Category::Health,
    ),
];

/// Default category when no bucket matches and context decides nothing.
pub const CATEGORY_DEFAULT: Category = Category::Personal;

/// Render one keyword bucket as a prompt rule line.
fn render_bucket(keywords: &[&str], label: &str) -> String {
    format!("- {} → {label}", keywords.join(", "))
}

/// Render the priority rules as prompt text.
pub fn render_priority_rules() -> String {
    let mut lines: Vec<String> = PRIORITY_RULES
        .iter()
        .map(|(keywords, priority)| render_bucket(keywords, priority.as_str()))
        .collect();
    lines.push(format!(
        "- no urgency or leisure signal → {}",
        PRIORITY_DEFAULT.as_str()
    ));
    lines.join("\n")
}

/// Render the category rules as prompt text.
pub fn render_category_rules() -> String {
    let mut lines: Vec<String> = CATEGORY_RULES
        .iter()
        .map(|(keywords, category)| render_bucket(keywords, category.as_str()))
        .collect();
    lines.push(format!(
        "- ambiguous keywords: judge from context; nothing decisive → {}",
        CATEGORY_DEFAULT.as_str()
    ));
    lines.join("\n")
}
