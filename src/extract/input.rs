//! Input normalization and validation for the extraction pipeline.
//!
//! The policy is "reject pure punctuation/emoji/whitespace", not "restrict
//! to one script": any input carrying at least one Hangul, Latin, digit,
//! CJK ideograph, or kana character passes.

use thiserror::Error;

/// Maximum normalized input length in characters.
pub const MAX_INPUT_CHARS: usize = 500;

/// Minimum normalized input length in characters.
pub const MIN_INPUT_CHARS: usize = 2;

/// Validation failures, reported to the caller with the specific reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input is empty after normalization.
    #[error("input is empty")]
    Empty,
    /// Input is shorter than the minimum.
    #[error("input is too short (minimum {MIN_INPUT_CHARS} characters)")]
    TooShort,
    /// Input exceeds the maximum; carries the actual length.
    #[error("input is too long ({len} characters, maximum {MAX_INPUT_CHARS})")]
    TooLong {
        /// Actual character count of the normalized input.
        len: usize,
    },
    /// Input contains no meaningful script character.
    #[error("input contains no meaningful text")]
    NoMeaningfulText,
}

/// Trim and collapse whitespace.
///
/// Runs of newlines collapse to a single newline; all other whitespace runs
/// collapse to a single space. Idempotent.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending: Option<char> = None;

    for c in raw.trim().chars() {
        if c.is_whitespace() {
            // A run containing any newline collapses to one newline.
            pending = match (pending, c) {
                (Some('\n'), _) | (_, '\n' | '\r') => Some('\n'),
                _ => Some(' '),
            };
        } else {
            if let Some(sep) = pending.take() {
                if !out.is_empty() {
                    out.push(sep);
                }
            }
            out.push(c);
        }
    }

    out
}

/// Validate a normalized input string.
///
/// # Errors
///
/// Returns the specific [`ValidationError`] per the bounds and script policy.
pub fn validate(normalized: &str) -> Result<(), ValidationError> {
    let len = normalized.chars().count();
    if len == 0 {
        return Err(ValidationError::Empty);
    }
    if len < MIN_INPUT_CHARS {
        return Err(ValidationError::TooShort);
    }
    if len > MAX_INPUT_CHARS {
        return Err(ValidationError::TooLong { len });
    }
    if !normalized.chars().any(is_meaningful_char) {
        return Err(ValidationError::NoMeaningfulText);
    }
    Ok(())
}

/// Whether a character counts as meaningful script content.
fn is_meaningful_char(c: char) -> bool {
    matches!(c,
        'a'..='z' | 'A'..='Z' | '0'..='9'
        // Hangul syllables
        | '\u{AC00}'..='\u{D7A3}'
        // Hangul jamo + compatibility jamo
        | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}'
        // CJK unified ideographs
        | '\u{4E00}'..='\u{9FFF}'
        // Hiragana + katakana
        | '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}'
    )
}
