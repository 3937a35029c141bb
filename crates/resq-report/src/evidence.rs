//! # Evidence Spans
//!
//! Every answer must quote the report context verbatim at the offset it
//! claims. Offsets and lengths count characters, not bytes, so reports
//! with non-ASCII text (umlauts, accents) are addressed the same way the
//! annotation tools address them.
//!
//! - `single`: `text` is a non-empty string, `answer_start` a
//!   non-negative integer, and the context holds `text` at that offset.
//! - `complex`: `text` and `answer_start` are parallel arrays of more
//!   than one entry; each pair must hold as a `single` answer.

use serde_json::Value;

use crate::error::ReportError;
use crate::report::Answer;

/// Check one answer's evidence against the context.
pub fn validate_answer(answer: &Answer, context: &str) -> Result<(), ReportError> {
    match answer.answer_type.as_str() {
        "single" => validate_span(&answer.text, &answer.answer_start, context),
        "complex" => validate_complex(&answer.text, &answer.answer_start, context),
        other => Err(ReportError::UnsupportedAnswerType {
            answer_type: other.to_string(),
        }),
    }
}

fn validate_complex(text: &Value, start: &Value, context: &str) -> Result<(), ReportError> {
    let (Value::Array(texts), Value::Array(starts)) = (text, start) else {
        return Err(ReportError::ComplexAnswerShape {
            text: text.to_string(),
            start: start.to_string(),
        });
    };
    if texts.len() != starts.len() || texts.len() <= 1 {
        return Err(ReportError::ComplexAnswerLength {
            text: text.to_string(),
            start: start.to_string(),
        });
    }
    texts
        .iter()
        .zip(starts)
        .try_for_each(|(text, start)| validate_span(text, start, context))
}

fn validate_span(text: &Value, start: &Value, context: &str) -> Result<(), ReportError> {
    let (Value::String(text), Some(start_i)) = (text, start.as_i64()) else {
        return Err(ReportError::AnswerShape {
            text: text.to_string(),
            start: start.to_string(),
        });
    };
    if text.is_empty() || start_i < 0 {
        return Err(ReportError::EmptyAnswer {
            text: text.clone(),
            start: start_i,
        });
    }
    let start = start_i as u64;
    if !context_has_text_at(context, start, text) {
        return Err(ReportError::EvidenceMismatch {
            text: text.clone(),
            start,
        });
    }
    Ok(())
}

/// Returns true if `context`, read from character `start`, begins with `text`.
pub fn context_has_text_at(context: &str, start: u64, text: &str) -> bool {
    let Ok(start) = usize::try_from(start) else {
        return false;
    };
    match context.char_indices().nth(start) {
        Some((byte_offset, _)) => context[byte_offset..].starts_with(text),
        None => false,
    }
}
