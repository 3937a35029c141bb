//! # Report Input Model
//!
//! The dataset layout is SQuAD-like: each report has one paragraph with a
//! free-text `context` and a list of question/answer pairs whose answers
//! point back into that context.
//!
//! Answer `text` and `answer_start` stay untyped JSON: a single answer
//! holds a string and an offset, a complex answer holds parallel arrays,
//! and a wrong shape is a validation failure rather than a parse failure.

use resq_core::{ResqError, ReportId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dataset document: `{"data": [report, ...]}`.
///
/// Reports are kept as raw JSON so that one malformed report is counted
/// as invalid instead of rejecting the whole dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// The reports, in input order.
    pub data: Vec<Value>,
}

impl Dataset {
    /// Interpret a parsed document as a dataset.
    ///
    /// # Errors
    ///
    /// Returns `ResqError::Parse` if the document has no `data` list.
    pub fn from_value(value: Value) -> Result<Self, ResqError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Returns the number of reports.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the dataset has no reports.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One medical report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Identifier, unique within the dataset.
    pub report_id: ReportId,
    /// Must contain exactly one paragraph.
    pub paragraphs: Vec<Paragraph>,
}

/// The report text and the answers extracted from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Source text every answer's evidence must be found in.
    pub context: String,
    /// Question/answer pairs, in input order.
    pub qas: Vec<Qa>,
}

/// A question/answer pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Qa {
    /// Must equal `<report_id>_<question_id>`.
    pub id: String,
    /// Dot-path of the answered question.
    pub question_id: String,
    /// The form value chosen for the question.
    pub enumeration_value_id: Value,
    /// Evidence supporting the value.
    pub answers: Vec<Answer>,
}

/// Evidence for an answer, located in the context by offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// `"single"` or `"complex"`.
    pub answer_type: String,
    /// A string, or an array of strings for complex answers.
    pub text: Value,
    /// A character offset, or an array of offsets for complex answers.
    pub answer_start: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_deserializes() {
        let report: Report = serde_json::from_value(json!({
            "report_id": "R1",
            "paragraphs": [{
                "context": "mRS 2",
                "qas": [{
                    "id": "R1_discharge.mrs",
                    "question_id": "discharge.mrs",
                    "enumeration_value_id": 2,
                    "answers": [{"answer_type": "single", "text": "mRS 2", "answer_start": 0}]
                }]
            }]
        }))
        .unwrap();
        assert_eq!(report.report_id.as_str(), "R1");
        assert_eq!(report.paragraphs[0].qas[0].enumeration_value_id, json!(2));
    }

    #[test]
    fn test_missing_enumeration_value_is_parse_error() {
        let result = serde_json::from_value::<Qa>(json!({
            "id": "R1_x",
            "question_id": "x",
            "answers": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_dataset_requires_data() {
        assert!(Dataset::from_value(json!({"version": "1"})).is_err());
        let dataset = Dataset::from_value(json!({"data": [{}, {}]})).unwrap();
        assert_eq!(dataset.len(), 2);
    }
}
