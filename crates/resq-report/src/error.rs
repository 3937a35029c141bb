//! # Report Validation Errors
//!
//! Two categories are kept apart:
//!
//! - **Configuration** ([`FormError`]): the schema or dataset could not be
//!   loaded. Fatal, raised before any report is looked at.
//! - **Per-report** ([`ReportError`]): one report failed. Semantic
//!   failures carry the offending values; structural failures wrap the
//!   JSON Schema checker's error unchanged.

use resq_core::ResqError;
use resq_schema::SchemaValidationError;
use thiserror::Error;

/// The form definition or a dataset could not be loaded.
#[derive(Error, Debug)]
pub enum FormError {
    /// Schema loading, flattening, or compilation failed.
    #[error(transparent)]
    Schema(#[from] SchemaValidationError),

    /// A document did not have the dataset shape.
    #[error(transparent)]
    Core(#[from] ResqError),
}

/// Why a single report is invalid.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report does not have exactly one paragraph.
    #[error("Report must contain exactly 1 paragraph, found {found}.")]
    ParagraphCount {
        /// Number of paragraphs present.
        found: usize,
    },

    /// A QA id is not `<report_id>_<question_id>`.
    #[error("QA id '{id}' does not match expected format '{expected}'.")]
    QaIdFormat {
        /// The id as given.
        id: String,
        /// The id it should have been.
        expected: String,
    },

    /// A QA id was already used earlier in this validation run.
    #[error("Duplicate QA id '{id}' in report '{report_id}'.")]
    DuplicateQaId {
        /// The repeated id.
        id: String,
        /// Report in which the repeat was found.
        report_id: String,
    },

    /// A QA refers to a question the schema does not define.
    #[error("Question id '{question_id}' is not defined in the schema.")]
    UnknownQuestion {
        /// The unknown question id.
        question_id: String,
    },

    /// A single answer's text is not a string or its offset is not an integer.
    #[error("Answer text {text} must be a string and start {start} must be an integer.")]
    AnswerShape {
        /// The answer text, as JSON.
        text: String,
        /// The answer offset, as JSON.
        start: String,
    },

    /// A single answer's text is empty or its offset is negative.
    #[error("Answer text {text:?} must be non-empty and start index {start} must be non-negative.")]
    EmptyAnswer {
        /// The answer text.
        text: String,
        /// The answer offset.
        start: i64,
    },

    /// The context does not contain the answer text at the claimed offset.
    #[error("Answer text {text:?} not found in context at position {start}.")]
    EvidenceMismatch {
        /// The answer text.
        text: String,
        /// The claimed character offset.
        start: u64,
    },

    /// A complex answer's text or offsets are not arrays.
    #[error("Complex answer text {text} and start indices {start} must be arrays.")]
    ComplexAnswerShape {
        /// The answer text, as JSON.
        text: String,
        /// The answer offsets, as JSON.
        start: String,
    },

    /// A complex answer's arrays differ in length or hold fewer than two entries.
    #[error("Complex answer text {text} and start {start} arrays must be of the same length and contain more than one entry.")]
    ComplexAnswerLength {
        /// The answer texts, as JSON.
        text: String,
        /// The answer offsets, as JSON.
        start: String,
    },

    /// An answer type other than `single` or `complex`.
    #[error("Unsupported answer type '{answer_type}'. Only 'single' or 'complex' are allowed.")]
    UnsupportedAnswerType {
        /// The answer type as given.
        answer_type: String,
    },

    /// The form value is outside the question's answer domain.
    #[error(
        "Answer {value} is not valid for question id '{question_id}'. Use one of [{}]",
        .valid_options.join(", ")
    )]
    InvalidEnumerationValue {
        /// The rejected value, as JSON.
        value: String,
        /// The question it was given for.
        question_id: String,
        /// Every option the question accepts.
        valid_options: Vec<String>,
    },

    /// The report does not have the report shape at all.
    #[error("Malformed report: {reason}")]
    MalformedReport {
        /// Deserialization failure.
        reason: String,
    },

    /// The reassembled answers failed the form's JSON Schema.
    #[error(transparent)]
    Structural(SchemaValidationError),
}

impl ReportError {
    /// Returns true for failures reported by the JSON Schema checker.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Structural(_))
    }
}
