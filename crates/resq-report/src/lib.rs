//! # resq-report: RES-Q Report Validation
//!
//! Validates annotated medical reports against a RES-Q form definition.
//!
//! A dataset holds reports; each report holds one paragraph of free text
//! (the *context*) and a list of question/answer pairs. A report is valid
//! when every pair names a question of the form under a well-formed,
//! unique id, quotes its evidence verbatim from the context, picks a
//! value from the question's answer domain, and (optionally) the values
//! reassembled into a nested document satisfy the form's JSON Schema.
//!
//! ## Usage
//!
//! ```no_run
//! use resq_report::{FormDefinition, DEFAULT_SCHEMA_PATH};
//!
//! let form = FormDefinition::new(DEFAULT_SCHEMA_PATH)?;
//! let summary = form.validate_dataset_file("dataset.json", true)?;
//! println!("{summary}");
//! # Ok::<(), resq_report::FormError>(())
//! ```

pub mod definition;
pub mod error;
pub mod evidence;
pub mod report;
pub mod summary;

pub use definition::{FormDefinition, UsedQaIds, DEFAULT_SCHEMA_PATH};
pub use error::{FormError, ReportError};
pub use evidence::{context_has_text_at, validate_answer};
pub use report::{Answer, Dataset, Paragraph, Qa, Report};
pub use summary::{DatasetSummary, ReportFailure};
