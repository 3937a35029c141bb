//! # resq-core: Foundational Types for the RES-Q Validator
//!
//! Leaf crate of the workspace. Defines the vocabulary every other crate
//! speaks when it talks about report questions and their answers.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `QuestionId`, `QaId` and
//!    `ReportId` are distinct types. A QA id can only be derived from a
//!    report id and a question id, never typed in by hand.
//!
//! 2. **Single `DataType` enum.** The answer-kind taxonomy
//!    (`boolean`, `null`, `enum`, `integer`, `number`, `string`, `date`,
//!    `time`, `date-time`) is defined once. Every `match` on it is
//!    exhaustive.
//!
//! 3. **Strict calendar parsing.** Date, time and date-time answers are
//!    checked against a fixed pattern and a real calendar. `2023-02-30`
//!    is not a date.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `resq-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

pub use domain::DataType;
pub use error::ResqError;
pub use identity::{QaId, QuestionId, ReportId, PATH_SEPARATOR};
pub use temporal::{is_date, is_date_time, is_time, DATE_FORMAT, DATE_TIME_FORMAT, TIME_FORMAT};
