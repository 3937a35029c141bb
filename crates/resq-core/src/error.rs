//! # Error Types
//!
//! Errors raised by the foundational types. Per-report validation
//! failures live in `resq-report`; structural and schema-configuration
//! failures live in `resq-schema`.

use thiserror::Error;

/// Error type for the foundational types.
#[derive(Error, Debug)]
pub enum ResqError {
    /// A document could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// An answer data-type name outside the supported taxonomy.
    #[error("unknown data type '{0}'; expected one of boolean, null, enum, integer, number, string, date, time, date-time")]
    UnknownDataType(String),
}

impl From<serde_json::Error> for ResqError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
