//! # Answer Data Types
//!
//! Defines `DataType`, the closed taxonomy of answer kinds a form
//! question can accept. It is the vocabulary used when asking a question
//! "do you accept dates?" and the kind tag carried by every typed option
//! in the flattened form model.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ResqError;

/// Every kind of answer a form question can accept.
///
/// | Name | Matches |
/// |------|---------|
/// | `boolean` | literal `true` / `false` |
/// | `null` | literal `null` |
/// | `enum` | one of the literal values listed in the schema |
/// | `integer` | integral numbers, optionally bounded |
/// | `number` | any number, optionally bounded |
/// | `string` | any text |
/// | `date` | text of the form `YYYY-MM-DD` |
/// | `time` | text of the form `HH:MM:SS` |
/// | `date-time` | text of the form `YYYY-MM-DDTHH:MM:SS` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "null")]
    Null,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "date-time")]
    DateTime,
}

impl DataType {
    /// Returns all data types in canonical order.
    pub fn all() -> &'static [DataType] {
        &[
            Self::Boolean,
            Self::Null,
            Self::Enum,
            Self::Integer,
            Self::Number,
            Self::String,
            Self::Date,
            Self::Time,
            Self::DateTime,
        ]
    }

    /// Returns the schema-facing name of this data type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Enum => "enum",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date-time",
        }
    }

    /// Whether answers of this kind are checked by a predicate rather
    /// than by equality with a literal.
    pub fn is_typed(&self) -> bool {
        !matches!(self, Self::Boolean | Self::Null | Self::Enum)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ResqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "null" => Ok(Self::Null),
            "enum" => Ok(Self::Enum),
            "integer" => Ok(Self::Integer),
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "date-time" => Ok(Self::DateTime),
            other => Err(ResqError::UnknownDataType(other.to_string())),
        }
    }
}
