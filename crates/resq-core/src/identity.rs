//! # Identifier Newtypes
//!
//! `QuestionId` is the dot-separated property path of a leaf in the form
//! schema (e.g. `discharge.mrs_score`). `QaId` identifies one
//! question/answer pair inside a dataset and is always
//! `<report_id>_<question_id>`.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Separator between property names in a [`QuestionId`].
pub const PATH_SEPARATOR: char = '.';

/// Dot-path of a leaf question in the form schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Wrap an existing dot-path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The empty path, i.e. the schema root.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Extend this path by one property name.
    pub fn child(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}{PATH_SEPARATOR}{segment}", self.0))
        }
    }

    /// Access the inner path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a report within a dataset.
///
/// Datasets write it as a string or a bare number; a number keeps its
/// JSON text, so `7` becomes `"7"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportId(pub String);

impl<'de> Deserialize<'de> for ReportId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Text(String),
            Number(serde_json::Number),
            Bool(bool),
        }

        Ok(Self(match Scalar::deserialize(deserializer)? {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }))
    }
}

impl ReportId {
    /// Access the inner identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a question/answer pair, unique across a dataset run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QaId(String);

impl QaId {
    /// The only well-formed id for `question_id` inside `report_id`.
    pub fn expected(report_id: &ReportId, question_id: &str) -> Self {
        Self(format!("{}_{question_id}", report_id.0))
    }

    /// Access the inner identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QaId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
