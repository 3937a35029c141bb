//! # Dataset Validation Summary

use std::fmt;

use crate::error::ReportError;

/// Outcome of validating a whole dataset.
#[derive(Debug, Default)]
pub struct DatasetSummary {
    /// Number of reports in the dataset.
    pub total: usize,
    /// Every invalid report, in input order.
    pub failures: Vec<ReportFailure>,
}

/// A report that failed validation.
#[derive(Debug)]
pub struct ReportFailure {
    /// The report's id, or `<unknown>` if it has none.
    pub report_id: String,
    /// The first failure found in the report.
    pub error: ReportError,
}

impl DatasetSummary {
    /// Number of invalid reports.
    pub fn invalid_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of valid reports.
    pub fn valid_count(&self) -> usize {
        self.total - self.failures.len()
    }

    /// Returns true if every report passed.
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failure recorded for `report_id`, if any.
    pub fn failure_for(&self, report_id: &str) -> Option<&ReportFailure> {
        self.failures.iter().find(|f| f.report_id == report_id)
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} reports were invalid.", self.invalid_count(), self.total)
    }
}

impl fmt::Display for ReportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Report '{}' is NOT valid: {}", self.report_id, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = DatasetSummary {
            total: 3,
            failures: vec![ReportFailure {
                report_id: "R2".to_string(),
                error: ReportError::ParagraphCount { found: 2 },
            }],
        };
        assert_eq!(summary.to_string(), "1/3 reports were invalid.");
        assert_eq!(summary.valid_count(), 2);
        assert!(!summary.is_valid());
        assert_eq!(
            summary.failure_for("R2").unwrap().to_string(),
            "Report 'R2' is NOT valid: Report must contain exactly 1 paragraph, found 2."
        );
        assert!(summary.failure_for("R1").is_none());
    }
}
