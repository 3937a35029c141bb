//! # Validate Subcommand
//!
//! Validates every report of a dataset against the form schema and prints
//! a pass/fail summary. Each invalid report is also logged at `error`
//! level by the validator itself.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use resq_report::{DatasetSummary, FormDefinition};

use crate::config::ResqConfig;

/// Arguments for the `resq validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Dataset document to validate (JSON or YAML).
    #[arg(value_name = "DATASET")]
    pub dataset: PathBuf,

    /// Form schema to validate against. Overrides the config file.
    #[arg(long, value_name = "SCHEMA")]
    pub schema: Option<PathBuf>,

    /// Skip the JSON Schema conformance check.
    #[arg(long)]
    pub skip_structural: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 if every report is valid, 1 if any is invalid.
/// Operational errors are returned as `Err`.
pub fn run_validate(args: &ValidateArgs, config: &ResqConfig) -> Result<u8> {
    let schema_path = config.schema_path(args.schema.as_deref());
    let structural_check = config.structural_check(args.skip_structural);

    let form = FormDefinition::new(&schema_path)
        .with_context(|| format!("failed to load form schema {}", schema_path.display()))?;

    tracing::info!(
        schema = %schema_path.display(),
        questions = form.model().question_count(),
        structural_check,
        "loaded form definition"
    );

    let summary = form
        .validate_dataset_file(&args.dataset, structural_check)
        .with_context(|| format!("failed to load dataset {}", args.dataset.display()))?;

    print_summary(&summary);

    if summary.is_valid() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn print_summary(summary: &DatasetSummary) {
    println!("Reports: {}/{} passed", summary.valid_count(), summary.total);

    for failure in &summary.failures {
        println!("  FAIL: {}: {}", failure.report_id, failure.error);
    }

    if !summary.is_valid() {
        println!("\n{summary}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn test_repo_root() -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates
        dir.pop(); // repo root
        dir
    }

    fn args(dataset: &Path, skip_structural: bool) -> ValidateArgs {
        ValidateArgs {
            dataset: dataset.to_path_buf(),
            schema: Some(test_repo_root().join("resources/schema.json")),
            skip_structural,
        }
    }

    #[test]
    fn test_sample_dataset_has_failures() {
        let dataset = test_repo_root().join("resources/dataset.sample.json");
        let code = run_validate(&args(&dataset, false), &ResqConfig::default()).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_valid_dataset_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = dir.path().join("empty.json");
        std::fs::write(&dataset, r#"{"data": []}"#).unwrap();
        let code = run_validate(&args(&dataset, false), &ResqConfig::default()).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn test_missing_dataset_is_operational_error() {
        let err = run_validate(
            &args(Path::new("/nonexistent/data.json"), false),
            &ResqConfig::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed to load dataset"));
    }

    #[test]
    fn test_missing_schema_is_operational_error() {
        let dataset = test_repo_root().join("resources/dataset.sample.json");
        let args = ValidateArgs {
            dataset,
            schema: Some(PathBuf::from("/nonexistent/schema.json")),
            skip_structural: false,
        };
        let err = run_validate(&args, &ResqConfig::default()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load form schema"));
    }
}
