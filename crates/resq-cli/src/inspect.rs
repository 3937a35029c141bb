//! # Inspect Subcommand
//!
//! Prints the flattened form: each question id with the answers it
//! accepts, optionally narrowed to one question or one data type.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use resq_core::DataType;
use resq_report::FormDefinition;

use crate::config::ResqConfig;

/// Arguments for the `resq inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Only show this question.
    #[arg(long, value_name = "QUESTION_ID")]
    pub question: Option<String>,

    /// Only show questions accepting this data type
    /// (boolean, null, enum, integer, number, string, date, time, date-time).
    #[arg(long, value_name = "DATATYPE")]
    pub datatype: Option<DataType>,

    /// Form schema to inspect. Overrides the config file.
    #[arg(long, value_name = "SCHEMA")]
    pub schema: Option<PathBuf>,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs, config: &ResqConfig) -> Result<u8> {
    let schema_path = config.schema_path(args.schema.as_deref());
    let form = FormDefinition::new(&schema_path)
        .with_context(|| format!("failed to load form schema {}", schema_path.display()))?;

    for line in inspect_lines(&form, args)? {
        println!("{line}");
    }
    Ok(0)
}

/// One `question_id: [options]` line per selected question.
pub fn inspect_lines(form: &FormDefinition, args: &InspectArgs) -> Result<Vec<String>> {
    if let Some(question) = &args.question {
        if !form.model().contains(question) {
            bail!("question '{question}' is not defined in the schema");
        }
    }

    let lines = form
        .model()
        .iter()
        .filter(|(id, _)| args.question.as_deref().map_or(true, |q| id.as_str() == q))
        .filter(|(id, _)| {
            args.datatype
                .map_or(true, |dt| form.question_includes_datatype(id.as_str(), dt))
        })
        .map(|(id, options)| format!("{id}: {options}"))
        .collect();
    Ok(lines)
}
