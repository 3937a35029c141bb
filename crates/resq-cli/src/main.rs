//! # resq CLI entry point
//!
//! Parses command-line arguments, loads the optional config file, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use resq_cli::config::ResqConfig;
use resq_cli::inspect::{run_inspect, InspectArgs};
use resq_cli::validate::{run_validate, ValidateArgs};

/// RES-Q report validator.
///
/// Checks annotated medical report datasets against a RES-Q form schema:
/// question ids, evidence spans, answer domains, and schema conformance.
#[derive(Parser, Debug)]
#[command(name = "resq", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a report dataset against the form schema.
    Validate(ValidateArgs),

    /// List the form's questions and the answers each accepts.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("resq CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = ResqConfig::load_optional(cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::Validate(args) => run_validate(&args, &config),
            Commands::Inspect(args) => run_inspect(&args, &config),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
