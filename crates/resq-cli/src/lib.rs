//! # resq-cli: CLI Tool for RES-Q
//!
//! Provides the `resq` command-line interface.
//!
//! ## Subcommands
//!
//! - `resq validate`: Validate a report dataset against the form schema.
//! - `resq inspect`: List the form's questions and their answer domains.
//!
//! ```bash
//! resq validate resources/dataset.sample.json
//! resq --config resq.yaml validate data.yaml --skip-structural
//! resq inspect --datatype date
//! ```
//!
//! ## Exit Codes
//!
//! `0` when everything passed, `1` when at least one report is invalid,
//! `2` on operational errors (unreadable schema, config, or dataset).

pub mod config;
pub mod inspect;
pub mod validate;

use std::path::{Path, PathBuf};

/// Resolve a path that may be relative to `base`.
///
/// Absolute paths are returned as-is.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
