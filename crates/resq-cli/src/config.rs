//! # Configuration File
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! schema_path: forms/stroke.schema.json
//! structural_check: false
//! ```
//!
//! A relative `schema_path` is resolved against the config file's
//! directory. Command-line flags override the file, and the file
//! overrides the built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use resq_report::DEFAULT_SCHEMA_PATH;

use crate::resolve_path;

/// Settings read from the config file. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResqConfig {
    /// Form schema to validate against.
    pub schema_path: Option<PathBuf>,
    /// Whether to run the JSON Schema conformance check.
    pub structural_check: Option<bool>,
}

impl ResqConfig {
    /// Load the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if let (Some(schema_path), Some(dir)) = (config.schema_path.as_mut(), path.parent()) {
            *schema_path = resolve_path(schema_path, dir);
        }

        tracing::debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    /// Load the config file if one was given, else the defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// The schema to use: `--schema`, else the config file, else
    /// [`DEFAULT_SCHEMA_PATH`].
    pub fn schema_path(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.schema_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH))
    }

    /// Whether to run the structural check: off with `--skip-structural`,
    /// else as configured, else on.
    pub fn structural_check(&self, skip_flag: bool) -> bool {
        !skip_flag && self.structural_check.unwrap_or(true)
    }
}
