//! # Validate Subcommand
//!
//! Validates schedule config files against the task registry.
//!
//! Every file is checked, even after a failure, and every violation of a
//! failing file is printed with its field path. Exit code: 0 when all files
//! are valid, 1 when at least one is invalid, 2 when a file cannot be read
//! or parsed.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use zimfarm_schema::{load_document, ConfigValidator, TaskRegistry, ValidationErrors};

/// Report format.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per file, violations indented below.
    #[default]
    Text,
    /// A JSON array with one report object per file.
    Json,
}

/// Arguments for the `zimfarm validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schedule config files (`.json`, `.yaml` or `.yml`).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

/// Outcome of validating one file.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileReport {
    /// The config is valid.
    Valid {
        /// File path.
        path: String,
        /// Canonical config.
        config: Value,
    },
    /// The config has violations.
    Invalid {
        /// File path.
        path: String,
        /// Every violation found.
        violations: ValidationErrors,
    },
    /// The file could not be loaded.
    Error {
        /// File path.
        path: String,
        /// Load error.
        error: String,
    },
}

impl FileReport {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Valid { .. } => 0,
            Self::Invalid { .. } => 1,
            Self::Error { .. } => 2,
        }
    }
}

/// Execute the validate subcommand, printing to stdout.
///
/// Returns exit code: 0 on success, 1 on validation failure, 2 on operational error.
pub fn run_validate(args: &ValidateArgs, registry: Arc<TaskRegistry>) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, registry, &mut out)
}

/// Execute the validate subcommand, writing the report to `out`.
pub fn run_validate_to(
    args: &ValidateArgs,
    registry: Arc<TaskRegistry>,
    out: &mut impl Write,
) -> Result<u8> {
    let validator = ConfigValidator::new(registry).context("failed to build config validator")?;

    let reports: Vec<FileReport> = args
        .paths
        .iter()
        .map(|path| validate_file(&validator, path))
        .collect();

    match args.output {
        OutputFormat::Text => write_text(&reports, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &reports).context("failed to write report")?;
            writeln!(out)?;
        }
    }

    Ok(reports.iter().map(FileReport::exit_code).max().unwrap_or(0))
}

/// Validate a single config file.
pub fn validate_file(validator: &ConfigValidator, path: &Path) -> FileReport {
    let display_path = path.display().to_string();
    let document = match load_document(path) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(path = %display_path, "cannot load config: {e}");
            return FileReport::Error {
                path: display_path,
                error: e.to_string(),
            };
        }
    };

    match validator.validate(&document) {
        Ok(config) => {
            tracing::info!(path = %display_path, task = %config.task_name, "config is valid");
            FileReport::Valid {
                path: display_path,
                config: config.to_value(),
            }
        }
        Err(violations) => {
            tracing::info!(path = %display_path, violations = violations.len(), "config is invalid");
            FileReport::Invalid {
                path: display_path,
                violations,
            }
        }
    }
}

fn write_text(reports: &[FileReport], out: &mut impl Write) -> Result<()> {
    let mut failed = 0usize;
    for report in reports {
        match report {
            FileReport::Valid { path, .. } => writeln!(out, "OK: {path}")?,
            FileReport::Invalid { path, violations } => {
                failed += 1;
                writeln!(out, "FAIL: {path} ({} violation(s))", violations.len())?;
                writeln!(out, "{violations}")?;
            }
            FileReport::Error { path, error } => {
                failed += 1;
                writeln!(out, "ERROR: {path}: {error}")?;
            }
        }
    }

    writeln!(out, "Configs: {}/{} passed", reports.len() - failed, reports.len())?;
    Ok(())
}
