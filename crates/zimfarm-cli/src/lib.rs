//! # zimfarm-cli: CLI Tool for the Zimfarm Dispatcher
//!
//! Provides the `zimfarm` command-line interface for checking schedule
//! configs before they are submitted to the dispatcher.
//!
//! ## Subcommands
//!
//! - `zimfarm validate`: Validate one or more config files (JSON or YAML).
//! - `zimfarm tasks`: List the registered tasks and queues.
//!
//! ```bash
//! zimfarm validate schedule.yaml
//! zimfarm --registry registry.yaml validate --output json schedule.json
//! zimfarm tasks
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handler functions delegate to `zimfarm-schema`; no validation rules here.

pub mod tasks;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use zimfarm_schema::TaskRegistry;

/// Load the registry from `path`, or use the built-in one.
pub fn load_registry(path: Option<&Path>) -> Result<Arc<TaskRegistry>> {
    let registry = match path {
        Some(path) => TaskRegistry::load(path)
            .with_context(|| format!("failed to load registry config {}", path.display()))?,
        None => TaskRegistry::builtin().context("failed to build the built-in registry")?,
    };
    Ok(Arc::new(registry))
}
