//! # zimfarm CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zimfarm_cli::load_registry;
use zimfarm_cli::tasks::{run_tasks, TasksArgs};
use zimfarm_cli::validate::{run_validate, ValidateArgs};

/// Zimfarm dispatcher toolchain.
///
/// Validates schedule configs against the task registry and inspects the
/// registered offliner tasks and queues.
#[derive(Parser, Debug)]
#[command(name = "zimfarm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Registry config file (JSON or YAML). Defaults to the built-in registry.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate schedule config files.
    Validate(ValidateArgs),

    /// List registered tasks and queues.
    Tasks(TasksArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("zimfarm CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = load_registry(cli.registry.as_deref()).and_then(|registry| match cli.command {
        Commands::Validate(args) => run_validate(&args, registry),
        Commands::Tasks(args) => run_tasks(&args, &registry),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
