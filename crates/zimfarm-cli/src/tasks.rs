//! # Tasks Subcommand
//!
//! Lists the queues and tasks of the active registry, with the image,
//! warehouse root and flags fields each task requires.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use zimfarm_schema::{TaskDescriptor, TaskRegistry};

/// Arguments for the `zimfarm tasks` subcommand.
#[derive(Args, Debug, Default)]
pub struct TasksArgs {
    /// Print the listing as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RegistryListing<'a> {
    queues: Vec<&'a str>,
    tasks: Vec<TaskListing<'a>>,
}

#[derive(Debug, Serialize)]
struct TaskListing<'a> {
    name: &'a str,
    image: &'a str,
    warehouse_root: &'a str,
    required_flags: Vec<&'a str>,
    optional_flags: Vec<&'a str>,
}

impl<'a> TaskListing<'a> {
    fn new(descriptor: &'a TaskDescriptor) -> Self {
        let (required, optional): (Vec<_>, Vec<_>) = descriptor
            .flags_schema()
            .fields()
            .iter()
            .partition(|field| field.is_required());
        Self {
            name: descriptor.task_name().as_str(),
            image: descriptor.image_name(),
            warehouse_root: descriptor.warehouse_root(),
            required_flags: required.into_iter().map(|f| f.name()).collect(),
            optional_flags: optional.into_iter().map(|f| f.name()).collect(),
        }
    }
}

/// Execute the tasks subcommand, printing to stdout.
pub fn run_tasks(args: &TasksArgs, registry: &TaskRegistry) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_tasks_to(args, registry, &mut out)
}

/// Execute the tasks subcommand, writing the listing to `out`.
pub fn run_tasks_to(args: &TasksArgs, registry: &TaskRegistry, out: &mut impl Write) -> Result<u8> {
    let listing = RegistryListing {
        queues: registry.queue_names().collect(),
        tasks: registry.descriptors().map(TaskListing::new).collect(),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &listing).context("failed to write listing")?;
        writeln!(out)?;
        return Ok(0);
    }

    writeln!(out, "Queues: {}", listing.queues.join(", "))?;
    for task in &listing.tasks {
        writeln!(out)?;
        writeln!(out, "{}", task.name)?;
        writeln!(out, "  image:          {}", task.image)?;
        writeln!(out, "  warehouse root: {}", task.warehouse_root)?;
        writeln!(out, "  required flags: {}", task.required_flags.join(", "))?;
        writeln!(out, "  optional flags: {}", task.optional_flags.join(", "))?;
    }
    Ok(0)
}
