//! # Task Registry
//!
//! Immutable mapping from a `task_name` discriminant to everything that
//! depends on it: the flags schema, the expected image name and the
//! warehouse root. Also holds the set of known queues.
//!
//! The registry is built once at startup, either from the built-in
//! definition or from a registry config file, and shared read-only
//! (`Arc<TaskRegistry>`) by every validation call.
//!
//! ## Registry config file
//!
//! ```yaml
//! queues: [small, medium]
//! tasks:
//!   - name: offliner.mwoffliner
//!     image: openzim/mwoffliner
//!     warehouse_root: /wikipedia
//!     flags_schema: mwoffliner
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use zimfarm_core::TaskName;

use crate::document::load_document;
use crate::error::SchemaError;
use crate::flags::{flags_schema, MWOFFLINER};
use crate::object::ObjectSchema;

/// Task identifier of mwoffliner.
pub const MWOFFLINER_TASK: &str = "offliner.mwoffliner";
/// Image mwoffliner tasks must run in.
pub const MWOFFLINER_IMAGE: &str = "openzim/mwoffliner";
/// Warehouse root of mwoffliner tasks.
pub const MWOFFLINER_WAREHOUSE_ROOT: &str = "/wikipedia";
/// Queue available in the built-in registry.
pub const DEFAULT_QUEUE: &str = "small";

/// What a task name resolves to.
#[derive(Debug, Clone)]
pub struct TaskDescriptor {
    task_name: TaskName,
    image_name: String,
    warehouse_root: String,
    flags: Arc<ObjectSchema>,
}

impl TaskDescriptor {
    /// Describe a task.
    pub fn new(
        task_name: impl Into<String>,
        image_name: impl Into<String>,
        warehouse_root: impl Into<String>,
        flags: ObjectSchema,
    ) -> Self {
        Self {
            task_name: TaskName::new(task_name),
            image_name: image_name.into(),
            warehouse_root: warehouse_root.into(),
            flags: Arc::new(flags),
        }
    }

    /// The task name this descriptor is registered under.
    pub fn task_name(&self) -> &TaskName {
        &self.task_name
    }

    /// The image name a config for this task must use.
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    /// The exact `warehouse_path` a config for this task must use.
    pub fn warehouse_root(&self) -> &str {
        &self.warehouse_root
    }

    /// Schema of the task's `flags` record.
    pub fn flags_schema(&self) -> &ObjectSchema {
        &self.flags
    }
}

/// Registered tasks and queues.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, TaskDescriptor>,
    queues: BTreeSet<String>,
}

impl TaskRegistry {
    /// Start an empty registry.
    pub fn builder() -> TaskRegistryBuilder {
        TaskRegistryBuilder::default()
    }

    /// The built-in registry: queue `small` and the mwoffliner task.
    ///
    /// # Errors
    ///
    /// Only fails if a built-in schema definition is broken.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::builder()
            .queue(DEFAULT_QUEUE)
            .task(TaskDescriptor::new(
                MWOFFLINER_TASK,
                MWOFFLINER_IMAGE,
                MWOFFLINER_WAREHOUSE_ROOT,
                flags_schema(MWOFFLINER, MWOFFLINER_TASK)?,
            ))
            .build()
    }

    /// Build a registry from a parsed registry config.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownFlagsSchema`] for an entry naming a
    /// flags schema that does not exist, and the duplicate errors of
    /// [`TaskRegistryBuilder::build`].
    pub fn from_config(config: &RegistryConfig) -> Result<Self, SchemaError> {
        let mut builder = Self::builder();
        for queue in &config.queues {
            builder = builder.queue(queue);
        }
        for entry in &config.tasks {
            let flags = flags_schema(&entry.flags_schema, &entry.name)?;
            builder = builder.task(TaskDescriptor::new(
                &entry.name,
                &entry.image,
                &entry.warehouse_root,
                flags,
            ));
        }
        builder.build()
    }

    /// Load a registry config file (JSON or YAML) and build the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Document`] if the file cannot be loaded,
    /// [`SchemaError::InvalidRegistryConfig`] if it has the wrong shape, and
    /// any error of [`TaskRegistry::from_config`].
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let document = load_document(path)?;
        let config: RegistryConfig =
            serde_json::from_value(document).map_err(|e| SchemaError::InvalidRegistryConfig {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let registry = Self::from_config(&config)?;
        tracing::info!(
            path = %path.display(),
            tasks = registry.tasks.len(),
            queues = registry.queues.len(),
            "loaded task registry"
        );
        Ok(registry)
    }

    /// Resolve a task name.
    pub fn lookup(&self, task_name: &str) -> Option<&TaskDescriptor> {
        self.tasks.get(task_name)
    }

    /// Whether `queue` is a known queue.
    pub fn has_queue(&self, queue: &str) -> bool {
        self.queues.contains(queue)
    }

    /// Registered task names, sorted.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Known queue names, sorted.
    pub fn queue_names(&self) -> impl Iterator<Item = &str> {
        self.queues.iter().map(String::as_str)
    }

    /// Registered task descriptors, sorted by task name.
    pub fn descriptors(&self) -> impl Iterator<Item = &TaskDescriptor> {
        self.tasks.values()
    }
}

/// Builder for [`TaskRegistry`].
#[derive(Debug, Default)]
pub struct TaskRegistryBuilder {
    tasks: Vec<TaskDescriptor>,
    queues: Vec<String>,
}

impl TaskRegistryBuilder {
    /// Add a queue.
    pub fn queue(mut self, name: impl Into<String>) -> Self {
        self.queues.push(name.into());
        self
    }

    /// Add a task.
    pub fn task(mut self, descriptor: TaskDescriptor) -> Self {
        self.tasks.push(descriptor);
        self
    }

    /// Finish the registry.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateQueue`] or [`SchemaError::DuplicateTask`]
    /// if a name was added twice.
    pub fn build(self) -> Result<TaskRegistry, SchemaError> {
        let mut queues = BTreeSet::new();
        for queue in self.queues {
            if queues.contains(&queue) {
                return Err(SchemaError::DuplicateQueue(queue));
            }
            queues.insert(queue);
        }

        let mut tasks = BTreeMap::new();
        for descriptor in self.tasks {
            let name = descriptor.task_name.as_str().to_string();
            if tasks.contains_key(&name) {
                return Err(SchemaError::DuplicateTask(name));
            }
            tracing::debug!(task = %name, image = %descriptor.image_name, "registered task");
            tasks.insert(name, descriptor);
        }

        Ok(TaskRegistry { tasks, queues })
    }
}

/// Registry config file content.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Queue names.
    pub queues: Vec<String>,
    /// Task entries.
    pub tasks: Vec<TaskEntry>,
}

/// One task entry of a registry config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskEntry {
    /// Task name, e.g. `offliner.mwoffliner`.
    pub name: String,
    /// Expected image name.
    pub image: String,
    /// Exact warehouse path.
    pub warehouse_root: String,
    /// Name of a built-in flags schema (see [`crate::flags::FLAGS_SCHEMA_NAMES`]).
    pub flags_schema: String,
}
