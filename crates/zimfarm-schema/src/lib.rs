//! # zimfarm-schema: Schedule Config Validation
//!
//! Validates the schedule configs submitted to the Zimfarm dispatcher: a
//! task descriptor (`task_name`, `queue`, `warehouse_path`, `image`) plus the
//! task-specific `flags` record, whose schema is selected by `task_name`.
//!
//! ## Validation Model
//!
//! - **Strict.** Unknown keys are rejected at every level, required keys
//!   must be present, and types are never coerced.
//! - **Exhaustive.** Validators append to one [`ValidationErrors`]
//!   accumulator and keep going, so a failed call reports every violation,
//!   each with its field path (`flags.format[1]`).
//! - **Data-driven dispatch.** The [`TaskRegistry`] maps each task name to
//!   its flags schema, expected image and warehouse root. It is immutable
//!   and shared across threads.
//!
//! ## Entry Points
//!
//! - [`ConfigValidator::validate`]: a whole config, returning a
//!   [`TaskConfig`] or the full error collection.
//! - [`ObjectSchema::check`]: a record against one schema, e.g. a flags
//!   record against [`flags::mwoffliner_flags_schema`].
//! - [`document::load_document`]: read a JSON or YAML config from disk.
//!
//! ## Crate Policy
//!
//! - Depends only on `zimfarm-core` internally.
//! - Validation is pure: no I/O, no shared mutable state.
//! - Violations are returned by value, never by panicking.

pub mod config;
pub mod document;
pub mod error;
pub mod flags;
pub mod list;
pub mod object;
pub mod primitive;
pub mod registry;

pub use config::{ConfigValidator, TaskConfig};
pub use document::{load_document, parse_document, DocumentFormat};
pub use error::{
    DocumentError, ErrorKind, FieldPath, PathSegment, SchemaError, ValidationErrors, Violation,
};
pub use flags::{mwoffliner_flags_schema, MWOFFLINER_FORMATS};
pub use list::ListValidator;
pub use object::{FieldSpec, FieldValidator, ObjectSchema, ObjectSchemaBuilder};
pub use primitive::Primitive;
pub use registry::{RegistryConfig, TaskDescriptor, TaskEntry, TaskRegistry, TaskRegistryBuilder};
