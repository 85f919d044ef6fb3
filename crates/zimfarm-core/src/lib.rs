//! # zimfarm-core: Foundational Types for the Zimfarm Dispatcher
//!
//! Defines the domain primitives that every schedule config is built from.
//! Every other crate in the workspace depends on `zimfarm-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `TaskName`, `QueueName`,
//!    `ImageTag`, `AbsoluteUrl`, `EmailAddress` are distinct types. The
//!    string-format ones validate at construction, so holding one is proof
//!    the value passed its lexical check.
//!
//! 2. **Lexical checks only.** URL and email validation never touches the
//!    network.
//!
//! 3. **Round-trip preserving.** Validated newtypes keep the submitted text
//!    verbatim and serialize back to it, so a canonical config can be fed
//!    through validation again unchanged.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zimfarm-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod error;
pub mod identity;

// Re-export primary types for ergonomic imports.
pub use address::{AbsoluteUrl, EmailAddress};
pub use error::ValidationError;
pub use identity::{ImageRef, ImageTag, QueueName, TaskName};
