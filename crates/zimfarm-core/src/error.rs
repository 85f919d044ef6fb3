//! # Error Hierarchy
//!
//! Errors raised by the validated newtypes, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Validation errors carry the rejected input and the expected format so a
//! client can fix the submitted config without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
///
/// Each newtype enforces its lexical format at construction time. Nothing
/// here performs network access: a well-formed URL may still be unreachable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// URL is not an absolute `scheme://authority` URL.
    #[error("invalid URL: \"{value}\" ({reason})")]
    InvalidUrl {
        /// The rejected input.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Email address does not match the accepted `local@domain` syntax.
    #[error("invalid email address: \"{value}\" ({reason})")]
    InvalidEmail {
        /// The rejected input.
        value: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Image tag does not follow the container tag grammar.
    #[error("invalid image tag: \"{0}\" (expected [A-Za-z0-9_][A-Za-z0-9_.-]{{0,127}})")]
    InvalidImageTag(String),
}
