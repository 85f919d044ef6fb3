//! # Identity Newtypes
//!
//! Domain-primitive newtypes for the identifiers that appear in a schedule
//! config. Each identifier is a distinct type: you cannot pass a
//! [`QueueName`] where a [`TaskName`] is expected.
//!
//! ## Validation
//!
//! [`TaskName`] and [`QueueName`] are open-ended: which values are accepted
//! is decided by the task registry, not by the type. [`ImageTag`] validates
//! the container tag grammar at construction time.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Registry-checked identifiers
// ---------------------------------------------------------------------------

/// Identifier of an offliner task, e.g. `offliner.mwoffliner`.
///
/// This is the discriminant of a schedule config: it selects the flags
/// schema, the expected image and the warehouse root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskName(String);

impl TaskName {
    /// Wrap a task identifier. Membership is checked by the registry.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the task identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a dispatcher queue, e.g. `small`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueName(String);

impl QueueName {
    /// Wrap a queue name. Membership is checked by the registry.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the queue name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Container image reference
// ---------------------------------------------------------------------------

/// Maximum length of a container image tag.
pub const IMAGE_TAG_MAX_LEN: usize = 128;

/// Container image tag, e.g. `1.8.0` or `latest`.
///
/// # Validation
///
/// - 1 to 128 characters
/// - First character is an ASCII letter, digit or `_`
/// - Remaining characters are ASCII letters, digits, `_`, `.` or `-`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImageTag(String);

impl ImageTag {
    /// Create an image tag, validating the tag grammar.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidImageTag`] if the value is empty,
    /// too long, or contains a character outside the grammar.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Self::is_valid(&s) {
            return Err(ValidationError::InvalidImageTag(s));
        }
        Ok(Self(s))
    }

    fn is_valid(s: &str) -> bool {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if s.len() > IMAGE_TAG_MAX_LEN {
            return false;
        }
        (first.is_ascii_alphanumeric() || first == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    }

    /// Access the tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ImageTag {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImageTag> for String {
    fn from(tag: ImageTag) -> Self {
        tag.0
    }
}

impl std::fmt::Display for ImageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The container image an offliner task runs in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageRef {
    /// Repository name, e.g. `openzim/mwoffliner`.
    pub name: String,
    /// Version tag.
    pub tag: ImageTag,
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}
