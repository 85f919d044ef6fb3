//! # Error Aggregation
//!
//! Every validator in this crate records problems into a single
//! [`ValidationErrors`] accumulator instead of returning on the first one.
//! A failed validation therefore reports every violation at once, each
//! qualified by the exact path of the offending field.
//!
//! Operational failures that are not about the submitted config (a broken
//! schema definition, an unreadable file) use [`SchemaError`] and
//! [`DocumentError`].

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// One step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// Location of a value inside a config, rendered as `flags.format[1]`.
///
/// The empty path designates the config itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The path of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the mapping key `name` below this one.
    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(name.into()));
        Self(segments)
    }

    /// Path of the sequence element `index` below this one.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    /// Whether this is the document root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The individual segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The category of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required field is absent.
    MissingField,
    /// A field that the schema does not declare is present.
    UnexpectedField,
    /// The value has the wrong JSON type, e.g. a string where a boolean is required.
    TypeMismatch,
    /// The value has the right type but invalid syntax, e.g. a malformed URL.
    Format,
    /// The value is outside a closed set of allowed values.
    EnumViolation,
    /// A rule that depends on the `task_name` discriminant is violated.
    CrossFieldConstraint,
}

impl ErrorKind {
    /// Stable snake_case identifier, as used in JSON reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::UnexpectedField => "unexpected_field",
            Self::TypeMismatch => "type_mismatch",
            Self::Format => "format",
            Self::EnumViolation => "enum_violation",
            Self::CrossFieldConstraint => "cross_field_constraint",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Path to the violating field.
    pub path: FieldPath,
    /// Category of the violation.
    pub kind: ErrorKind,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "  (root): [{}] {}", self.kind, self.message)
        } else {
            write!(f, "  {}: [{}] {}", self.path, self.kind, self.message)
        }
    }
}

/// Collection of validation violations.
///
/// Validators only ever append to it. When a validation call returns
/// `Err(ValidationErrors)` the collection is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// An empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation.
    pub fn push(&mut self, path: FieldPath, kind: ErrorKind, message: impl Into<String>) {
        self.violations.push(Violation {
            path,
            kind,
            message: message.into(),
        });
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations, in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// Violations recorded at exactly `path` (e.g. `"flags.mwUrl"`).
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.path.to_string() == path)
    }

    /// Whether a violation of `kind` was recorded at exactly `path`.
    pub fn has(&self, kind: ErrorKind, path: &str) -> bool {
        self.at(path).any(|v| v.kind == kind)
    }

    /// Whether any violation of `kind` was recorded, at any path.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Append every violation of `other`.
    pub fn extend(&mut self, other: ValidationErrors) {
        self.violations.extend(other.violations);
    }

    /// `Ok(value)` if nothing was recorded, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Error in a schema or registry definition.
///
/// These are programming or deployment mistakes, detected when schemas and
/// the registry are built, never while validating a config.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Two fields with the same name were declared in one schema.
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// Name of the schema.
        schema: String,
        /// The repeated field name.
        field: String,
    },

    /// Two registry entries share a task name.
    #[error("task '{0}' is registered more than once")]
    DuplicateTask(String),

    /// A queue name is listed more than once.
    #[error("queue '{0}' is registered more than once")]
    DuplicateQueue(String),

    /// A registry entry references a flags schema that does not exist.
    #[error("task '{task}' references unknown flags schema '{schema}'")]
    UnknownFlagsSchema {
        /// The task entry.
        task: String,
        /// The missing flags schema name.
        schema: String,
    },

    /// The registry configuration file has the wrong shape.
    #[error("invalid registry config '{path}': {reason}")]
    InvalidRegistryConfig {
        /// Path of the configuration file.
        path: String,
        /// Reason it was rejected.
        reason: String,
    },

    /// The registry configuration file could not be loaded.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Error loading a JSON or YAML document from disk.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read.
    #[error("cannot read '{path}': {source}")]
    Read {
        /// Path to the document.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or YAML.
    #[error("cannot parse '{path}': {reason}")]
    Parse {
        /// Path to the document.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// The YAML document uses a construct with no JSON equivalent.
    #[error("cannot convert '{path}' to JSON: {reason}")]
    Conversion {
        /// Path to the document.
        path: String,
        /// Reason the conversion failed.
        reason: String,
    },
}
