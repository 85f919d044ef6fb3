//! # Primitive Validators
//!
//! Atomic type and format checks. Each takes an arbitrary JSON value and
//! either returns its canonical form or records a violation.
//!
//! Types are strict: a string is never coerced to a boolean or a number,
//! so `"False"` is rejected where a boolean is expected.

use serde_json::{Number, Value};
use zimfarm_core::{AbsoluteUrl, EmailAddress, ImageTag, ValidationError};

use crate::error::{ErrorKind, FieldPath, ValidationErrors};

/// A leaf validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// Any string.
    String,
    /// A native boolean.
    Boolean,
    /// Any number; the canonical form is a float.
    Float,
    /// An absolute `scheme://authority` URL (see [`AbsoluteUrl`]).
    Url,
    /// An email address (see [`EmailAddress`]).
    Email,
    /// A container image tag (see [`ImageTag`]).
    ImageTag,
    /// A string from a closed set, in declaration order.
    Enumeration(Vec<String>),
}

impl Primitive {
    /// An enumeration of the given values.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enumeration(values.into_iter().map(Into::into).collect())
    }

    /// Short description of what the validator accepts, for messages.
    pub fn expected(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Float => "number",
            Self::Url => "URL string",
            Self::Email => "email string",
            Self::ImageTag => "image tag string",
            Self::Enumeration(_) => "enumeration string",
        }
    }

    /// Validate `value`, returning its canonical form.
    ///
    /// On failure a single violation is recorded at `path` and `None` is
    /// returned.
    pub fn validate(
        &self,
        value: &Value,
        path: &FieldPath,
        errors: &mut ValidationErrors,
    ) -> Option<Value> {
        match self {
            Self::Boolean => match value {
                Value::Bool(b) => Some(Value::Bool(*b)),
                other => {
                    type_mismatch(self, other, path, errors);
                    None
                }
            },
            Self::Float => match value.as_f64().and_then(Number::from_f64) {
                Some(n) => Some(Value::Number(n)),
                None => {
                    type_mismatch(self, value, path, errors);
                    None
                }
            },
            Self::String => {
                let s = expect_str(self, value, path, errors)?;
                Some(Value::String(s.to_string()))
            }
            Self::Url => {
                let s = expect_str(self, value, path, errors)?;
                lexical(AbsoluteUrl::new(s), path, errors)
                    .map(|url| Value::String(url.into()))
            }
            Self::Email => {
                let s = expect_str(self, value, path, errors)?;
                lexical(EmailAddress::new(s), path, errors)
                    .map(|email| Value::String(email.into()))
            }
            Self::ImageTag => {
                let s = expect_str(self, value, path, errors)?;
                lexical(ImageTag::new(s), path, errors).map(|tag| Value::String(tag.into()))
            }
            Self::Enumeration(allowed) => {
                let s = expect_str(self, value, path, errors)?;
                if allowed.iter().any(|a| a == s) {
                    Some(Value::String(s.to_string()))
                } else {
                    errors.push(
                        path.clone(),
                        ErrorKind::EnumViolation,
                        format!("\"{s}\" is not one of [{}]", allowed.join(", ")),
                    );
                    None
                }
            }
        }
    }
}

/// JSON type name of a value, for messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Record a [`ErrorKind::TypeMismatch`] for a value that is not `expected`.
pub(crate) fn record_type_mismatch(
    expected: &str,
    value: &Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) {
    errors.push(
        path.clone(),
        ErrorKind::TypeMismatch,
        format!("expected {expected}, got {}", json_type_name(value)),
    );
}

fn type_mismatch(
    primitive: &Primitive,
    value: &Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) {
    record_type_mismatch(primitive.expected(), value, path, errors);
}

fn expect_str<'v>(
    primitive: &Primitive,
    value: &'v Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<&'v str> {
    match value {
        Value::String(s) => Some(s),
        other => {
            type_mismatch(primitive, other, path, errors);
            None
        }
    }
}

fn lexical<T>(
    result: Result<T, ValidationError>,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(path.clone(), ErrorKind::Format, e.to_string());
            None
        }
    }
}
