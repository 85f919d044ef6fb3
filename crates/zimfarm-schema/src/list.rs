//! # List-Dedup Validator
//!
//! Validates an ordered sequence element by element and collapses
//! duplicates, keeping the position of each value's first occurrence:
//! `[b, b, b, a]` becomes `[b, a]`. Running it on its own output is a no-op.

use serde_json::Value;

use crate::error::{FieldPath, ValidationErrors};
use crate::primitive::{record_type_mismatch, Primitive};

/// A sequence of primitive-validated items, deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListValidator {
    item: Primitive,
}

impl ListValidator {
    /// A deduplicating list of `item` values.
    pub fn dedup(item: Primitive) -> Self {
        Self { item }
    }

    /// The per-element validator.
    pub fn item(&self) -> &Primitive {
        &self.item
    }

    /// Validate `value` as a sequence, returning the deduplicated canonical list.
    ///
    /// Every element is checked, even after a failure, and each failure is
    /// recorded under its index (`flags.format[1]`). Any failing element
    /// fails the whole list.
    pub fn validate(
        &self,
        value: &Value,
        path: &FieldPath,
        errors: &mut ValidationErrors,
    ) -> Option<Value> {
        let Value::Array(items) = value else {
            record_type_mismatch("array", value, path, errors);
            return None;
        };

        let mut failed = false;
        let mut canonical: Vec<Value> = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.item.validate(item, &path.index(index), errors) {
                Some(v) => canonical.push(v),
                None => failed = true,
            }
        }

        if failed {
            None
        } else {
            Some(Value::Array(dedup_first_occurrence(canonical)))
        }
    }
}

/// Keep the first occurrence of every value, preserving order.
pub fn dedup_first_occurrence<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
