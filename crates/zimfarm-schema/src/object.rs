//! # Strict Object Validator
//!
//! Validates a mapping against a named [`ObjectSchema`] in two exhaustive
//! passes:
//!
//! 1. **Key set.** Keys the schema does not declare are
//!    [`ErrorKind::UnexpectedField`]; absent required fields are
//!    [`ErrorKind::MissingField`]. Both are computed as explicit set
//!    differences between the input keys and the declared names.
//! 2. **Values.** Every present declared field is validated, recursing into
//!    nested schemas and lists. A failing field does not stop its siblings.
//!
//! The object fails if either pass recorded anything.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{ErrorKind, FieldPath, SchemaError, ValidationErrors};
use crate::list::ListValidator;
use crate::primitive::{record_type_mismatch, Primitive};

/// The validator attached to a field.
#[derive(Debug, Clone)]
pub enum FieldValidator {
    /// A leaf value.
    Primitive(Primitive),
    /// A deduplicated list of leaf values.
    List(ListValidator),
    /// A nested strict object.
    Object(Arc<ObjectSchema>),
    /// Any mapping. Its content is validated by a schema chosen at runtime.
    Mapping,
}

impl FieldValidator {
    /// Validate `value`, returning its canonical form.
    pub fn validate(
        &self,
        value: &Value,
        path: &FieldPath,
        errors: &mut ValidationErrors,
    ) -> Option<Value> {
        match self {
            Self::Primitive(primitive) => primitive.validate(value, path, errors),
            Self::List(list) => list.validate(value, path, errors),
            Self::Object(schema) => schema.validate_at(value, path, errors).map(Value::Object),
            Self::Mapping => match value {
                Value::Object(_) => Some(value.clone()),
                other => {
                    record_type_mismatch("object", other, path, errors);
                    None
                }
            },
        }
    }
}

impl From<Primitive> for FieldValidator {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl From<ListValidator> for FieldValidator {
    fn from(list: ListValidator) -> Self {
        Self::List(list)
    }
}

impl From<ObjectSchema> for FieldValidator {
    fn from(schema: ObjectSchema) -> Self {
        Self::Object(Arc::new(schema))
    }
}

impl From<Arc<ObjectSchema>> for FieldValidator {
    fn from(schema: Arc<ObjectSchema>) -> Self {
        Self::Object(schema)
    }
}

/// One declared field of a schema.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    required: bool,
    validator: FieldValidator,
}

impl FieldSpec {
    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The field's validator.
    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }
}

/// A named, ordered set of field specifications that rejects unknown keys.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl ObjectSchema {
    /// Start declaring a schema called `name`.
    pub fn builder(name: impl Into<String>) -> ObjectSchemaBuilder {
        ObjectSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Schema name, e.g. `"mwoffliner flags"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of the required fields, in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name.as_str())
    }

    /// Validate a mapping, returning the canonical record or every violation.
    pub fn check(&self, value: &Value) -> Result<Map<String, Value>, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match self.validate_at(value, &FieldPath::root(), &mut errors) {
            Some(record) => errors.into_result(record),
            None => Err(errors),
        }
    }

    /// Validate a mapping located at `path`, recording violations into `errors`.
    ///
    /// Returns the canonical record (declared field order, canonical values)
    /// when nothing was recorded for this object.
    pub fn validate_at(
        &self,
        value: &Value,
        path: &FieldPath,
        errors: &mut ValidationErrors,
    ) -> Option<Map<String, Value>> {
        let Value::Object(input) = value else {
            record_type_mismatch("object", value, path, errors);
            return None;
        };
        let before = errors.len();

        self.check_keys(input, path, errors);

        let mut record = Map::new();
        for spec in &self.fields {
            if let Some(raw) = input.get(&spec.name) {
                if let Some(canonical) = spec.validator.validate(raw, &path.key(&spec.name), errors) {
                    record.insert(spec.name.clone(), canonical);
                }
            }
        }

        if errors.len() > before {
            None
        } else {
            Some(record)
        }
    }

    fn check_keys(&self, input: &Map<String, Value>, path: &FieldPath, errors: &mut ValidationErrors) {
        let declared: BTreeSet<&str> = self.fields.iter().map(|f| f.name.as_str()).collect();
        let present: BTreeSet<&str> = input.keys().map(String::as_str).collect();
        let required: BTreeSet<&str> = self.required_fields().collect();

        for key in present.difference(&declared) {
            errors.push(
                path.key(*key),
                ErrorKind::UnexpectedField,
                format!("field is not declared by the {} schema", self.name),
            );
        }
        for key in required.difference(&present) {
            errors.push(path.key(*key), ErrorKind::MissingField, "required field is missing");
        }
    }
}

/// Builder for [`ObjectSchema`].
#[derive(Debug)]
pub struct ObjectSchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl ObjectSchemaBuilder {
    /// Declare a required field.
    pub fn required(self, name: impl Into<String>, validator: impl Into<FieldValidator>) -> Self {
        self.field(name, true, validator)
    }

    /// Declare an optional field. Optional fields may be absent, not null.
    pub fn optional(self, name: impl Into<String>, validator: impl Into<FieldValidator>) -> Self {
        self.field(name, false, validator)
    }

    fn field(mut self, name: impl Into<String>, required: bool, validator: impl Into<FieldValidator>) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            required,
            validator: validator.into(),
        });
        self
    }

    /// Finish the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateField`] if a field name was declared twice.
    pub fn build(self) -> Result<ObjectSchema, SchemaError> {
        let mut seen = BTreeSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: spec.name.clone(),
                });
            }
        }
        Ok(ObjectSchema {
            name: self.name,
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn image_schema() -> ObjectSchema {
        ObjectSchema::builder("image")
            .required("name", Primitive::String)
            .required("tag", Primitive::ImageTag)
            .build()
            .unwrap()
    }

    fn outer_schema() -> ObjectSchema {
        ObjectSchema::builder("outer")
            .required("id", Primitive::String)
            .optional("enabled", Primitive::Boolean)
            .optional("image", image_schema())
            .optional(
                "tags",
                ListValidator::dedup(Primitive::one_of(["a", "b"])),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_record_is_canonical() {
        let record = outer_schema()
            .check(&json!({
                "tags": ["b", "b", "a"],
                "id": "x",
                "image": {"name": "openzim/mwoffliner", "tag": "1.8.0"}
            }))
            .unwrap();
        assert_eq!(
            Value::Object(record),
            json!({
                "id": "x",
                "image": {"name": "openzim/mwoffliner", "tag": "1.8.0"},
                "tags": ["b", "a"]
            })
        );
    }

    #[test]
    fn test_missing_and_unexpected_reported_together() {
        let errors = outer_schema()
            .check(&json!({"enabled": true, "extra": 1, "other": 2}))
            .unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has(ErrorKind::MissingField, "id"));
        assert!(errors.has(ErrorKind::UnexpectedField, "extra"));
        assert!(errors.has(ErrorKind::UnexpectedField, "other"));
    }

    #[test]
    fn test_sibling_fields_still_validated() {
        let errors = outer_schema()
            .check(&json!({
                "id": 1,
                "enabled": "yes",
                "image": {"name": "x", "tag": "bad tag", "digest": "sha"},
                "tags": ["c"]
            }))
            .unwrap_err();
        assert!(errors.has(ErrorKind::TypeMismatch, "id"));
        assert!(errors.has(ErrorKind::TypeMismatch, "enabled"));
        assert!(errors.has(ErrorKind::Format, "image.tag"));
        assert!(errors.has(ErrorKind::UnexpectedField, "image.digest"));
        assert!(errors.has(ErrorKind::EnumViolation, "tags[0]"));
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_nested_missing_field_path() {
        let errors = outer_schema()
            .check(&json!({"id": "x", "image": {"name": "unknown_offliner"}}))
            .unwrap_err();
        assert!(errors.has(ErrorKind::MissingField, "image.tag"));
    }

    #[test]
    fn test_null_optional_field_is_rejected() {
        let errors = outer_schema()
            .check(&json!({"id": "x", "enabled": null}))
            .unwrap_err();
        assert!(errors.has(ErrorKind::TypeMismatch, "enabled"));
    }

    #[test]
    fn test_not_a_mapping() {
        let errors = outer_schema().check(&json!(["id"])).unwrap_err();
        assert!(errors.has(ErrorKind::TypeMismatch, ""));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = ObjectSchema::builder("dup")
            .required("a", Primitive::String)
            .optional("a", Primitive::Boolean)
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { ref field, .. } if field == "a"));
    }

    #[test]
    fn test_introspection() {
        let schema = outer_schema();
        assert_eq!(schema.name(), "outer");
        assert_eq!(schema.fields().len(), 4);
        assert_eq!(schema.required_fields().collect::<Vec<_>>(), vec!["id"]);
        assert!(schema.field("enabled").is_some_and(|f| !f.is_required()));
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_mapping_validator() {
        let mut errors = ValidationErrors::new();
        let path = FieldPath::root().key("flags");
        assert!(FieldValidator::Mapping.validate(&json!({"k": 1}), &path, &mut errors).is_some());
        assert!(FieldValidator::Mapping.validate(&json!("flags"), &path, &mut errors).is_none());
        assert!(errors.has(ErrorKind::TypeMismatch, "flags"));
    }
}
