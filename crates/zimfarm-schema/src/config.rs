//! # Schedule Config Validation
//!
//! Validates a whole schedule config: the task descriptor fields plus the
//! task-specific `flags` record.
//!
//! ## Passes
//!
//! 1. **Structure.** The config is checked against a strict schema whose
//!    `queue` enumeration comes from the registry. `flags` only has to be a
//!    mapping at this stage.
//! 2. **Dispatch.** `task_name` is resolved in the [`TaskRegistry`]. An
//!    unknown name is a [`ErrorKind::CrossFieldConstraint`] and nothing that
//!    depends on the task is checked. A known name pins `image.name` and
//!    `warehouse_path` to the task's values and selects the flags schema.
//!
//! Both passes write into the same accumulator, so one call reports every
//! violation in the config.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use zimfarm_core::{ImageRef, QueueName, TaskName};

use crate::error::{ErrorKind, FieldPath, SchemaError, ValidationErrors};
use crate::object::{FieldValidator, ObjectSchema};
use crate::primitive::Primitive;
use crate::registry::{TaskDescriptor, TaskRegistry};

/// Top-level field names.
pub mod fields {
    /// The discriminant.
    pub const TASK_NAME: &str = "task_name";
    /// Dispatcher queue.
    pub const QUEUE: &str = "queue";
    /// Output location.
    pub const WAREHOUSE_PATH: &str = "warehouse_path";
    /// Container image.
    pub const IMAGE: &str = "image";
    /// Name inside `image`.
    pub const IMAGE_NAME: &str = "name";
    /// Tag inside `image`.
    pub const IMAGE_TAG: &str = "tag";
    /// Task-specific flags.
    pub const FLAGS: &str = "flags";
}

/// A validated schedule config.
///
/// Lists in `flags` are deduplicated and every value is in canonical form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Offliner task.
    pub task_name: TaskName,
    /// Dispatcher queue.
    pub queue: QueueName,
    /// Output location in the warehouse.
    pub warehouse_path: String,
    /// Container image.
    pub image: ImageRef,
    /// Task-specific flags, in the flags schema's field order.
    pub flags: Map<String, Value>,
}

impl TaskConfig {
    /// The config in its submitted shape.
    pub fn to_value(&self) -> Value {
        let mut image = Map::new();
        image.insert(fields::IMAGE_NAME.into(), Value::String(self.image.name.clone()));
        image.insert(fields::IMAGE_TAG.into(), Value::String(self.image.tag.to_string()));

        let mut config = Map::new();
        config.insert(fields::TASK_NAME.into(), Value::String(self.task_name.to_string()));
        config.insert(fields::QUEUE.into(), Value::String(self.queue.to_string()));
        config.insert(fields::WAREHOUSE_PATH.into(), Value::String(self.warehouse_path.clone()));
        config.insert(fields::IMAGE.into(), Value::Object(image));
        config.insert(fields::FLAGS.into(), Value::Object(self.flags.clone()));
        Value::Object(config)
    }
}

/// Validates schedule configs against a [`TaskRegistry`].
///
/// Holds only immutable data, so one instance can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct ConfigValidator {
    registry: Arc<TaskRegistry>,
    structure: ObjectSchema,
}

impl ConfigValidator {
    /// Build a validator for the tasks and queues of `registry`.
    ///
    /// # Errors
    ///
    /// Only fails if the config schema definition itself is broken.
    pub fn new(registry: Arc<TaskRegistry>) -> Result<Self, SchemaError> {
        let image = ObjectSchema::builder("image")
            .required(fields::IMAGE_NAME, Primitive::String)
            .required(fields::IMAGE_TAG, Primitive::ImageTag)
            .build()?;
        let structure = ObjectSchema::builder("task config")
            .required(fields::TASK_NAME, Primitive::String)
            .required(fields::QUEUE, Primitive::one_of(registry.queue_names()))
            .required(fields::WAREHOUSE_PATH, Primitive::String)
            .required(fields::IMAGE, image)
            .required(fields::FLAGS, FieldValidator::Mapping)
            .build()?;
        Ok(Self { registry, structure })
    }

    /// The registry this validator dispatches on.
    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Validate a raw config.
    ///
    /// Returns the canonical config, or every violation found.
    pub fn validate(&self, config: &Value) -> Result<TaskConfig, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let root = FieldPath::root();

        let structure = self.structure.validate_at(config, &root, &mut errors);

        let mut flags = None;
        if let Value::Object(input) = config {
            if let Some(descriptor) = self.dispatch(input, &root, &mut errors) {
                flags = self.check_task_constraints(descriptor, input, &root, &mut errors);
            }
        }

        tracing::debug!(violations = errors.len(), "validated schedule config");

        match (structure, flags) {
            (Some(mut canonical), Some(flags)) if errors.is_empty() => {
                canonical.insert(fields::FLAGS.into(), Value::Object(flags));
                match serde_json::from_value(Value::Object(canonical)) {
                    Ok(config) => Ok(config),
                    Err(e) => {
                        errors.push(root, ErrorKind::Format, format!("cannot build canonical config: {e}"));
                        Err(errors)
                    }
                }
            }
            _ => Err(errors),
        }
    }

    /// Resolve `task_name` in the registry.
    ///
    /// A missing or non-string `task_name` was already reported by the
    /// structural pass; only unknown names are reported here.
    fn dispatch<'r>(
        &'r self,
        input: &Map<String, Value>,
        root: &FieldPath,
        errors: &mut ValidationErrors,
    ) -> Option<&'r TaskDescriptor> {
        let task_name = input.get(fields::TASK_NAME)?.as_str()?;
        match self.registry.lookup(task_name) {
            Some(descriptor) => {
                tracing::debug!(task = task_name, "dispatching flags schema");
                Some(descriptor)
            }
            None => {
                tracing::debug!(task = task_name, "unknown task, skipping dispatch");
                errors.push(
                    root.key(fields::TASK_NAME),
                    ErrorKind::CrossFieldConstraint,
                    format!(
                        "unknown task \"{task_name}\" (expected one of [{}])",
                        self.registry.task_names().collect::<Vec<_>>().join(", ")
                    ),
                );
                None
            }
        }
    }

    /// Check the fields pinned by the task and validate its flags.
    ///
    /// Returns the canonical flags record if the flags are valid.
    fn check_task_constraints(
        &self,
        descriptor: &TaskDescriptor,
        input: &Map<String, Value>,
        root: &FieldPath,
        errors: &mut ValidationErrors,
    ) -> Option<Map<String, Value>> {
        let task = descriptor.task_name();

        let image_name = input
            .get(fields::IMAGE)
            .and_then(|image| image.get(fields::IMAGE_NAME))
            .and_then(Value::as_str);
        if let Some(name) = image_name {
            if name != descriptor.image_name() {
                errors.push(
                    root.key(fields::IMAGE).key(fields::IMAGE_NAME),
                    ErrorKind::CrossFieldConstraint,
                    format!(
                        "task {task} requires image \"{}\", got \"{name}\"",
                        descriptor.image_name()
                    ),
                );
            }
        }

        if let Some(path) = input.get(fields::WAREHOUSE_PATH).and_then(Value::as_str) {
            if path != descriptor.warehouse_root() {
                errors.push(
                    root.key(fields::WAREHOUSE_PATH),
                    ErrorKind::CrossFieldConstraint,
                    format!(
                        "task {task} requires warehouse path \"{}\" exactly, got \"{path}\"",
                        descriptor.warehouse_root()
                    ),
                );
            }
        }

        match input.get(fields::FLAGS) {
            // Non-mapping flags were reported by the structural pass.
            Some(flags @ Value::Object(_)) => {
                descriptor
                    .flags_schema()
                    .validate_at(flags, &root.key(fields::FLAGS), errors)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> ConfigValidator {
        ConfigValidator::new(Arc::new(TaskRegistry::builtin().unwrap())).unwrap()
    }

    fn config() -> Value {
        json!({
            "task_name": "offliner.mwoffliner",
            "queue": "small",
            "warehouse_path": "/wikipedia",
            "image": {"name": "openzim/mwoffliner", "tag": "1.8.0"},
            "flags": {
                "mwUrl": "https://www.wikipedia.org",
                "adminEmail": "contact@kiwix.org",
                "format": ["nopic", "novid", "nopic"]
            }
        })
    }

    #[test]
    fn test_valid_config() {
        let canonical = validator().validate(&config()).unwrap();
        assert_eq!(canonical.task_name.as_str(), "offliner.mwoffliner");
        assert_eq!(canonical.queue.as_str(), "small");
        assert_eq!(canonical.warehouse_path, "/wikipedia");
        assert_eq!(canonical.image.to_string(), "openzim/mwoffliner:1.8.0");
        assert_eq!(canonical.flags["format"], json!(["nopic", "novid"]));
    }

    #[test]
    fn test_to_value_round_trips() {
        let v = validator();
        let canonical = v.validate(&config()).unwrap();
        let again = v.validate(&canonical.to_value()).unwrap();
        assert_eq!(canonical, again);
    }

    #[test]
    fn test_unknown_task_skips_dispatch() {
        let mut cfg = config();
        cfg["task_name"] = json!("offliner.unknown");
        cfg["warehouse_path"] = json!("/elsewhere");
        cfg["flags"] = json!({"anything": "goes"});

        let errors = validator().validate(&cfg).unwrap_err();
        assert_eq!(errors.len(), 1, "{errors}");
        assert!(errors.has(ErrorKind::CrossFieldConstraint, "task_name"));
    }

    #[test]
    fn test_non_string_task_name() {
        let mut cfg = config();
        cfg["task_name"] = json!(7);
        let errors = validator().validate(&cfg).unwrap_err();
        assert!(errors.has(ErrorKind::TypeMismatch, "task_name"));
        assert!(!errors.has_kind(ErrorKind::CrossFieldConstraint));
    }

    #[test]
    fn test_flags_not_a_mapping_reported_once() {
        let mut cfg = config();
        cfg["flags"] = json!(["mwUrl"]);
        let errors = validator().validate(&cfg).unwrap_err();
        assert_eq!(errors.len(), 1, "{errors}");
        assert!(errors.has(ErrorKind::TypeMismatch, "flags"));
    }

    #[test]
    fn test_cross_field_and_flags_errors_merged() {
        let mut cfg = config();
        cfg["warehouse_path"] = json!("/wikipedia/subdir");
        cfg["image"] = json!({"name": "unknown_offliner", "tag": "1.0"});
        cfg["flags"]["mwUrl"] = json!("bad_url");
        cfg["queue"] = json!("minuscule");

        let errors = validator().validate(&cfg).unwrap_err();
        assert!(errors.has(ErrorKind::CrossFieldConstraint, "warehouse_path"));
        assert!(errors.has(ErrorKind::CrossFieldConstraint, "image.name"));
        assert!(errors.has(ErrorKind::Format, "flags.mwUrl"));
        assert!(errors.has(ErrorKind::EnumViolation, "queue"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_config_not_a_mapping() {
        let errors = validator().validate(&json!("config")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has(ErrorKind::TypeMismatch, ""));
    }
}
