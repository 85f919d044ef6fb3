//! # Document Loading
//!
//! Reads schedule configs and registry configs from JSON or YAML files into
//! `serde_json::Value` trees. The format is picked from the file extension:
//! `.yaml`/`.yml` for YAML, anything else is parsed as JSON.
//!
//! YAML is converted to the JSON value model with the same type rules a
//! JSON payload would get, so `useCache: "False"` stays a string and is
//! rejected by the boolean validator exactly as it would be over HTTP.

use std::path::Path;

use serde_json::Value;

use crate::error::DocumentError;

/// Serialization format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON.
    Json,
    /// YAML (1.2 core schema, as parsed by `serde_yaml`).
    Yaml,
}

impl DocumentFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Load a JSON or YAML document from disk.
///
/// # Errors
///
/// Returns [`DocumentError::Read`] if the file cannot be read, and
/// [`DocumentError::Parse`] or [`DocumentError::Conversion`] if its content
/// is not a valid document.
pub fn load_document(path: &Path) -> Result<Value, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_document(&content, DocumentFormat::from_path(path), &path.display().to_string())
}

/// Parse document text. `origin` names the source in error messages.
///
/// # Errors
///
/// Returns [`DocumentError::Parse`] or [`DocumentError::Conversion`].
pub fn parse_document(
    content: &str,
    format: DocumentFormat,
    origin: &str,
) -> Result<Value, DocumentError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| DocumentError::Parse {
            path: origin.to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
        DocumentFormat::Yaml => {
            let yaml_value: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| DocumentError::Parse {
                    path: origin.to_string(),
                    reason: format!("invalid YAML: {e}"),
                })?;
            yaml_to_json_value(&yaml_value).map_err(|reason| DocumentError::Conversion {
                path: origin.to_string(),
                reason,
            })
        }
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Tags are dropped. Mapping keys must be strings, numbers or booleans.
fn yaml_to_json_value(yaml: &serde_yaml::Value) -> Result<Value, String> {
    match yaml {
        serde_yaml::Value::Null => Ok(Value::Null),
        serde_yaml::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(serde_json::Number::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(serde_json::Number::from(u)))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        serde_yaml::Value::String(s) => Ok(Value::String(s.clone())),
        serde_yaml::Value::Sequence(seq) => {
            let items: Result<Vec<Value>, String> = seq.iter().map(yaml_to_json_value).collect();
            Ok(Value::Array(items?))
        }
        serde_yaml::Value::Mapping(map) => {
            let mut json_map = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key type: {other:?}")),
                };
                json_map.insert(key, yaml_to_json_value(v)?);
            }
            Ok(Value::Object(json_map))
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json_value(&tagged.value),
    }
}
