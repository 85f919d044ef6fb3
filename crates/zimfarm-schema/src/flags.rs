//! # Offliner Flags Schemas
//!
//! The per-offliner `flags` schemas, looked up by name when the task
//! registry is built. Only `mwoffliner` is defined today.

use crate::error::SchemaError;
use crate::list::ListValidator;
use crate::object::ObjectSchema;
use crate::primitive::Primitive;

/// Catalog name of the mwoffliner flags schema.
pub const MWOFFLINER: &str = "mwoffliner";

/// Every flags schema name accepted by [`flags_schema`].
pub const FLAGS_SCHEMA_NAMES: &[&str] = &[MWOFFLINER];

/// Output-format switches accepted in mwoffliner's `format` flag.
pub const MWOFFLINER_FORMATS: &[&str] = &["nopic", "novid", "nopdf", "nodet"];

/// Flags passed to mwoffliner.
///
/// | Field | Required | Validator |
/// |-------|----------|-----------|
/// | `mwUrl` | yes | URL |
/// | `adminEmail` | yes | email |
/// | `format` | no | deduplicated list of [`MWOFFLINER_FORMATS`] |
/// | `useCache` | no | boolean |
/// | `verbose` | no | boolean |
/// | `speed` | no | float |
/// | `articleList` | no | URL |
/// | `customZimFavicon` | no | URL |
/// | `customZimTitle` | no | string |
/// | `customZimDescription` | no | string |
pub fn mwoffliner_flags_schema() -> Result<ObjectSchema, SchemaError> {
    ObjectSchema::builder("mwoffliner flags")
        .required("mwUrl", Primitive::Url)
        .required("adminEmail", Primitive::Email)
        .optional(
            "format",
            ListValidator::dedup(Primitive::one_of(MWOFFLINER_FORMATS.iter().copied())),
        )
        .optional("useCache", Primitive::Boolean)
        .optional("verbose", Primitive::Boolean)
        .optional("speed", Primitive::Float)
        .optional("articleList", Primitive::Url)
        .optional("customZimFavicon", Primitive::Url)
        .optional("customZimTitle", Primitive::String)
        .optional("customZimDescription", Primitive::String)
        .build()
}

/// Build the flags schema registered under `name`, on behalf of `task`.
///
/// # Errors
///
/// Returns [`SchemaError::UnknownFlagsSchema`] if no schema has that name.
pub fn flags_schema(name: &str, task: &str) -> Result<ObjectSchema, SchemaError> {
    match name {
        MWOFFLINER => mwoffliner_flags_schema(),
        other => Err(SchemaError::UnknownFlagsSchema {
            task: task.to_string(),
            schema: other.to_string(),
        }),
    }
}
