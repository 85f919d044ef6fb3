//! Integration tests for the schedule validators.
//!
//! Covers the mwoffliner flags schema on its own and the full config
//! validator with registry dispatch, using the same fixtures a dispatcher
//! client would submit.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::{json, Value};
use zimfarm_schema::{
    mwoffliner_flags_schema, ConfigValidator, ErrorKind, ObjectSchema, TaskRegistry,
};

fn mwoffliner_flags() -> Value {
    json!({
        "mwUrl": "https://www.wikipedia.org",
        "adminEmail": "contact@kiwix.org",
        "format": ["nopic", "novid"],
        "useCache": true,
        "verbose": false,
        "speed": 1.0,
        "articleList": "https://example.com",
        "customZimFavicon": "https://example.com/icon.jpeg",
        "customZimTitle": "Custom Title",
        "customZimDescription": "Custom Description"
    })
}

fn mwoffliner_flags_with(key: &str, value: Value) -> Value {
    let mut flags = mwoffliner_flags();
    flags[key] = value;
    flags
}

fn make_config() -> Value {
    json!({
        "task_name": "offliner.mwoffliner",
        "queue": "small",
        "warehouse_path": "/wikipedia",
        "image": {"name": "openzim/mwoffliner", "tag": "1.8.0"},
        "flags": mwoffliner_flags()
    })
}

fn make_config_with(key: &str, value: Value) -> Value {
    let mut config = make_config();
    config[key] = value;
    config
}

fn flags_schema() -> ObjectSchema {
    mwoffliner_flags_schema().expect("built-in flags schema")
}

fn config_validator() -> ConfigValidator {
    let registry = TaskRegistry::builtin().expect("built-in registry");
    ConfigValidator::new(Arc::new(registry)).expect("config validator")
}

fn remove(value: &mut Value, key: &str) {
    value.as_object_mut().expect("fixture is an object").remove(key);
}

// ---------------------------------------------------------------------------
// mwoffliner flags
// ---------------------------------------------------------------------------

#[test]
fn flags_valid() {
    let schema = flags_schema();

    schema
        .check(&json!({"mwUrl": "https://www.wikipedia.org", "adminEmail": "contact@kiwix.org"}))
        .unwrap();

    schema
        .check(&json!({
            "mwUrl": "https://www.wikipedia.org",
            "adminEmail": "contact@kiwix.org",
            "format": ["nopic", "novid"],
            "useCache": true,
            "verbose": false,
            "speed": 1.0
        }))
        .unwrap();

    schema.check(&mwoffliner_flags()).unwrap();
}

#[test]
fn flags_valid_output_equals_input() {
    let record = flags_schema().check(&mwoffliner_flags()).unwrap();
    assert_eq!(Value::Object(record), mwoffliner_flags());
}

#[test]
fn flags_missing_required() {
    for missing in ["mwUrl", "adminEmail"] {
        let mut flags = mwoffliner_flags();
        remove(&mut flags, missing);
        let errors = flags_schema().check(&flags).unwrap_err();
        assert!(
            errors.has(ErrorKind::MissingField, missing),
            "expected MissingField at {missing}, got:\n{errors}"
        );
    }
}

#[test]
fn flags_extra_key() {
    let flags = mwoffliner_flags_with("extra", json!("some_value"));
    let errors = flags_schema().check(&flags).unwrap_err();
    assert!(errors.has(ErrorKind::UnexpectedField, "extra"));
}

#[test]
fn flags_invalid_field() {
    let cases = [
        ("mwUrl", json!("http:/example.com"), ErrorKind::Format, "mwUrl"),
        ("adminEmail", json!("user @example.com"), ErrorKind::Format, "adminEmail"),
        ("format", json!(["pic", 123]), ErrorKind::EnumViolation, "format[0]"),
        ("useCache", json!("False"), ErrorKind::TypeMismatch, "useCache"),
        ("verbose", json!("False"), ErrorKind::TypeMismatch, "verbose"),
        ("speed", json!("zero"), ErrorKind::TypeMismatch, "speed"),
        ("articleList", json!("abc"), ErrorKind::Format, "articleList"),
        ("customZimFavicon", json!("123"), ErrorKind::Format, "customZimFavicon"),
        ("customZimTitle", json!(123), ErrorKind::TypeMismatch, "customZimTitle"),
        ("customZimDescription", Value::Null, ErrorKind::TypeMismatch, "customZimDescription"),
    ];

    for (key, value, kind, path) in cases {
        let flags = mwoffliner_flags_with(key, value.clone());
        let errors = flags_schema().check(&flags).unwrap_err();
        assert!(
            errors.has(kind, path),
            "{key}={value}: expected {kind} at {path}, got:\n{errors}"
        );
    }
}

#[test]
fn flags_duplicated_formats() {
    let cases = [
        (json!(["nopic", "nopic"]), vec!["nopic"]),
        (json!(["novid", "novid", "novid", "nopic"]), vec!["novid", "nopic"]),
    ];

    for (format, expected) in cases {
        let record = flags_schema()
            .check(&mwoffliner_flags_with("format", format))
            .unwrap();
        let got: BTreeSet<&str> = record["format"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(got, expected.iter().copied().collect::<BTreeSet<_>>());
        assert_eq!(record["format"], json!(expected));
    }
}

#[test]
fn flags_canonical_output_is_idempotent() {
    let schema = flags_schema();
    let input = mwoffliner_flags_with("format", json!(["novid", "nopic", "novid"]));
    let once = schema.check(&input).unwrap();
    let twice = schema.check(&Value::Object(once.clone())).unwrap();
    assert_eq!(once, twice);
}

// ---------------------------------------------------------------------------
// Full config
// ---------------------------------------------------------------------------

#[test]
fn config_valid() {
    let config = config_validator().validate(&make_config()).unwrap();
    assert_eq!(config.to_value(), make_config());
}

#[test]
fn config_missing_required() {
    for missing in ["task_name", "queue", "warehouse_path", "image", "flags"] {
        let mut config = make_config();
        remove(&mut config, missing);
        let errors = config_validator().validate(&config).unwrap_err();
        assert!(
            errors.has(ErrorKind::MissingField, missing),
            "expected MissingField at {missing}, got:\n{errors}"
        );
    }
}

#[test]
fn config_extra_key() {
    let config = make_config_with("extra", json!("some_value"));
    let errors = config_validator().validate(&config).unwrap_err();
    assert!(errors.has(ErrorKind::UnexpectedField, "extra"));
}

#[test]
fn config_invalid_field() {
    let cases = [
        ("task_name", json!("offliner.unknown"), ErrorKind::CrossFieldConstraint, "task_name"),
        ("queue", json!("minuscule"), ErrorKind::EnumViolation, "queue"),
        ("warehouse_path", json!("/wikipedia/subdir"), ErrorKind::CrossFieldConstraint, "warehouse_path"),
        ("warehouse_path", json!("/bad_path"), ErrorKind::CrossFieldConstraint, "warehouse_path"),
        (
            "image",
            json!({"name": "unknown_offliner", "tag": "1.0"}),
            ErrorKind::CrossFieldConstraint,
            "image.name",
        ),
        ("image", json!({"name": "unknown_offliner"}), ErrorKind::MissingField, "image.tag"),
        (
            "flags",
            mwoffliner_flags_with("mwUrl", json!("bad_url")),
            ErrorKind::Format,
            "flags.mwUrl",
        ),
    ];

    for (key, value, kind, path) in cases {
        let config = make_config_with(key, value.clone());
        let errors = config_validator().validate(&config).unwrap_err();
        assert!(
            errors.has(kind, path),
            "{key}={value}: expected {kind} at {path}, got:\n{errors}"
        );
    }
}

#[test]
fn config_unknown_task_does_not_dispatch_flags() {
    // Flags that would fail the mwoffliner schema in several ways.
    let mut config = make_config_with("task_name", json!("offliner.unknown"));
    config["flags"] = json!({"mwUrl": "http:/example.com", "bogus": true});

    let errors = config_validator().validate(&config).unwrap_err();
    assert!(errors.has(ErrorKind::CrossFieldConstraint, "task_name"));
    assert!(
        errors.violations().iter().all(|v| !v.path.to_string().starts_with("flags")),
        "no flags violations expected without dispatch, got:\n{errors}"
    );
}

#[test]
fn config_reports_every_violation() {
    let mut config = make_config();
    config["queue"] = json!("minuscule");
    config["warehouse_path"] = json!("/bad_path");
    config["image"] = json!({"name": "unknown_offliner", "tag": "1.0", "digest": "x"});
    config["flags"] = json!({
        "adminEmail": "user @example.com",
        "format": ["novid", "pic"],
        "useCache": "False"
    });
    config["extra"] = json!(1);

    let errors = config_validator().validate(&config).unwrap_err();
    let expected = [
        (ErrorKind::UnexpectedField, "extra"),
        (ErrorKind::EnumViolation, "queue"),
        (ErrorKind::UnexpectedField, "image.digest"),
        (ErrorKind::CrossFieldConstraint, "image.name"),
        (ErrorKind::CrossFieldConstraint, "warehouse_path"),
        (ErrorKind::MissingField, "flags.mwUrl"),
        (ErrorKind::Format, "flags.adminEmail"),
        (ErrorKind::EnumViolation, "flags.format[1]"),
        (ErrorKind::TypeMismatch, "flags.useCache"),
    ];
    for (kind, path) in expected {
        assert!(errors.has(kind, path), "expected {kind} at {path}, got:\n{errors}");
    }
    assert_eq!(errors.len(), expected.len(), "{errors}");
}

#[test]
fn config_canonical_output_is_idempotent() {
    let validator = config_validator();
    let mut config = make_config();
    config["flags"]["format"] = json!(["novid", "novid", "novid", "nopic"]);
    config["flags"]["speed"] = json!(2);

    let once = validator.validate(&config).unwrap();
    assert_eq!(once.flags["format"], json!(["novid", "nopic"]));
    assert_eq!(once.flags["speed"], json!(2.0));

    let twice = validator.validate(&once.to_value()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn config_validation_is_shareable_across_threads() {
    let validator = config_validator();
    std::thread::scope(|scope| {
        for i in 0..8 {
            let validator = &validator;
            scope.spawn(move || {
                let config = if i % 2 == 0 {
                    make_config()
                } else {
                    make_config_with("queue", json!("minuscule"))
                };
                let result = validator.validate(&config);
                assert_eq!(result.is_ok(), i % 2 == 0);
            });
        }
    });
}

#[test]
fn config_error_report_serializes() {
    let config = make_config_with("task_name", json!("offliner.unknown"));
    let errors = config_validator().validate(&config).unwrap_err();
    let report = serde_json::to_value(&errors).unwrap();
    assert_eq!(report[0]["path"], "task_name");
    assert_eq!(report[0]["kind"], "cross_field_constraint");
}
