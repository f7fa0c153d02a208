//! Schema validation helpers for gloss JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Keys accepted inside an `options` block.
const OPTION_KEYS: &[&str] = &[
    "default_key",
    "default_package",
    "msg_delimiter",
    "path_name_key",
    "upper_first",
    "link_to_errors",
    "link_to_origin_error",
    "additional_error_fields",
    "additional_context_fields",
];

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    let allowed = [
        "$schema",
        "options",
        "packages",
        "path_names",
        "error_contexts",
    ];
    ensure_allowed_keys(map, &allowed, layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("options") {
        validate_options(value, layer, "options")?;
    }
    if let Some(value) = map.get("packages") {
        validate_packages(value, layer, "packages")?;
    }
    if let Some(value) = map.get("path_names") {
        validate_path_names(value, layer, "path_names")?;
    }
    if let Some(value) = map.get("error_contexts") {
        validate_error_contexts(value, layer, "error_contexts")?;
    }

    Ok(())
}

/// Validate a partial options object applied at runtime.
pub(super) fn validate_options_patch(value: &Value, label: &str) -> Result<(), ConfigError> {
    validate_options(value, label, "")
}

/// Validate the "options" block.
fn validate_options(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, OPTION_KEYS, layer, path)?;
    for key in [
        "default_key",
        "default_package",
        "msg_delimiter",
        "path_name_key",
    ] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("upper_first") {
        expect_bool(value, layer, &join_path(path, "upper_first"))?;
    }
    for key in ["link_to_errors", "link_to_origin_error"] {
        if let Some(value) = map.get(key) {
            expect_optional_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("additional_error_fields") {
        expect_object(value, layer, &join_path(path, "additional_error_fields"))?;
    }
    if let Some(value) = map.get("additional_context_fields") {
        validate_string_map(value, layer, &join_path(path, "additional_context_fields"))?;
    }
    Ok(())
}

/// Validate the "packages" block: package -> { templates, type_names }.
fn validate_packages(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    for (package, entry) in map {
        let entry_path = join_path(path, package);
        let entry_map = expect_object(entry, layer, &entry_path)?;
        ensure_allowed_keys(entry_map, &["templates", "type_names"], layer, &entry_path)?;
        for key in ["templates", "type_names"] {
            if let Some(value) = entry_map.get(key) {
                validate_string_map(value, layer, &join_path(&entry_path, key))?;
            }
        }
    }
    Ok(())
}

/// Validate the "path_names" block: model -> package -> names.
fn validate_path_names(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let models = expect_object(value, layer, path)?;
    for (model, packages) in models {
        let model_path = join_path(path, model);
        for (package, names) in expect_object(packages, layer, &model_path)? {
            let names_path = join_path(&model_path, package);
            validate_name_tree(names, layer, &names_path)?;
        }
    }
    Ok(())
}

/// Display names are strings, optionally nested in objects.
fn validate_name_tree(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    for (key, entry) in expect_object(value, layer, path)? {
        let entry_path = join_path(path, key);
        match entry {
            Value::String(_) => {}
            Value::Object(_) => validate_name_tree(entry, layer, &entry_path)?,
            _ => {
                return Err(invalid_field(
                    layer,
                    &entry_path,
                    "expected string or object",
                ));
            }
        }
    }
    Ok(())
}

/// Validate the "error_contexts" block: kind -> { field: lookup }.
fn validate_error_contexts(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    for (kind, fields) in map {
        validate_string_map(fields, layer, &join_path(path, kind))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON string or null.
fn expect_optional_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_null() || value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string or null"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Validate that a value is an object of strings.
fn validate_string_map(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    for (key, entry) in expect_object(value, layer, path)? {
        expect_string(entry, layer, &join_path(path, key))?;
    }
    Ok(())
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join a dotted path prefix with a key.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
