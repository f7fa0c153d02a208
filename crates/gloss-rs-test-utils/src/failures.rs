use serde_json::{Map, Value, json};

/// Leaf failure as the mapper reports it.
pub fn leaf_failure(kind: &str, path: &str, value: Value, properties: Value) -> Value {
    json!({
        "name": "ValidatorError",
        "kind": kind,
        "path": path,
        "value": value,
        "message": format!("Validator failed for path `{path}`"),
        "properties": properties,
    })
}

pub fn required_failure(path: &str) -> Value {
    leaf_failure("required", path, Value::Null, json!({ "type": "required" }))
}

pub fn minlength_failure(path: &str, value: &str, min: u64) -> Value {
    leaf_failure(
        "minlength",
        path,
        json!(value),
        json!({ "type": "minlength", "minlength": min }),
    )
}

pub fn enum_failure(path: &str, value: &str, allowed: &[&str]) -> Value {
    leaf_failure(
        "enum",
        path,
        json!(value),
        json!({ "type": "enum", "enumValues": allowed }),
    )
}

/// Cast failure; `type_token` is the declared type as the mapper spells it.
pub fn cast_failure(path: &str, type_token: &str, value: Value) -> Value {
    let text = value
        .as_str()
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string());
    json!({
        "name": "CastError",
        "kind": type_token,
        "path": path,
        "value": value,
        "stringValue": format!("\"{text}\""),
        "message": format!("Cast to {type_token} failed for value \"{text}\" at path \"{path}\""),
    })
}

/// Aggregate validation error; sub-failures keep the given order.
pub fn validation_error(failures: Vec<(&str, Value)>) -> Value {
    let errors: Map<String, Value> = failures
        .into_iter()
        .map(|(path, failure)| (path.to_string(), failure))
        .collect();
    json!({
        "name": "ValidationError",
        "message": "Users validation failed",
        "errors": errors,
    })
}

/// Driver error for a duplicate key on `{path}_1`.
pub fn duplicate_key_error(collection: &str, path: &str, value: &str) -> Value {
    json!({
        "name": "MongoError",
        "code": 11000,
        "message": format!(
            "E11000 duplicate key error collection: {collection} index: {path}_1 dup key: {{ : \"{value}\" }}"
        ),
    })
}
