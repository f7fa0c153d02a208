//! Dotted-path lookups over JSON values.

use serde_json::{Map, Value};

/// Resolve a dotted path (`properties.minlength`, `logs.0.time`) inside a value.
///
/// Object segments are matched by key and array segments by numeric index.
/// An empty path resolves to the value itself.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Resolve a dotted path starting from an object map.
pub fn lookup_path_in_map<'a>(map: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let value = map.get(head)?;
    match rest {
        Some(rest) => lookup_path(value, rest),
        None => Some(value),
    }
}

/// True when the value is an object with at least one key.
pub fn is_filled_object(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Object(map)) if !map.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn walks_objects_and_arrays() {
        let value = json!({
            "properties": { "minlength": 3 },
            "logs": [{ "time": "now" }],
        });
        assert_eq!(lookup_path(&value, "properties.minlength"), Some(&json!(3)));
        assert_eq!(lookup_path(&value, "logs.0.time"), Some(&json!("now")));
        assert_eq!(lookup_path(&value, "logs.1.time"), None);
        assert_eq!(lookup_path(&value, "properties.minlength.deeper"), None);
        assert_eq!(lookup_path(&value, ""), Some(&value));
    }

    #[test]
    fn filled_object_rejects_empty_and_scalars() {
        assert!(is_filled_object(Some(&json!({ "a": 1 }))));
        assert!(!is_filled_object(Some(&json!({}))));
        assert!(!is_filled_object(Some(&json!("errors"))));
        assert!(!is_filled_object(None));
    }
}
