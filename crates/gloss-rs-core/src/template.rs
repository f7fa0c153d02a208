//! Placeholder substitution and its structural inverse.
//!
//! Templates carry `{name}` placeholders that resolve against a flat record,
//! with dotted names (`{enum_values.0}`) walking into nested values. There is
//! no escaping: a literal brace pair around text is always a placeholder.

use gloss_rs_protocol::lookup_path_in_map;
use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Placeholder used by `compile`: any run of characters without braces.
static PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").ok());

/// Placeholder used by `decompile`: names never contain whitespace.
static DECOMPILE_PLACEHOLDER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{([^\s{}]+)\}").ok());

/// Marker substituted for fixed segments while decompiling.
const SENTINEL: &str = "~$~";

/// Substitute every placeholder with the value found at its dotted path.
///
/// Missing and `null` values render as an empty string. Arrays render as
/// their items joined with `,`.
pub fn compile(template: &str, data: &Map<String, Value>) -> String {
    let Some(regex) = PLACEHOLDER.as_ref() else {
        return template.to_string();
    };
    regex
        .replace_all(template, |caps: &Captures<'_>| {
            let key = caps.get(1).map_or("", |name| name.as_str().trim());
            lookup_path_in_map(data, key)
                .map(render_value)
                .unwrap_or_default()
        })
        .into_owned()
}

/// Recover placeholder values from a string produced by `compile`.
///
/// Each non-empty fixed segment of the template replaces its first
/// occurrence in `input`, so this only works when no captured value contains
/// a fixed segment and the segments appear in template order. It is a
/// targeted parser for fixed-format driver messages such as the duplicate-key
/// error, not a general template inverter. Placeholders without a captured
/// value are left out of the result.
pub fn decompile(template: &str, input: &str) -> HashMap<String, String> {
    let Some(regex) = DECOMPILE_PLACEHOLDER.as_ref() else {
        return HashMap::new();
    };

    let mut keys = Vec::new();
    let skeleton = regex.replace_all(template, |caps: &Captures<'_>| {
        keys.push(caps.get(1).map_or("", |name| name.as_str().trim()).to_string());
        SENTINEL
    });

    let mut remaining = input.to_string();
    for fixed in skeleton.split(SENTINEL).filter(|fixed| !fixed.is_empty()) {
        remaining = remaining.replacen(fixed, SENTINEL, 1);
    }

    let mut values: Vec<&str> = remaining.split(SENTINEL).collect();
    if values.len() > keys.len() && values.first() == Some(&"") {
        values.remove(0);
    }
    if values.len() > keys.len() && values.last() == Some(&"") {
        values.pop();
    }

    keys.into_iter()
        .zip(values)
        .map(|(key, value)| (key, value.to_string()))
        .collect()
}

/// Text form of a context value as it appears inside a message.
fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const DUP_KEY: &str =
        "E11000 duplicate key error collection: {collection} index: {index} dup key: { : {value} }";

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn compile_substitutes_and_blanks_missing() {
        let context = data(json!({
            "path_name": "birthday",
            "type_name": "date",
            "min": 3,
            "enum_values": ["admin", "normal"],
            "nothing": null,
        }));
        assert_eq!(
            compile("{path_name} must be a {type_name}", &context),
            "birthday must be a date"
        );
        assert_eq!(
            compile("{ path_name }/{path_name}: {min}{missing}{nothing}", &context),
            "birthday/birthday: 3"
        );
        assert_eq!(
            compile("one of {enum_values} (first {enum_values.0})", &context),
            "one of admin,normal (first admin)"
        );
    }

    #[test]
    fn compile_leaves_text_without_placeholders() {
        let context = Map::new();
        assert_eq!(compile("no placeholders {}", &context), "no placeholders {}");
        assert_eq!(compile("", &context), "");
    }

    #[test]
    fn decompile_reads_duplicate_key_message() {
        let fields = decompile(
            DUP_KEY,
            r#"E11000 duplicate key error collection: test.Users index: username_1 dup key: { : "bob" }"#,
        );
        assert_eq!(fields.get("collection").map(String::as_str), Some("test.Users"));
        assert_eq!(fields.get("index").map(String::as_str), Some("username_1"));
        assert_eq!(fields.get("value").map(String::as_str), Some(r#""bob""#));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn decompile_splits_index_string() {
        let fields = decompile("{path}_{direction}", "username_1");
        assert_eq!(fields.get("path").map(String::as_str), Some("username"));
        assert_eq!(fields.get("direction").map(String::as_str), Some("1"));
    }

    #[test]
    fn decompile_inverts_compile_for_duplicate_key_template() {
        for (collection, index, value) in [
            ("test.Users", "username_1", "bob"),
            ("shop.orders", "code_-1", "1000"),
            ("a.b", "_id_", "\"5c1b\""),
        ] {
            let context = data(json!({
                "collection": collection,
                "index": index,
                "value": value,
            }));
            let message = compile(DUP_KEY, &context);
            let fields = decompile(DUP_KEY, &message);
            assert_eq!(fields.get("collection").map(String::as_str), Some(collection));
            assert_eq!(fields.get("index").map(String::as_str), Some(index));
            assert_eq!(fields.get("value").map(String::as_str), Some(value));
        }
    }

    #[test]
    fn decompile_of_unrelated_text_yields_partial_fields() {
        let fields = decompile(DUP_KEY, "connection refused");
        assert!(fields.get("index").is_none());
    }
}
