//! Single-field validation failure records.

use crate::kind::FailureKind;
use crate::path::{lookup_path, lookup_path_in_map};
use serde_json::{Map, Value};

/// Error name the mapper uses for type-cast failures.
const CAST_ERROR_NAME: &str = "CastError";

/// Kind-specific data derived while normalizing a failure.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum KindDetail {
    /// No derived data.
    #[default]
    Plain,
    /// Type mismatch: lower-cased raw type token and its localized name.
    Type { type_token: String, type_name: String },
    /// Enumeration failure: the allowed values joined into one string.
    Enum { values_string: String },
    /// Duplicate-key failure recovered from the driver message.
    Unique {
        collection: String,
        index: String,
        direction: Option<String>,
    },
}

/// A leaf failure: one field, one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafFailure {
    /// Error family name reported by the mapper (`ValidatorError`, `CastError`, ...).
    pub name: Option<String>,
    pub kind: FailureKind,
    /// Kind token exactly as reported, before any remapping.
    pub raw_kind: String,
    pub path: String,
    pub message: Option<String>,
    pub value: Value,
    pub properties: Map<String, Value>,
    pub detail: KindDetail,
    /// Remaining top-level fields of the raw record.
    pub extra: Map<String, Value>,
}

impl LeafFailure {
    /// Read a leaf failure from a raw record. Returns `None` unless the record
    /// is an object carrying string `kind` and `path` fields.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let map = raw.as_object()?;
        let raw_kind = map.get("kind")?.as_str()?.to_string();
        let path = map.get("path")?.as_str()?.to_string();
        let name = map.get("name").and_then(Value::as_str).map(str::to_string);
        let message = map.get("message").and_then(Value::as_str).map(str::to_string);
        let value = map.get("value").cloned().unwrap_or(Value::Null);
        let properties = map
            .get("properties")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let extra = map
            .iter()
            .filter(|(key, _)| {
                !matches!(
                    key.as_str(),
                    "kind" | "path" | "name" | "message" | "value" | "properties"
                )
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            name,
            kind: FailureKind::parse(&raw_kind),
            raw_kind,
            path,
            message,
            value,
            properties,
            detail: KindDetail::Plain,
            extra,
        })
    }

    /// True when the mapper reported a type-cast failure.
    pub fn is_cast_failure(&self) -> bool {
        self.name.as_deref() == Some(CAST_ERROR_NAME)
    }

    /// Resolve a dotted lookup path against the normalized record.
    ///
    /// Known top-level fields are answered from the typed fields and the
    /// kind detail; anything else is looked up in `extra`. Missing values
    /// resolve to `None`.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        let owned = match (head, &self.detail) {
            ("kind", _) => Value::String(self.kind.as_str().to_string()),
            ("path", _) => Value::String(self.path.clone()),
            ("name", _) => Value::String(self.name.clone()?),
            ("message", _) => Value::String(self.message.clone()?),
            ("value", _) => return descend(&self.value, rest),
            ("type", KindDetail::Type { type_token, .. }) => Value::String(type_token.clone()),
            ("type_name", KindDetail::Type { type_name, .. }) => {
                Value::String(type_name.clone())
            }
            ("collection", KindDetail::Unique { collection, .. }) => {
                Value::String(collection.clone())
            }
            ("index", KindDetail::Unique { index, .. }) => Value::String(index.clone()),
            ("direction", KindDetail::Unique { direction, .. }) => {
                Value::String(direction.clone()?)
            }
            ("properties", KindDetail::Enum { values_string })
                if rest == Some("enumValuesString") =>
            {
                Value::String(values_string.clone())
            }
            ("properties", _) => {
                return match rest {
                    Some(rest) => lookup_path_in_map(&self.properties, rest).cloned(),
                    None => Some(Value::Object(self.properties.clone())),
                };
            }
            _ => return lookup_path_in_map(&self.extra, path).cloned(),
        };

        descend(&owned, rest)
    }
}

fn descend(value: &Value, rest: Option<&str>) -> Option<Value> {
    match rest {
        Some(rest) => lookup_path(value, rest).cloned(),
        None => Some(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn minlength() -> LeafFailure {
        LeafFailure::from_value(&json!({
            "name": "ValidatorError",
            "kind": "minlength",
            "path": "fullName",
            "value": "Bi",
            "message": "Path `fullName` is shorter than the minimum allowed length (3).",
            "properties": { "minlength": 3, "type": "minlength" },
            "reason": null,
        }))
        .expect("leaf")
    }

    #[test]
    fn reads_leaf_fields() {
        let failure = minlength();
        assert_eq!(failure.kind, FailureKind::MinLength);
        assert_eq!(failure.path, "fullName");
        assert_eq!(failure.value, json!("Bi"));
        assert!(failure.extra.contains_key("reason"));
        assert!(!failure.is_cast_failure());
    }

    #[test]
    fn rejects_records_without_kind_or_path() {
        assert!(LeafFailure::from_value(&json!({ "path": "a" })).is_none());
        assert!(LeafFailure::from_value(&json!({ "kind": "required" })).is_none());
        assert!(LeafFailure::from_value(&json!("required")).is_none());
    }

    #[test]
    fn lookup_resolves_typed_and_nested_fields() {
        let failure = minlength();
        assert_eq!(failure.lookup("kind"), Some(json!("minlength")));
        assert_eq!(failure.lookup("properties.minlength"), Some(json!(3)));
        assert_eq!(failure.lookup("properties.maxlength"), None);
        assert_eq!(failure.lookup("type_name"), None);
        assert_eq!(failure.lookup("reason"), Some(Value::Null));
    }

    #[test]
    fn lookup_reads_kind_detail() {
        let mut failure = minlength();
        failure.detail = KindDetail::Enum {
            values_string: "admin, normal".to_string(),
        };
        assert_eq!(
            failure.lookup("properties.enumValuesString"),
            Some(json!("admin, normal"))
        );

        failure.detail = KindDetail::Unique {
            collection: "test.Users".to_string(),
            index: "username_1".to_string(),
            direction: None,
        };
        assert_eq!(failure.lookup("collection"), Some(json!("test.Users")));
        assert_eq!(failure.lookup("direction"), None);
    }
}
