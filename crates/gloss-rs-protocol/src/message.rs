//! Rendered messages, per-call options, and the composite friendly error.

use crate::path::lookup_path_in_map;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Flat record of named values substituted into a message template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorContext(Map<String, Value>);

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a dotted path, e.g. `enum_values.0`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        lookup_path_in_map(&self.0, path)
    }

    /// Overlay another context; its values win on key collision.
    pub fn extend(&mut self, other: ErrorContext) {
        for (key, value) in other.0 {
            self.0.insert(key, value);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ErrorContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One rendered per-field message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub message: String,
    pub context: ErrorContext,
    pub template: String,
}

/// Kinds to exclude, given either as one kind or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExcludeErrors {
    One(String),
    Many(Vec<String>),
}

impl ExcludeErrors {
    /// Normalize to a list; a scalar becomes a one-element list.
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::One(kind) => vec![kind],
            Self::Many(kinds) => kinds,
        }
    }
}

/// Per-call options for handling a validation error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandleOptions {
    /// Template package; falls back to the configured default package.
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub exclude_errors: Option<ExcludeErrors>,
}

impl HandleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render with the given package.
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Exclude one more kind from the result.
    pub fn exclude(mut self, kind: impl Into<String>) -> Self {
        let mut kinds = self
            .exclude_errors
            .take()
            .map(ExcludeErrors::into_list)
            .unwrap_or_default();
        kinds.push(kind.into());
        self.exclude_errors = Some(ExcludeErrors::Many(kinds));
        self
    }
}

/// Per-call options after merging over configured defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOptions {
    pub package: String,
    pub exclude_errors: Vec<String>,
}

impl ResolvedOptions {
    pub fn excludes(&self, kind: &str) -> bool {
        self.exclude_errors.iter().any(|excluded| excluded == kind)
    }
}

/// Aggregated, user-presentable validation error.
///
/// Serializes to a flat object: `message`, `messages`, `model_name`,
/// `options`, the per-field details under the configured field name, the
/// original error under its configured field name, and every additional
/// configured field.
#[derive(Debug, Clone, PartialEq)]
pub struct FriendlyError {
    pub message: String,
    pub messages: Vec<String>,
    pub model_name: String,
    pub options: ResolvedOptions,
    /// Per-field details, attached under `errors_field` when it is set.
    pub errors: Vec<RenderedMessage>,
    pub errors_field: Option<String>,
    /// Caller's original error, attached under `origin_field` when it is set.
    pub origin: Option<Value>,
    pub origin_field: Option<String>,
    pub additional_fields: Map<String, Value>,
}

impl FriendlyError {
    /// Serialize into a JSON object.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for FriendlyError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &self.additional_fields {
            if matches!(key.as_str(), "message" | "messages" | "model_name" | "options") {
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("messages", &self.messages)?;
        map.serialize_entry("model_name", &self.model_name)?;
        map.serialize_entry("options", &self.options)?;
        if let Some(field) = &self.errors_field {
            map.serialize_entry(field, &self.errors)?;
        }
        if let (Some(field), Some(origin)) = (&self.origin_field, &self.origin) {
            map.serialize_entry(field, origin)?;
        }
        map.end()
    }
}

impl fmt::Display for FriendlyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FriendlyError {}

/// Result of handling a validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// At least one failure was rendered.
    Friendly(FriendlyError),
    /// Nothing to report: the document was valid or every failure was excluded.
    NoError,
    /// The failure shape was not recognized; the original input, untouched.
    Unhandled(Value),
}

impl Outcome {
    pub fn friendly(&self) -> Option<&FriendlyError> {
        match self {
            Self::Friendly(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_friendly(self) -> Option<FriendlyError> {
        match self {
            Self::Friendly(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_no_error(&self) -> bool {
        matches!(self, Self::NoError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn exclude_accepts_scalar_or_list() {
        let scalar: HandleOptions =
            serde_json::from_value(json!({ "exclude_errors": "required" })).expect("options");
        assert_eq!(
            scalar.exclude_errors.map(ExcludeErrors::into_list),
            Some(vec!["required".to_string()])
        );

        let options = HandleOptions::new().exclude("required").exclude("enum");
        assert_eq!(
            options.exclude_errors.map(ExcludeErrors::into_list),
            Some(vec!["required".to_string(), "enum".to_string()])
        );
    }

    #[test]
    fn friendly_error_serializes_flat() {
        let mut additional = Map::new();
        additional.insert("name".to_string(), json!("ValidationError"));
        additional.insert("message".to_string(), json!("shadowed"));
        let error = FriendlyError {
            message: "Username is required".to_string(),
            messages: vec!["Username is required".to_string()],
            model_name: "Users".to_string(),
            options: ResolvedOptions {
                package: "DEFAULT".to_string(),
                exclude_errors: Vec::new(),
            },
            errors: Vec::new(),
            errors_field: Some("details".to_string()),
            origin: Some(json!({ "name": "ValidationError" })),
            origin_field: None,
            additional_fields: additional,
        };

        let value = error.to_value();
        assert_eq!(value["name"], json!("ValidationError"));
        assert_eq!(value["message"], json!("Username is required"));
        assert_eq!(value["details"], json!([]));
        assert!(value.get("origin").is_none());
        assert_eq!(error.to_string(), "Username is required");
    }
}
