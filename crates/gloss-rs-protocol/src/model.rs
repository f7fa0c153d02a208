//! Model, schema, and document handles supplied by the document mapper.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declared schema of a model, keyed by field path.
///
/// Each node is an object of field options (`{ type, minlength, $name }`) or
/// a nested object of child fields. Arrays of sub-documents are described by
/// a one-element array holding the sub-document schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaDescriptor(Map<String, Value>);

impl SchemaDescriptor {
    /// Build a descriptor from a JSON object; `None` for any other value.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Schema node declared for a document path.
    ///
    /// Array levels are descended through their first element, so both
    /// `logs.time` and `logs.0.time` resolve to the same node.
    pub fn node(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            if let Value::Array(items) = current {
                current = items.first()?;
                if segment.parse::<usize>().is_ok() {
                    continue;
                }
            }
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Option `key` declared on the schema node at `path`.
    pub fn attribute(&self, path: &str, key: &str) -> Option<&Value> {
        let mut node = self.node(path)?;
        if let Value::Array(items) = node {
            node = items.first()?;
        }
        node.as_object()?.get(key)
    }
}

/// A model handle: a stable name plus a schema descriptor.
pub trait Model: Send + Sync {
    /// Declared model name.
    fn model_name(&self) -> Option<&str>;

    /// Backing collection name, used when the model has no name.
    fn collection_name(&self) -> Option<&str> {
        None
    }

    /// Schema descriptor; `None` means the handle is not a usable model.
    fn schema(&self) -> Option<&SchemaDescriptor>;
}

/// Resolve the name a model is known by: its own name, else its collection.
pub fn resolve_model_name(model: &dyn Model) -> Option<&str> {
    model
        .model_name()
        .filter(|name| !name.is_empty())
        .or_else(|| model.collection_name().filter(|name| !name.is_empty()))
}

/// Plain-data model handle, loadable from JSON/JSON5.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub schema: Option<SchemaDescriptor>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>, schema: SchemaDescriptor) -> Self {
        Self {
            name: Some(name.into()),
            collection: None,
            schema: Some(schema),
        }
    }

    /// Set the backing collection name.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }
}

impl Model for ModelDescriptor {
    fn model_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn collection_name(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    fn schema(&self) -> Option<&SchemaDescriptor> {
        self.schema.as_ref()
    }
}

/// Reference to a model either by handle or by name, for per-model settings.
#[derive(Clone, Copy)]
pub enum ModelRef<'a> {
    Name(&'a str),
    Model(&'a dyn Model),
}

impl<'a> ModelRef<'a> {
    /// Name the reference resolves to, if any.
    pub fn name(&self) -> Option<&'a str> {
        match self {
            Self::Name(name) => Some(*name).filter(|name| !name.is_empty()),
            Self::Model(model) => resolve_model_name(*model),
        }
    }
}

impl<'a> From<&'a str> for ModelRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for ModelRef<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name.as_str())
    }
}

impl<'a> From<&'a dyn Model> for ModelRef<'a> {
    fn from(model: &'a dyn Model) -> Self {
        Self::Model(model)
    }
}

impl<'a> From<&'a ModelDescriptor> for ModelRef<'a> {
    fn from(model: &'a ModelDescriptor) -> Self {
        Self::Model(model)
    }
}

/// A document that can validate itself against its model.
#[async_trait]
pub trait Document: Send + Sync {
    /// Model the document belongs to.
    fn model(&self) -> &dyn Model;

    /// Run the mapper's validation. `Err` carries the raw validation error.
    async fn validate(&self) -> Result<(), Value>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn users_schema() -> SchemaDescriptor {
        SchemaDescriptor::from_value(json!({
            "username": { "type": "String", "$name": "user name" },
            "logs": [{ "time": { "type": "Date", "$name": "access time" } }],
            "address": { "country": { "type": "String", "minlength": 2 } },
        }))
        .expect("schema")
    }

    #[test]
    fn attribute_resolves_nested_and_array_paths() {
        let schema = users_schema();
        assert_eq!(
            schema.attribute("username", "$name"),
            Some(&json!("user name"))
        );
        assert_eq!(
            schema.attribute("logs.0.time", "$name"),
            Some(&json!("access time"))
        );
        assert_eq!(
            schema.attribute("logs.time", "$name"),
            Some(&json!("access time"))
        );
        assert_eq!(
            schema.attribute("address.country", "minlength"),
            Some(&json!(2))
        );
        assert_eq!(schema.attribute("address.street", "$name"), None);
    }

    #[test]
    fn model_name_falls_back_to_collection() {
        let model = ModelDescriptor {
            name: Some(String::new()),
            collection: Some("users".to_string()),
            schema: Some(users_schema()),
        };
        assert_eq!(resolve_model_name(&model), Some("users"));
        assert_eq!(ModelRef::from(&model).name(), Some("users"));
        assert_eq!(ModelRef::from("").name(), None);
    }
}
