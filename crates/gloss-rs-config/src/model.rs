//! Configuration schema for gloss.

use crate::defaults::{DEFAULT_KEY, DEFAULT_PACKAGE};
use gloss_rs_protocol::lookup_path_in_map;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Process-wide rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossOptions {
    /// Template key used when a package has no template for a kind.
    #[serde(default = "default_key")]
    pub default_key: String,
    /// Package used when a call does not name one.
    #[serde(default = "default_package")]
    pub default_package: String,
    /// Join string for the composite message.
    #[serde(default = "default_msg_delimiter")]
    pub msg_delimiter: String,
    /// Schema option holding a field's inline display name.
    #[serde(default = "default_path_name_key")]
    pub path_name_key: String,
    /// Capitalize the first ASCII letter of each rendered message.
    #[serde(default = "default_upper_first")]
    pub upper_first: bool,
    /// Field of the composite error carrying per-field details; `None` disables.
    #[serde(default = "default_link_to_errors")]
    pub link_to_errors: Option<String>,
    /// Field of the composite error carrying the original error; `None` disables.
    #[serde(default)]
    pub link_to_origin_error: Option<String>,
    /// Static fields merged into every composite error.
    #[serde(default = "default_additional_error_fields")]
    pub additional_error_fields: Map<String, Value>,
    /// Context field name -> schema option pulled in at render time.
    #[serde(default)]
    pub additional_context_fields: BTreeMap<String, String>,
}

impl Default for GlossOptions {
    fn default() -> Self {
        Self {
            default_key: default_key(),
            default_package: default_package(),
            msg_delimiter: default_msg_delimiter(),
            path_name_key: default_path_name_key(),
            upper_first: default_upper_first(),
            link_to_errors: default_link_to_errors(),
            link_to_origin_error: None,
            additional_error_fields: default_additional_error_fields(),
            additional_context_fields: BTreeMap::new(),
        }
    }
}

fn default_key() -> String {
    DEFAULT_KEY.to_string()
}

fn default_package() -> String {
    DEFAULT_PACKAGE.to_string()
}

fn default_msg_delimiter() -> String {
    ", ".to_string()
}

fn default_path_name_key() -> String {
    "$name".to_string()
}

fn default_upper_first() -> bool {
    true
}

fn default_link_to_errors() -> Option<String> {
    Some("errors".to_string())
}

fn default_additional_error_fields() -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("name".to_string(), Value::from("ValidationError"));
    fields.insert("code".to_string(), Value::from("ERR_DOCUMENT_VALIDATION"));
    fields
}

/// Message templates of one package, keyed by failure kind.
///
/// Must hold a [`DEFAULT_KEY`] entry to cover kinds without a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateSet(BTreeMap<String, String>);

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the template for a kind.
    pub fn with(mut self, kind: impl Into<String>, template: impl Into<String>) -> Self {
        self.0.insert(kind.into(), template.into());
        self
    }

    pub fn insert(&mut self, kind: impl Into<String>, template: impl Into<String>) {
        self.0.insert(kind.into(), template.into());
    }

    pub fn get(&self, kind: &str) -> Option<&str> {
        self.0.get(kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(kind, template)| (kind.into(), template.into()))
                .collect(),
        )
    }
}

/// Raw type identifier -> localized type name, for type-mismatch messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeNames(BTreeMap<String, String>);

impl TypeNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, type_token: impl Into<String>, name: impl Into<String>) -> Self {
        self.0.insert(type_token.into(), name.into());
        self
    }

    pub fn get(&self, type_token: &str) -> Option<&str> {
        self.0.get(type_token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TypeNames {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(token, name)| (token.into(), name.into()))
                .collect(),
        )
    }
}

/// Field path -> localized display name for one model and package.
///
/// Values may nest to mirror the document (`address: { country: "Country" }`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathNames(Map<String, Value>);

impl PathNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, name: impl Into<String>) -> Self {
        self.0.insert(path.into(), Value::String(name.into()));
        self
    }

    /// Build from a JSON object; `None` for any other value.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Display name for a path: exact dotted key first, then the nested tree.
    /// Empty names do not count.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.0
            .get(path)
            .or_else(|| lookup_path_in_map(&self.0, path))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Context field name -> dotted lookup path into the failure record.
pub type ContextFieldMap = BTreeMap<String, String>;

/// Context-field maps keyed by failure kind, plus the shared `base` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorContextMap(BTreeMap<String, ContextFieldMap>);

impl ErrorContextMap {
    /// Key of the entry applied to every failure.
    pub const BASE: &'static str = "base";

    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one field of a kind's map.
    pub fn with(
        mut self,
        kind: impl Into<String>,
        field: impl Into<String>,
        lookup: impl Into<String>,
    ) -> Self {
        self.0
            .entry(kind.into())
            .or_default()
            .insert(field.into(), lookup.into());
        self
    }

    pub fn get(&self, kind: &str) -> Option<&ContextFieldMap> {
        self.0.get(kind)
    }

    /// Replace one kind's map wholesale.
    pub fn set(&mut self, kind: impl Into<String>, fields: ContextFieldMap) {
        self.0.insert(kind.into(), fields);
    }

    /// Merge another map field-by-field; its fields win.
    pub fn merge(&mut self, other: ErrorContextMap) {
        for (kind, fields) in other.0 {
            self.0.entry(kind).or_default().extend(fields);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Templates and type names shipped together for one language/locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageConfig {
    #[serde(default)]
    pub templates: Option<TemplateSet>,
    #[serde(default)]
    pub type_names: Option<TypeNames>,
}

/// Root of a gloss config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlossConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub options: GlossOptions,
    #[serde(default)]
    pub packages: BTreeMap<String, PackageConfig>,
    /// Model name -> package -> path names.
    #[serde(default)]
    pub path_names: BTreeMap<String, BTreeMap<String, PathNames>>,
    #[serde(default)]
    pub error_contexts: ErrorContextMap,
}
