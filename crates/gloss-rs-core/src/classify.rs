//! Failure shape detection and per-call option resolution.

use crate::error::GlossError;
use crate::template::{compile, decompile};
use gloss_rs_config::GlossOptions;
use gloss_rs_protocol::{
    ExcludeErrors, HandleOptions, Model, ResolvedOptions, SchemaDescriptor, is_filled_object,
    resolve_model_name,
};
use log::debug;
use serde_json::{Map, Value};

/// Field of an aggregate failure holding the per-path sub-failures.
pub const SUB_FAILURES_FIELD: &str = "errors";

/// Fixed message format of a duplicate-key violation.
pub const DUPLICATE_KEY_TEMPLATE: &str =
    "E11000 duplicate key error collection: {collection} index: {index} dup key: { : {value} }";

/// Layout of the index name inside a duplicate-key message.
pub const INDEX_TEMPLATE: &str = "{path}_{direction}";

/// Error family names the driver uses for server-side failures.
const DRIVER_ERROR_NAMES: &[&str] = &["MongoError", "MongoServerError"];

/// Driver error code for a duplicate-key violation.
const DUPLICATE_KEY_CODE: i64 = 11000;

/// Shape of a raw validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureShape {
    /// Aggregate failure: sub-failures in declaration order, keyed by path.
    Multi(Vec<(String, Value)>),
    /// One leaf failure, possibly rebuilt from a duplicate-key message.
    Single(Value),
    /// Neither shape; the caller gets the original error back.
    Unsupported,
}

/// A classified error together with the model facts the pipeline needs.
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub model_name: &'a str,
    pub schema: &'a SchemaDescriptor,
    pub shape: FailureShape,
}

/// Resolve the name and schema of a model, or reject the handle.
pub fn check_model(model: &dyn Model) -> Result<(&str, &SchemaDescriptor), GlossError> {
    let Some(schema) = model.schema() else {
        return Err(GlossError::UnsupportedModel(
            "model has no schema descriptor".to_string(),
        ));
    };
    let Some(name) = resolve_model_name(model) else {
        return Err(GlossError::UnsupportedModel(
            "model has neither a name nor a collection name".to_string(),
        ));
    };
    Ok((name, schema))
}

/// Classify a raw validation error raised for `model`.
pub fn classify<'a>(model: &'a dyn Model, raw: &Value) -> Result<Classified<'a>, GlossError> {
    let (model_name, schema) = check_model(model)?;
    let shape = match parse_duplicate_key(raw) {
        Some(leaf) => {
            debug!("duplicate-key failure recovered (model={model_name})");
            FailureShape::Single(leaf)
        }
        None => detect_shape(raw),
    };
    Ok(Classified {
        model_name,
        schema,
        shape,
    })
}

/// Merge per-call options over the configured defaults.
pub fn resolve_options(options: &HandleOptions, config: &GlossOptions) -> ResolvedOptions {
    let package = options
        .package
        .as_deref()
        .filter(|package| !package.is_empty())
        .unwrap_or(config.default_package.as_str())
        .to_string();
    let exclude_errors = options
        .exclude_errors
        .clone()
        .map(ExcludeErrors::into_list)
        .unwrap_or_default();
    ResolvedOptions {
        package,
        exclude_errors,
    }
}

fn detect_shape(raw: &Value) -> FailureShape {
    let sub_failures = raw.get(SUB_FAILURES_FIELD);
    let is_aggregate = is_filled_object(sub_failures);
    let is_leaf = has_leaf_identity(raw);

    match (is_aggregate, is_leaf, sub_failures.and_then(Value::as_object)) {
        (true, false, Some(entries)) => FailureShape::Multi(
            entries
                .iter()
                .map(|(path, failure)| (path.clone(), failure.clone()))
                .collect(),
        ),
        (false, true, _) => FailureShape::Single(raw.clone()),
        _ => FailureShape::Unsupported,
    }
}

fn has_leaf_identity(raw: &Value) -> bool {
    raw.get("kind").is_some_and(Value::is_string) && raw.get("path").is_some_and(Value::is_string)
}

/// Rebuild a duplicate-key driver error as a `unique` leaf failure.
///
/// Returns `None` unless the error carries the driver marker and its message
/// matches the fixed duplicate-key format.
fn parse_duplicate_key(raw: &Value) -> Option<Value> {
    let map = raw.as_object()?;
    let name = map.get("name")?.as_str()?;
    if !DRIVER_ERROR_NAMES.contains(&name) {
        return None;
    }
    if map.get("code")?.as_i64()? != DUPLICATE_KEY_CODE {
        return None;
    }
    let message = map
        .get("message")
        .or_else(|| map.get("errmsg"))?
        .as_str()?;

    let fields = decompile(DUPLICATE_KEY_TEMPLATE, message);
    let (Some(collection), Some(index), Some(value)) = (
        fields.get("collection"),
        fields.get("index"),
        fields.get("value"),
    ) else {
        debug!("duplicate-key message not recognized (message={message})");
        return None;
    };
    let recovered: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.clone(), Value::from(value.as_str())))
        .collect();
    if compile(DUPLICATE_KEY_TEMPLATE, &recovered) != message {
        debug!("duplicate-key message does not match the fixed format (message={message})");
        return None;
    }
    let value = strip_quotes(value);
    let (path, direction) = split_index(index)?;

    let mut leaf: Map<String, Value> = map.clone();
    leaf.insert("kind".to_string(), Value::from("unique"));
    leaf.insert("path".to_string(), Value::from(path));
    leaf.insert("value".to_string(), Value::from(value));
    leaf.insert("collection".to_string(), Value::from(collection.as_str()));
    leaf.insert("index".to_string(), Value::from(index.as_str()));
    if let Some(direction) = direction {
        leaf.insert("direction".to_string(), Value::from(direction));
    }
    Some(Value::Object(leaf))
}

/// Split an index name into its path and direction.
///
/// Indexes without a direction suffix (`_id_`) keep the whole name minus
/// the trailing `_` as the path.
fn split_index(index: &str) -> Option<(String, Option<String>)> {
    let parts = decompile(INDEX_TEMPLATE, index);
    if let Some(path) = parts.get("path").filter(|path| !path.is_empty()) {
        return Some((path.clone(), parts.get("direction").cloned()));
    }
    let path = index.strip_suffix('_').unwrap_or(index);
    if path.is_empty() {
        return None;
    }
    Some((path.to_string(), None))
}

fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}
