//! Kind normalization and per-failure context building.

use gloss_rs_config::{ErrorContextMap, GlossOptions, PathNames, TypeNames};
use gloss_rs_protocol::{ErrorContext, FailureKind, KindDetail, LeafFailure, SchemaDescriptor};
use log::debug;
use serde_json::Value;

/// Context field holding the resolved display name.
pub const PATH_NAME_FIELD: &str = "path_name";

/// Everything context building reads for one failure.
#[derive(Debug, Clone, Copy)]
pub struct ContextSources<'a> {
    pub schema: &'a SchemaDescriptor,
    pub path_names: Option<&'a PathNames>,
    pub contexts: &'a ErrorContextMap,
    pub options: &'a GlossOptions,
}

/// Apply kind-specific rewrites to a leaf failure.
///
/// Cast failures become `type` failures carrying the lower-cased type token
/// and its localized name. Enumeration failures gain their allowed values as
/// one delimited string. Duplicate-key fields move into the kind detail.
pub fn normalize(
    mut failure: LeafFailure,
    type_names: Option<&TypeNames>,
    options: &GlossOptions,
) -> LeafFailure {
    if failure.is_cast_failure() {
        let type_token = failure.raw_kind.to_lowercase();
        let type_name = type_names
            .and_then(|names| names.get(&type_token))
            .unwrap_or(&type_token)
            .to_string();
        debug!(
            "cast failure normalized (path={}, type={})",
            failure.path, type_token
        );
        failure.kind = FailureKind::Type;
        failure.detail = KindDetail::Type {
            type_token,
            type_name,
        };
        return failure;
    }

    match failure.kind {
        FailureKind::Enum => {
            let values_string = failure
                .properties
                .get("enumValues")
                .and_then(Value::as_array)
                .map(|values| {
                    values
                        .iter()
                        .map(|value| match value {
                            Value::String(text) => text.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(&options.msg_delimiter)
                })
                .unwrap_or_default();
            failure.detail = KindDetail::Enum { values_string };
        }
        FailureKind::Unique => {
            let take = |failure: &mut LeafFailure, key: &str| {
                failure
                    .extra
                    .remove(key)
                    .and_then(|value| value.as_str().map(str::to_string))
            };
            let collection = take(&mut failure, "collection").unwrap_or_default();
            let index = take(&mut failure, "index").unwrap_or_default();
            let direction = take(&mut failure, "direction");
            failure.detail = KindDetail::Unique {
                collection,
                index,
                direction,
            };
        }
        _ => {}
    }
    failure
}

/// Display name for a path: path-name map, then the schema option, then the path.
pub fn resolve_display_name(
    path: &str,
    schema: &SchemaDescriptor,
    path_names: Option<&PathNames>,
    path_name_key: &str,
) -> String {
    if let Some(name) = path_names.and_then(|names| names.resolve(path)) {
        return name.to_string();
    }
    schema
        .attribute(path, path_name_key)
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(path)
        .to_string()
}

/// Build the flat context a message template renders against.
///
/// The `base` fields come first, the kind's fields override them, the
/// display name is set last, and configured schema options are pulled in
/// after that. Lookups that find nothing are left out.
pub fn build_context(failure: &LeafFailure, sources: ContextSources<'_>) -> ErrorContext {
    let mut context = extract(failure, sources.contexts, ErrorContextMap::BASE);
    context.extend(extract(failure, sources.contexts, failure.kind.as_str()));

    let display_name = resolve_display_name(
        &failure.path,
        sources.schema,
        sources.path_names,
        &sources.options.path_name_key,
    );
    context.insert(PATH_NAME_FIELD, Value::String(display_name));

    for (context_field, schema_field) in &sources.options.additional_context_fields {
        if let Some(value) = sources.schema.attribute(&failure.path, schema_field) {
            context.insert(context_field.clone(), value.clone());
        }
    }
    context
}

fn extract(failure: &LeafFailure, contexts: &ErrorContextMap, kind: &str) -> ErrorContext {
    let mut context = ErrorContext::new();
    let Some(fields) = contexts.get(kind) else {
        return context;
    };
    for (field, lookup) in fields {
        if let Some(value) = failure.lookup(lookup) {
            context.insert(field.clone(), value);
        }
    }
    context
}
