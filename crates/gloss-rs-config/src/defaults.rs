//! Built-in templates, type names, and context-field maps.

use crate::model::{ErrorContextMap, TemplateSet, TypeNames};

/// Package name used when neither the call nor the options pick one.
pub const DEFAULT_PACKAGE: &str = "DEFAULT";
/// Template key used when a kind has no template of its own.
pub(crate) const DEFAULT_KEY: &str = "DEFAULT";

/// English templates for the built-in package.
pub fn default_message_templates() -> TemplateSet {
    TemplateSet::new()
        .with(DEFAULT_KEY, "Invalid {path_name}")
        .with("type", "{path_name} must be a {type_name}")
        .with("required", "{path_name} is required")
        .with("min", "{path_name} must not be less than {min}")
        .with("max", "{path_name} must not be greater than {max}")
        .with(
            "minlength",
            "{path_name} must be at least {min_length} characters long",
        )
        .with(
            "maxlength",
            "{path_name} must be at most {max_length} characters long",
        )
        .with(
            "enum",
            "{path_name} must be one of the following: {enum_values_string}",
        )
        .with("regexp", "Invalid {path_name}")
        .with(
            "unique",
            "{path_name} {value} has already been used, please choose another",
        )
}

/// English type names for the built-in package.
pub fn default_type_names() -> TypeNames {
    TypeNames::new()
        .with("number", "number")
        .with("boolean", "boolean")
        .with("date", "date")
        .with("string", "string")
        .with("array", "array")
        .with("object", "object")
        .with("buffer", "buffer")
        .with("objectid", "identifier")
}

/// Context-field maps for every kind the mapper reports.
pub fn default_error_contexts() -> ErrorContextMap {
    ErrorContextMap::new()
        .with(ErrorContextMap::BASE, "kind", "kind")
        .with(ErrorContextMap::BASE, "path", "path")
        .with("type", "type", "type")
        .with("type", "type_name", "type_name")
        .with("type", "value", "value")
        .with("type", "string_value", "stringValue")
        .with("min", "value", "value")
        .with("min", "min", "properties.min")
        .with("max", "value", "value")
        .with("max", "max", "properties.max")
        .with("minlength", "value", "value")
        .with("minlength", "min_length", "properties.minlength")
        .with("maxlength", "value", "value")
        .with("maxlength", "max_length", "properties.maxlength")
        .with("regexp", "value", "value")
        .with("enum", "value", "value")
        .with("enum", "enum_values", "properties.enumValues")
        .with("enum", "enum_values_string", "properties.enumValuesString")
        .with("unique", "value", "value")
        .with("unique", "collection", "collection")
        .with("unique", "index", "index")
        .with("unique", "direction", "direction")
        .with("validate", "value", "value")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_package_has_fallback_template() {
        let templates = default_message_templates();
        assert!(templates.get(DEFAULT_KEY).is_some());
        assert!(templates.get("unique").is_some());
    }

    #[test]
    fn default_contexts_include_base() {
        let contexts = default_error_contexts();
        let base = contexts.get(ErrorContextMap::BASE).expect("base");
        assert!(base.contains_key("kind"));
        assert!(base.contains_key("path"));
    }
}
