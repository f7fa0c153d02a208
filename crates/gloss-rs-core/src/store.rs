//! Shared configuration store for templates, names, and context maps.

use crate::error::GlossError;
use gloss_rs_config::{
    ContextFieldMap, ErrorContextMap, GlossConfig, GlossOptions, PathNames, TemplateSet,
    TypeNames, default_error_contexts, default_message_templates, default_type_names,
};
use gloss_rs_protocol::{ModelRef, is_filled_object};
use log::{debug, info, warn};
use parking_lot::{RwLock, RwLockReadGuard};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Everything a render reads, guarded as one unit.
#[derive(Debug, Clone)]
pub(crate) struct StoreState {
    pub(crate) options: GlossOptions,
    /// Package -> templates.
    templates: BTreeMap<String, TemplateSet>,
    /// Package -> type names.
    type_names: BTreeMap<String, TypeNames>,
    /// Model -> package -> path names.
    path_names: BTreeMap<String, BTreeMap<String, PathNames>>,
    pub(crate) contexts: ErrorContextMap,
}

impl StoreState {
    fn with_defaults() -> Self {
        let options = GlossOptions::default();
        let mut templates = BTreeMap::new();
        templates.insert(options.default_package.clone(), default_message_templates());
        let mut type_names = BTreeMap::new();
        type_names.insert(options.default_package.clone(), default_type_names());
        Self {
            options,
            templates,
            type_names,
            path_names: BTreeMap::new(),
            contexts: default_error_contexts(),
        }
    }

    pub(crate) fn templates(&self, package: &str) -> Option<&TemplateSet> {
        self.templates.get(package)
    }

    pub(crate) fn type_names(&self, package: &str) -> Option<&TypeNames> {
        self.type_names.get(package)
    }

    pub(crate) fn path_names(&self, model: &str, package: &str) -> Option<&PathNames> {
        self.path_names.get(model)?.get(package)
    }

    /// Package named by the caller, or the configured default.
    fn package_or_default(&self, package: Option<&str>) -> Result<String, GlossError> {
        match package {
            Some("") => Err(GlossError::InvalidArgument(
                "package name must not be empty".to_string(),
            )),
            Some(package) => Ok(package.to_string()),
            None => Ok(self.options.default_package.clone()),
        }
    }

    fn lookup_package(&self, package: Option<&str>) -> String {
        package
            .filter(|package| !package.is_empty())
            .unwrap_or(self.options.default_package.as_str())
            .to_string()
    }
}

/// Cheaply clonable handle to the process-wide gloss configuration.
///
/// Setters validate their arguments and replace or merge under a write lock.
/// Getters return owned copies, so callers can never mutate shared state.
#[derive(Clone)]
pub struct ConfigStore {
    state: Arc<RwLock<StoreState>>,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ConfigStore {
    /// Store seeded with the built-in options, English package, and context maps.
    pub fn with_defaults() -> Self {
        Self {
            state: Arc::new(RwLock::new(StoreState::with_defaults())),
        }
    }

    /// Store seeded with the built-in defaults and then a loaded config.
    ///
    /// Packages replace per package, path names replace per model and
    /// package, and error contexts merge field by field.
    pub fn from_config(config: GlossConfig) -> Result<Self, GlossError> {
        config.validate()?;
        let store = Self::with_defaults();
        store.configure(config.options)?;
        for (package, entry) in config.packages {
            if let Some(templates) = entry.templates {
                store.set_message_templates(templates, Some(&package))?;
            }
            if let Some(type_names) = entry.type_names {
                store.set_type_names(type_names, Some(&package))?;
            }
        }
        for (model, packages) in config.path_names {
            for (package, names) in packages {
                store.set_path_names(ModelRef::Name(&model), names, Some(&package))?;
            }
        }
        if !config.error_contexts.is_empty() {
            store.merge_error_contexts(config.error_contexts)?;
        }
        {
            let state = store.state.read();
            info!(
                "config store loaded (packages={}, models={})",
                state.templates.len(),
                state.path_names.len()
            );
        }
        Ok(store)
    }

    /// Read guard held for the duration of one aggregation.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read()
    }

    /// Recursively merge a partial options object into the current options.
    pub fn set_config(&self, patch: &Value) -> Result<(), GlossError> {
        if !is_filled_object(Some(patch)) {
            return Err(GlossError::InvalidArgument(format!(
                "options patch must be a non-empty object, got {patch}"
            )));
        }
        let mut state = self.state.write();
        state.options = state.options.patched(patch)?;
        info!("options updated (keys={})", patch_keys(patch));
        Ok(())
    }

    /// Replace the options wholesale.
    pub fn configure(&self, options: GlossOptions) -> Result<(), GlossError> {
        options.validate()?;
        self.state.write().options = options;
        info!("options replaced");
        Ok(())
    }

    /// Copy of the current options.
    pub fn config(&self) -> GlossOptions {
        self.state.read().options.clone()
    }

    /// Replace the template set of a package (default package when `None`).
    pub fn set_message_templates(
        &self,
        templates: TemplateSet,
        package: Option<&str>,
    ) -> Result<(), GlossError> {
        if templates.is_empty() {
            return Err(GlossError::InvalidArgument(
                "message templates must not be empty".to_string(),
            ));
        }
        let mut state = self.state.write();
        let package = state.package_or_default(package)?;
        if templates.get(&state.options.default_key).is_none() {
            warn!(
                "template set has no fallback template (package={}, default_key={})",
                package, state.options.default_key
            );
        }
        debug!(
            "message templates set (package={}, count={})",
            package,
            templates.len()
        );
        state.templates.insert(package, templates);
        Ok(())
    }

    /// Templates of a package (default package when `None`).
    pub fn message_templates(&self, package: Option<&str>) -> Option<TemplateSet> {
        let state = self.state.read();
        let package = state.lookup_package(package);
        state.templates.get(&package).cloned()
    }

    /// Templates of every package.
    pub fn all_message_templates(&self) -> BTreeMap<String, TemplateSet> {
        self.state.read().templates.clone()
    }

    /// Replace the type names of a package (default package when `None`).
    pub fn set_type_names(
        &self,
        type_names: TypeNames,
        package: Option<&str>,
    ) -> Result<(), GlossError> {
        if type_names.is_empty() {
            return Err(GlossError::InvalidArgument(
                "type names must not be empty".to_string(),
            ));
        }
        let mut state = self.state.write();
        let package = state.package_or_default(package)?;
        debug!(
            "type names set (package={}, count={})",
            package,
            type_names.len()
        );
        state.type_names.insert(package, type_names);
        Ok(())
    }

    /// Type names of a package (default package when `None`).
    pub fn type_names(&self, package: Option<&str>) -> Option<TypeNames> {
        let state = self.state.read();
        let package = state.lookup_package(package);
        state.type_names.get(&package).cloned()
    }

    /// Type names of every package.
    pub fn all_type_names(&self) -> BTreeMap<String, TypeNames> {
        self.state.read().type_names.clone()
    }

    /// Replace the path names of a model for a package (default package when `None`).
    pub fn set_path_names<'a>(
        &self,
        model: impl Into<ModelRef<'a>>,
        names: PathNames,
        package: Option<&str>,
    ) -> Result<(), GlossError> {
        let model = model.into();
        let Some(model_name) = model.name() else {
            return Err(GlossError::InvalidArgument(
                "model must be a non-empty name or a named model".to_string(),
            ));
        };
        if names.is_empty() {
            return Err(GlossError::InvalidArgument(
                "path names must not be empty".to_string(),
            ));
        }
        let mut state = self.state.write();
        let package = state.package_or_default(package)?;
        debug!(
            "path names set (model={}, package={}, count={})",
            model_name,
            package,
            names.len()
        );
        state
            .path_names
            .entry(model_name.to_string())
            .or_default()
            .insert(package, names);
        Ok(())
    }

    /// Path names of a model for a package (default package when `None`).
    pub fn path_names<'a>(
        &self,
        model: impl Into<ModelRef<'a>>,
        package: Option<&str>,
    ) -> Option<PathNames> {
        let model_name = model.into().name()?;
        let state = self.state.read();
        let package = state.lookup_package(package);
        state.path_names(model_name, &package).cloned()
    }

    /// Path names of a model for every package.
    pub fn all_path_names<'a>(
        &self,
        model: impl Into<ModelRef<'a>>,
    ) -> BTreeMap<String, PathNames> {
        let Some(model_name) = model.into().name() else {
            return BTreeMap::new();
        };
        self.state
            .read()
            .path_names
            .get(model_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Merge context-field maps into the store; incoming fields win per field.
    pub fn merge_error_contexts(&self, contexts: ErrorContextMap) -> Result<(), GlossError> {
        if contexts.is_empty() {
            return Err(GlossError::InvalidArgument(
                "error contexts must not be empty".to_string(),
            ));
        }
        debug!("error contexts merged (kinds={})", contexts.len());
        self.state.write().contexts.merge(contexts);
        Ok(())
    }

    /// Replace the context-field map of one kind wholesale.
    pub fn set_error_context(&self, kind: &str, fields: ContextFieldMap) -> Result<(), GlossError> {
        if kind.is_empty() {
            return Err(GlossError::InvalidArgument(
                "error kind must not be empty".to_string(),
            ));
        }
        if fields.is_empty() {
            return Err(GlossError::InvalidArgument(format!(
                "context fields for kind {kind} must not be empty"
            )));
        }
        debug!(
            "error context set (kind={}, fields={})",
            kind,
            fields.len()
        );
        self.state.write().contexts.set(kind, fields);
        Ok(())
    }

    /// Context-field map of one kind.
    pub fn error_context(&self, kind: &str) -> Option<ContextFieldMap> {
        self.state.read().contexts.get(kind).cloned()
    }

    /// Every context-field map, including `base`.
    pub fn error_contexts(&self) -> ErrorContextMap {
        self.state.read().contexts.clone()
    }
}

fn patch_keys(patch: &Value) -> String {
    patch
        .as_object()
        .map(|map| map.keys().cloned().collect::<Vec<_>>().join(","))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn defaults_are_seeded() {
        let store = ConfigStore::with_defaults();
        let templates = store.message_templates(None).expect("templates");
        assert_eq!(templates.get("required"), Some("{path_name} is required"));
        assert_eq!(
            store.type_names(None).and_then(|names| names.get("objectid").map(str::to_string)),
            Some("identifier".to_string())
        );
        assert!(store.error_context("base").is_some());
    }

    #[test]
    fn setters_reject_empty_arguments() {
        let store = ConfigStore::with_defaults();
        assert!(matches!(
            store.set_message_templates(TemplateSet::new(), None),
            Err(GlossError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.set_message_templates(TemplateSet::new().with("DEFAULT", "x"), Some("")),
            Err(GlossError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.set_type_names(TypeNames::new(), Some("vi")),
            Err(GlossError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.set_path_names("", PathNames::new().with("a", "A"), None),
            Err(GlossError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.set_path_names("Users", PathNames::new(), None),
            Err(GlossError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.merge_error_contexts(ErrorContextMap::new()),
            Err(GlossError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.set_error_context("", ContextFieldMap::new()),
            Err(GlossError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.set_config(&json!({})),
            Err(GlossError::InvalidArgument(_))
        ));
    }

    #[test]
    fn set_config_merges_and_rejects_unknown_keys() {
        let store = ConfigStore::with_defaults();
        store
            .set_config(&json!({ "default_package": "vi", "upper_first": false }))
            .expect("set config");
        let options = store.config();
        assert_eq!(options.default_package, "vi");
        assert!(!options.upper_first);
        assert_eq!(options.msg_delimiter, ", ");

        let err = store.set_config(&json!({ "colour": "red" })).unwrap_err();
        assert!(matches!(err, GlossError::Config(_)));
        assert_eq!(store.config().default_package, "vi");
    }

    #[test]
    fn packages_follow_default_package() {
        let store = ConfigStore::with_defaults();
        store
            .set_message_templates(
                TemplateSet::new().with("DEFAULT", "{path_name} không hợp lệ"),
                Some("vi"),
            )
            .expect("vi templates");
        store
            .set_config(&json!({ "default_package": "vi" }))
            .expect("set config");
        assert_eq!(
            store
                .message_templates(None)
                .and_then(|set| set.get("DEFAULT").map(str::to_string)),
            Some("{path_name} không hợp lệ".to_string())
        );
        assert_eq!(store.all_message_templates().len(), 2);
    }
}
