//! Configuration models and layered config loading.
//!
//! This crate owns the gloss option schema, the built-in template packages
//! and context-field maps, JSON5 config files, and the merge rules used when
//! options are patched at runtime.

mod defaults;
mod error;
mod loader;
mod model;

/// Built-in defaults seeded into every fresh store.
pub use defaults::{
    DEFAULT_PACKAGE, default_error_contexts, default_message_templates, default_type_names,
};
/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Layered config types and loader options.
pub use loader::{ConfigLayer, ConfigLayerSource, LayeredConfig, LayeredConfigOptions};
/// Configuration schema models.
pub use model::*;
