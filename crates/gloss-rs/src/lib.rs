//! Public SDK surface for gloss.
//!
//! This crate re-exports the building blocks and the types most callers
//! need to render friendly validation errors, plus a small logging helper.

/// Re-export for convenience.
pub use gloss_rs_config as config;
pub use gloss_rs_core as core;
/// Re-export for convenience.
pub use gloss_rs_protocol as protocol;

pub use gloss_rs_config::{GlossConfig, GlossOptions, PathNames, TemplateSet, TypeNames};
pub use gloss_rs_core::{ConfigStore, ErrorHandler, GlossError};
pub use gloss_rs_protocol::{
    Document, FriendlyError, HandleOptions, Model, ModelDescriptor, Outcome, SchemaDescriptor,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}
