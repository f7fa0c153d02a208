//! Error types for the core message engine.

use gloss_rs_config::ConfigError;
use thiserror::Error;

/// Errors returned by store setters and the error handler.
#[derive(Debug, Error)]
pub enum GlossError {
    /// A setter received an empty or malformed required value.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The model handle has no schema or no resolvable name.
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),
    /// Config loading or option patching failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
