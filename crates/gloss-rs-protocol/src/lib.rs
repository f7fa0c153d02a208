//! Shared data model for gloss: validation failures as they arrive from the
//! document mapper, the schema and model handles that describe them, and the
//! friendly error produced for callers.

mod failure;
mod kind;
mod message;
mod model;
mod path;

pub use failure::{KindDetail, LeafFailure};
pub use kind::FailureKind;
pub use message::{
    ErrorContext, ExcludeErrors, FriendlyError, HandleOptions, Outcome, RenderedMessage,
    ResolvedOptions,
};
pub use model::{Document, Model, ModelDescriptor, ModelRef, SchemaDescriptor, resolve_model_name};
pub use path::{is_filled_object, lookup_path, lookup_path_in_map};
