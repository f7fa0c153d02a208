//! Core message engine for gloss.
//!
//! This crate owns the template engine, the shared configuration store, and
//! the pipeline that turns a raw validation failure into a friendly error:
//! classification, context building, rendering, and aggregation.

pub mod classify;
pub mod context;
pub mod error;
pub mod handler;
pub mod render;
mod store;
pub mod template;

pub use classify::{Classified, FailureShape};
pub use error::GlossError;
pub use handler::ErrorHandler;
/// Shared configuration store consulted by every render.
pub use store::ConfigStore;
pub use template::{compile, decompile};
