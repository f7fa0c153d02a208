//! Test helpers shared across gloss crates.

pub mod document;
pub mod failures;
pub mod models;

pub use document::StubDocument;
pub use failures::{
    cast_failure, duplicate_key_error, enum_failure, leaf_failure, minlength_failure,
    required_failure, validation_error,
};
pub use models::{users_model, users_schema};
