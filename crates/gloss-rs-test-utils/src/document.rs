use async_trait::async_trait;
use gloss_rs_protocol::{Document, Model, ModelDescriptor};
use parking_lot::Mutex;
use serde_json::Value;

/// Document whose validation returns a canned result.
pub struct StubDocument {
    model: ModelDescriptor,
    result: Result<(), Value>,
    validations: Mutex<usize>,
}

impl StubDocument {
    /// A document that validates cleanly.
    pub fn valid(model: ModelDescriptor) -> Self {
        Self {
            model,
            result: Ok(()),
            validations: Mutex::new(0),
        }
    }

    /// A document whose validation fails with `error`.
    pub fn failing(model: ModelDescriptor, error: Value) -> Self {
        Self {
            model,
            result: Err(error),
            validations: Mutex::new(0),
        }
    }

    /// Number of times `validate` ran.
    pub fn validations(&self) -> usize {
        *self.validations.lock()
    }
}

#[async_trait]
impl Document for StubDocument {
    fn model(&self) -> &dyn Model {
        &self.model
    }

    async fn validate(&self) -> Result<(), Value> {
        *self.validations.lock() += 1;
        self.result.clone()
    }
}
