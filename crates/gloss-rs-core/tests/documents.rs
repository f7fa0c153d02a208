//! Document validation wrapper.

use gloss_rs_core::{ErrorHandler, GlossError};
use gloss_rs_protocol::{HandleOptions, ModelDescriptor, Outcome};
use gloss_rs_test_utils::{StubDocument, minlength_failure, users_model, validation_error};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn valid_document_yields_no_error() {
    let handler = ErrorHandler::default();
    let document = StubDocument::valid(users_model());
    let outcome = handler
        .validate_document(&document, &HandleOptions::new())
        .await
        .expect("outcome");
    assert_eq!(outcome, Outcome::NoError);
    assert_eq!(document.validations(), 1);
}

#[tokio::test]
async fn failing_document_yields_friendly_error() {
    let handler = ErrorHandler::default();
    let error = validation_error(vec![("fullName", minlength_failure("fullName", "Bi", 3))]);
    let document = StubDocument::failing(users_model(), error);
    let outcome = handler
        .validate_document(&document, &HandleOptions::new())
        .await
        .expect("outcome");
    assert_eq!(
        outcome.friendly().map(|error| error.message.as_str()),
        Some("FullName must be at least 3 characters long")
    );
}

#[tokio::test]
async fn document_without_model_is_rejected_before_validating() {
    let handler = ErrorHandler::default();
    let document = StubDocument::valid(ModelDescriptor::default());
    let err = handler
        .validate_document(&document, &HandleOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GlossError::UnsupportedModel(_)));
    assert_eq!(document.validations(), 0);
}
