//! Aggregation of validation failures into one friendly error.

use crate::classify::{FailureShape, check_model, classify, resolve_options};
use crate::context::{ContextSources, build_context, normalize};
use crate::error::GlossError;
use crate::render::render_message;
use crate::store::{ConfigStore, StoreState};
use gloss_rs_protocol::{
    Document, FriendlyError, HandleOptions, LeafFailure, Model, Outcome, RenderedMessage,
    ResolvedOptions, SchemaDescriptor,
};
use log::{debug, info, warn};
use serde_json::Value;

/// Turns raw validation errors into friendly errors using a shared store.
#[derive(Clone, Default)]
pub struct ErrorHandler {
    store: ConfigStore,
}

impl ErrorHandler {
    /// Create a handler reading from the given store.
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Store the handler renders with.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Render every failure of a raw validation error raised for `model`.
    ///
    /// Returns [`Outcome::Unhandled`] with the original error when its shape
    /// is not recognized, and [`Outcome::NoError`] when every failure was
    /// excluded. Fails only when `model` is not a usable model handle.
    pub fn handle_validation_error(
        &self,
        model: &dyn Model,
        error: &Value,
        options: &HandleOptions,
    ) -> Result<Outcome, GlossError> {
        let classified = classify(model, error)?;
        let state = self.store.read();
        let resolved = resolve_options(options, &state.options);

        let failures = match classified.shape {
            FailureShape::Unsupported => {
                debug!(
                    "validation error shape not recognized (model={})",
                    classified.model_name
                );
                return Ok(Outcome::Unhandled(error.clone()));
            }
            FailureShape::Single(raw) => match LeafFailure::from_value(&raw) {
                Some(failure) => vec![failure],
                None => return Ok(Outcome::Unhandled(error.clone())),
            },
            FailureShape::Multi(entries) => entries
                .into_iter()
                .filter_map(|(key, raw)| {
                    let failure = LeafFailure::from_value(&raw);
                    if failure.is_none() {
                        warn!(
                            "skipping malformed sub-failure (model={}, key={})",
                            classified.model_name, key
                        );
                    }
                    failure
                })
                .collect(),
        };

        let rendered: Vec<RenderedMessage> = failures
            .into_iter()
            .filter_map(|failure| {
                render_failure(
                    &state,
                    classified.model_name,
                    classified.schema,
                    &resolved,
                    failure,
                )
            })
            .collect();

        if rendered.is_empty() {
            debug!(
                "no failures left after exclusion (model={}, excluded={:?})",
                classified.model_name, resolved.exclude_errors
            );
            return Ok(Outcome::NoError);
        }

        let friendly = assemble(
            &state,
            classified.model_name,
            resolved,
            rendered,
            error,
        );
        info!(
            "validation error rendered (model={}, package={}, messages={})",
            friendly.model_name,
            friendly.options.package,
            friendly.messages.len()
        );
        Ok(Outcome::Friendly(friendly))
    }

    /// Validate a document and render its failures, if any.
    ///
    /// A document that validates cleanly yields [`Outcome::NoError`].
    pub async fn validate_document(
        &self,
        document: &dyn Document,
        options: &HandleOptions,
    ) -> Result<Outcome, GlossError> {
        let model = document.model();
        let (model_name, _) = check_model(model)?;
        match document.validate().await {
            Ok(()) => {
                debug!("document validated cleanly (model={model_name})");
                Ok(Outcome::NoError)
            }
            Err(error) => self.handle_validation_error(model, &error, options),
        }
    }
}

fn render_failure(
    state: &StoreState,
    model_name: &str,
    schema: &SchemaDescriptor,
    resolved: &ResolvedOptions,
    failure: LeafFailure,
) -> Option<RenderedMessage> {
    let package = resolved.package.as_str();
    let failure = normalize(failure, state.type_names(package), &state.options);
    if resolved.excludes(failure.kind.as_str()) {
        debug!(
            "failure excluded (model={}, path={}, kind={})",
            model_name, failure.path, failure.kind
        );
        return None;
    }

    let context = build_context(
        &failure,
        ContextSources {
            schema,
            path_names: state.path_names(model_name, package),
            contexts: &state.contexts,
            options: &state.options,
        },
    );
    debug!(
        "rendering failure (model={}, path={}, kind={}, package={})",
        model_name, failure.path, failure.kind, package
    );
    Some(render_message(
        &failure,
        context,
        state.templates(package),
        &state.options,
    ))
}

fn assemble(
    state: &StoreState,
    model_name: &str,
    resolved: ResolvedOptions,
    rendered: Vec<RenderedMessage>,
    origin: &Value,
) -> FriendlyError {
    let options = &state.options;
    let messages: Vec<String> = rendered.iter().map(|item| item.message.clone()).collect();
    let origin_field = options
        .link_to_origin_error
        .clone()
        .filter(|field| !field.is_empty());
    FriendlyError {
        message: messages.join(&options.msg_delimiter),
        messages,
        model_name: model_name.to_string(),
        options: resolved,
        errors: rendered,
        errors_field: options
            .link_to_errors
            .clone()
            .filter(|field| !field.is_empty()),
        origin: origin_field.as_ref().map(|_| origin.clone()),
        origin_field,
        additional_fields: options.additional_error_fields.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloss_rs_protocol::ModelDescriptor;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn users() -> ModelDescriptor {
        let schema = SchemaDescriptor::from_value(json!({
            "username": { "type": "String", "$name": "user name" },
            "age": { "type": "Number" },
        }))
        .expect("schema");
        ModelDescriptor::new("Users", schema)
    }

    #[test]
    fn malformed_sub_failures_are_skipped() {
        let handler = ErrorHandler::default();
        let raw = json!({
            "errors": {
                "username": { "kind": "required", "path": "username" },
                "broken": { "message": "no kind here" },
            },
        });
        let outcome = handler
            .handle_validation_error(&users(), &raw, &HandleOptions::new())
            .expect("outcome");
        let friendly = outcome.into_friendly().expect("friendly");
        assert_eq!(friendly.messages, vec!["User name is required".to_string()]);
    }

    #[test]
    fn origin_error_is_attached_when_configured() {
        let handler = ErrorHandler::default();
        handler
            .store()
            .set_config(&json!({ "link_to_origin_error": "origin_error", "link_to_errors": null }))
            .expect("config");
        let raw = json!({ "kind": "required", "path": "age" });
        let friendly = handler
            .handle_validation_error(&users(), &raw, &HandleOptions::new())
            .expect("outcome")
            .into_friendly()
            .expect("friendly");
        let value = friendly.to_value();
        assert_eq!(value["origin_error"], raw);
        assert!(value.get("errors").is_none());
        assert_eq!(value["code"], json!("ERR_DOCUMENT_VALIDATION"));
    }
}
