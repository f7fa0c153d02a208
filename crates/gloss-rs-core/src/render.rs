//! Template selection and message rendering.

use crate::template::compile;
use gloss_rs_config::{GlossOptions, TemplateSet};
use gloss_rs_protocol::{ErrorContext, FailureKind, LeafFailure, RenderedMessage};

/// Pick the template for a failure.
///
/// Custom validator failures use their own message. Every other kind uses
/// the package's template for the kind, then the package fallback, then an
/// empty template.
pub fn select_template(
    failure: &LeafFailure,
    templates: Option<&TemplateSet>,
    default_key: &str,
) -> String {
    if failure.kind == FailureKind::Validate {
        return failure.message.clone().unwrap_or_default();
    }
    templates
        .and_then(|set| {
            set.get(failure.kind.as_str())
                .or_else(|| set.get(default_key))
        })
        .unwrap_or_default()
        .to_string()
}

/// Render one failure against its context.
pub fn render_message(
    failure: &LeafFailure,
    context: ErrorContext,
    templates: Option<&TemplateSet>,
    options: &GlossOptions,
) -> RenderedMessage {
    let template = select_template(failure, templates, &options.default_key);
    let mut message = compile(&template, context.as_map());
    if options.upper_first {
        upper_first(&mut message);
    }
    RenderedMessage {
        message,
        context,
        template,
    }
}

/// Uppercase the first character when it is an ASCII lowercase letter.
/// Any other first character, including non-Latin letters, is left as is.
pub fn upper_first(message: &mut String) {
    if message.as_bytes().first().is_some_and(u8::is_ascii_lowercase) {
        message[..1].make_ascii_uppercase();
    }
}
