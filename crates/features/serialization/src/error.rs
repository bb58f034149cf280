use rune_model::ModelError;
use std::borrow::Cow;

/// Errors raised while reading or writing the JSON wire form.
#[rune_derive::rune_error]
pub enum SerializationError {
    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The JSON is well formed but does not follow the wire format.
    #[error("Malformed document{}: {message}", format_context(.context))]
    Format { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Model error{}: {source}", format_context(.context))]
    Model { source: ModelError, context: Option<Cow<'static, str>> },
}

impl SerializationError {
    pub(crate) fn format(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Format { message: message.into(), context: None }
    }
}
