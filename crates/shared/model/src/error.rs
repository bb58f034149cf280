use rune_domain::roles::KeyKind;
use std::borrow::Cow;

/// Errors raised while building, reading or resolving an object graph.
#[rune_derive::rune_error]
pub enum ModelError {
    /// Cardinality, required-field, metadata role or value type mismatch.
    #[error("Structural validation failed{}: {message}", format_context(.context))]
    Structural { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error(
        "Reference to {kind} key `{key}` cannot be resolved{}: {message}",
        format_context(.context)
    )]
    ReferenceResolution {
        key: String,
        kind: KeyKind,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Key `{key}` ({kind}) is registered more than once{}", format_context(.context))]
    RegistryKeyCollision { key: String, kind: KeyKind, context: Option<Cow<'static, str>> },

    #[error("Unknown type `{name}`{}", format_context(.context))]
    UnknownType { name: String, context: Option<Cow<'static, str>> },

    #[error("Type `{type_name}` has no field `{field}`{}", format_context(.context))]
    UnknownField { type_name: String, field: String, context: Option<Cow<'static, str>> },

    #[error("Cannot read `{field}` from a {receiver} value{}", format_context(.context))]
    NotNavigable { field: String, receiver: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid schema{}: {message}", format_context(.context))]
    Schema { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal model error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ModelError {
    pub(crate) fn structural(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Structural { message: message.into(), context: None }
    }

    pub(crate) fn schema(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Schema { message: message.into(), context: None }
    }

    pub(crate) fn unresolved(
        key: impl Into<String>,
        kind: KeyKind,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::ReferenceResolution { key: key.into(), kind, message: message.into(), context: None }
    }
}
