use rune_kernel::config::ConfigError;
use rune_logger::LoggerError;
use rune_model::ModelError;
use rune_serialization::SerializationError;
use rune_validation::ValidationError;
use std::borrow::Cow;

/// Everything a [`crate::Runtime`] call can fail with.
#[rune_derive::rune_error]
pub enum RuntimeError {
    #[error("Model error{}: {source}", format_context(.context))]
    Model { source: ModelError, context: Option<Cow<'static, str>> },

    #[error("Validation failed{}: {source}", format_context(.context))]
    Validation { source: ValidationError, context: Option<Cow<'static, str>> },

    #[error("Serialization failed{}: {source}", format_context(.context))]
    Serialization { source: SerializationError, context: Option<Cow<'static, str>> },

    #[error("Configuration error{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("Logger error{}: {source}", format_context(.context))]
    Logger { source: LoggerError, context: Option<Cow<'static, str>> },
}

impl RuntimeError {
    /// The condition violations behind a failed validation; empty for other failures.
    #[must_use]
    pub fn violations(&self) -> &[rune_validation::ConditionViolation] {
        match self {
            Self::Validation { source, .. } => source.violations(),
            _ => &[],
        }
    }
}
