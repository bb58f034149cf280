use crate::violation::ConditionViolation;
use rune_model::ModelError;
use std::borrow::Cow;

/// Errors raised by the condition engine.
#[rune_derive::rune_error]
pub enum ValidationError {
    /// Aggregate of every violation found by one call.
    #[error(
        "{} condition violation(s){}: {}",
        .violations.len(),
        format_context(.context),
        summary(.violations)
    )]
    ConditionViolations {
        violations: Vec<ConditionViolation>,
        context: Option<Cow<'static, str>>,
    },

    /// Structural, reference or predicate failure that aborts the call.
    #[error("Model error{}: {source}", format_context(.context))]
    Model { source: ModelError, context: Option<Cow<'static, str>> },
}

impl ValidationError {
    /// The violations carried by an aggregate error.
    #[must_use]
    pub fn violations(&self) -> &[ConditionViolation] {
        match self {
            Self::ConditionViolations { violations, .. } => violations,
            Self::Model { .. } => &[],
        }
    }
}

fn summary(violations: &[ConditionViolation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
