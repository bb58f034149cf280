use crate::error::ModelError;
use crate::graph::ObjectRef;
use std::fmt::{self, Debug};
use std::sync::Arc;
use strum_macros::{Display, IntoStaticStr};

/// When a condition runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    StructuralChoice,
    BusinessRule,
    Pre,
    Post,
}

/// Which objects a type condition is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Scope {
    /// The declaring object only.
    Local,
    /// The declaring object and every object contained below it.
    Recursive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ChoiceKind {
    /// Exactly one of the fields is set.
    OneOf,
    /// Same bound as `OneOf`, spelled the way the language's `required choice` reads.
    RequiredChoice,
    /// At most one of the fields is set.
    OptionalChoice,
}

impl ChoiceKind {
    /// Smallest number of set fields the rule accepts.
    #[must_use]
    pub const fn min(self) -> usize {
        match self {
            Self::OneOf | Self::RequiredChoice => 1,
            Self::OptionalChoice => 0,
        }
    }

    #[must_use]
    pub const fn max(self) -> usize {
        1
    }

    #[must_use]
    pub const fn admits(self, set: usize) -> bool {
        set >= self.min() && set <= self.max()
    }
}

/// A choice rule over a fixed field set. An empty set on `one-of` means
/// every field of the type and is expanded when the schema is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRule {
    pub kind: ChoiceKind,
    pub fields: Vec<String>,
}

pub type Predicate = Arc<dyn for<'g> Fn(ObjectRef<'g>) -> Result<bool, ModelError> + Send + Sync>;

#[derive(Clone)]
pub enum Check {
    Choice(ChoiceRule),
    Predicate(Predicate),
}

impl Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Choice(rule) => f.debug_tuple("Choice").field(rule).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A named, stateless condition registered on a type.
#[derive(Debug, Clone)]
pub struct Condition {
    name: String,
    description: Option<String>,
    phase: Phase,
    scope: Scope,
    check: Check,
}

impl Condition {
    pub fn one_of<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::choice(name, ChoiceKind::OneOf, fields)
    }

    pub fn required_choice<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::choice(name, ChoiceKind::RequiredChoice, fields)
    }

    pub fn optional_choice<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::choice(name, ChoiceKind::OptionalChoice, fields)
    }

    pub fn choice<I, S>(name: impl Into<String>, kind: ChoiceKind, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        Self {
            name: name.into(),
            description: None,
            phase: Phase::StructuralChoice,
            scope: Scope::Local,
            check: Check::Choice(ChoiceRule { kind, fields }),
        }
    }

    /// A business rule. Returning `Ok(false)` is a violation; errors propagate.
    pub fn rule<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: for<'g> Fn(ObjectRef<'g>) -> Result<bool, ModelError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: None,
            phase: Phase::BusinessRule,
            scope: Scope::Local,
            check: Check::Predicate(Arc::new(predicate)),
        }
    }

    /// Evaluates the condition on every contained object as well.
    #[must_use]
    pub const fn recursive(mut self) -> Self {
        self.scope = Scope::Recursive;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    #[must_use]
    pub const fn check(&self) -> &Check {
        &self.check
    }

    pub(crate) const fn choice_rule_mut(&mut self) -> Option<&mut ChoiceRule> {
        match &mut self.check {
            Check::Choice(rule) => Some(rule),
            Check::Predicate(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_bounds() {
        assert!(ChoiceKind::OneOf.admits(1));
        assert!(!ChoiceKind::OneOf.admits(0));
        assert!(!ChoiceKind::RequiredChoice.admits(2));
        assert!(ChoiceKind::OptionalChoice.admits(0));
        assert!(!ChoiceKind::OptionalChoice.admits(2));
    }

    #[test]
    fn phases_render_in_kebab_case() {
        assert_eq!(Phase::StructuralChoice.to_string(), "structural-choice");
        assert_eq!(ChoiceKind::OptionalChoice.to_string(), "optional-choice");
        assert_eq!(Scope::Recursive.to_string(), "recursive");
    }

    #[test]
    fn rules_default_to_local_business_rules() {
        let rule = Condition::rule("PositiveAmount", |_| Ok(true)).recursive();
        assert_eq!(rule.phase(), Phase::BusinessRule);
        assert_eq!(rule.scope(), Scope::Recursive);
        assert!(matches!(rule.check(), Check::Predicate(_)));
    }
}
