//! Pre- and post-conditions around a function-like operation.
//!
//! A [`FunctionScope`] is built for one call, consumed by [`FunctionScope::call`]
//! and dropped with it, so registered predicates never leak into another call.
//!
//! ```rust
//! use rune_validation::FunctionScope;
//!
//! let halve = FunctionScope::<i64, i64>::new("Halve")
//!     .pre("InputIsEven", |n: &i64| Ok(n % 2 == 0))
//!     .post("OutputIsSmaller", |io| Ok(io.output < io.input));
//!
//! assert_eq!(halve.call(10, |n| Ok::<_, rune_validation::ValidationError>(n / 2)).unwrap(), 5);
//! ```

use crate::error::ValidationError;
use crate::violation::ConditionViolation;
use rune_model::{ModelError, Phase};
use std::fmt::{self, Debug};
use tracing::{debug, trace};

type Check<'a, S> = Box<dyn Fn(&S) -> Result<bool, ModelError> + 'a>;

/// Input and output of a finished body, the subject of post-conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<I, O> {
    pub input: I,
    pub output: O,
}

/// Ordered, named predicates over one subject, evaluated together.
pub struct LocalConditions<'a, S> {
    phase: Phase,
    entries: Vec<(String, Check<'a, S>)>,
}

impl<S> Debug for LocalConditions<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalConditions")
            .field("phase", &self.phase)
            .field("names", &self.entries.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .finish()
    }
}

impl<'a, S> LocalConditions<'a, S> {
    #[must_use]
    pub const fn new(phase: Phase) -> Self {
        Self { phase, entries: Vec::new() }
    }

    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&S) -> Result<bool, ModelError> + 'a,
    {
        self.entries.push((name.into(), Box::new(predicate)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluates every predicate in registration order. Failing predicates are
    /// reported together, each named in its own violation.
    ///
    /// # Errors
    /// Returns [`ValidationError::ConditionViolations`] when any predicate is false
    /// and [`ValidationError::Model`] as soon as one errors.
    pub fn check(&self, function: &str, subject: &S) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        for (name, predicate) in &self.entries {
            let holds = predicate(subject)?;
            trace!(function, condition = %name, holds, phase = %self.phase, "Function condition");
            if !holds {
                violations.push(ConditionViolation::rule(function, None, name, self.phase, None));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            debug!(
                function,
                failed = violations.len(),
                phase = %self.phase,
                "Function conditions failed"
            );
            let context = format!("{} of `{function}`", self.phase);
            Err(ValidationError::ConditionViolations { violations, context: Some(context.into()) })
        }
    }
}

/// Condition registries of one function call.
pub struct FunctionScope<'a, I, O> {
    name: String,
    pre: LocalConditions<'a, I>,
    post: LocalConditions<'a, Outcome<I, O>>,
}

impl<I, O> Debug for FunctionScope<'_, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionScope")
            .field("name", &self.name)
            .field("pre", &self.pre)
            .field("post", &self.post)
            .finish()
    }
}

impl<'a, I, O> FunctionScope<'a, I, O> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pre: LocalConditions::new(Phase::Pre),
            post: LocalConditions::new(Phase::Post),
        }
    }

    /// Adds a condition on the inputs, checked before the body runs.
    #[must_use]
    pub fn pre<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&I) -> Result<bool, ModelError> + 'a,
    {
        self.pre.register(name, predicate);
        self
    }

    /// Adds a condition on inputs and output, checked after the body returns.
    #[must_use]
    pub fn post<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Outcome<I, O>) -> Result<bool, ModelError> + 'a,
    {
        self.post.register(name, predicate);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks the pre-conditions, runs `body`, checks the post-conditions and
    /// returns the output. The scope is consumed.
    ///
    /// # Errors
    /// Returns [`ValidationError::ConditionViolations`] naming the failed
    /// predicates, or the error of `body`.
    pub fn call<F, E>(self, input: I, body: F) -> Result<O, ValidationError>
    where
        F: FnOnce(&I) -> Result<O, E>,
        E: Into<ValidationError>,
    {
        self.pre.check(&self.name, &input)?;
        let output = body(&input).map_err(Into::into)?;

        let outcome = Outcome { input, output };
        self.post.check(&self.name, &outcome)?;
        Ok(outcome.output)
    }
}
