//! # Condition Engine
//!
//! Evaluates what a schema declares about its objects: cardinality and metadata
//! roles, choice rules and business rules, plus pre/post conditions wrapped around
//! function-like operations.
//!
//! * [`Validator`] runs the per-call stage machine over a graph; see [`engine`].
//! * [`FunctionScope`] holds the call-scoped condition registries of one function.
//!
//! Violations are data: [`Validator::run`] returns them, and
//! [`Validator::validate_model`] turns them into one aggregate error on request.

pub mod engine;
mod error;
mod scope;
mod violation;

pub use engine::{Stage, Validator, validate};
pub use error::{ValidationError, ValidationErrorExt};
pub use scope::{FunctionScope, LocalConditions, Outcome};
pub use violation::{ChoiceDetail, ConditionViolation};
