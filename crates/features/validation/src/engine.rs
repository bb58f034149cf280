//! # Model Validation
//!
//! One call walks the graph reachable from a root object through four stages:
//!
//! 1. **Init**: collect reachable objects (each once) and re-register their keys
//!    in a fresh registry. Duplicate keys and unresolved references abort.
//! 2. **Structural check**: cardinality and metadata roles abort on the first
//!    failure; choice rules report violations with the fields they found set.
//! 3. **Business rules**: predicates run on the declaring object, or on every
//!    object contained below it for recursive conditions. Predicate errors abort.
//! 4. **Done**.
//!
//! In fail-fast mode the first violation ends the call.

use crate::error::ValidationError;
use crate::violation::{ChoiceDetail, ConditionViolation};
use fxhash::FxHashSet;
use rune_domain::config::ValidationConfig;
use rune_model::{
    Check, ChoiceRule, Condition, Document, Graph, ObjectId, ObjectRef, ObjectRegistry, Scope,
    Value,
};
use strum_macros::Display;
use tracing::{debug, instrument, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    Init,
    StructuralCheck,
    BusinessRules,
    Done,
}

/// Validates the graph reachable from one root object.
#[derive(Debug)]
pub struct Validator<'g> {
    graph: &'g Graph,
    root: ObjectId,
    fail_fast: bool,
    stage: Stage,
    nodes: Vec<ObjectId>,
    violations: Vec<ConditionViolation>,
}

impl<'g> Validator<'g> {
    #[must_use]
    pub const fn new(graph: &'g Graph, root: ObjectId) -> Self {
        Self {
            graph,
            root,
            fail_fast: false,
            stage: Stage::Init,
            nodes: Vec::new(),
            violations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn for_document(document: &'g Document) -> Self {
        Self::new(&document.graph, document.root)
    }

    /// Stop at the first violation instead of collecting all of them.
    #[must_use]
    pub const fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs every stage and returns the violations found (empty when valid).
    ///
    /// # Errors
    /// Returns [`ValidationError::Model`] for duplicate keys, unresolved references,
    /// cardinality or role failures and predicate errors.
    #[instrument(level = "debug", skip(self), fields(root = %self.root))]
    pub fn run(mut self) -> Result<Vec<ConditionViolation>, ValidationError> {
        while self.stage != Stage::Done {
            let next = match self.stage {
                Stage::Init => self.init()?,
                Stage::StructuralCheck => self.structural_check()?,
                Stage::BusinessRules => self.business_rules()?,
                Stage::Done => Stage::Done,
            };
            trace!(from = %self.stage, to = %next, "Validation stage");
            self.stage = next;
        }

        let (objects, violations) = (self.nodes.len(), self.violations.len());
        debug!(objects, violations, "Validation finished");
        Ok(self.violations)
    }

    /// Like [`Validator::run`], but a non-empty result becomes an aggregate
    /// [`ValidationError::ConditionViolations`] when `raise_on_failure` is set.
    ///
    /// # Errors
    /// See [`Validator::run`].
    pub fn validate_model(
        self,
        raise_on_failure: bool,
    ) -> Result<Vec<ConditionViolation>, ValidationError> {
        let violations = self.run()?;
        if raise_on_failure && !violations.is_empty() {
            return Err(ValidationError::ConditionViolations { violations, context: None });
        }
        Ok(violations)
    }

    fn init(&mut self) -> Result<Stage, ValidationError> {
        self.nodes = self.graph.reachable(self.root)?;

        let mut registry = ObjectRegistry::new();
        for id in &self.nodes {
            for loc in self.graph.register_keys(*id, &mut registry)? {
                let object = self.graph.object(loc.owner)?;
                let field = &object.type_def().fields()[loc.field];
                let values = object.values(field.name())?;
                if let Some(Value::Reference(reference)) = values.get(loc.position) {
                    reference.require()?;
                }
            }
        }
        registry.ensure_unique()?;

        debug!(objects = self.nodes.len(), keys = registry.len(), "Reachable graph collected");
        Ok(Stage::StructuralCheck)
    }

    fn structural_check(&mut self) -> Result<Stage, ValidationError> {
        for id in &self.nodes {
            self.graph.check_cardinality(*id)?;
            self.graph.check_roles(*id)?;

            let object = self.graph.object(*id)?;
            for condition in object.type_def().conditions() {
                let Check::Choice(rule) = condition.check() else { continue };
                if let Some(detail) = check_choice(object, rule)? {
                    self.violations.push(ConditionViolation::choice(
                        object.type_name(),
                        *id,
                        condition.name(),
                        detail,
                    ));
                    if self.fail_fast {
                        return Ok(Stage::Done);
                    }
                }
            }
        }
        Ok(Stage::BusinessRules)
    }

    fn business_rules(&mut self) -> Result<Stage, ValidationError> {
        let mut evaluated = FxHashSet::default();

        for id in &self.nodes {
            let object = self.graph.object(*id)?;
            for condition in object.type_def().conditions() {
                let Check::Predicate(predicate) = condition.check() else { continue };

                let targets = match condition.scope() {
                    Scope::Local => vec![*id],
                    Scope::Recursive => self.graph.contained(*id)?,
                };
                for target in targets {
                    if !evaluated.insert((object.type_name(), condition.name(), target)) {
                        continue;
                    }
                    if !predicate(self.graph.object(target)?)? {
                        self.violations.push(violation(object, condition, target));
                        if self.fail_fast {
                            return Ok(Stage::Done);
                        }
                    }
                }
            }
        }
        Ok(Stage::Done)
    }
}

/// Validates `document` with the switches of `config`.
///
/// # Errors
/// See [`Validator::validate_model`].
pub fn validate(
    document: &Document,
    config: &ValidationConfig,
) -> Result<Vec<ConditionViolation>, ValidationError> {
    Validator::for_document(document)
        .fail_fast(config.fail_fast)
        .validate_model(config.raise_on_failure)
}

fn check_choice(
    object: ObjectRef<'_>,
    rule: &ChoiceRule,
) -> Result<Option<ChoiceDetail>, ValidationError> {
    let mut set = Vec::new();
    for field in &rule.fields {
        if object.is_set(field)? {
            set.push(field.clone());
        }
    }

    if rule.kind.admits(set.len()) {
        return Ok(None);
    }
    Ok(Some(ChoiceDetail {
        kind: rule.kind,
        fields: rule.fields.clone(),
        set,
        min: rule.kind.min(),
        max: rule.kind.max(),
    }))
}

fn violation(
    declaring: ObjectRef<'_>,
    condition: &Condition,
    target: ObjectId,
) -> ConditionViolation {
    ConditionViolation::rule(
        declaring.type_name(),
        Some(target),
        condition.name(),
        condition.phase(),
        condition.description(),
    )
}
