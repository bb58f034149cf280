use rune_model::{ChoiceKind, ObjectId, Phase};
use std::fmt::{self, Display};

/// Field-level detail of a failed choice rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceDetail {
    pub kind: ChoiceKind,
    /// Fields the rule ranges over.
    pub fields: Vec<String>,
    /// Fields found set, in rule order.
    pub set: Vec<String>,
    pub min: usize,
    pub max: usize,
}

/// One condition that does not hold on one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionViolation {
    pub condition: String,
    /// Type declaring the condition.
    pub type_name: String,
    /// Object the condition failed on.
    pub object: Option<ObjectId>,
    pub phase: Phase,
    pub message: String,
    pub choice: Option<ChoiceDetail>,
}

impl ConditionViolation {
    pub(crate) fn choice(
        type_name: &str,
        object: ObjectId,
        condition: &str,
        detail: ChoiceDetail,
    ) -> Self {
        let message = match detail.set.len() {
            0 => format!("{} requires one of {:?} to be set, none is", detail.kind, detail.fields),
            n => format!(
                "{} allows at most {} of {:?}, found {n}: {:?}",
                detail.kind, detail.max, detail.fields, detail.set
            ),
        };
        Self {
            condition: condition.to_owned(),
            type_name: type_name.to_owned(),
            object: Some(object),
            phase: Phase::StructuralChoice,
            message,
            choice: Some(detail),
        }
    }

    pub(crate) fn rule(
        type_name: &str,
        object: Option<ObjectId>,
        condition: &str,
        phase: Phase,
        description: Option<&str>,
    ) -> Self {
        let message = description
            .map_or_else(|| format!("condition `{condition}` does not hold"), ToOwned::to_owned);
        Self {
            condition: condition.to_owned(),
            type_name: type_name.to_owned(),
            object,
            phase,
            message,
            choice: None,
        }
    }
}

impl Display for ConditionViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}.{}", self.phase, self.type_name, self.condition)?;
        if let Some(object) = self.object {
            write!(f, " on {object}")?;
        }
        write!(f, ": {}", self.message)
    }
}
