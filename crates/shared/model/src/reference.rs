use crate::error::ModelError;
use crate::graph::ObjectId;
use rune_domain::roles::KeyKind;
use std::fmt::{self, Display};

/// Position of a single value inside an object: owner, field index, list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueLoc {
    pub owner: ObjectId,
    pub field: usize,
    pub position: usize,
}

/// What a key resolves to: a whole object or one keyed value inside an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Object(ObjectId),
    Value(ValueLoc),
}

impl Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(id) => write!(f, "{id}"),
            Self::Value(loc) => write!(f, "{}[{}][{}]", loc.owner, loc.field, loc.position),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Unresolved,
    Resolved(Handle),
    Failed,
}

/// A pointer to a keyed value, resolved after the whole document is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    target_key: String,
    kind: KeyKind,
    state: Resolution,
}

impl Reference {
    /// An unresolved reference to an internal (`@key`) target.
    pub fn new(target_key: impl Into<String>) -> Self {
        Self::of_kind(KeyKind::Internal, target_key)
    }

    pub fn external(target_key: impl Into<String>) -> Self {
        Self::of_kind(KeyKind::External, target_key)
    }

    pub fn scoped(target_key: impl Into<String>) -> Self {
        Self::of_kind(KeyKind::Scoped, target_key)
    }

    pub fn of_kind(kind: KeyKind, target_key: impl Into<String>) -> Self {
        Self { target_key: target_key.into(), kind, state: Resolution::Unresolved }
    }

    #[must_use]
    pub fn target_key(&self) -> &str {
        &self.target_key
    }

    #[must_use]
    pub const fn kind(&self) -> KeyKind {
        self.kind
    }

    #[must_use]
    pub const fn state(&self) -> Resolution {
        self.state
    }

    #[must_use]
    pub const fn handle(&self) -> Option<Handle> {
        match self.state {
            Resolution::Resolved(handle) => Some(handle),
            _ => None,
        }
    }

    /// Returns the bound handle or a resolution error for unresolved and failed references.
    ///
    /// # Errors
    /// Returns [`ModelError::ReferenceResolution`] unless the reference is resolved.
    pub fn require(&self) -> Result<Handle, ModelError> {
        match self.state {
            Resolution::Resolved(handle) => Ok(handle),
            Resolution::Unresolved => Err(ModelError::unresolved(
                &self.target_key,
                self.kind,
                "reference is not resolved yet",
            )),
            Resolution::Failed => {
                Err(ModelError::unresolved(&self.target_key, self.kind, "no such key"))
            }
        }
    }

    pub(crate) fn transition(&mut self, next: Resolution) -> Result<(), ModelError> {
        if self.state != Resolution::Unresolved {
            return Err(ModelError::Internal {
                message: format!(
                    "reference to `{}` already left the unresolved state",
                    self.target_key
                )
                .into(),
                context: None,
            });
        }
        self.state = next;
        Ok(())
    }

    pub(crate) const fn reset(&mut self) {
        self.state = Resolution::Unresolved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_references_are_unresolved() {
        let reference = Reference::external("party-1");
        assert_eq!(reference.kind(), KeyKind::External);
        assert_eq!(reference.state(), Resolution::Unresolved);

        let err = reference.require().expect_err("unresolved");
        assert_eq!(err.kind(), "ReferenceResolution");
    }

    #[test]
    fn references_transition_once() {
        let mut reference = Reference::new("k-1");
        let handle = Handle::Object(ObjectId::from_index(0));

        reference.transition(Resolution::Resolved(handle)).expect("first transition");
        assert_eq!(reference.handle(), Some(handle));
        assert!(reference.transition(Resolution::Failed).is_err());
    }
}
