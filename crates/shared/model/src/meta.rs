use crate::error::ModelError;
use rune_domain::roles::{KeyKind, MetaRoles};
use std::hash::{Hash, Hasher};

/// Key and scheme metadata attached to a value or an object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub key: Option<String>,
    pub external_key: Option<String>,
    pub scoped_key: Option<String>,
    pub scheme: Option<String>,
}

impl Meta {
    #[must_use]
    pub fn with_key(mut self, kind: KeyKind, key: impl Into<String>) -> Self {
        *self.slot_mut(kind) = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    #[must_use]
    pub fn key(&self, kind: KeyKind) -> Option<&str> {
        match kind {
            KeyKind::Internal => self.key.as_deref(),
            KeyKind::External => self.external_key.as_deref(),
            KeyKind::Scoped => self.scoped_key.as_deref(),
        }
    }

    pub fn set_key(&mut self, kind: KeyKind, key: impl Into<String>) {
        *self.slot_mut(kind) = Some(key.into());
    }

    /// Present keys in `internal, external, scoped` order.
    pub fn keys(&self) -> impl Iterator<Item = (KeyKind, &str)> {
        KeyKind::ALL.into_iter().filter_map(|kind| self.key(kind).map(|key| (kind, key)))
    }

    #[must_use]
    pub fn has_keys(&self) -> bool {
        self.keys().next().is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_keys() && self.scheme.is_none()
    }

    /// Key roles implied by the keys actually present.
    #[must_use]
    pub fn present_roles(&self) -> MetaRoles {
        self.keys().fold(MetaRoles::empty(), |roles, (kind, _)| roles | kind.key_role())
    }

    /// Every present key must be non-empty.
    ///
    /// # Errors
    /// Returns [`ModelError::Structural`] naming the first empty key.
    pub fn check_keys(&self) -> Result<(), ModelError> {
        match self.keys().find(|(_, key)| key.trim().is_empty()) {
            Some((kind, _)) => Err(ModelError::structural(format!("empty {kind} key"))),
            None => Ok(()),
        }
    }

    const fn slot_mut(&mut self, kind: KeyKind) -> &mut Option<String> {
        match kind {
            KeyKind::Internal => &mut self.key,
            KeyKind::External => &mut self.external_key,
            KeyKind::Scoped => &mut self.scoped_key,
        }
    }
}

/// A scalar or enum value carrying key metadata.
///
/// Equality and hashing only look at the wrapped value; metadata is reached
/// through [`WithMeta::meta`].
#[derive(Debug, Clone)]
pub struct WithMeta<T> {
    value: T,
    meta: Meta,
    roles: MetaRoles,
}

impl<T> WithMeta<T> {
    pub const fn new(value: T) -> Self {
        let meta = Meta { key: None, external_key: None, scoped_key: None, scheme: None };
        Self { value, meta, roles: MetaRoles::empty() }
    }

    #[must_use]
    pub fn key(self, key: impl Into<String>) -> Self {
        self.keyed(KeyKind::Internal, key)
    }

    #[must_use]
    pub fn external_key(self, key: impl Into<String>) -> Self {
        self.keyed(KeyKind::External, key)
    }

    #[must_use]
    pub fn scoped_key(self, key: impl Into<String>) -> Self {
        self.keyed(KeyKind::Scoped, key)
    }

    #[must_use]
    pub fn keyed(mut self, kind: KeyKind, key: impl Into<String>) -> Self {
        self.meta.set_key(kind, key);
        self
    }

    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.meta.scheme = Some(scheme.into());
        self
    }

    /// Declares the roles this value may play. Values stored in a graph take
    /// the roles of their field.
    #[must_use]
    pub const fn roles(mut self, roles: MetaRoles) -> Self {
        self.roles = roles;
        self
    }

    #[must_use]
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub const fn value(&self) -> &T {
        &self.value
    }

    pub const fn meta(&self) -> &Meta {
        &self.meta
    }

    pub const fn declared_roles(&self) -> MetaRoles {
        self.roles
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub(crate) const fn set_declared_roles(&mut self, roles: MetaRoles) {
        self.roles = roles;
    }

    /// Present keys must be non-empty and covered by the declared roles.
    ///
    /// # Errors
    /// Returns [`ModelError::Structural`] on the first offending key.
    pub fn check_roles(&self) -> Result<(), ModelError> {
        self.meta.check_keys()?;
        let undeclared = self.meta.present_roles().difference(self.roles);
        if undeclared.is_empty() {
            Ok(())
        } else {
            Err(ModelError::structural(format!("metadata roles {undeclared:?} are not declared")))
        }
    }
}

impl<T> From<T> for WithMeta<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: PartialEq> PartialEq for WithMeta<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for WithMeta<T> {}

impl<T: Hash> Hash for WithMeta<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}
