mod equality;
mod object;
mod value;

pub use object::ObjectRef;
pub use value::{DataObject, FieldDraft, Value};

use crate::error::{ModelError, ModelErrorExt};
use crate::meta::Meta;
use crate::reference::{Handle, Resolution, ValueLoc};
use crate::registry::ObjectRegistry;
use crate::resolver::Item;
use crate::schema::{FieldDef, Schema, TypeDef, ValueKind};
use fxhash::FxHashSet;
use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::sync::Arc;
use tracing::{debug, trace};

/// Stable handle of an object inside one [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    #[cfg(test)]
    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index)
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) ty: Arc<TypeDef>,
    pub(crate) meta: Meta,
    pub(crate) slots: Vec<Vec<Value>>,
}

/// Arena of objects sharing one schema.
///
/// Objects are allocated first and wired afterwards, so cycles are built by
/// handle: [`Graph::create`] both ends, then [`Graph::set`] the fields.
/// A single-valued field holds at most one value; an empty slot is unset.
#[derive(Debug, Clone)]
pub struct Graph {
    schema: Arc<Schema>,
    nodes: Vec<Node>,
}

/// A graph plus the handle of its root object.
#[derive(Debug, Clone)]
pub struct Document {
    pub graph: Graph,
    pub root: ObjectId,
}

impl Document {
    #[must_use]
    pub fn root(&self) -> ObjectRef<'_> {
        ObjectRef::new(&self.graph, self.root)
    }

    /// Field-for-field equality of the two root objects.
    #[must_use]
    pub fn deep_eq(&self, other: &Self) -> bool {
        self.graph.deep_eq(self.root, &other.graph, other.root)
    }
}

impl Graph {
    #[must_use]
    pub const fn new(schema: Arc<Schema>) -> Self {
        Self { schema, nodes: Vec::new() }
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Handles in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + use<> {
        (0..self.nodes.len()).map(ObjectId)
    }

    /// Allocates an object with every field unset.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownType`] when the schema lacks the type.
    pub fn create(&mut self, type_name: &str) -> Result<ObjectId, ModelError> {
        let ty = Arc::clone(self.schema.type_def(type_name)?);
        let id = ObjectId(self.nodes.len());
        let slots = vec![Vec::new(); ty.fields().len()];
        self.nodes.push(Node { slots, ty, meta: Meta::default() });
        trace!(%id, r#type = type_name, "Object allocated");
        Ok(id)
    }

    /// # Errors
    /// Returns [`ModelError::Internal`] for a handle from another graph.
    pub fn object(&self, id: ObjectId) -> Result<ObjectRef<'_>, ModelError> {
        self.node(id)?;
        Ok(ObjectRef::new(self, id))
    }

    /// # Errors
    /// Returns [`ModelError::Internal`] for a handle from another graph.
    pub fn type_of(&self, id: ObjectId) -> Result<&Arc<TypeDef>, ModelError> {
        Ok(&self.node(id)?.ty)
    }

    /// # Errors
    /// Returns [`ModelError::Structural`] for blank keys.
    pub fn set_meta(&mut self, id: ObjectId, meta: Meta) -> Result<(), ModelError> {
        meta.check_keys().context(format!("object {id}"))?;
        self.node_mut(id)?.meta = meta;
        Ok(())
    }

    /// Replaces the field's values with `value`.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownField`] or [`ModelError::Structural`] when the
    /// value does not fit the field's type or metadata roles.
    pub fn set(
        &mut self,
        id: ObjectId,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        self.set_many(id, field, [value])
    }

    /// Replaces the field's values.
    ///
    /// # Errors
    /// See [`Graph::set`]; additionally fails when more values are given than the
    /// field's upper bound allows.
    pub fn set_many<I, V>(&mut self, id: ObjectId, field: &str, values: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let ty = Arc::clone(self.type_of(id)?);
        let (index, def) = ty.lookup(field)?;

        let mut values: Vec<Value> = values.into_iter().map(Into::into).collect();
        check_upper(&ty, def, values.len())?;
        for value in &mut values {
            self.admit(&ty, def, value)?;
        }

        self.node_mut(id)?.slots[index] = values;
        Ok(())
    }

    /// Appends `value` to the field.
    ///
    /// # Errors
    /// See [`Graph::set_many`].
    pub fn push(
        &mut self,
        id: ObjectId,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<(), ModelError> {
        let ty = Arc::clone(self.type_of(id)?);
        let (index, def) = ty.lookup(field)?;

        let mut value = value.into();
        let count = self.node(id)?.slots[index].len() + 1;
        check_upper(&ty, def, count)?;
        self.admit(&ty, def, &mut value)?;

        self.node_mut(id)?.slots[index].push(value);
        Ok(())
    }

    /// Unsets the field.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownField`] when the type lacks the field.
    pub fn clear(&mut self, id: ObjectId, field: &str) -> Result<(), ModelError> {
        let (index, _) = self.type_of(id)?.lookup(field)?;
        self.node_mut(id)?.slots[index].clear();
        Ok(())
    }

    /// Inserts a draft together with its nested drafts and checks that every
    /// inserted object satisfies its field cardinalities.
    ///
    /// # Errors
    /// Returns the first type, role or cardinality error.
    pub fn insert(&mut self, draft: DataObject) -> Result<ObjectId, ModelError> {
        let id = self.create(&draft.type_name)?;
        self.set_meta(id, draft.meta)?;
        for (field, drafts) in draft.fields {
            let mut values = Vec::with_capacity(drafts.len());
            for item in drafts {
                values.push(match item {
                    FieldDraft::Value(value) => value,
                    FieldDraft::Object(nested) => Value::Object(self.insert(nested)?),
                });
            }
            self.set_many(id, &field, values)?;
        }
        self.check_cardinality(id)?;
        Ok(id)
    }

    /// Checks lower and upper bounds of every field of one object.
    ///
    /// # Errors
    /// Returns [`ModelError::Structural`] naming the first offending field.
    pub fn check_cardinality(&self, id: ObjectId) -> Result<(), ModelError> {
        let node = self.node(id)?;
        for (def, slot) in node.ty.fields().iter().zip(&node.slots) {
            if !def.bounds().admits(slot.len()) {
                return Err(ModelError::structural(format!(
                    "field `{}.{}` expects {} values, found {}",
                    node.ty.name(),
                    def.name(),
                    def.bounds(),
                    slot.len()
                )))
                .context(format!("object {id}"));
            }
        }
        Ok(())
    }

    /// Checks the metadata rules on every value of one object.
    ///
    /// # Errors
    /// Returns [`ModelError::Structural`] for blank keys and undeclared roles.
    pub fn check_roles(&self, id: ObjectId) -> Result<(), ModelError> {
        let node = self.node(id)?;
        node.meta.check_keys().context(format!("object {id}"))?;
        for (def, slot) in node.ty.fields().iter().zip(&node.slots) {
            for value in slot {
                admit_roles(&node.ty, def, value)?;
            }
        }
        Ok(())
    }

    /// Every object reachable from `root` through contained fields and resolved
    /// references, each once, in breadth-first order.
    ///
    /// # Errors
    /// Returns [`ModelError::Internal`] for a foreign handle.
    pub fn reachable(&self, root: ObjectId) -> Result<Vec<ObjectId>, ModelError> {
        self.walk(root, true)
    }

    /// Like [`Graph::reachable`] but only through contained fields.
    ///
    /// # Errors
    /// Returns [`ModelError::Internal`] for a foreign handle.
    pub fn contained(&self, root: ObjectId) -> Result<Vec<ObjectId>, ModelError> {
        self.walk(root, false)
    }

    fn walk(&self, root: ObjectId, follow_references: bool) -> Result<Vec<ObjectId>, ModelError> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([root]);

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            for value in self.node(id)?.slots.iter().flatten() {
                let next = match value {
                    Value::Object(child) => Some(*child),
                    Value::Reference(r) if follow_references => match r.handle() {
                        Some(Handle::Object(target)) => Some(target),
                        Some(Handle::Value(loc)) => Some(loc.owner),
                        None => None,
                    },
                    _ => None,
                };
                if let Some(next) = next.filter(|n| !seen.contains(n)) {
                    queue.push_back(next);
                }
            }
        }

        Ok(order)
    }

    /// Registers the keys of one object and of its keyed values, and returns
    /// the locations of the references it holds.
    ///
    /// # Errors
    /// Returns [`ModelError::Structural`] for blank keys.
    pub fn register_keys(
        &self,
        id: ObjectId,
        registry: &mut ObjectRegistry,
    ) -> Result<Vec<ValueLoc>, ModelError> {
        let node = self.node(id)?;
        for (kind, key) in node.meta.keys() {
            registry.register(kind, key, Handle::Object(id))?;
        }

        let mut references = Vec::new();
        for (field, slot) in node.slots.iter().enumerate() {
            for (position, value) in slot.iter().enumerate() {
                let loc = ValueLoc { owner: id, field, position };
                match value {
                    Value::Reference(_) => references.push(loc),
                    other => {
                        for (kind, key) in other.meta().into_iter().flat_map(Meta::keys) {
                            registry.register(kind, key, Handle::Value(loc))?;
                        }
                    }
                }
            }
        }
        Ok(references)
    }

    /// Re-resolves every reference of the graph against a fresh registry of all
    /// keys it holds, in allocation order. Duplicate keys and incompatible
    /// targets leave every reference as it was.
    ///
    /// # Errors
    /// Returns [`ModelError::RegistryKeyCollision`] for duplicate keys and
    /// [`ModelError::ReferenceResolution`] for missing or incompatible targets.
    pub fn resolve_references(&mut self) -> Result<usize, ModelError> {
        let mut registry = ObjectRegistry::new();
        let mut pending = Vec::new();
        for id in self.ids() {
            pending.extend(self.register_keys(id, &mut registry)?);
        }

        debug!(keys = registry.len(), pending = pending.len(), "Resolving graph references");
        registry.resolve_all(self, pending)
    }

    /// Follows resolved references to the value or object they alias.
    ///
    /// # Errors
    /// Returns [`ModelError::ReferenceResolution`] for unresolved or failed references.
    pub fn deref<'g>(&'g self, value: &'g Value) -> Result<Item<'g>, ModelError> {
        match value {
            Value::Scalar(v) => Ok(Item::Scalar(v)),
            Value::Enum(v) => Ok(Item::Enum(v)),
            Value::Object(id) => self.object(*id).map(Item::Object),
            Value::Reference(r) => match r.require()? {
                Handle::Object(id) => self.object(id).map(Item::Object),
                Handle::Value(loc) => match self.value_at(loc)? {
                    Value::Scalar(v) => Ok(Item::Scalar(v)),
                    Value::Enum(v) => Ok(Item::Enum(v)),
                    other => Err(ModelError::Internal {
                        message: format!(
                            "key `{}` points at an {}",
                            r.target_key(),
                            other.describe()
                        )
                        .into(),
                        context: None,
                    }),
                },
            },
        }
    }

    pub(crate) fn node(&self, id: ObjectId) -> Result<&Node, ModelError> {
        self.nodes.get(id.0).ok_or_else(|| unknown_handle(id))
    }

    fn node_mut(&mut self, id: ObjectId) -> Result<&mut Node, ModelError> {
        self.nodes.get_mut(id.0).ok_or_else(|| unknown_handle(id))
    }

    pub(crate) fn value_at(&self, loc: ValueLoc) -> Result<&Value, ModelError> {
        self.node(loc.owner)?
            .slots
            .get(loc.field)
            .and_then(|slot| slot.get(loc.position))
            .ok_or_else(|| unknown_location(loc))
    }

    fn value_at_mut(&mut self, loc: ValueLoc) -> Result<&mut Value, ModelError> {
        self.node_mut(loc.owner)?
            .slots
            .get_mut(loc.field)
            .and_then(|slot| slot.get_mut(loc.position))
            .ok_or_else(|| unknown_location(loc))
    }

    pub(crate) fn field_at(&self, loc: ValueLoc) -> Result<(&Arc<TypeDef>, &FieldDef), ModelError> {
        let ty = self.type_of(loc.owner)?;
        let def = ty.field_at(loc.field).ok_or_else(|| unknown_location(loc))?;
        Ok((ty, def))
    }

    /// Starts a new resolution pass for the reference at `loc` and moves it to `next`.
    pub(crate) fn rebind(&mut self, loc: ValueLoc, next: Resolution) -> Result<(), ModelError> {
        match self.value_at_mut(loc)? {
            Value::Reference(r) => {
                r.reset();
                r.transition(next)
            }
            other => Err(ModelError::Internal {
                message: format!(
                    "expected a reference at {}, found {}",
                    Handle::Value(loc),
                    other.describe()
                )
                .into(),
                context: None,
            }),
        }
    }

    /// Checks type compatibility and stamps the field's roles onto `value`.
    fn admit(&self, ty: &TypeDef, def: &FieldDef, value: &mut Value) -> Result<(), ModelError> {
        let fits = match (def.kind(), &*value) {
            (_, Value::Reference(_)) => true,
            (ValueKind::Scalar(kind), Value::Scalar(v)) => v.value().kind() == *kind,
            (ValueKind::Enum(name), Value::Enum(v)) => {
                v.value().enumeration() == name
                    && self.schema.enumeration(name).is_some_and(|e| e.contains(v.value().member()))
            }
            (ValueKind::Object(name), Value::Object(id)) => self.type_of(*id)?.is_a(name),
            _ => false,
        };
        if !fits {
            return Err(ModelError::structural(format!(
                "field `{}.{}` expects {}, got {}",
                ty.name(),
                def.name(),
                def.kind(),
                value.describe()
            )));
        }

        match value {
            Value::Scalar(v) => v.set_declared_roles(def.allowed_roles()),
            Value::Enum(v) => v.set_declared_roles(def.allowed_roles()),
            Value::Object(_) | Value::Reference(_) => {}
        }
        admit_roles(ty, def, value)
    }
}

/// Metadata rules for one stored value. Objects may always be shared by handle,
/// so only scalar and enum fields restrict keys and references.
fn admit_roles(ty: &TypeDef, def: &FieldDef, value: &Value) -> Result<(), ModelError> {
    let field = || format!("field `{}.{}`", ty.name(), def.name());
    match value {
        Value::Scalar(v) => v.check_roles().context(field()),
        Value::Enum(v) => v.check_roles().context(field()),
        Value::Object(_) => Ok(()),
        Value::Reference(r) => {
            if r.target_key().trim().is_empty() {
                return Err(ModelError::structural("empty reference key")).context(field());
            }
            let object_field = matches!(def.kind(), ValueKind::Object(_));
            if object_field || def.allowed_roles().contains(r.kind().ref_role()) {
                Ok(())
            } else {
                let token = r.kind().ref_token();
                Err(ModelError::structural(format!("{token} references are not declared")))
                    .context(field())
            }
        }
    }
}

fn check_upper(ty: &TypeDef, def: &FieldDef, count: usize) -> Result<(), ModelError> {
    match def.bounds().upper {
        Some(upper) if count > upper => Err(ModelError::structural(format!(
            "field `{}.{}` holds at most {upper} values, got {count}",
            ty.name(),
            def.name()
        ))),
        _ => Ok(()),
    }
}

fn unknown_handle(id: ObjectId) -> ModelError {
    ModelError::Internal { message: format!("unknown object handle {id}").into(), context: None }
}

fn unknown_location(loc: ValueLoc) -> ModelError {
    ModelError::Internal {
        message: format!("no value at {}", Handle::Value(loc)).into(),
        context: None,
    }
}
