use super::{Graph, Node, ObjectId, Value};
use crate::error::ModelError;
use crate::meta::Meta;
use crate::resolver::{Item, Navigable, Projection};
use crate::scalar::Scalar;
use crate::schema::{Schema, TypeDef, ValueKind};
use fxhash::FxHashSet;
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Read-only view of one object: the receiver every condition and resolver
/// step works on.
#[derive(Clone, Copy)]
pub struct ObjectRef<'g> {
    graph: &'g Graph,
    id: ObjectId,
}

impl Debug for ObjectRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &self.id)
            .field("type", &self.type_name())
            .finish()
    }
}

impl<'g> ObjectRef<'g> {
    /// `id` must belong to `graph`.
    pub(crate) const fn new(graph: &'g Graph, id: ObjectId) -> Self {
        Self { graph, id }
    }

    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    #[must_use]
    pub const fn graph(&self) -> &'g Graph {
        self.graph
    }

    fn node(&self) -> &'g Node {
        &self.graph.nodes[self.id.0]
    }

    #[must_use]
    pub fn type_def(&self) -> &'g Arc<TypeDef> {
        &self.node().ty
    }

    #[must_use]
    pub fn type_name(&self) -> &'g str {
        self.node().ty.name()
    }

    #[must_use]
    pub fn meta(&self) -> &'g Meta {
        &self.node().meta
    }

    /// Raw stored values of a field, references not followed.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownField`] when the type lacks the field.
    pub fn values(&self, field: &str) -> Result<&'g [Value], ModelError> {
        let (index, _) = self.type_def().lookup(field)?;
        Ok(&self.node().slots[index])
    }

    pub(crate) fn slot(&self, index: usize) -> &'g [Value] {
        self.node().slots.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// # Errors
    /// Returns [`ModelError::UnknownField`] when the type lacks the field.
    pub fn is_set(&self, field: &str) -> Result<bool, ModelError> {
        Ok(!self.values(field)?.is_empty())
    }

    /// Projects one field; see [`Navigable`].
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownField`] or a resolution error for dangling references.
    pub fn get(&self, field: &str) -> Result<Projection<'g>, ModelError> {
        self.resolve(field)
    }

    /// Projects a dotted path such as `"party.account.number"`.
    ///
    /// # Errors
    /// See [`ObjectRef::get`].
    pub fn path(&self, path: &str) -> Result<Projection<'g>, ModelError> {
        self.resolve_path(path)
    }

    /// The scalar of a single-valued scalar field, when set.
    ///
    /// # Errors
    /// See [`ObjectRef::get`].
    pub fn scalar(&self, field: &str) -> Result<Option<&'g Scalar>, ModelError> {
        Ok(self.get(field)?.single().and_then(|item| item.as_scalar()))
    }

    /// `true` when every field named by `paths` is set and no other field of the
    /// objects holding them is. A dotted path such as `"bar.before"` checks
    /// `before` against the other fields of `bar`; an unset holder fails the check.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownField`] for fields the holding type lacks, or a
    /// resolution error for dangling references on the way.
    pub fn only_exists(&self, paths: &[&str]) -> Result<bool, ModelError> {
        let mut named: Vec<(ObjectRef<'g>, Vec<usize>)> = Vec::new();
        for path in paths {
            let (holders, field) = match path.rsplit_once('.') {
                Some((parent, field)) => (self.path(parent)?.objects(), field.trim()),
                None => (vec![*self], path.trim()),
            };
            if holders.is_empty() {
                return Ok(false);
            }
            for holder in holders {
                let (index, _) = holder.type_def().lookup(field)?;
                match named.iter_mut().find(|(seen, _)| *seen == holder) {
                    Some((_, fields)) => fields.push(index),
                    None => named.push((holder, vec![index])),
                }
            }
        }

        Ok(named.iter().all(|(holder, fields)| {
            (0..holder.type_def().fields().len())
                .all(|index| holder.slot(index).is_empty() != fields.contains(&index))
        }))
    }

    /// Projects `field` through a choice: from this object when its type declares
    /// the field, otherwise from whichever option is set, depth first.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownField`] when neither the type nor any type
    /// reachable through its object fields declares `field`.
    pub fn resolve_deep(&self, field: &str) -> Result<Projection<'g>, ModelError> {
        let schema = self.graph.schema();
        if !declares_deep(schema, self.type_def(), field, &mut FxHashSet::default())? {
            return Err(ModelError::UnknownField {
                type_name: self.type_name().to_owned(),
                field: field.to_owned(),
                context: None,
            });
        }
        self.find_deep(field, &mut FxHashSet::default())
    }

    fn find_deep(
        &self,
        field: &str,
        seen: &mut FxHashSet<ObjectId>,
    ) -> Result<Projection<'g>, ModelError> {
        if self.type_def().field_index(field).is_some() {
            return self.get(field);
        }
        if !seen.insert(self.id) {
            return Ok(Projection::Absent);
        }

        for (index, def) in self.type_def().fields().iter().enumerate() {
            if !matches!(def.kind(), ValueKind::Object(_)) {
                continue;
            }
            for value in self.slot(index) {
                if let Item::Object(option) = self.graph.deref(value)? {
                    let found = option.find_deep(field, seen)?;
                    if !found.is_absent() {
                        return Ok(found);
                    }
                }
            }
        }
        Ok(Projection::Absent)
    }
}

fn declares_deep(
    schema: &Schema,
    ty: &TypeDef,
    field: &str,
    seen: &mut FxHashSet<String>,
) -> Result<bool, ModelError> {
    if ty.field_index(field).is_some() {
        return Ok(true);
    }
    if !seen.insert(ty.name().to_owned()) {
        return Ok(false);
    }
    for def in ty.fields() {
        if let ValueKind::Object(name) = def.kind()
            && declares_deep(schema, schema.type_def(name)?, field, seen)?
        {
            return Ok(true);
        }
    }
    Ok(false)
}

impl PartialEq for ObjectRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for ObjectRef<'_> {}
