//! Attribute projection over objects and collections of objects.
//!
//! Projecting a field from a collection distributes the step over every element
//! and combines the results by the field's cardinality on the element type:
//!
//! * multi-valued fields concatenate, element order first, then value order;
//! * single-valued fields give one entry per element, absences included, so
//!   entries line up with the receiving elements.
//!
//! Either way, when no element has the field set the whole result is
//! [`Projection::Absent`] rather than a list of absences.

use crate::error::ModelError;
use crate::graph::ObjectRef;
use crate::meta::WithMeta;
use crate::scalar::{EnumValue, Scalar};
use std::borrow::Cow;

/// One projected value, references already followed.
#[derive(Debug, Clone, Copy)]
pub enum Item<'g> {
    Scalar(&'g WithMeta<Scalar>),
    Enum(&'g WithMeta<EnumValue>),
    Object(ObjectRef<'g>),
}

impl<'g> Item<'g> {
    #[must_use]
    pub fn as_scalar(&self) -> Option<&'g Scalar> {
        match self {
            Self::Scalar(v) => Some(v.value()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_enum(&self) -> Option<&'g EnumValue> {
        match self {
            Self::Enum(v) => Some(v.value()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<ObjectRef<'g>> {
        match self {
            Self::Object(o) => Some(*o),
            _ => None,
        }
    }

    fn describe(&self) -> Cow<'static, str> {
        match self {
            Self::Scalar(v) => Cow::Owned(format!("{} scalar", v.value().kind())),
            Self::Enum(_) => Cow::Borrowed("enum"),
            Self::Object(_) => Cow::Borrowed("object"),
        }
    }
}

impl PartialEq for Item<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

/// How many present items an existence check asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Necessity {
    /// At least one.
    #[default]
    Any,
    /// Exactly one.
    Single,
    /// More than one.
    Multiple,
}

/// Result of a resolver step.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection<'g> {
    Absent,
    One(Item<'g>),
    /// A collection; `None` entries mark elements where a single-valued field is unset.
    Many(Vec<Option<Item<'g>>>),
}

impl<'g> Projection<'g> {
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Present items in order, absences skipped.
    pub fn items(&self) -> impl Iterator<Item = Item<'g>> + '_ {
        let many = match self {
            Self::Many(items) => items.as_slice(),
            _ => &[],
        };
        let one = match self {
            Self::One(item) => Some(*item),
            _ => None,
        };
        one.into_iter().chain(many.iter().filter_map(|item| *item))
    }

    /// Number of present items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items().count()
    }

    #[must_use]
    pub fn exists(&self, necessity: Necessity) -> bool {
        let count = self.count();
        match necessity {
            Necessity::Any => count > 0,
            Necessity::Single => count == 1,
            Necessity::Multiple => count > 1,
        }
    }

    /// The present item when there is exactly one, whatever the cardinality.
    #[must_use]
    pub fn only_element(&self) -> Option<Item<'g>> {
        let mut items = self.items();
        match (items.next(), items.next()) {
            (Some(item), None) => Some(item),
            _ => None,
        }
    }

    /// The item of a single-valued projection.
    #[must_use]
    pub const fn single(&self) -> Option<Item<'g>> {
        match self {
            Self::One(item) => Some(*item),
            _ => None,
        }
    }

    /// Present scalars in order.
    #[must_use]
    pub fn scalars(&self) -> Vec<&'g Scalar> {
        self.items().filter_map(|item| item.as_scalar()).collect()
    }

    /// Present objects in order.
    #[must_use]
    pub fn objects(&self) -> Vec<ObjectRef<'g>> {
        self.items().filter_map(|item| item.as_object()).collect()
    }
}

/// Receivers the attribute resolver can step through.
pub trait Navigable<'g> {
    /// Projects `field` from the receiver.
    ///
    /// # Errors
    /// Returns [`ModelError::UnknownField`] for fields the receiving type lacks,
    /// [`ModelError::NotNavigable`] for scalar receivers and resolution errors for
    /// dangling references.
    fn resolve(&self, field: &str) -> Result<Projection<'g>, ModelError>;

    /// Chains [`Navigable::resolve`] over a dotted path.
    ///
    /// # Errors
    /// See [`Navigable::resolve`].
    fn resolve_path(&self, path: &str) -> Result<Projection<'g>, ModelError> {
        let mut steps = path.split('.').map(str::trim);
        let first = steps.next().unwrap_or_default();
        steps.try_fold(self.resolve(first)?, |projection, step| projection.resolve(step))
    }
}

/// Free-function form of [`Navigable::resolve`].
///
/// # Errors
/// See [`Navigable::resolve`].
pub fn resolve<'g, R>(receiver: &R, field: &str) -> Result<Projection<'g>, ModelError>
where
    R: Navigable<'g> + ?Sized,
{
    receiver.resolve(field)
}

impl<'g> Navigable<'g> for ObjectRef<'g> {
    fn resolve(&self, field: &str) -> Result<Projection<'g>, ModelError> {
        let (index, def) = self.type_def().lookup(field)?;
        let values = self.slot(index);
        let graph = self.graph();

        match values {
            [] => Ok(Projection::Absent),
            [value] if !def.is_multi() => graph.deref(value).map(Projection::One),
            values => values
                .iter()
                .map(|value| graph.deref(value).map(Some))
                .collect::<Result<Vec<_>, _>>()
                .map(Projection::Many),
        }
    }
}

impl<'g> Navigable<'g> for Item<'g> {
    fn resolve(&self, field: &str) -> Result<Projection<'g>, ModelError> {
        match self {
            Self::Object(object) => object.resolve(field),
            Self::Enum(_) => Ok(Projection::Absent),
            Self::Scalar(_) => Err(ModelError::NotNavigable {
                field: field.to_owned(),
                receiver: self.describe(),
                context: None,
            }),
        }
    }
}

impl<'g> Navigable<'g> for Projection<'g> {
    fn resolve(&self, field: &str) -> Result<Projection<'g>, ModelError> {
        match self {
            Self::Absent => Ok(Self::Absent),
            Self::One(item) => item.resolve(field),
            Self::Many(items) => distribute(items, field),
        }
    }
}

impl<'g> Navigable<'g> for [ObjectRef<'g>] {
    fn resolve(&self, field: &str) -> Result<Projection<'g>, ModelError> {
        let items: Vec<_> = self.iter().map(|o| Some(Item::Object(*o))).collect();
        distribute(&items, field)
    }
}

impl<'g> Navigable<'g> for [Item<'g>] {
    fn resolve(&self, field: &str) -> Result<Projection<'g>, ModelError> {
        let items: Vec<_> = self.iter().copied().map(Some).collect();
        distribute(&items, field)
    }
}

fn distribute<'g>(
    elements: &[Option<Item<'g>>],
    field: &str,
) -> Result<Projection<'g>, ModelError> {
    let mut multi = None;
    let mut results = Vec::with_capacity(elements.len());

    for element in elements {
        let Some(item) = element else {
            results.push(Projection::Absent);
            continue;
        };
        if let (None, Item::Object(object)) = (multi, item) {
            multi = Some(object.type_def().lookup(field)?.1.is_multi());
        }
        results.push(item.resolve(field)?);
    }

    if results.iter().all(Projection::is_absent) {
        return Ok(Projection::Absent);
    }

    let mut combined = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Projection::Absent if multi == Some(true) => {}
            Projection::Absent => combined.push(None),
            Projection::One(item) => combined.push(Some(item)),
            Projection::Many(items) => combined.extend(items),
        }
    }
    Ok(Projection::Many(combined))
}
