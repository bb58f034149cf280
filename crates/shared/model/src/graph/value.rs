use super::ObjectId;
use crate::meta::{Meta, WithMeta};
use crate::reference::Reference;
use crate::scalar::{EnumValue, Scalar};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rune_domain::roles::KeyKind;
use rust_decimal::Decimal;

/// One value stored in a field slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(WithMeta<Scalar>),
    Enum(WithMeta<EnumValue>),
    /// A contained object.
    Object(ObjectId),
    Reference(Reference),
}

impl Value {
    /// Metadata carried by scalar and enum values.
    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        match self {
            Self::Scalar(v) => Some(v.meta()),
            Self::Enum(v) => Some(v.meta()),
            Self::Object(_) | Self::Reference(_) => None,
        }
    }

    #[must_use]
    pub const fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(r) => Some(r),
            _ => None,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Scalar(v) => format!("{} value", v.value().kind()),
            Self::Enum(v) => format!("`{}` member", v.value().enumeration()),
            Self::Object(id) => format!("object {id}"),
            Self::Reference(r) => format!("{} reference", r.kind()),
        }
    }
}

/// A value or a nested object waiting to be inserted into a graph.
#[derive(Debug, Clone)]
pub enum FieldDraft {
    Value(Value),
    Object(DataObject),
}

impl From<DataObject> for FieldDraft {
    fn from(object: DataObject) -> Self {
        Self::Object(object)
    }
}

macro_rules! value_from {
    (wrapped: $($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }

            impl From<$ty> for FieldDraft {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
    (scalar: $($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Scalar(WithMeta::new(Scalar::from(value)))
                }
            }

            impl From<$ty> for FieldDraft {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

value_from! {
    wrapped:
    Scalar => Scalar,
    WithMeta<Scalar> => Scalar,
    EnumValue => Enum,
    WithMeta<EnumValue> => Enum,
    ObjectId => Object,
    Reference => Reference,
}

value_from! {
    scalar: i64, i32, Decimal, String, &str, bool,
    NaiveDate, NaiveDateTime, DateTime<FixedOffset>, NaiveTime,
}

/// Owned description of an object and its nested objects, inserted in one
/// step with [`super::Graph::insert`].
#[derive(Debug, Clone)]
pub struct DataObject {
    pub(crate) type_name: String,
    pub(crate) meta: Meta,
    pub(crate) fields: Vec<(String, Vec<FieldDraft>)>,
}

impl DataObject {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), meta: Meta::default(), fields: Vec::new() }
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

    /// Replaces the field's values with a single one.
    #[must_use]
    pub fn set(self, field: impl Into<String>, value: impl Into<FieldDraft>) -> Self {
        self.set_many(field, [value])
    }

    #[must_use]
    pub fn set_many<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldDraft>,
    {
        let field = field.into();
        let values: Vec<FieldDraft> = values.into_iter().map(Into::into).collect();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = values,
            None => self.fields.push((field, values)),
        }
        self
    }

    /// Appends one value to the field.
    #[must_use]
    pub fn push(mut self, field: impl Into<String>, value: impl Into<FieldDraft>) -> Self {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => slot.push(value.into()),
            None => self.fields.push((field, vec![value.into()])),
        }
        self
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}
