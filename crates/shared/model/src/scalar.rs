use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use std::fmt::{self, Display};
use strum_macros::{Display as StrumDisplay, EnumString, IntoStaticStr};

/// Built-in scalar types of the modeling language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum ScalarKind {
    Int,
    Number,
    String,
    Boolean,
    Date,
    DateTime,
    ZonedDateTime,
    Time,
}

/// A scalar value. Kinds never convert into each other implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int(i64),
    Number(Decimal),
    String(String),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    ZonedDateTime(DateTime<FixedOffset>),
    Time(NaiveTime),
}

impl Scalar {
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Int(_) => ScalarKind::Int,
            Self::Number(_) => ScalarKind::Number,
            Self::String(_) => ScalarKind::String,
            Self::Boolean(_) => ScalarKind::Boolean,
            Self::Date(_) => ScalarKind::Date,
            Self::DateTime(_) => ScalarKind::DateTime,
            Self::ZonedDateTime(_) => ScalarKind::ZonedDateTime,
            Self::Time(_) => ScalarKind::Time,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view over `int` and `number` scalars.
    #[must_use]
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(i) => Some(Decimal::from(*i)),
            Self::Number(d) => Some(*d),
            _ => None,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::ZonedDateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Time(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

scalar_from! {
    i64 => Int,
    i32 => Int,
    Decimal => Number,
    String => String,
    &str => String,
    bool => Boolean,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => ZonedDateTime,
    NaiveTime => Time,
}

/// A member of a declared enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    enumeration: String,
    member: String,
}

impl EnumValue {
    pub fn new(enumeration: impl Into<String>, member: impl Into<String>) -> Self {
        Self { enumeration: enumeration.into(), member: member.into() }
    }

    #[must_use]
    pub fn enumeration(&self) -> &str {
        &self.enumeration
    }

    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }
}

impl Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.enumeration, self.member)
    }
}
