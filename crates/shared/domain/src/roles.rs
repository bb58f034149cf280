use crate::constants::{KEY, KEY_EXTERNAL, KEY_SCOPED, REF, REF_EXTERNAL, REF_SCOPED};
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Debug, Display};

bitflags! {
    /// Metadata roles a field admits on its values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct MetaRoles: u8 {
        const KEY = 1 << 0;
        const KEY_EXTERNAL = 1 << 1;
        const KEY_SCOPED = 1 << 2;
        const REF = 1 << 3;
        const REF_EXTERNAL = 1 << 4;
        const REF_SCOPED = 1 << 5;

        const KEYS = Self::KEY.bits() | Self::KEY_EXTERNAL.bits() | Self::KEY_SCOPED.bits();
        const REFS = Self::REF.bits() | Self::REF_EXTERNAL.bits() | Self::REF_SCOPED.bits();
        const ALL = Self::KEYS.bits() | Self::REFS.bits();
    }
}

impl MetaRoles {
    /// Roles of a field that may be shared by key and pointed at by reference,
    /// the usual shape of an attribute holding another business object.
    pub const KEYED_REF: Self = Self::KEY
        .union(Self::KEY_EXTERNAL)
        .union(Self::REF)
        .union(Self::REF_EXTERNAL);

    /// Parses a comma separated token list such as `"@key,@ref:external"`.
    /// Unknown tokens are ignored.
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        list.split(',').map(str::trim).map(Self::from).fold(Self::empty(), Self::union)
    }
}

impl From<&str> for MetaRoles {
    fn from(s: &str) -> Self {
        match s {
            KEY => Self::KEY,
            KEY_EXTERNAL => Self::KEY_EXTERNAL,
            KEY_SCOPED => Self::KEY_SCOPED,
            REF => Self::REF,
            REF_EXTERNAL => Self::REF_EXTERNAL,
            REF_SCOPED => Self::REF_SCOPED,
            "all" | "*" => Self::ALL,
            _ => Self::empty(),
        }
    }
}

impl From<u8> for MetaRoles {
    fn from(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl Serialize for MetaRoles {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for MetaRoles {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// The three key spaces a document may use. A reference only ever resolves
/// against keys of its own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    Internal,
    External,
    Scoped,
}

impl KeyKind {
    pub const ALL: [Self; 3] = [Self::Internal, Self::External, Self::Scoped];

    #[must_use]
    pub const fn key_role(self) -> MetaRoles {
        match self {
            Self::Internal => MetaRoles::KEY,
            Self::External => MetaRoles::KEY_EXTERNAL,
            Self::Scoped => MetaRoles::KEY_SCOPED,
        }
    }

    #[must_use]
    pub const fn ref_role(self) -> MetaRoles {
        match self {
            Self::Internal => MetaRoles::REF,
            Self::External => MetaRoles::REF_EXTERNAL,
            Self::Scoped => MetaRoles::REF_SCOPED,
        }
    }

    #[must_use]
    pub const fn key_token(self) -> &'static str {
        match self {
            Self::Internal => KEY,
            Self::External => KEY_EXTERNAL,
            Self::Scoped => KEY_SCOPED,
        }
    }

    #[must_use]
    pub const fn ref_token(self) -> &'static str {
        match self {
            Self::Internal => REF,
            Self::External => REF_EXTERNAL,
            Self::Scoped => REF_SCOPED,
        }
    }

    #[must_use]
    pub fn from_key_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key_token() == token)
    }

    #[must_use]
    pub fn from_ref_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.ref_token() == token)
    }
}

impl Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Scoped => "scoped",
        })
    }
}
