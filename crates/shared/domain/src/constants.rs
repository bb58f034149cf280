//! Wire-format tokens of the JSON document shape.

pub const KEY: &str = "@key";
pub const KEY_EXTERNAL: &str = "@key:external";
pub const KEY_SCOPED: &str = "@key:scoped";

pub const REF: &str = "@ref";
pub const REF_EXTERNAL: &str = "@ref:external";
pub const REF_SCOPED: &str = "@ref:scoped";

pub const SCHEME: &str = "@scheme";
pub const DATA: &str = "@data";

pub const TYPE: &str = "@type";
pub const MODEL: &str = "@model";
pub const VERSION: &str = "@version";

/// Every token that may open a metadata entry inside an object body.
pub const METADATA_TOKENS: [&str; 11] = [
    KEY,
    KEY_EXTERNAL,
    KEY_SCOPED,
    REF,
    REF_EXTERNAL,
    REF_SCOPED,
    SCHEME,
    DATA,
    TYPE,
    MODEL,
    VERSION,
];

/// Returns `true` when `name` is a reserved wire token rather than a field name.
#[must_use]
pub fn is_metadata_token(name: &str) -> bool {
    name.starts_with('@') && METADATA_TOKENS.contains(&name)
}
