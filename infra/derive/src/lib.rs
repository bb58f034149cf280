#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the runtime crates.
//!
//! ## Usage
//! Every crate in the workspace declares its error enum with [`macro@rune_error`]:
//! ```toml
//! [dependencies]
//! rune-derive.workspace = true
//! thiserror.workspace = true
//! ```
//!
//! The examples are `ignore`d to avoid compiling in this crate; see `tests/` for
//! compiled usage.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining crate-level error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to `Result<T, Source>` for every wrapped source error.
/// * **Standard Conversions**: Implements `From<Source>` for variants with a `source`
///   field (or a field marked `#[source]`/`#[from]`), enabling `?` on upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
/// * **Kind Accessor**: `kind()` returns the variant name, handy as a structured
///   `tracing` field.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants wrapping a source error must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use rune_derive::rune_error;
/// use std::borrow::Cow;
///
/// #[rune_error]
/// pub enum CodecError {
///     #[error("JSON error{}: {source}", format_context(.context))]
///     Json { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal codec error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn parse(text: &str) -> Result<serde_json::Value, CodecError> {
///     serde_json::from_str(text).context("Parsing document")
/// }
/// ```
#[proc_macro_attribute]
pub fn rune_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
