//! # JSON Wire Codec
//!
//! Reads and writes object graphs in the document shape below. Reading builds
//! the graph node by node, registers keys in a per-call registry and binds every
//! reference once the document is complete. Writing emits each object once and
//! points at it afterwards.
//!
//! ```json
//! {
//!   "@model": "demo.trade", "@type": "Trade", "@version": "1.0.0",
//!   "party": [ { "@key": "p1", "name": "Alpha" } ],
//!   "buyer": { "@ref": "p1" },
//!   "tradeDate": { "@data": "2024-03-01", "@key": "td" }
//! }
//! ```
//!
//! Nested objects carry `@type` only when they are a subtype of the declared
//! field type. Numbers keep their source digits.

mod error;
mod reader;
mod scalar;
mod writer;

pub use crate::error::{SerializationError, SerializationErrorExt};

use crate::reader::Reader;
use crate::writer::Writer;
use rune_domain::config::SerializationConfig;
use rune_model::{Document, Schema};
use serde_json::Value as Json;
use std::sync::Arc;
use tracing::instrument;

/// Reader and writer bound to one schema.
#[derive(Debug, Clone)]
pub struct JsonCodec {
    schema: Arc<Schema>,
    config: SerializationConfig,
    strict: bool,
}

impl JsonCodec {
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema, config: SerializationConfig::default(), strict: true }
    }

    #[must_use]
    pub fn with_config(mut self, config: SerializationConfig) -> Self {
        self.config = config;
        self
    }

    /// Check field cardinalities of every object while reading.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Reads a document whose root names its type with `@type`.
    ///
    /// # Errors
    /// Returns [`SerializationError::Json`] for invalid JSON,
    /// [`SerializationError::Format`] for documents off the wire format and
    /// [`SerializationError::Model`] for unknown types or fields, structural
    /// failures, duplicate keys and unresolvable references.
    #[instrument(
        level = "debug",
        skip_all,
        fields(model = %self.schema.model(), bytes = text.len())
    )]
    pub fn deserialize(&self, text: &str) -> Result<Document, SerializationError> {
        let json: Json = serde_json::from_str(text)?;
        self.from_json(&json, None)
    }

    /// Reads a document whose root is expected to be a `root_type`.
    ///
    /// # Errors
    /// See [`JsonCodec::deserialize`].
    pub fn deserialize_as(
        &self,
        text: &str,
        root_type: &str,
    ) -> Result<Document, SerializationError> {
        let json: Json = serde_json::from_str(text)?;
        self.from_json(&json, Some(root_type))
    }

    /// # Errors
    /// See [`JsonCodec::deserialize`].
    pub fn from_json(
        &self,
        json: &Json,
        root_type: Option<&str>,
    ) -> Result<Document, SerializationError> {
        Reader::new(Arc::clone(&self.schema), self.strict).read(json, root_type)
    }

    /// # Errors
    /// Returns [`SerializationError::Model`] for foreign handles and
    /// [`SerializationError::Format`] for numbers JSON cannot carry or objects
    /// only reachable through a keyed value.
    pub fn to_json(&self, document: &Document) -> Result<Json, SerializationError> {
        Writer::new(&document.graph, &self.config).write(document)
    }

    /// Writes `document`, pretty-printed when configured.
    ///
    /// # Errors
    /// See [`JsonCodec::to_json`].
    #[instrument(
        level = "debug",
        skip_all,
        fields(model = %self.schema.model(), objects = document.graph.len())
    )]
    pub fn serialize(&self, document: &Document) -> Result<String, SerializationError> {
        let json = self.to_json(document)?;
        let text = if self.config.pretty {
            serde_json::to_string_pretty(&json)?
        } else {
            serde_json::to_string(&json)?
        };
        Ok(text)
    }
}
