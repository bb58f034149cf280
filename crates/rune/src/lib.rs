//! Facade crate for the Rune object-graph runtime.
//! Re-exports the model, validation and serialization crates and adds the
//! [`Runtime`], which drives a document through deserialize, validate and
//! serialize under one [`RuntimeConfig`].
//! Keep this crate thin: it should compose other crates, not implement model logic.
//!
//! ## Usage
//! ```rust
//! use rune::model::{FieldDef, ScalarKind, Schema, TypeDef};
//! use rune::Runtime;
//!
//! let schema = Schema::builder("demo")
//!     .data_type(
//!         TypeDef::new("Note").field(FieldDef::scalar("text", ScalarKind::String).required()),
//!     )
//!     .build()?;
//! let runtime = Runtime::new(schema);
//!
//! let outcome = runtime.round_trip(r#"{ "@type": "Note", "text": "hello" }"#)?;
//! assert!(outcome.violations.is_empty());
//! assert!(outcome.text.contains(r#""text":"hello""#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;

pub use crate::error::{RuntimeError, RuntimeErrorExt};
pub use rune_domain as domain;
pub use rune_domain::config::RuntimeConfig;
pub use rune_kernel as kernel;
pub use rune_logger::Logger;
pub use rune_model as model;
pub use rune_serialization as serialization;
pub use rune_validation as validation;

use rune_model::{Document, Schema};
use rune_serialization::JsonCodec;
use rune_validation::ConditionViolation;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// What one round trip produced.
#[derive(Debug)]
pub struct RoundTrip {
    pub document: Document,
    pub violations: Vec<ConditionViolation>,
    pub text: String,
}

/// A schema bound to its runtime configuration.
#[derive(Debug, Clone)]
pub struct Runtime {
    config: RuntimeConfig,
    codec: JsonCodec,
}

impl Runtime {
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_config(schema, RuntimeConfig::default())
    }

    #[must_use]
    pub fn with_config(schema: Arc<Schema>, config: RuntimeConfig) -> Self {
        let codec = JsonCodec::new(schema)
            .with_config(config.serialization.clone())
            .strict(config.validation.strict);
        Self { config, codec }
    }

    /// Builds a runtime from a configuration file with `RUNE__` environment overrides.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Config`] when the file is missing or malformed.
    pub fn load(schema: Arc<Schema>, path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let config: RuntimeConfig = rune_kernel::config::load_config(Some(path.as_ref()))?;
        Ok(Self::with_config(schema, config))
    }

    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        self.codec.schema()
    }

    #[must_use]
    pub const fn codec(&self) -> &JsonCodec {
        &self.codec
    }

    /// Installs the global tracing subscriber described by the `logging` section.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Logger`] when a subscriber is already installed or the
    /// section is invalid.
    pub fn init_logging(&self) -> Result<Logger, RuntimeError> {
        Ok(Logger::from_config(&self.config.logging)?)
    }

    /// # Errors
    /// Returns [`RuntimeError::Serialization`] for malformed documents, unknown types
    /// or fields, duplicate keys and unresolvable references.
    pub fn deserialize(&self, text: &str) -> Result<Document, RuntimeError> {
        Ok(self.codec.deserialize(text)?)
    }

    /// Runs every condition over the graph reachable from the document root.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Validation`] for structural failures, and for any
    /// violation when `raise_on_failure` is configured.
    pub fn validate(&self, document: &Document) -> Result<Vec<ConditionViolation>, RuntimeError> {
        Ok(rune_validation::validate(document, &self.config.validation)?)
    }

    /// # Errors
    /// Returns [`RuntimeError::Serialization`] when the document cannot be written.
    pub fn serialize(&self, document: &Document) -> Result<String, RuntimeError> {
        Ok(self.codec.serialize(document)?)
    }

    /// Reads `text`, validates the document and writes it back.
    ///
    /// # Errors
    /// The first failure of [`Runtime::deserialize`], [`Runtime::validate`] or
    /// [`Runtime::serialize`].
    #[instrument(level = "info", skip_all, fields(model = %self.schema().model()))]
    pub fn round_trip(&self, text: &str) -> Result<RoundTrip, RuntimeError> {
        let document = self.deserialize(text).context("reading document")?;
        let violations = self.validate(&document).context("validating document")?;
        let text = self.serialize(&document).context("writing document")?;

        info!(objects = document.graph.len(), violations = violations.len(), "Round trip complete");
        Ok(RoundTrip { document, violations, text })
    }
}
