use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level runtime configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfigInner {
    pub validation: ValidationConfig,
    pub serialization: SerializationConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    #[serde(flatten, default)]
    inner: Arc<RuntimeConfigInner>,
}

impl Deref for RuntimeConfig {
    type Target = RuntimeConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for RuntimeConfig {
    fn deref_mut(&mut self) -> &mut RuntimeConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Condition engine and strict construction switches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Check cardinality of every object as it is built from a document.
    pub strict: bool,
    /// Stop at the first condition violation instead of collecting all of them.
    pub fail_fast: bool,
    /// Turn a non-empty violation list into an error.
    pub raise_on_failure: bool,
}

/// JSON codec switches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerializationConfig {
    /// Write `@model` and `@version` on the root object.
    pub emit_model_header: bool,
    pub pretty: bool,
    /// Length of keys generated for shared objects that carry none.
    pub generated_key_length: usize,
}

/// Tracing subscriber setup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    pub level: String,
    pub console: bool,
    /// Directory for daily rolling log files. No file output when unset.
    pub path: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { strict: true, fail_fast: false, raise_on_failure: false }
    }
}

impl Default for SerializationConfig {
    fn default() -> Self {
        Self { emit_model_header: true, pretty: false, generated_key_length: 12 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "rune".to_owned(),
            level: "info".to_owned(),
            console: true,
            path: None,
            json: false,
        }
    }
}
