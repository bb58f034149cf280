use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment prefix for overrides, e.g. `RUNE__VALIDATION__FAIL_FAST=true`.
pub const ENV_PREFIX: &str = "RUNE";

/// Custom error type for config loading.
#[rune_derive::rune_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration structure from a file overlaid with environment variables.
///
/// 1. **Base File**: settings from `path` (any format the `config` crate understands,
///    extension optional). Defaults to `"rune"` in the working directory.
/// 2. **Environment Overrides**: variables prefixed with `RUNE__`, nested with double
///    underscores (`RUNE__LOGGING__LEVEL` maps to `logging.level`).
///
/// # Errors
/// Returns [`ConfigError`] if the file cannot be found or its content (after overrides)
/// does not match `T`.
///
/// # Example
/// ```rust,no_run
/// use rune_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct CodecConfig {
///     pretty: bool,
/// }
///
/// let cfg: CodecConfig = load_config(Some("config/local")).unwrap_or_default();
/// # let _ = cfg.pretty;
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path = path.map_or_else(|| PathBuf::from("rune"), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .convert_case(config::Case::Snake),
        );

    info!("Loading config from {}", effective_path.display());

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
