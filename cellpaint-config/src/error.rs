//! Typed error variants for the cellpaint-config crate.
//!
//! Provides structured error types for config I/O and validation operations,
//! so library consumers can match on specific failure modes instead of
//! opaque `anyhow` strings.

use thiserror::Error;

/// Errors that can occur when loading, saving or validating configuration.
///
/// `Config::load_from` and `Config::save_to` return `anyhow::Result`; these
/// values are recoverable with `downcast_ref::<ConfigError>()`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("Config validation error: {0}")]
    Validation(String),

    /// A theme name did not match any built-in theme.
    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),
}
