//! Typed errors for font loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading fonts.
#[derive(Debug, Error)]
pub enum FontError {
    /// Neither the requested family nor any fallback could be loaded.
    #[error("No usable font found for '{0}' (fallback chain exhausted)")]
    NotFound(String),

    /// Font bytes could not be parsed as TTF/OTF/TTC.
    #[error("Invalid font data: {0}")]
    InvalidData(String),

    /// A configured font file could not be read.
    #[error("Failed to read font file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
