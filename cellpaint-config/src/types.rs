//! Cursor, backend and logging configuration types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Cursor Types
// ============================================================================

/// Cursor style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CursorStyle {
    /// Block cursor (fills entire cell)
    #[default]
    Block,
    /// Bar cursor (vertical line at cell start)
    #[serde(alias = "beam")]
    Bar,
    /// Underline cursor (horizontal line at cell bottom)
    Underline,
}

impl CursorStyle {
    /// Short name used for markup classes.
    pub fn as_str(&self) -> &'static str {
        match self {
            CursorStyle::Block => "block",
            CursorStyle::Bar => "bar",
            CursorStyle::Underline => "underline",
        }
    }
}

// ============================================================================
// Renderer Types
// ============================================================================

/// Which rendering strategy paints the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    /// Glyph-atlas bitmap blitter producing an RGBA surface
    #[default]
    Raster,
    /// Structured markup tree, one node per row
    Structured,
}

impl std::str::FromStr for RendererBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raster" | "canvas" => Ok(RendererBackend::Raster),
            "structured" | "dom" | "html" => Ok(RendererBackend::Structured),
            other => Err(format!("unknown renderer backend '{other}'")),
        }
    }
}

// ============================================================================
// Logging Types
// ============================================================================

/// Log level for debug logging to file.
///
/// Controls the verbosity of log output written to the debug log file.
/// The `DEBUG_LEVEL` environment variable and `--log-level` CLI flag take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// No logging (log file not created)
    #[default]
    Off,
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Most verbose
    Trace,
}

impl LogLevel {
    /// All available levels, least verbose first
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Off,
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Ok(LogLevel::Off),
            "error" | "1" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" | "2" => Ok(LogLevel::Info),
            "debug" | "3" => Ok(LogLevel::Debug),
            "trace" | "4" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_style_accepts_beam_alias() {
        let style: CursorStyle = serde_yaml_ng::from_str("beam").unwrap();
        assert_eq!(style, CursorStyle::Bar);
        let style: CursorStyle = serde_yaml_ng::from_str("underline").unwrap();
        assert_eq!(style.as_str(), "underline");
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("dom".parse::<RendererBackend>(), Ok(RendererBackend::Structured));
        assert_eq!("Raster".parse::<RendererBackend>(), Ok(RendererBackend::Raster));
        assert!("vulkan".parse::<RendererBackend>().is_err());
    }

    #[test]
    fn test_log_level_numeric_aliases_match_debug_level_env() {
        assert_eq!("0".parse::<LogLevel>(), Ok(LogLevel::Off));
        assert_eq!("3".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    }
}
