//! Configuration and data model for the cellpaint terminal renderer.
//!
//! This crate provides:
//!
//! - The cell data model shared by every rendering backend
//! - Cell metrics (device-pixel cell geometry)
//! - Colors, the 18-entry palette and built-in themes
//! - Cursor and backend configuration types
//! - YAML configuration loading, saving and validation

pub mod cell;
pub mod color;
pub mod config;
pub mod defaults;
pub mod error;
pub mod metrics;
pub mod themes;
mod types;

// Re-export main types for convenience
pub use cell::{Cell, CellAttributes, CellFlags, DEFAULT_BG, DEFAULT_FG};
pub use color::{Color, Palette};
pub use config::{ColorConfig, Config, CursorConfig, FontConfig};
pub use error::ConfigError;
pub use metrics::CellMetrics;
pub use themes::Theme;
pub use types::{CursorStyle, LogLevel, RendererBackend};
