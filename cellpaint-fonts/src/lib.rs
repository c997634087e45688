//! Font management and glyph rasterization for the cellpaint terminal renderer.
//!
//! This crate provides:
//! - Font loading with system font discovery and a fallback chain
//! - Alpha-mask glyph rasterization positioned inside a cell box
//! - Text width measurement for monospace anomaly detection
//! - Cell metrics derived from the primary font
//!
//! # Architecture
//!
//! Renderers never talk to fonts directly. They consume the
//! [`GlyphRasterizer`] and [`TextMeasurer`] traits, which [`FontManager`]
//! implements on top of `fontdb` and `swash`. Every call carries its full
//! [`GlyphStyle`]; nothing holds a "current font".

pub mod error;
pub mod font_manager;
pub mod metrics;
pub mod raster;

// Re-export main types for convenience
pub use error::FontError;
pub use font_manager::{FALLBACK_FAMILIES, FontData, FontManager};
pub use metrics::{FontMetrics, calculate_cell_metrics};
pub use raster::{GlyphBitmap, GlyphRasterizer, GlyphStyle, TextMeasurer};
