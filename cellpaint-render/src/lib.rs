//! Rendering engine for the cellpaint terminal renderer.
//!
//! This crate provides two interchangeable backends behind
//! [`TerminalRenderer`]:
//!
//! - [`AtlasBlitRenderer`]: blits tiles of a pre-rendered glyph atlas onto
//!   an RGBA surface, rasterizing directly only what the atlas lacks
//! - [`StructuredRowRenderer`]: builds one span-per-run node tree per row
//!   and serialises it to markup with a scoped stylesheet
//!
//! Shared pieces:
//!
//! - Glyph atlas generation with generation tokens
//! - Incremental font metrics probing for anomalous glyph widths
//! - Selection geometry and link hover spans
//! - The [`GridSource`] view of a terminal buffer

pub mod atlas;
pub mod blit;
pub mod error;
pub mod grid;
pub mod link;
mod paint;
pub mod probe;
pub mod renderer;
pub mod selection;
pub mod structured;

// Re-export main public types
pub use atlas::{AtlasRequest, GlyphAtlas, GlyphAtlasCache, build_atlas, color_row, generate};
pub use blit::AtlasBlitRenderer;
pub use error::RenderError;
pub use grid::{GridSnapshot, GridSource};
pub use link::{LinkHoverRange, LinkHoverState};
pub use probe::{FontMetricsProbe, FontMetricsTable, ProbeBatch};
pub use renderer::{RendererId, RendererOptions, TerminalRenderer};
pub use selection::{SelectionRange, SelectionRect, compute_rects};
pub use structured::{IdleStatus, RowNode, SpanNode, StructuredRowRenderer, create_row};

// Re-export shared types from dependencies for convenience
pub use cellpaint_config::{Cell, CellAttributes, CellFlags, CellMetrics, Palette};
