//! Typed error types for cellpaint-render.
//!
//! Rendering itself never fails: a missing atlas defers painting and bad
//! geometry is clipped. These errors describe atlas generation, which runs
//! off the render path and is logged by the renderer that requested it.

use thiserror::Error;

/// Errors produced while building a glyph atlas.
#[derive(Debug, Error)]
pub enum RenderError {
    // -----------------------------------------------------------------------
    // Atlas geometry
    // -----------------------------------------------------------------------
    /// Cell metrics rounded to an empty tile.
    #[error("Invalid cell metrics for atlas: {width}x{height}")]
    InvalidMetrics {
        /// Tile width in pixels.
        width: u32,
        /// Tile height in pixels.
        height: u32,
    },

    /// The atlas bitmap would exceed the allocation budget.
    #[error("Atlas surface {width}x{height} exceeds the {max_bytes} byte limit")]
    SurfaceTooLarge {
        width: u64,
        height: u64,
        max_bytes: u64,
    },

    // -----------------------------------------------------------------------
    // Background work
    // -----------------------------------------------------------------------
    /// The blocking generation task panicked or was cancelled.
    #[error("Atlas generation task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
