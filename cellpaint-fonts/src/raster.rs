//! Rasterization and measurement seams consumed by the renderers.

use cellpaint_config::CellMetrics;

/// Face selection for a single draw or measure call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GlyphStyle {
    pub bold: bool,
    pub italic: bool,
}

impl GlyphStyle {
    pub const REGULAR: GlyphStyle = GlyphStyle {
        bold: false,
        italic: false,
    };

    pub const BOLD: GlyphStyle = GlyphStyle {
        bold: true,
        italic: false,
    };

    pub fn new(bold: bool, italic: bool) -> Self {
        Self { bold, italic }
    }
}

/// An 8-bit coverage mask positioned relative to the top-left corner of a
/// cell box.
///
/// `left`/`top` may be negative or push the mask past the cell edges; the
/// consumer clips against its own destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    pub left: i32,
    pub top: i32,
    /// Row-major coverage, `width * height` bytes
    pub coverage: Vec<u8>,
}

impl GlyphBitmap {
    /// Coverage at mask coordinates, zero outside the mask.
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.coverage
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.coverage.iter().all(|&a| a == 0)
    }
}

/// Produces glyph masks for single characters.
///
/// Returns `None` for characters the font cannot draw (controls, missing
/// glyphs, whitespace with no outline).
pub trait GlyphRasterizer: Send + Sync {
    fn rasterize(&self, ch: char, style: GlyphStyle, metrics: &CellMetrics)
    -> Option<GlyphBitmap>;
}

/// Measures the rendered advance of a string in device pixels.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: GlyphStyle) -> f64;
}
