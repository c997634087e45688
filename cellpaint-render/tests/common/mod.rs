//! Deterministic font stand-ins shared by the renderer tests.

#![allow(dead_code)]

use cellpaint_config::CellMetrics;
use cellpaint_fonts::{GlyphBitmap, GlyphRasterizer, GlyphStyle, TextMeasurer};

/// 4x6 cells with the baseline at 4.
pub fn metrics() -> CellMetrics {
    CellMetrics::new(4.0, 6.0, 4.0)
}

/// Fills the cell from its top down to the baseline for every printable
/// character, leaving the rows below the baseline transparent.
pub struct BoxRasterizer;

impl GlyphRasterizer for BoxRasterizer {
    fn rasterize(&self, ch: char, _style: GlyphStyle, metrics: &CellMetrics) -> Option<GlyphBitmap> {
        if ch.is_control() || ch == ' ' {
            return None;
        }
        let width = metrics.tile_width();
        let height = metrics.baseline as u32;
        Some(GlyphBitmap {
            width,
            height,
            left: 0,
            top: 0,
            coverage: vec![255; (width * height) as usize],
        })
    }
}

/// Every character is `width` wide except those listed in `wide`.
pub struct FixedMeasurer {
    pub width: f64,
    pub wide: Vec<char>,
}

impl FixedMeasurer {
    pub fn monospace(width: f64) -> Self {
        Self {
            width,
            wide: Vec::new(),
        }
    }
}

impl TextMeasurer for FixedMeasurer {
    fn measure(&self, text: &str, _style: GlyphStyle) -> f64 {
        text.chars()
            .map(|c| {
                if self.wide.contains(&c) {
                    self.width * 1.25
                } else {
                    self.width
                }
            })
            .sum()
    }
}
