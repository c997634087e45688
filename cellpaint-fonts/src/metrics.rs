//! Font metrics and cell geometry derived from the primary font.

use cellpaint_config::CellMetrics;
use swash::FontRef;

/// Scaled vertical metrics and reference advance of a font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    /// Distance from baseline to top
    pub ascent: f32,
    /// Distance from baseline to bottom (positive)
    pub descent: f32,
    /// Extra line spacing recommended by the font
    pub leading: f32,
    /// Advance width of 'm' (standard monospace reference)
    pub char_advance: f32,
    /// Font size in device pixels
    pub font_size_pixels: f32,
}

impl FontMetrics {
    /// Extract metrics from a font at the given pixel size.
    pub fn from_font(font: FontRef<'_>, font_size_pixels: f32) -> Self {
        let metrics = font.metrics(&[]);
        let scale = font_size_pixels / metrics.units_per_em.max(1) as f32;

        let glyph_id = font.charmap().map('m');
        let char_advance = font.glyph_metrics(&[]).advance_width(glyph_id) * scale;

        Self {
            ascent: metrics.ascent * scale,
            descent: metrics.descent.abs() * scale,
            leading: metrics.leading * scale,
            char_advance,
            font_size_pixels,
        }
    }

    pub fn natural_line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }
}

/// Derive ceiled cell metrics.
///
/// # Arguments
/// * `font` - Metrics at device-pixel size
/// * `letter_spacing` - Extra device pixels between cells
/// * `line_spacing` - Line height multiplier
pub fn calculate_cell_metrics(
    font: &FontMetrics,
    letter_spacing: f32,
    line_spacing: f32,
) -> CellMetrics {
    let metrics = CellMetrics::from_font(
        font.char_advance as f64,
        font.natural_line_height() as f64,
        font.ascent as f64,
        letter_spacing as f64,
        line_spacing as f64,
        1.0,
    );
    log::debug!(
        "Cell metrics {}x{} baseline {} (font {:.1}px, advance {:.2})",
        metrics.width,
        metrics.height,
        metrics.baseline,
        font.font_size_pixels,
        font.char_advance
    );
    metrics
}
