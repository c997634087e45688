//! Device-pixel cell geometry.

use serde::{Deserialize, Serialize};

/// Size of one grid cell in device pixels.
///
/// Values are integral: every constructor ceils its inputs so that glyph
/// tiles, blits and selection rectangles land on whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellMetrics {
    pub width: f64,
    pub height: f64,
    /// Distance from the cell top to the text baseline.
    pub baseline: f64,
}

impl CellMetrics {
    pub fn new(width: f64, height: f64, baseline: f64) -> Self {
        let height = height.max(1.0).ceil();
        Self {
            width: width.max(1.0).ceil(),
            height,
            baseline: baseline.ceil().clamp(0.0, height),
        }
    }

    /// Derive metrics from CSS-pixel font measurements.
    ///
    /// # Arguments
    /// * `char_advance` - Advance width of a reference glyph in CSS pixels
    /// * `line_height` - Natural line height (ascent + descent + leading)
    /// * `ascent` - Font ascent in CSS pixels
    /// * `letter_spacing` - Extra pixels between cells
    /// * `line_spacing` - Line height multiplier
    /// * `device_pixel_ratio` - Display scale factor
    pub fn from_font(
        char_advance: f64,
        line_height: f64,
        ascent: f64,
        letter_spacing: f64,
        line_spacing: f64,
        device_pixel_ratio: f64,
    ) -> Self {
        let dpr = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let width = (char_advance + letter_spacing) * dpr;
        let height = line_height * line_spacing * dpr;
        // Center the extra line spacing around the glyphs.
        let baseline = ascent * dpr + (height - line_height * dpr) / 2.0;
        Self::new(width, height, baseline)
    }

    /// Integral tile width in pixels.
    pub fn tile_width(&self) -> u32 {
        self.width as u32
    }

    /// Integral tile height in pixels.
    pub fn tile_height(&self) -> u32 {
        self.height as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ceils_fractional_sizes() {
        let m = CellMetrics::new(7.2, 15.01, 11.5);
        assert_eq!(m.width, 8.0);
        assert_eq!(m.height, 16.0);
        assert_eq!(m.baseline, 12.0);
        assert_eq!((m.tile_width(), m.tile_height()), (8, 16));
    }

    #[test]
    fn test_from_font_scales_by_device_pixel_ratio() {
        let m = CellMetrics::from_font(7.0, 14.0, 11.0, 0.0, 1.0, 2.0);
        assert_eq!(m.width, 14.0);
        assert_eq!(m.height, 28.0);
        assert_eq!(m.baseline, 22.0);
    }

    #[test]
    fn test_degenerate_inputs_stay_positive() {
        let m = CellMetrics::from_font(0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        assert!(m.width >= 1.0);
        assert!(m.height >= 1.0);
    }
}
