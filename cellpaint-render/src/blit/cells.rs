//! Text layer painting: backgrounds, glyphs and underlines.

use cellpaint_config::{Cell, DEFAULT_BG};
use cellpaint_fonts::GlyphStyle;

use super::AtlasBlitRenderer;
use crate::atlas::{GlyphAtlas, color_row};
use crate::grid::GridSource;
use crate::paint::{self, PixelRect};

/// Alpha applied to DIM glyphs
const DIM_ALPHA: u8 = 128;

/// Atlas tile `(code, color_row)` for a cell, or `None` when the cell has
/// to be rasterized directly.
pub(super) fn atlas_tile(cell: &Cell, fg: u16) -> Option<(u8, u8)> {
    let attrs = cell.attributes;
    if cell.codepoint >= 256 || attrs.italic() || attrs.dim() {
        return None;
    }
    let row = color_row(fg, attrs.bold())?;
    // Row 0 only carries the regular face
    if row == 0 && attrs.bold() {
        return None;
    }
    Some((cell.codepoint as u8, row))
}

impl AtlasBlitRenderer {
    /// Repaint viewport rows `start..=end` of the text layer.
    pub(super) fn paint_rows(
        &mut self,
        atlas: Option<&GlyphAtlas>,
        grid: &dyn GridSource,
        start: usize,
        end: usize,
    ) {
        let rows = self.rows.min(grid.rows());
        let cols = self.cols.min(grid.cols());
        if rows == 0 || cols == 0 {
            return;
        }
        let end = end.min(rows - 1);
        if start > end {
            return;
        }

        let band = self.cell_rect(start, 0, 1);
        let surface_width = self.surface.width();
        paint::fill_rect(
            &mut self.surface,
            PixelRect::new(0, band.y, surface_width, band.height * (end - start + 1) as u32),
            self.options.palette.background,
        );

        for row in start..=end {
            self.paint_backgrounds(grid, row, cols);
        }
        for row in start..=end {
            for col in 0..cols {
                let Some(cell) = grid.cell(row, col) else {
                    continue;
                };
                if cell.is_unset() {
                    continue;
                }
                self.paint_glyph(atlas, row, col, &cell);
                if cell.attributes.underline() {
                    self.paint_underline(row, col, &cell);
                }
            }
        }
    }

    fn paint_backgrounds(&mut self, grid: &dyn GridSource, row: usize, cols: usize) {
        for col in 0..cols {
            let Some(cell) = grid.cell(row, col) else {
                continue;
            };
            let (_, bg) = cell.attributes.effective_colors();
            if bg >= DEFAULT_BG {
                continue;
            }
            let rect = self.cell_rect(row, col, cell.display_width());
            let color = self.options.palette.resolve_bg(bg);
            paint::fill_rect(&mut self.surface, rect, color);
        }
    }

    fn paint_glyph(&mut self, atlas: Option<&GlyphAtlas>, row: usize, col: usize, cell: &Cell) {
        let attrs = cell.attributes;
        let (fg, _) = attrs.effective_colors();
        let rect = self.cell_rect(row, col, cell.display_width());

        if let Some(atlas) = atlas
            && let Some((code, color_row)) = atlas_tile(cell, fg)
        {
            let mut tile = atlas.tile_pixel_rect(code, color_row);
            // A stale atlas may have larger tiles than the current cells
            tile.width = tile.width.min(rect.width);
            tile.height = tile.height.min(rect.height);
            paint::blit_over(&mut self.surface, rect.x, rect.y, atlas.image(), tile);
            return;
        }

        let fg = if attrs.bold() && fg < 8 { fg + 8 } else { fg };
        let color = self.options.palette.resolve_fg(fg);
        let alpha = if attrs.dim() { DIM_ALPHA } else { 255 };
        let style = GlyphStyle::new(attrs.bold(), attrs.italic());
        if let Some(mask) = self.fallback_glyph(cell.codepoint, style) {
            paint::draw_mask(&mut self.surface, rect, &mask, color, alpha);
        }
    }

    /// 1px line just below the baseline.
    fn paint_underline(&mut self, row: usize, col: usize, cell: &Cell) {
        let (fg, _) = cell.attributes.effective_colors();
        let fg = if cell.attributes.bold() && fg < 8 { fg + 8 } else { fg };
        let rect = self.cell_rect(row, col, cell.display_width());
        let offset = (self.metrics.baseline as u32 + 1).min(rect.height.saturating_sub(1));
        paint::fill_rect(
            &mut self.surface,
            PixelRect::new(rect.x, rect.y + offset as i64, rect.width, 1),
            self.options.palette.resolve_fg(fg),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellpaint_config::{CellAttributes, CellFlags, DEFAULT_FG};

    fn cell(ch: char, fg: u16, flags: CellFlags) -> Cell {
        Cell::new(ch, CellAttributes::new(fg, DEFAULT_BG, flags))
    }

    #[test]
    fn test_plain_palette_cell_uses_atlas() {
        let c = cell('A', 1, CellFlags::empty());
        assert_eq!(atlas_tile(&c, 1), Some((65, 2)));
        let c = cell('A', DEFAULT_FG, CellFlags::empty());
        assert_eq!(atlas_tile(&c, DEFAULT_FG), Some((65, 0)));
    }

    #[test]
    fn test_bold_low_color_uses_bright_row() {
        let c = cell('A', 2, CellFlags::BOLD);
        assert_eq!(atlas_tile(&c, 2), Some((65, 11)));
    }

    #[test]
    fn test_fallback_cases() {
        assert_eq!(atlas_tile(&cell('A', DEFAULT_FG, CellFlags::BOLD), DEFAULT_FG), None);
        assert_eq!(atlas_tile(&cell('A', 1, CellFlags::ITALIC), 1), None);
        assert_eq!(atlas_tile(&cell('A', 1, CellFlags::DIM), 1), None);
        assert_eq!(atlas_tile(&cell('A', 100, CellFlags::empty()), 100), None);
        assert_eq!(atlas_tile(&cell('\u{4e00}', 1, CellFlags::empty()), 1), None);
    }
}
