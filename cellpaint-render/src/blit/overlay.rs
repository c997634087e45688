//! Selection, cursor and link underline, composited over the text layer.

use cellpaint_config::{Cell, CursorStyle};
use cellpaint_fonts::GlyphStyle;
use image::RgbaImage;

use super::AtlasBlitRenderer;
use crate::grid::GridSource;
use crate::link::{LinkHoverRange, LinkHoverState};
use crate::paint::{self, PixelRect};
use crate::selection::{SelectionRange, SelectionRect, compute_rects};

/// Opacity of the selection fill
const SELECTION_ALPHA: u8 = 128;

/// Cursor position and the cell it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct CursorOverlay {
    pub col: usize,
    pub row: usize,
    pub cell: Cell,
}

#[derive(Debug, Clone, Default)]
pub(super) struct OverlayState {
    pub selection: Option<SelectionRange>,
    pub selection_rects: Vec<SelectionRect>,
    /// Active link spans keyed by viewport row
    pub link_rows: Vec<(usize, LinkHoverState)>,
    pub cursor: Option<CursorOverlay>,
}

impl OverlayState {
    pub fn set_selection(
        &mut self,
        grid: &dyn GridSource,
        range: Option<SelectionRange>,
        column_mode: bool,
    ) {
        self.selection = range.map(|mut range| {
            range.column_mode = column_mode;
            range
        });
        self.selection_rects = match &self.selection {
            Some(range) => compute_rects(
                range,
                column_mode,
                grid.scroll_offset(),
                grid.rows(),
                grid.cols(),
            ),
            None => Vec::new(),
        };
    }

    pub fn set_link_hover(&mut self, grid: &dyn GridSource, range: Option<LinkHoverRange>) {
        self.link_rows.clear();
        let Some(range) = range else {
            return;
        };
        let scroll = grid.scroll_offset();
        for absolute_row in range.rows() {
            let Some(row) = absolute_row.checked_sub(scroll) else {
                continue;
            };
            if row >= grid.rows() {
                break;
            }
            let state = range.state_for_row(absolute_row, grid.cols());
            if state.active {
                self.link_rows.push((row, state));
            }
        }
    }
}

impl AtlasBlitRenderer {
    pub(super) fn update_cursor(&mut self, grid: &dyn GridSource) {
        let cols = grid.cols();
        self.overlay.cursor = grid.cursor_viewport_row().and_then(|row| {
            let col = grid.cursor().0.min(cols.checked_sub(1)?);
            Some(CursorOverlay {
                col,
                row,
                cell: grid.cell(row, col).unwrap_or_default(),
            })
        });
    }

    /// Text layer with selection, link underline and cursor composited on top.
    pub fn frame(&mut self) -> RgbaImage {
        let mut frame = self.surface.clone();
        let palette = &self.options.palette;

        let color = palette.selection(self.focused);
        for rect in &self.overlay.selection_rects {
            let first = self.cell_rect(rect.row, rect.col, rect.width);
            let area = PixelRect::new(first.x, first.y, first.width, first.height * rect.height as u32);
            paint::blend_rect(&mut frame, area, color, SELECTION_ALPHA);
        }

        for (row, state) in &self.overlay.link_rows {
            let span = state.col_end.saturating_sub(state.col_start) as usize;
            let rect = self.cell_rect(*row, state.col_start as usize, span);
            let y = rect.y + rect.height as i64 - 1;
            paint::fill_rect(&mut frame, PixelRect::new(rect.x, y, rect.width, 1), palette.foreground);
        }

        if let Some(cursor) = self.overlay.cursor {
            self.draw_cursor(&mut frame, cursor);
        }
        frame
    }

    fn draw_cursor(&mut self, frame: &mut RgbaImage, cursor: CursorOverlay) {
        let rect = self.cell_rect(cursor.row, cursor.col, cursor.cell.display_width());
        let color = self.options.palette.cursor;
        let dpr = self.options.device_pixel_ratio.max(f32::EPSILON);

        match self.options.cursor.style {
            CursorStyle::Block if self.focused => {
                paint::fill_rect(frame, rect, color);
                if cursor.cell.is_unset() {
                    return;
                }
                let attrs = cursor.cell.attributes;
                let style = GlyphStyle::new(attrs.bold(), attrs.italic());
                let accent = self.options.palette.cursor_accent;
                if let Some(mask) = self.fallback_glyph(cursor.cell.codepoint, style) {
                    paint::draw_mask(frame, rect, &mask, accent, 255);
                }
            }
            CursorStyle::Block => paint::stroke_rect(frame, rect, color),
            CursorStyle::Bar => {
                let width = (self.options.cursor.width * dpr).round().max(1.0) as u32;
                paint::fill_rect(
                    frame,
                    PixelRect::new(rect.x, rect.y, width.min(rect.width), rect.height),
                    color,
                );
            }
            CursorStyle::Underline => {
                let height = dpr.round().max(1.0) as u32;
                let height = height.min(rect.height);
                paint::fill_rect(
                    frame,
                    PixelRect::new(rect.x, rect.y + (rect.height - height) as i64, rect.width, height),
                    color,
                );
            }
        }
    }
}
