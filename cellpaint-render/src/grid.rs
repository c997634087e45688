//! Read-only access to the terminal cell grid.
//!
//! The grid is owned by the terminal session; renderers only read it for the
//! duration of one call and never hold on to it.

use cellpaint_config::{Cell, CellAttributes};

/// The view of a terminal buffer a renderer consumes.
///
/// Rows passed to [`GridSource::cell`] are viewport rows. Cursor and
/// selection coordinates are absolute buffer rows, so the viewport row of
/// an absolute row `r` is `r - scroll_offset()`.
pub trait GridSource {
    fn cols(&self) -> usize;
    fn rows(&self) -> usize;

    /// Absolute buffer row shown at the top of the viewport.
    fn scroll_offset(&self) -> usize;

    /// Cursor `(col, absolute_row)`.
    fn cursor(&self) -> (usize, usize);

    /// Cell at a viewport position, `None` outside the grid.
    fn cell(&self, row: usize, col: usize) -> Option<Cell>;

    /// All cells of a viewport row; unset cells past the data.
    fn row_cells(&self, row: usize) -> Vec<Cell> {
        (0..self.cols())
            .map(|col| self.cell(row, col).unwrap_or_default())
            .collect()
    }

    /// Viewport row of the cursor, if it is on screen.
    fn cursor_viewport_row(&self) -> Option<usize> {
        let (_, row) = self.cursor();
        let row = row.checked_sub(self.scroll_offset())?;
        (row < self.rows()).then_some(row)
    }
}

/// An owned snapshot of a viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSnapshot {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    cursor: (usize, usize),
    scroll_offset: usize,
}

impl GridSnapshot {
    /// A grid of unset cells.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
            cursor: (0, 0),
            scroll_offset: 0,
        }
    }

    /// Lay plain text out row by row with default attributes.
    ///
    /// Lines longer than `cols` are truncated, tabs advance to the next
    /// multiple of 8 and lines past `rows` are dropped.
    pub fn from_text(text: &str, cols: usize, rows: usize) -> Self {
        Self::from_text_with(text, cols, rows, CellAttributes::default())
    }

    /// Like [`GridSnapshot::from_text`] with explicit attributes for every
    /// written cell.
    pub fn from_text_with(text: &str, cols: usize, rows: usize, attrs: CellAttributes) -> Self {
        let mut grid = Self::new(cols, rows);
        for (row, line) in text.lines().take(rows).enumerate() {
            let mut col = 0;
            for ch in line.chars() {
                if col >= cols {
                    break;
                }
                match ch {
                    '\t' => col = (col / 8 + 1) * 8,
                    ch if ch.is_control() => {}
                    ch => {
                        grid.set_cell(row, col, Cell::new(ch, attrs));
                        col += 1;
                    }
                }
            }
        }
        grid
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col] = cell;
        }
    }

    /// Apply attributes to every cell of a row range.
    pub fn set_attributes(&mut self, rows: std::ops::Range<usize>, attrs: CellAttributes) {
        for row in rows.filter(|&r| r < self.rows) {
            for cell in &mut self.cells[row * self.cols..(row + 1) * self.cols] {
                cell.attributes = attrs;
            }
        }
    }

    /// Set the cursor `(col, absolute_row)`.
    pub fn set_cursor(&mut self, col: usize, row: usize) {
        self.cursor = (col, row);
    }

    pub fn set_scroll_offset(&mut self, offset: usize) {
        self.scroll_offset = offset;
    }
}

impl GridSource for GridSnapshot {
    fn cols(&self) -> usize {
        self.cols
    }

    fn rows(&self) -> usize {
        self.rows
    }

    fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_places_characters() {
        let grid = GridSnapshot::from_text("ab\n\tc", 10, 3);
        assert_eq!(grid.cell(0, 0).map(|c| c.codepoint), Some('a' as u32));
        assert_eq!(grid.cell(0, 1).map(|c| c.codepoint), Some('b' as u32));
        assert!(grid.cell(0, 2).is_some_and(|c| c.is_unset()));
        assert_eq!(grid.cell(1, 8).map(|c| c.codepoint), Some('c' as u32));
        assert!(grid.cell(2, 0).is_some_and(|c| c.is_unset()));
    }

    #[test]
    fn test_from_text_truncates_long_lines() {
        let grid = GridSnapshot::from_text("abcdef", 3, 1);
        assert_eq!(grid.row_cells(0).len(), 3);
        assert_eq!(grid.cell(0, 2).map(|c| c.codepoint), Some('c' as u32));
        assert!(grid.cell(0, 3).is_none());
    }

    #[test]
    fn test_cursor_viewport_row_respects_scroll_offset() {
        let mut grid = GridSnapshot::new(4, 2);
        grid.set_scroll_offset(10);
        grid.set_cursor(1, 11);
        assert_eq!(grid.cursor_viewport_row(), Some(1));
        grid.set_cursor(1, 9);
        assert_eq!(grid.cursor_viewport_row(), None);
        grid.set_cursor(1, 12);
        assert_eq!(grid.cursor_viewport_row(), None);
    }
}
