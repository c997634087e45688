//! Selection geometry: abstract ranges to viewport rectangles.

/// A selection in absolute buffer coordinates.
///
/// `start` and `end` are `(col, row)` and may arrive in either order; both
/// ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: (usize, usize),
    pub end: (usize, usize),
    /// Rectangular block selection instead of a text range
    pub column_mode: bool,
}

impl SelectionRange {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self {
            start,
            end,
            column_mode: false,
        }
    }

    /// `(start, end)` in screen order (row first, then column).
    pub fn normalized(&self) -> ((usize, usize), (usize, usize)) {
        let key = |(col, row): (usize, usize)| (row, col);
        if key(self.start) <= key(self.end) {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}

/// A rectangle in viewport cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionRect {
    pub col: usize,
    pub row: usize,
    pub width: usize,
    pub height: usize,
}

impl SelectionRect {
    fn new(col: usize, row: usize, width: usize, height: usize) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self {
            col,
            row,
            width,
            height,
        })
    }
}

/// Convert a selection into the minimal set of viewport rectangles.
///
/// Column mode yields a single block. Range mode yields at most three
/// rectangles: the partial first row, one block for every middle row and
/// the partial last row. Rows outside `[0, viewport_rows)` are clipped.
pub fn compute_rects(
    range: &SelectionRange,
    column_mode: bool,
    scroll_offset: usize,
    viewport_rows: usize,
    cols: usize,
) -> Vec<SelectionRect> {
    if viewport_rows == 0 || cols == 0 {
        return Vec::new();
    }
    let ((start_col, start_row), (end_col, end_row)) = range.normalized();

    let viewport_start = start_row as i64 - scroll_offset as i64;
    let viewport_end = end_row as i64 - scroll_offset as i64;
    let capped_start = viewport_start.max(0);
    let capped_end = viewport_end.min(viewport_rows as i64 - 1);
    if capped_start > capped_end {
        return Vec::new();
    }
    let (first, last) = (capped_start as usize, capped_end as usize);

    if column_mode {
        let left = start_col.min(end_col).min(cols);
        let right = (start_col.max(end_col) + 1).min(cols);
        return SelectionRect::new(left, first, right - left, last - first + 1)
            .into_iter()
            .collect();
    }

    let mut rects = Vec::with_capacity(3);

    // First row: from the start column, or column 0 if it scrolled off above
    let first_left = if viewport_start == capped_start {
        start_col.min(cols)
    } else {
        0
    };
    let first_right = if first == last && viewport_end == capped_end {
        (end_col + 1).min(cols)
    } else {
        cols
    };
    rects.extend(SelectionRect::new(
        first_left,
        first,
        first_right.saturating_sub(first_left),
        1,
    ));

    // Middle rows as one block
    if last > first + 1 {
        rects.extend(SelectionRect::new(0, first + 1, cols, last - first - 1));
    }

    // Last row: from column 0, or full width if the end scrolled off below
    if last != first {
        let last_right = if viewport_end == capped_end {
            (end_col + 1).min(cols)
        } else {
            cols
        };
        rects.extend(SelectionRect::new(0, last, last_right, 1));
    }

    rects
}
