//! Hovered-link spans, resolved per row.

use std::ops::RangeInclusive;

/// A hovered link in absolute buffer coordinates, `(col, row)` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkHoverRange {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl LinkHoverRange {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        let key = |(col, row): (usize, usize)| (row, col);
        if key(start) <= key(end) {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Absolute rows touched by the link.
    pub fn rows(&self) -> RangeInclusive<usize> {
        self.start.1..=self.end.1
    }

    /// Hover state of one absolute row.
    pub fn state_for_row(&self, absolute_row: usize, cols: usize) -> LinkHoverState {
        if !self.rows().contains(&absolute_row) {
            return LinkHoverState::default();
        }
        let col_start = if absolute_row == self.start.1 {
            self.start.0
        } else {
            0
        };
        let col_end = if absolute_row == self.end.1 {
            self.end.0 + 1
        } else {
            cols
        };
        let col_end = col_end.min(cols);
        if col_start >= col_end {
            return LinkHoverState::default();
        }
        LinkHoverState {
            active: true,
            col_start: col_start.min(u16::MAX as usize) as u16,
            col_end: col_end.min(u16::MAX as usize) as u16,
        }
    }
}

/// Hover state of a single row: columns `col_start..col_end` are underlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkHoverState {
    pub active: bool,
    pub col_start: u16,
    /// Exclusive
    pub col_end: u16,
}

impl LinkHoverState {
    pub fn contains(&self, col: usize) -> bool {
        self.active && (self.col_start as usize..self.col_end as usize).contains(&col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_row_link_states() {
        let link = LinkHoverRange::new((70, 4), (9, 6));
        assert_eq!(
            link.state_for_row(4, 80),
            LinkHoverState {
                active: true,
                col_start: 70,
                col_end: 80
            }
        );
        assert_eq!(link.state_for_row(5, 80).col_start, 0);
        assert_eq!(link.state_for_row(5, 80).col_end, 80);
        assert_eq!(link.state_for_row(6, 80).col_end, 10);
        assert!(!link.state_for_row(7, 80).active);
    }

    #[test]
    fn test_reversed_endpoints_are_ordered() {
        let link = LinkHoverRange::new((9, 6), (70, 4));
        assert_eq!(link.start, (70, 4));
        assert_eq!(link.rows(), 4..=6);
    }

    #[test]
    fn test_contains_is_half_open() {
        let state = LinkHoverRange::new((2, 0), (4, 0)).state_for_row(0, 80);
        assert!(!state.contains(1));
        assert!(state.contains(2));
        assert!(state.contains(4));
        assert!(!state.contains(5));
    }
}
