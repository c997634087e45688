//! Row node construction: one span per styled run of cells.

use cellpaint_config::{Cell, CellAttributes, CursorStyle, DEFAULT_BG, DEFAULT_FG};

use crate::link::LinkHoverState;
use crate::probe::FontMetricsTable;

/// Cursor drawn inside a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMarker {
    pub style: CursorStyle,
    pub blink: bool,
}

/// A run of cells sharing every rendering attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanNode {
    pub text: String,
    /// First grid column covered by the run
    pub start_col: usize,
    /// Grid columns covered, counting wide cells twice
    pub cols: usize,
    pub attributes: CellAttributes,
    /// Explicit layout width in CSS pixels for runs of anomalous glyphs
    pub width_px: Option<f64>,
    pub cursor: Option<CursorMarker>,
    pub link_hover: bool,
}

impl SpanNode {
    /// Style classes, in a stable order.
    pub fn classes(&self) -> Vec<String> {
        let attrs = self.attributes;
        let mut classes = Vec::new();
        if attrs.bold() {
            classes.push("cp-bold".to_string());
        }
        if attrs.dim() {
            classes.push("cp-dim".to_string());
        }
        if attrs.italic() {
            classes.push("cp-italic".to_string());
        }
        if attrs.underline() {
            classes.push("cp-underline".to_string());
        }
        if attrs.blink() {
            classes.push("cp-blink".to_string());
        }

        let (fg, bg) = attrs.effective_colors();
        let fg = if attrs.bold() && fg < 8 { fg + 8 } else { fg };
        match fg {
            0..=255 => classes.push(format!("cp-fg-{fg}")),
            DEFAULT_BG => classes.push("cp-fg-inverse".to_string()),
            _ => {}
        }
        match bg {
            0..=255 => classes.push(format!("cp-bg-{bg}")),
            DEFAULT_FG => classes.push("cp-bg-inverse".to_string()),
            _ => {}
        }

        if let Some(cursor) = self.cursor {
            classes.push("cp-cursor".to_string());
            classes.push(format!("cp-cursor-{}", cursor.style.as_str()));
            if cursor.blink {
                classes.push("cp-cursor-blink".to_string());
            }
        }
        if self.link_hover {
            classes.push("cp-link-hover".to_string());
        }
        classes
    }
}

/// All spans of one grid row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowNode {
    pub absolute_row: usize,
    pub spans: Vec<SpanNode>,
}

impl RowNode {
    /// Row text with unset cells as spaces.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// The span holding the cursor, if this is the cursor row.
    pub fn cursor_span(&self) -> Option<&SpanNode> {
        self.spans.iter().find(|s| s.cursor.is_some())
    }
}

/// Everything that forces a run boundary when it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunKey {
    attributes: CellAttributes,
    anomalous: bool,
    cursor: bool,
    link: bool,
}

/// Build the node tree of a single row.
///
/// Pure: the output depends only on the arguments. `cell_width` is the
/// CSS width of one column and is applied to runs of anomalous glyphs.
#[allow(clippy::too_many_arguments)]
pub fn create_row(
    cells: &[Cell],
    absolute_row: usize,
    is_cursor_row: bool,
    cursor_style: CursorStyle,
    cursor_col: usize,
    cursor_blink: bool,
    cell_width: f64,
    table: &FontMetricsTable,
    link_hover: &LinkHoverState,
) -> RowNode {
    let mut spans: Vec<SpanNode> = Vec::new();
    let mut current: Option<(RunKey, SpanNode)> = None;

    let mut col = 0;
    while col < cells.len() {
        let cell = cells[col];
        let width = cell.display_width().min(cells.len() - col);
        let is_cursor = is_cursor_row && (col..col + width).contains(&cursor_col);
        let key = RunKey {
            attributes: cell.attributes,
            anomalous: table.is_anomalous(cell.codepoint),
            cursor: is_cursor,
            link: link_hover.contains(col),
        };
        let ch = if cell.is_unset() {
            ' '
        } else {
            cell.as_char().unwrap_or(char::REPLACEMENT_CHARACTER)
        };

        match &mut current {
            Some((run_key, span)) if *run_key == key && !is_cursor => {
                span.text.push(ch);
                span.cols += width;
            }
            _ => {
                if let Some((run_key, span)) = current.take() {
                    spans.push(finish_span(run_key, span, cell_width));
                }
                current = Some((
                    key,
                    SpanNode {
                        text: ch.to_string(),
                        start_col: col,
                        cols: width,
                        attributes: cell.attributes,
                        width_px: None,
                        cursor: is_cursor.then_some(CursorMarker {
                            style: cursor_style,
                            blink: cursor_blink,
                        }),
                        link_hover: key.link,
                    },
                ));
            }
        }
        col += width;
    }
    if let Some((run_key, span)) = current {
        spans.push(finish_span(run_key, span, cell_width));
    }

    RowNode {
        absolute_row,
        spans,
    }
}

fn finish_span(key: RunKey, mut span: SpanNode, cell_width: f64) -> SpanNode {
    if key.anomalous {
        span.width_px = Some(cell_width * span.cols as f64);
    }
    span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{ANOMALOUS, NORMAL};
    use cellpaint_config::CellFlags;

    fn row_of(text: &str, attrs: CellAttributes) -> Vec<Cell> {
        text.chars().map(|c| Cell::new(c, attrs)).collect()
    }

    fn resolved_table() -> FontMetricsTable {
        let mut table = FontMetricsTable::new();
        for code in 0..256 {
            table.set(code, NORMAL);
        }
        table
    }

    fn build(cells: &[Cell], cursor: Option<usize>, table: &FontMetricsTable) -> RowNode {
        create_row(
            cells,
            0,
            cursor.is_some(),
            CursorStyle::Block,
            cursor.unwrap_or(0),
            false,
            8.0,
            table,
            &LinkHoverState::default(),
        )
    }

    #[test]
    fn test_uniform_row_is_one_span() {
        let cells = row_of("hello", CellAttributes::default());
        let row = build(&cells, None, &resolved_table());
        assert_eq!(row.spans.len(), 1);
        assert_eq!(row.text(), "hello");
        assert_eq!(row.spans[0].cols, 5);
    }

    #[test]
    fn test_attribute_change_splits_runs() {
        let mut cells = row_of("abcd", CellAttributes::default());
        cells[2].attributes = CellAttributes::new(1, DEFAULT_BG, CellFlags::BOLD);
        let row = build(&cells, None, &resolved_table());
        let texts: Vec<_> = row.spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["ab", "c", "d"]);
        assert_eq!(row.spans[1].classes(), ["cp-bold", "cp-fg-9"]);
    }

    #[test]
    fn test_cursor_gets_its_own_span() {
        let cells = row_of("abcde", CellAttributes::default());
        let row = build(&cells, Some(2), &resolved_table());
        let texts: Vec<_> = row.spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["ab", "c", "de"]);
        let cursor = row.cursor_span().unwrap();
        assert_eq!(cursor.start_col, 2);
        assert!(cursor.classes().contains(&"cp-cursor-block".to_string()));
        assert!(!cursor.classes().contains(&"cp-cursor-blink".to_string()));
    }

    #[test]
    fn test_anomalous_run_gets_explicit_width() {
        let mut table = resolved_table();
        table.set('W' as u32, ANOMALOUS);
        let cells = row_of("aWWb", CellAttributes::default());
        let row = build(&cells, None, &table);
        assert_eq!(row.spans.len(), 3);
        assert_eq!(row.spans[0].width_px, None);
        assert_eq!(row.spans[1].text, "WW");
        assert_eq!(row.spans[1].width_px, Some(16.0));
    }

    #[test]
    fn test_unknown_entries_are_not_anomalous() {
        let cells = row_of("W", CellAttributes::default());
        let row = build(&cells, None, &FontMetricsTable::new());
        assert_eq!(row.spans[0].width_px, None);
    }

    #[test]
    fn test_link_hover_boundaries() {
        let cells = row_of("see http://x now", CellAttributes::default());
        let link = LinkHoverState {
            active: true,
            col_start: 4,
            col_end: 12,
        };
        let row = create_row(
            &cells,
            3,
            false,
            CursorStyle::Bar,
            0,
            true,
            8.0,
            &resolved_table(),
            &link,
        );
        let texts: Vec<_> = row.spans.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["see ", "http://x", " now"]);
        assert!(row.spans[1].link_hover);
        assert_eq!(row.absolute_row, 3);
    }

    #[test]
    fn test_wide_cell_consumes_two_columns() {
        let attrs = CellAttributes::default();
        let cells = vec![
            Cell::wide('\u{4e00}', attrs),
            Cell::default(),
            Cell::new('x', attrs),
        ];
        let row = build(&cells, Some(1), &resolved_table());
        assert_eq!(row.spans[0].text, "\u{4e00}");
        assert_eq!(row.spans[0].cols, 2);
        assert!(row.spans[0].cursor.is_some());
        assert_eq!(row.spans[1].start_col, 2);
    }

    #[test]
    fn test_unset_cells_render_as_spaces() {
        let cells = vec![Cell::default(); 3];
        let row = build(&cells, None, &resolved_table());
        assert_eq!(row.text(), "   ");
    }

    #[test]
    fn test_inverse_classes() {
        let attrs = CellAttributes::new(DEFAULT_FG, DEFAULT_BG, CellFlags::INVERSE);
        let row = build(&row_of("x", attrs), None, &resolved_table());
        assert_eq!(row.spans[0].classes(), ["cp-fg-inverse", "cp-bg-inverse"]);
    }
}
