//! Structured backend: one node tree per row, serialised to markup.
//!
//! Rows are rebuilt only when their range is rendered. Cursor and link
//! hover changes rebuild just the rows they touch; selection lives in a
//! separate overlay and never rebuilds rows.

mod markup;
mod row;

pub use markup::{SelectionNode, escape};
pub use row::{CursorMarker, RowNode, SpanNode, create_row};

use cellpaint_config::CellMetrics;
use cellpaint_fonts::{GlyphStyle, TextMeasurer};

use crate::grid::GridSource;
use crate::link::{LinkHoverRange, LinkHoverState};
use crate::probe::{FontMetricsProbe, FontMetricsTable, REPEAT};
use crate::renderer::{RendererId, RendererOptions, TerminalRenderer};
use crate::selection::{SelectionRange, SelectionRect, compute_rects};

/// Result of one idle slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdleStatus {
    /// Another slice is needed
    pub more: bool,
    /// Anomalies were found; the host should re-render the viewport
    pub rerender: bool,
}

pub struct StructuredRowRenderer {
    id: RendererId,
    options: RendererOptions,
    measurer: Box<dyn TextMeasurer>,
    metrics: CellMetrics,
    cols: usize,
    probe: FontMetricsProbe,
    /// Viewport rows; `None` until first rendered
    rows: Vec<Option<RowNode>>,
    selection: Option<SelectionRange>,
    selection_rects: Vec<SelectionRect>,
    link: Option<LinkHoverRange>,
    /// Viewport row the cursor was last drawn on
    cursor_row: Option<usize>,
    focused: bool,
    idle_cancelled: bool,
}

impl std::fmt::Debug for StructuredRowRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuredRowRenderer")
            .field("id", &self.id)
            .field("cols", &self.cols)
            .field("rows", &self.rows.len())
            .field("metrics", &self.metrics)
            .field("probe_complete", &self.probe.is_complete())
            .finish()
    }
}

impl StructuredRowRenderer {
    pub fn new(
        id: RendererId,
        measurer: Box<dyn TextMeasurer>,
        options: RendererOptions,
        cols: usize,
        rows: usize,
        metrics: CellMetrics,
    ) -> Self {
        let expected = reference_advance(measurer.as_ref(), metrics);
        Self {
            id,
            options,
            measurer,
            metrics,
            cols,
            probe: FontMetricsProbe::new(expected),
            rows: vec![None; rows],
            selection: None,
            selection_rects: Vec::new(),
            link: None,
            cursor_row: None,
            focused: true,
            idle_cancelled: false,
        }
    }

    pub fn id(&self) -> RendererId {
        self.id
    }

    /// Class that scopes this renderer's stylesheet.
    pub fn scope_class(&self) -> String {
        format!("cellpaint-{}", self.id)
    }

    pub fn rows(&self) -> &[Option<RowNode>] {
        &self.rows
    }

    pub fn row(&self, viewport_row: usize) -> Option<&RowNode> {
        self.rows.get(viewport_row).and_then(Option::as_ref)
    }

    pub fn metrics_table(&self) -> &FontMetricsTable {
        self.probe.table()
    }

    pub fn selection_rects(&self) -> &[SelectionRect] {
        &self.selection_rects
    }

    fn dpr(&self) -> f64 {
        let dpr = f64::from(self.options.device_pixel_ratio);
        if dpr > 0.0 { dpr } else { 1.0 }
    }

    /// Column width in CSS pixels.
    pub fn css_cell_width(&self) -> f64 {
        self.metrics.width / self.dpr()
    }

    pub fn css_cell_height(&self) -> f64 {
        self.metrics.height / self.dpr()
    }

    /// Selection overlay boxes in CSS pixels.
    pub fn selection_nodes(&self) -> Vec<SelectionNode> {
        let (cw, ch) = (self.css_cell_width(), self.css_cell_height());
        self.selection_rects
            .iter()
            .map(|r| SelectionNode {
                left: r.col as f64 * cw,
                top: r.row as f64 * ch,
                width: r.width as f64 * cw,
                height: r.height as f64 * ch,
            })
            .collect()
    }

    /// Serialise the whole tree, overlay included.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        out.push_str("<div class=\"cellpaint ");
        out.push_str(&self.scope_class());
        if self.focused {
            out.push_str(" cp-focus");
        }
        out.push_str("\"><div class=\"cp-rows\">");
        for (index, row) in self.rows.iter().enumerate() {
            match row {
                Some(row) => markup::write_row(&mut out, row),
                None => {
                    out.push_str(&format!("<div class=\"cp-row\" data-viewport-row=\"{index}\"></div>"))
                }
            }
        }
        out.push_str("</div>");
        markup::write_selection(&mut out, &self.selection_nodes());
        out.push_str("</div>");
        out
    }

    /// Spacing that widens one natural glyph advance to a full column, CSS
    /// pixels. Anomalous runs get explicit widths instead.
    pub fn css_letter_spacing(&self) -> f64 {
        self.css_cell_width() - self.probe.cell_width() / self.dpr()
    }

    /// Font, palette, cursor and selection rules scoped to this renderer.
    pub fn stylesheet(&self) -> String {
        markup::stylesheet(
            &format!(".{}", self.scope_class()),
            &self.options,
            self.css_cell_height(),
            self.css_letter_spacing(),
        )
    }

    /// Run one probe batch. Called by the host whenever it is idle.
    pub fn run_idle(&mut self) -> IdleStatus {
        if self.idle_cancelled || self.probe.is_complete() {
            return IdleStatus::default();
        }
        let batch = self.probe.probe_next(self.measurer.as_ref(), GlyphStyle::REGULAR);
        if batch.anomalies > 0 {
            log::debug!(
                "Renderer {}: {} anomalous glyphs found",
                self.id,
                batch.anomalies
            );
        }
        IdleStatus {
            more: batch.more,
            rerender: batch.anomalies > 0,
        }
    }

    /// Stop idle probing; later [`StructuredRowRenderer::run_idle`] calls do nothing.
    pub fn cancel_idle(&mut self) {
        self.idle_cancelled = true;
    }

    pub fn dispose(&mut self) {
        self.cancel_idle();
        self.rows.clear();
        self.selection = None;
        self.selection_rects.clear();
        self.link = None;
        self.cursor_row = None;
    }

    fn link_state(&self, absolute_row: usize) -> LinkHoverState {
        self.link
            .map(|link| link.state_for_row(absolute_row, self.cols))
            .unwrap_or_default()
    }

    fn rebuild_row(&mut self, grid: &dyn GridSource, row: usize) {
        if row >= self.rows.len() || row >= grid.rows() {
            return;
        }
        let cols = self.cols.min(grid.cols());
        let mut cells = grid.row_cells(row);
        cells.truncate(cols);

        let absolute_row = row + grid.scroll_offset();
        let is_cursor_row = grid.cursor_viewport_row() == Some(row);
        let link = self.link_state(absolute_row);
        let cursor = &self.options.cursor;
        let node = create_row(
            &cells,
            absolute_row,
            is_cursor_row,
            cursor.style,
            grid.cursor().0,
            cursor.blink,
            self.css_cell_width(),
            self.probe.table(),
            &link,
        );
        self.rows[row] = Some(node);
    }

    /// Rebuild every viewport row touched by `range`.
    fn rebuild_link_rows(&mut self, grid: &dyn GridSource, range: LinkHoverRange) {
        let scroll = grid.scroll_offset();
        for absolute_row in range.rows() {
            let Some(row) = absolute_row.checked_sub(scroll) else {
                continue;
            };
            if row >= self.rows.len() {
                break;
            }
            self.rebuild_row(grid, row);
        }
    }
}

/// Natural advance of one glyph, falling back to the cell width.
fn reference_advance(measurer: &dyn TextMeasurer, metrics: CellMetrics) -> f64 {
    let text = "m".repeat(REPEAT);
    let advance = measurer.measure(&text, GlyphStyle::REGULAR) / REPEAT as f64;
    if advance > 0.0 { advance } else { metrics.width }
}

impl TerminalRenderer for StructuredRowRenderer {
    fn resize(&mut self, cols: usize, rows: usize, metrics: CellMetrics, metrics_changed: bool) {
        self.cols = cols;
        self.rows.resize(rows, None);
        if metrics_changed {
            self.handle_metrics_change(metrics);
        } else {
            self.metrics = metrics;
        }
    }

    fn render(&mut self, grid: &dyn GridSource, start: usize, end: usize) {
        let rows = self.rows.len().min(grid.rows());
        if rows == 0 {
            return;
        }
        for row in start..=end.min(rows - 1) {
            self.rebuild_row(grid, row);
        }
        self.cursor_row = grid.cursor_viewport_row();
    }

    fn clear(&mut self) {
        self.rows.iter_mut().for_each(|row| *row = None);
        self.selection = None;
        self.selection_rects.clear();
    }

    fn set_selection(
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

    fn set_link_hover(&mut self, grid: &dyn GridSource, range: Option<LinkHoverRange>) {
        let previous = std::mem::replace(&mut self.link, range);
        if previous == range {
            return;
        }
        if let Some(previous) = previous {
            self.rebuild_link_rows(grid, previous);
        }
        if let Some(range) = range {
            self.rebuild_link_rows(grid, range);
        }
    }

    fn handle_cursor_move(&mut self, grid: &dyn GridSource) {
        let current = grid.cursor_viewport_row();
        if let Some(previous) = self.cursor_row
            && Some(previous) != current
        {
            self.rebuild_row(grid, previous);
        }
        if let Some(row) = current {
            self.rebuild_row(grid, row);
        }
        self.cursor_row = current;
    }

    fn handle_metrics_change(&mut self, metrics: CellMetrics) {
        self.metrics = metrics;
        let expected = reference_advance(self.measurer.as_ref(), metrics);
        self.probe.set_cell_width(expected);
        self.probe.reset();
        log::debug!(
            "Renderer {}: metrics changed, font probe restarted at {:.2}px",
            self.id,
            expected
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
