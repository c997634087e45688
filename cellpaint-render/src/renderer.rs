//! The capability contract shared by both rendering backends.

use std::fmt;

use cellpaint_config::{CellMetrics, CursorConfig, FontConfig, Palette};

use crate::grid::GridSource;
use crate::link::LinkHoverRange;
use crate::selection::SelectionRange;

/// Identifier scoping one renderer's styles, assigned by the owning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(pub u32);

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings a renderer is constructed with.
#[derive(Debug, Clone)]
pub struct RendererOptions {
    pub palette: Palette,
    pub cursor: CursorConfig,
    /// Font settings, used by backends that leave glyph drawing to a layout engine
    pub font: FontConfig,
    pub device_pixel_ratio: f32,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            cursor: CursorConfig::default(),
            font: FontConfig::default(),
            device_pixel_ratio: 1.0,
        }
    }
}

/// Operations a terminal session drives on its renderer.
///
/// Every call is synchronous; only the visual effect of a metrics change
/// may lag until the renderer's background work resolves.
pub trait TerminalRenderer {
    /// The grid is now `cols`×`rows` cells of `metrics`.
    fn resize(&mut self, cols: usize, rows: usize, metrics: CellMetrics, metrics_changed: bool);

    /// Repaint viewport rows `start..=end`.
    fn render(&mut self, grid: &dyn GridSource, start: usize, end: usize);

    /// Wipe everything painted so far.
    fn clear(&mut self);

    /// Replace the selection overlay; `None` removes it.
    fn set_selection(
        &mut self,
        grid: &dyn GridSource,
        range: Option<SelectionRange>,
        column_mode: bool,
    );

    /// Replace the hovered link; `None` removes it.
    fn set_link_hover(&mut self, grid: &dyn GridSource, range: Option<LinkHoverRange>);

    /// The cursor moved in `grid`.
    fn handle_cursor_move(&mut self, grid: &dyn GridSource);

    /// Font or cell geometry changed.
    fn handle_metrics_change(&mut self, metrics: CellMetrics);

    /// Focus picks the active or inactive selection color.
    fn set_focused(&mut self, focused: bool);
}
