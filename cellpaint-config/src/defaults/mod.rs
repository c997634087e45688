//! Default value functions for configuration.
//!
//! Each sub-module groups related `default_*` free functions used as
//! `#[serde(default = "crate::defaults::...")]` attributes on `Config` fields.

mod font;
mod terminal;

// ── Font & text rendering ──────────────────────────────────────────────────
pub use font::{
    font_family, font_size, font_weight, font_weight_bold, letter_spacing, line_height,
};

// ── Cursor, colors & display ───────────────────────────────────────────────
pub use terminal::{
    bool_false, bool_true, cols, cursor_width, device_pixel_ratio, rows, theme,
};
