//! Colors and the terminal palette.

use serde::{Deserialize, Serialize};

use crate::cell::{DEFAULT_BG, DEFAULT_FG};

/// A color in RGB format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn as_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// RGBA bytes with the given alpha.
    pub fn to_rgba(&self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }

    /// CSS hex notation (`#rrggbb`).
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// The 16+2 color palette consumed by the renderers.
///
/// `ansi` holds palette indices 0–15. Indices 16–255 are derived from the
/// standard xterm 6×6×6 color cube and 24-step grey ramp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub ansi: [Color; 16],
    pub foreground: Color,
    pub background: Color,
    pub cursor: Color,
    pub cursor_accent: Color,
    pub selection_background: Color,
    pub selection_inactive_background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        crate::themes::Theme::default_dark().palette()
    }
}

impl Palette {
    /// Resolve a 256-color palette index.
    pub fn indexed(&self, index: u8) -> Color {
        match index {
            0..=15 => self.ansi[index as usize],
            16..=231 => {
                let i = index - 16;
                let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
                Color::new(level(i / 36), level((i / 6) % 6), level(i % 6))
            }
            232..=255 => {
                let grey = 8 + (index - 232) * 10;
                Color::new(grey, grey, grey)
            }
        }
    }

    /// Resolve a cell foreground index (`0..512`).
    pub fn resolve_fg(&self, index: u16) -> Color {
        match index {
            0..=255 => self.indexed(index as u8),
            DEFAULT_BG => self.background,
            _ => self.foreground,
        }
    }

    /// Resolve a cell background index (`0..512`).
    pub fn resolve_bg(&self, index: u16) -> Color {
        match index {
            0..=255 => self.indexed(index as u8),
            DEFAULT_FG => self.foreground,
            _ => self.background,
        }
    }

    /// Selection fill color for the given focus state.
    pub fn selection(&self, focused: bool) -> Color {
        if focused {
            self.selection_background
        } else {
            self.selection_inactive_background
        }
    }
}
