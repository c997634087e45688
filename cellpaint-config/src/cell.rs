//! The cell data model consumed by every rendering backend.
//!
//! A [`Cell`] is an immutable snapshot of one grid position for the duration
//! of a render pass. The grid that owns the cells lives outside this crate.

use bitflags::bitflags;

/// Color index meaning "the theme's default foreground".
pub const DEFAULT_FG: u16 = 256;

/// Color index meaning "the theme's default background".
pub const DEFAULT_BG: u16 = 257;

bitflags! {
    /// Text attribute flags carried by a cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFlags: u8 {
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
        const BLINK = 1 << 5;
    }
}

/// Styling attributes of a cell.
///
/// `fg` and `bg` are color indices in `0..512`: `0..256` address the
/// 256-color palette, [`DEFAULT_FG`] and [`DEFAULT_BG`] the theme defaults.
/// Any index above [`DEFAULT_BG`] is treated as the matching default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAttributes {
    pub fg: u16,
    pub bg: u16,
    pub flags: CellFlags,
}

impl Default for CellAttributes {
    fn default() -> Self {
        Self {
            fg: DEFAULT_FG,
            bg: DEFAULT_BG,
            flags: CellFlags::empty(),
        }
    }
}

impl CellAttributes {
    pub fn new(fg: u16, bg: u16, flags: CellFlags) -> Self {
        Self { fg, bg, flags }
    }

    pub fn bold(&self) -> bool {
        self.flags.contains(CellFlags::BOLD)
    }

    pub fn dim(&self) -> bool {
        self.flags.contains(CellFlags::DIM)
    }

    pub fn italic(&self) -> bool {
        self.flags.contains(CellFlags::ITALIC)
    }

    pub fn underline(&self) -> bool {
        self.flags.contains(CellFlags::UNDERLINE)
    }

    pub fn inverse(&self) -> bool {
        self.flags.contains(CellFlags::INVERSE)
    }

    pub fn blink(&self) -> bool {
        self.flags.contains(CellFlags::BLINK)
    }

    /// Foreground and background indices after applying INVERSE.
    ///
    /// Inverting a default color maps it onto the opposite default so the
    /// result still resolves through the theme.
    pub fn effective_colors(&self) -> (u16, u16) {
        if !self.inverse() {
            return (self.fg, self.bg);
        }
        let fg = if self.bg >= DEFAULT_FG {
            DEFAULT_BG
        } else {
            self.bg
        };
        let bg = if self.fg >= DEFAULT_FG {
            DEFAULT_FG
        } else {
            self.fg
        };
        (fg, bg)
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Unicode scalar value; `0` marks an unset cell.
    pub codepoint: u32,
    /// Display width in columns, 1 or 2.
    pub width: u8,
    pub attributes: CellAttributes,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            codepoint: 0,
            width: 1,
            attributes: CellAttributes::default(),
        }
    }
}

impl Cell {
    pub fn new(ch: char, attributes: CellAttributes) -> Self {
        Self {
            codepoint: ch as u32,
            width: 1,
            attributes,
        }
    }

    /// A double-width cell (CJK, emoji). The grid places an unset cell after it.
    pub fn wide(ch: char, attributes: CellAttributes) -> Self {
        Self {
            codepoint: ch as u32,
            width: 2,
            attributes,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.codepoint == 0
    }

    pub fn as_char(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }

    /// Width clamped to the `1..=2` range the renderers understand.
    pub fn display_width(&self) -> usize {
        self.width.clamp(1, 2) as usize
    }
}
