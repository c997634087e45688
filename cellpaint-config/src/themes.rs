/// Built-in color themes
use serde::{Deserialize, Serialize};

use crate::color::{Color, Palette};

/// Terminal color theme with 16 ANSI colors plus foreground/background
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    pub name: String,
    pub foreground: Color,
    pub background: Color,
    pub cursor: Color,
    pub cursor_accent: Color,
    pub selection_bg: Color,
    pub selection_inactive_bg: Color,
    /// ANSI colors 0-15 (normal 0-7, bright 8-15)
    pub ansi: [Color; 16],
}

impl Theme {
    /// Get ANSI color by index (0-15); other indices yield the foreground.
    pub fn ansi_color(&self, index: u8) -> Color {
        self.ansi
            .get(index as usize)
            .copied()
            .unwrap_or(self.foreground)
    }

    /// Convert into the renderer palette.
    pub fn palette(&self) -> Palette {
        Palette {
            ansi: self.ansi,
            foreground: self.foreground,
            background: self.background,
            cursor: self.cursor,
            cursor_accent: self.cursor_accent,
            selection_background: self.selection_bg,
            selection_inactive_background: self.selection_inactive_bg,
        }
    }

    /// Default Dark theme (xterm colors)
    pub fn default_dark() -> Self {
        Self {
            name: "Default Dark".to_string(),
            foreground: Color::new(255, 255, 255),
            background: Color::new(0, 0, 0),
            cursor: Color::new(255, 255, 255),
            cursor_accent: Color::new(0, 0, 0),
            selection_bg: Color::new(100, 100, 100),
            selection_inactive_bg: Color::new(60, 60, 60),
            ansi: [
                Color::new(0, 0, 0),
                Color::new(205, 0, 0),
                Color::new(0, 205, 0),
                Color::new(205, 205, 0),
                Color::new(0, 0, 238),
                Color::new(205, 0, 205),
                Color::new(0, 205, 205),
                Color::new(229, 229, 229),
                Color::new(127, 127, 127),
                Color::new(255, 0, 0),
                Color::new(0, 255, 0),
                Color::new(255, 255, 0),
                Color::new(92, 92, 255),
                Color::new(255, 0, 255),
                Color::new(0, 255, 255),
                Color::new(255, 255, 255),
            ],
        }
    }

    /// Dracula theme
    pub fn dracula() -> Self {
        Self {
            name: "Dracula".to_string(),
            foreground: Color::new(248, 248, 242),
            background: Color::new(40, 42, 54),
            cursor: Color::new(248, 248, 240),
            cursor_accent: Color::new(40, 42, 54),
            selection_bg: Color::new(68, 71, 90),
            selection_inactive_bg: Color::new(52, 55, 70),
            ansi: [
                Color::new(0, 0, 0),
                Color::new(255, 85, 85),
                Color::new(80, 250, 123),
                Color::new(241, 250, 140),
                Color::new(189, 147, 249),
                Color::new(255, 121, 198),
                Color::new(139, 233, 253),
                Color::new(255, 255, 255),
                Color::new(98, 114, 164),
                Color::new(255, 110, 103),
                Color::new(90, 247, 142),
                Color::new(244, 244, 161),
                Color::new(189, 147, 249),
                Color::new(255, 121, 198),
                Color::new(139, 233, 253),
                Color::new(255, 255, 255),
            ],
        }
    }

    /// Solarized Dark theme
    pub fn solarized_dark() -> Self {
        Self {
            name: "Solarized Dark".to_string(),
            foreground: Color::new(131, 148, 150),
            background: Color::new(0, 43, 54),
            cursor: Color::new(147, 161, 161),
            cursor_accent: Color::new(0, 43, 54),
            selection_bg: Color::new(7, 54, 66),
            selection_inactive_bg: Color::new(4, 48, 60),
            ansi: [
                Color::new(7, 54, 66),
                Color::new(220, 50, 47),
                Color::new(133, 153, 0),
                Color::new(181, 137, 0),
                Color::new(38, 139, 210),
                Color::new(211, 54, 130),
                Color::new(42, 161, 152),
                Color::new(238, 232, 213),
                Color::new(0, 43, 54),
                Color::new(203, 75, 22),
                Color::new(88, 110, 117),
                Color::new(101, 123, 131),
                Color::new(131, 148, 150),
                Color::new(108, 113, 196),
                Color::new(147, 161, 161),
                Color::new(253, 246, 227),
            ],
        }
    }

    /// Tango Light theme
    pub fn tango_light() -> Self {
        Self {
            name: "Tango Light".to_string(),
            foreground: Color::new(46, 52, 54),
            background: Color::new(255, 255, 255),
            cursor: Color::new(46, 52, 54),
            cursor_accent: Color::new(255, 255, 255),
            selection_bg: Color::new(203, 228, 255),
            selection_inactive_bg: Color::new(225, 235, 245),
            ansi: [
                Color::new(46, 52, 54),
                Color::new(204, 0, 0),
                Color::new(78, 154, 6),
                Color::new(196, 160, 0),
                Color::new(52, 101, 164),
                Color::new(117, 80, 123),
                Color::new(6, 152, 154),
                Color::new(211, 215, 207),
                Color::new(85, 87, 83),
                Color::new(239, 41, 41),
                Color::new(138, 226, 52),
                Color::new(252, 233, 79),
                Color::new(114, 159, 207),
                Color::new(173, 127, 168),
                Color::new(52, 226, 226),
                Color::new(238, 238, 236),
            ],
        }
    }

    /// Get theme by name (case-insensitive, spaces or dashes)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().replace(' ', "-").as_str() {
            "default-dark" | "default" => Some(Self::default_dark()),
            "dracula" => Some(Self::dracula()),
            "solarized-dark" => Some(Self::solarized_dark()),
            "tango-light" => Some(Self::tango_light()),
            _ => None,
        }
    }

    /// Get all available theme names
    pub fn available_themes() -> Vec<&'static str> {
        vec!["Default Dark", "Dracula", "Solarized Dark", "Tango Light"]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_theme_resolves() {
        for name in Theme::available_themes() {
            let theme = Theme::by_name(name);
            assert!(theme.is_some(), "theme '{}' should resolve", name);
            assert_eq!(theme.unwrap().name, name);
        }
    }

    #[test]
    fn test_unknown_theme_is_none() {
        assert!(Theme::by_name("no-such-theme").is_none());
    }

    #[test]
    fn test_palette_carries_ansi_colors() {
        let theme = Theme::dracula();
        let palette = theme.palette();
        assert_eq!(palette.ansi[1], Color::new(255, 85, 85));
        assert_eq!(palette.background, theme.background);
        assert_eq!(theme.ansi_color(200), theme.foreground);
    }
}
