//! Font fallback chain configuration.

/// Fallback font families in priority order.
///
/// Searched when the primary face has no glyph for a character, and used as
/// the primary face when the configured family is not installed:
/// 1. Common monospace families for ASCII/Latin-1
/// 2. CJK coverage for double-width cells
/// 3. Symbol fonts for box drawing and dingbats
pub const FALLBACK_FAMILIES: &[&str] = &[
    // Monospace
    "DejaVu Sans Mono",
    "JetBrains Mono",
    "Fira Code",
    "Liberation Mono",
    "Noto Sans Mono",
    "Consolas",
    "Menlo",
    "Monaco",
    "Courier New",
    // CJK
    "Noto Sans CJK JP",
    "Noto Sans CJK SC",
    "Microsoft YaHei",
    "MS Gothic",
    // Symbols
    "Symbols Nerd Font",
    "Noto Sans Symbols",
    "Noto Sans Symbols 2",
    "Segoe UI Symbol",
    "Apple Symbols",
    "DejaVu Sans",
];
