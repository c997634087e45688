//! HTML-like serialisation of row trees and the scoped stylesheet.

use std::fmt::Write;

use cellpaint_config::FontConfig;

use super::row::RowNode;
use crate::renderer::RendererOptions;

/// Absolutely positioned selection overlay box, CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionNode {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Escape text for element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Shortest decimal form of a pixel length.
fn px(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format!("{rounded}px")
}

pub(super) fn write_row(out: &mut String, row: &RowNode) {
    let _ = write!(out, "<div class=\"cp-row\" data-row=\"{}\">", row.absolute_row);
    for span in &row.spans {
        let classes = span.classes();
        out.push_str("<span");
        if !classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", classes.join(" "));
        }
        if let Some(width) = span.width_px {
            let _ = write!(
                out,
                " style=\"display:inline-block;width:{}\"",
                px(width)
            );
        }
        out.push('>');
        out.push_str(&escape(&span.text));
        out.push_str("</span>");
    }
    out.push_str("</div>");
}

pub(super) fn write_selection(out: &mut String, nodes: &[SelectionNode]) {
    out.push_str("<div class=\"cp-selection\">");
    for node in nodes {
        let _ = write!(
            out,
            "<div style=\"left:{};top:{};width:{};height:{}\"></div>",
            px(node.left),
            px(node.top),
            px(node.width),
            px(node.height)
        );
    }
    out.push_str("</div>");
}

/// `font-family` value: the configured family with a generic fallback.
fn font_family(font: &FontConfig) -> String {
    let family: String = font
        .family
        .chars()
        .filter(|c| !matches!(c, '"' | '\\' | ';' | '{' | '}' | '<' | '>'))
        .collect();
    if family.trim().is_empty() {
        "monospace".to_string()
    } else {
        format!("\"{}\", monospace", family.trim())
    }
}

/// Stylesheet for one renderer, every rule scoped by `scope`.
///
/// `letter_spacing` is added to every glyph so that a run of normal glyphs
/// advances exactly one column per cell.
pub(super) fn stylesheet(
    scope: &str,
    options: &RendererOptions,
    row_height: f64,
    letter_spacing: f64,
) -> String {
    let palette = &options.palette;
    let cursor = &options.cursor;
    let font = &options.font;
    let mut css = String::new();
    let fg = palette.foreground.to_css();
    let bg = palette.background.to_css();
    let cursor_color = palette.cursor.to_css();
    let accent = palette.cursor_accent.to_css();

    let _ = writeln!(css, "{scope} {{ position: relative; }}");
    let _ = writeln!(
        css,
        "{scope} .cp-rows {{ color: {fg}; background-color: {bg}; white-space: pre; \
         font-family: {family}; font-size: {size}; font-weight: {weight}; \
         letter-spacing: {spacing}; font-kerning: none; font-variant-ligatures: none; }}",
        family = font_family(font),
        size = px(f64::from(font.size)),
        weight = font.weight,
        spacing = px(letter_spacing)
    );
    let _ = writeln!(
        css,
        "{scope} .cp-row {{ height: {h}; line-height: {h}; overflow: hidden; }}",
        h = px(row_height)
    );
    let _ = writeln!(
        css,
        "{scope} .cp-bold {{ font-weight: {}; }}",
        font.weight_bold
    );
    let _ = writeln!(css, "{scope} .cp-dim {{ opacity: 0.5; }}");
    let _ = writeln!(css, "{scope} .cp-italic {{ font-style: italic; }}");
    let _ = writeln!(
        css,
        "{scope} .cp-underline, {scope} .cp-link-hover {{ text-decoration: underline; }}"
    );

    // Cursor
    let _ = writeln!(
        css,
        "{scope}.cp-focus .cp-cursor-block {{ background-color: {cursor_color}; color: {accent}; }}"
    );
    let _ = writeln!(
        css,
        "{scope}:not(.cp-focus) .cp-cursor-block {{ outline: 1px solid {cursor_color}; outline-offset: -1px; }}"
    );
    let _ = writeln!(
        css,
        "{scope} .cp-cursor-bar {{ box-shadow: {} 0 0 0 {cursor_color} inset; }}",
        px(f64::from(cursor.width))
    );
    let _ = writeln!(
        css,
        "{scope} .cp-cursor-underline {{ box-shadow: 0 -1px 0 0 {cursor_color} inset; }}"
    );
    let animation = format!("{}-blink", scope.trim_start_matches('.'));
    let _ = writeln!(
        css,
        "{scope}.cp-focus .cp-cursor-blink {{ animation: {animation} 1s step-end infinite; }}"
    );
    let _ = writeln!(
        css,
        "@keyframes {animation} {{ 50% {{ background-color: transparent; color: inherit; box-shadow: none; }} }}"
    );

    // Selection
    let _ = writeln!(
        css,
        "{scope} .cp-selection {{ position: absolute; top: 0; left: 0; pointer-events: none; }}"
    );
    let _ = writeln!(
        css,
        "{scope} .cp-selection div {{ position: absolute; opacity: 0.5; background-color: {}; }}",
        palette.selection_inactive_background.to_css()
    );
    let _ = writeln!(
        css,
        "{scope}.cp-focus .cp-selection div {{ background-color: {}; }}",
        palette.selection_background.to_css()
    );

    // Colors
    let _ = writeln!(css, "{scope} .cp-fg-inverse {{ color: {bg}; }}");
    let _ = writeln!(css, "{scope} .cp-bg-inverse {{ background-color: {fg}; }}");
    for index in 0..=255u8 {
        let color = palette.indexed(index).to_css();
        let _ = writeln!(css, "{scope} .cp-fg-{index} {{ color: {color}; }}");
        let _ = writeln!(
            css,
            "{scope} .cp-bg-{index} {{ background-color: {color}; }}"
        );
    }
    css
}
