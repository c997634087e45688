//! Default values for font and text-rendering settings.

pub fn font_size() -> f32 {
    15.0 // CSS pixels
}

pub fn font_family() -> String {
    "DejaVu Sans Mono".to_string()
}

pub fn font_weight() -> u16 {
    400
}

pub fn font_weight_bold() -> u16 {
    700
}

pub fn letter_spacing() -> f32 {
    0.0 // Extra pixels between cells
}

pub fn line_height() -> f32 {
    1.0 // Line height multiplier
}
