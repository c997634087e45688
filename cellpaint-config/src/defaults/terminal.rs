//! Default values for cursor, grid and display settings.

pub fn cursor_width() -> f32 {
    1.0 // Bar cursor width in CSS pixels
}

pub fn device_pixel_ratio() -> f32 {
    1.0
}

pub fn cols() -> usize {
    80
}

pub fn rows() -> usize {
    24
}

pub fn theme() -> String {
    "default-dark".to_string()
}

pub fn bool_true() -> bool {
    true
}

pub fn bool_false() -> bool {
    false
}
