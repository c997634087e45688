//! Pixel operations on RGBA surfaces. All operations clip to the target.

use cellpaint_config::Color;
use cellpaint_fonts::GlyphBitmap;
use image::{Rgba, RgbaImage};

/// Pixel-space rectangle; may extend past the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Intersection with a `width`×`height` surface as `(x0, y0, x1, y1)`.
    fn clip(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + self.width as i64).min(width as i64);
        let y1 = (self.y + self.height as i64).min(height as i64);
        (x0 < x1 && y0 < y1).then_some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Straight-alpha source-over.
pub(crate) fn blend_pixel(dst: &mut Rgba<u8>, src: [u8; 4]) {
    let sa = src[3] as u32;
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = Rgba(src);
        return;
    }
    let da = dst[3] as u32;
    let inv = 255 - sa;
    let out_a = sa * 255 + da * inv;
    if out_a == 0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = src[i] as u32 * sa * 255 + dst[i] as u32 * da * inv;
        out[i] = ((c + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    *dst = Rgba(out);
}

/// Overwrite a rectangle with an opaque color.
pub(crate) fn fill_rect(surface: &mut RgbaImage, rect: PixelRect, color: Color) {
    let Some((x0, y0, x1, y1)) = rect.clip(surface.width(), surface.height()) else {
        return;
    };
    let px = Rgba(color.to_rgba(255));
    for y in y0..y1 {
        for x in x0..x1 {
            surface.put_pixel(x, y, px);
        }
    }
}

/// Blend a translucent rectangle over the surface.
pub(crate) fn blend_rect(surface: &mut RgbaImage, rect: PixelRect, color: Color, alpha: u8) {
    let Some((x0, y0, x1, y1)) = rect.clip(surface.width(), surface.height()) else {
        return;
    };
    let src = color.to_rgba(alpha);
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(surface.get_pixel_mut(x, y), src);
        }
    }
}

/// 1px outline of a rectangle.
pub(crate) fn stroke_rect(surface: &mut RgbaImage, rect: PixelRect, color: Color) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let right = rect.x + rect.width as i64 - 1;
    let bottom = rect.y + rect.height as i64 - 1;
    fill_rect(surface, PixelRect::new(rect.x, rect.y, rect.width, 1), color);
    fill_rect(surface, PixelRect::new(rect.x, bottom, rect.width, 1), color);
    fill_rect(surface, PixelRect::new(rect.x, rect.y, 1, rect.height), color);
    fill_rect(surface, PixelRect::new(right, rect.y, 1, rect.height), color);
}

/// Draw a coverage mask tinted with `color` into a cell box.
///
/// The mask is offset from the box origin by its own `left`/`top` and
/// clipped to the box as well as the surface.
pub(crate) fn draw_mask(
    surface: &mut RgbaImage,
    cell: PixelRect,
    mask: &GlyphBitmap,
    color: Color,
    alpha: u8,
) {
    let Some((cx0, cy0, cx1, cy1)) = cell.clip(surface.width(), surface.height()) else {
        return;
    };
    let origin_x = cell.x + mask.left as i64;
    let origin_y = cell.y + mask.top as i64;
    for my in 0..mask.height {
        let y = origin_y + my as i64;
        if y < cy0 as i64 || y >= cy1 as i64 {
            continue;
        }
        for mx in 0..mask.width {
            let x = origin_x + mx as i64;
            if x < cx0 as i64 || x >= cx1 as i64 {
                continue;
            }
            let coverage = mask.coverage_at(mx, my) as u32 * alpha as u32 / 255;
            if coverage == 0 {
                continue;
            }
            blend_pixel(
                surface.get_pixel_mut(x as u32, y as u32),
                color.to_rgba(coverage as u8),
            );
        }
    }
}

/// Source-over copy of a region of `src` into `dst`.
pub(crate) fn blit_over(
    dst: &mut RgbaImage,
    dst_x: i64,
    dst_y: i64,
    src: &RgbaImage,
    src_rect: PixelRect,
) {
    let Some((sx0, sy0, sx1, sy1)) = src_rect.clip(src.width(), src.height()) else {
        return;
    };
    let target = PixelRect::new(dst_x, dst_y, sx1 - sx0, sy1 - sy0);
    let Some((dx0, dy0, dx1, dy1)) = target.clip(dst.width(), dst.height()) else {
        return;
    };
    for y in dy0..dy1 {
        let sy = sy0 as i64 + (y as i64 - dst_y);
        for x in dx0..dx1 {
            let sx = sx0 as i64 + (x as i64 - dst_x);
            let src_px = src.get_pixel(sx as u32, sy as u32).0;
            blend_pixel(dst.get_pixel_mut(x, y), src_px);
        }
    }
}
