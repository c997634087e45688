//! Pre-rendered glyph atlas for the blit fast path.
//!
//! Layout: 256 tile columns (code points 0-255) by 17 tile rows. Row 0 holds
//! the default foreground, rows 1-16 palette colors 0-15, with palette 8-15
//! drawn from the bold face. Tiles are exactly one cell in size, so a blit
//! never depends on glyph complexity.

use std::sync::Arc;

use cellpaint_config::{CellMetrics, Color, DEFAULT_BG, DEFAULT_FG, Palette};
use cellpaint_fonts::{GlyphBitmap, GlyphRasterizer, GlyphStyle};
use image::RgbaImage;

use crate::error::RenderError;
use crate::paint::{self, PixelRect};

/// Tile columns, one per code point
pub const ATLAS_CODEPOINTS: u32 = 256;

/// Tile rows: default foreground plus 16 palette colors
pub const ATLAS_COLOR_ROWS: u32 = 17;

/// Largest atlas bitmap we are willing to allocate, in bytes
pub const MAX_ATLAS_BYTES: u64 = 512 * 1024 * 1024;

/// An immutable atlas bitmap built for one set of cell metrics.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    image: RgbaImage,
    metrics: CellMetrics,
}

impl GlyphAtlas {
    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Pixel rectangle of tile `(code, color_row)`.
    pub fn tile_rect(&self, code: u8, color_row: u8) -> (u32, u32, u32, u32) {
        let (w, h) = (self.metrics.tile_width(), self.metrics.tile_height());
        (code as u32 * w, color_row as u32 * h, w, h)
    }

    pub(crate) fn tile_pixel_rect(&self, code: u8, color_row: u8) -> PixelRect {
        let (x, y, w, h) = self.tile_rect(code, color_row);
        PixelRect::new(x as i64, y as i64, w, h)
    }
}

/// Atlas color row for a foreground index, or `None` when the color is
/// not baked into the atlas.
///
/// BOLD moves palette colors 0-7 to their bright counterparts 8-15.
pub fn color_row(fg: u16, bold: bool) -> Option<u8> {
    match fg {
        0..=15 => {
            let index = if bold && fg < 8 { fg + 8 } else { fg };
            Some(index as u8 + 1)
        }
        DEFAULT_FG => Some(0),
        DEFAULT_BG => None,
        n if n > DEFAULT_BG => Some(0),
        _ => None,
    }
}

/// Color and face used for an atlas row.
fn row_style(palette: &Palette, row: u32) -> (Color, GlyphStyle) {
    match row.checked_sub(1) {
        None => (palette.foreground, GlyphStyle::REGULAR),
        Some(index) if index >= 8 => (palette.ansi[index as usize], GlyphStyle::BOLD),
        Some(index) => (palette.ansi[index as usize], GlyphStyle::REGULAR),
    }
}

/// Atlas bitmap size for one tile size, checked against [`MAX_ATLAS_BYTES`].
pub fn atlas_dimensions(tile_w: u32, tile_h: u32) -> Result<(u32, u32), RenderError> {
    if tile_w == 0 || tile_h == 0 {
        return Err(RenderError::InvalidMetrics {
            width: tile_w,
            height: tile_h,
        });
    }
    let width = tile_w as u64 * ATLAS_CODEPOINTS as u64;
    let height = tile_h as u64 * ATLAS_COLOR_ROWS as u64;
    let fits = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(4))
        .is_some_and(|bytes| bytes <= MAX_ATLAS_BYTES);
    if !fits {
        return Err(RenderError::SurfaceTooLarge {
            width,
            height,
            max_bytes: MAX_ATLAS_BYTES,
        });
    }
    Ok((width as u32, height as u32))
}

/// Build an atlas synchronously.
///
/// Each code point is rasterized once per face and tinted into every row
/// that uses that face; the masks are dropped when the atlas is returned.
pub fn build_atlas(
    rasterizer: &dyn GlyphRasterizer,
    palette: &Palette,
    metrics: CellMetrics,
) -> Result<GlyphAtlas, RenderError> {
    let (tile_w, tile_h) = (metrics.tile_width(), metrics.tile_height());
    let (width, height) = atlas_dimensions(tile_w, tile_h)?;

    let rasterize_all = |style: GlyphStyle| -> Vec<Option<GlyphBitmap>> {
        (0..ATLAS_CODEPOINTS)
            .map(|code| {
                char::from_u32(code).and_then(|ch| rasterizer.rasterize(ch, style, &metrics))
            })
            .collect()
    };
    let regular = rasterize_all(GlyphStyle::REGULAR);
    let bold = rasterize_all(GlyphStyle::BOLD);

    let mut image = RgbaImage::new(width, height);
    for row in 0..ATLAS_COLOR_ROWS {
        let (color, style) = row_style(palette, row);
        let masks = if style.bold { &bold } else { &regular };
        for (code, mask) in masks.iter().enumerate() {
            let Some(mask) = mask else {
                continue;
            };
            let tile = PixelRect::new(
                code as i64 * tile_w as i64,
                row as i64 * tile_h as i64,
                tile_w,
                tile_h,
            );
            paint::draw_mask(&mut image, tile, mask, color, 255);
        }
    }

    log::debug!(
        "Built glyph atlas {}x{} for {}x{} cells",
        image.width(),
        image.height(),
        tile_w,
        tile_h
    );
    Ok(GlyphAtlas { image, metrics })
}

/// Build an atlas on tokio's blocking pool.
pub async fn generate(
    rasterizer: Arc<dyn GlyphRasterizer>,
    palette: Palette,
    metrics: CellMetrics,
) -> Result<GlyphAtlas, RenderError> {
    tokio::task::spawn_blocking(move || build_atlas(rasterizer.as_ref(), &palette, metrics))
        .await?
}

/// A regeneration request; only the latest issued token may be installed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRequest {
    pub token: u64,
    pub metrics: CellMetrics,
}

/// Holds the installed atlas and the generation-token bookkeeping.
#[derive(Debug, Default)]
pub struct GlyphAtlasCache {
    atlas: Option<Arc<GlyphAtlas>>,
    latest_token: u64,
    installed_token: Option<u64>,
    failed_token: Option<u64>,
}

impl GlyphAtlasCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new token. The installed atlas stays readable until a result
    /// for this token is installed.
    pub fn request(&mut self, metrics: CellMetrics) -> AtlasRequest {
        self.latest_token += 1;
        log::debug!(
            "Atlas generation {} requested for {}x{} cells",
            self.latest_token,
            metrics.width,
            metrics.height
        );
        AtlasRequest {
            token: self.latest_token,
            metrics,
        }
    }

    /// Install a finished atlas. Returns `false` and drops it when a newer
    /// request has been issued since.
    pub fn install(&mut self, token: u64, atlas: GlyphAtlas) -> bool {
        if token != self.latest_token {
            log::debug!(
                "Discarding stale atlas generation {} (latest {})",
                token,
                self.latest_token
            );
            return false;
        }
        self.atlas = Some(Arc::new(atlas));
        self.installed_token = Some(token);
        true
    }

    /// Record that generation `token` failed; the previous atlas is kept.
    pub fn mark_failed(&mut self, token: u64) {
        if token == self.latest_token {
            self.failed_token = Some(token);
        }
    }

    pub fn atlas(&self) -> Option<&GlyphAtlas> {
        self.atlas.as_deref()
    }

    pub(crate) fn shared(&self) -> Option<Arc<GlyphAtlas>> {
        self.atlas.clone()
    }

    /// Drop the installed atlas and orphan every in-flight generation.
    pub fn invalidate(&mut self) {
        self.atlas = None;
        self.installed_token = None;
        self.latest_token += 1;
    }

    /// The latest request failed and no newer one is pending.
    pub fn has_failed(&self) -> bool {
        self.failed_token == Some(self.latest_token)
    }

    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    /// The latest request has resolved, successfully or not.
    pub fn is_settled(&self) -> bool {
        self.installed_token == Some(self.latest_token)
            || self.failed_token == Some(self.latest_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills the whole tile; nothing for code 0.
    struct BarRasterizer;

    impl GlyphRasterizer for BarRasterizer {
        fn rasterize(
            &self,
            ch: char,
            _style: GlyphStyle,
            metrics: &CellMetrics,
        ) -> Option<GlyphBitmap> {
            let code = ch as u32;
            if code == 0 {
                return None;
            }
            let (w, h) = (metrics.tile_width(), metrics.tile_height());
            Some(GlyphBitmap {
                width: w,
                height: h,
                left: 0,
                top: 0,
                coverage: vec![255; (w * h) as usize],
            })
        }
    }

    #[test]
    fn test_color_row_mapping() {
        assert_eq!(color_row(DEFAULT_FG, false), Some(0));
        assert_eq!(color_row(DEFAULT_FG, true), Some(0));
        assert_eq!(color_row(1, false), Some(2));
        assert_eq!(color_row(15, false), Some(16));
        assert_eq!(color_row(300, false), Some(0));
        assert_eq!(color_row(DEFAULT_BG, false), None);
        assert_eq!(color_row(16, false), None);
        assert_eq!(color_row(255, true), None);
    }

    #[test]
    fn test_bold_remaps_low_palette_colors_only() {
        for fg in 0..8u16 {
            assert_eq!(color_row(fg, true), Some(fg as u8 + 9));
        }
        for fg in 8..16u16 {
            assert_eq!(color_row(fg, true), color_row(fg, false));
        }
    }

    #[test]
    fn test_build_atlas_dimensions_and_tints() {
        let palette = Palette::default();
        let metrics = CellMetrics::new(3.0, 5.0, 4.0);
        let atlas = build_atlas(&BarRasterizer, &palette, metrics).unwrap();
        assert_eq!(atlas.image().width(), 256 * 3);
        assert_eq!(atlas.image().height(), 17 * 5);

        let (x, y, _, _) = atlas.tile_rect(65, 2);
        assert_eq!(atlas.image().get_pixel(x, y).0, palette.ansi[1].to_rgba(255));
        let (x, y, _, _) = atlas.tile_rect(65, 0);
        assert_eq!(atlas.image().get_pixel(x + 2, y + 4).0, palette.foreground.to_rgba(255));

        // Unrenderable code point stays transparent
        let (x, y, _, _) = atlas.tile_rect(0, 3);
        assert_eq!(atlas.image().get_pixel(x, y).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_oversized_atlas_is_rejected() {
        let metrics = CellMetrics::new(200.0, 200.0, 150.0);
        let result = build_atlas(&BarRasterizer, &Palette::default(), metrics);
        assert!(matches!(result, Err(RenderError::SurfaceTooLarge { .. })));
    }

    #[test]
    fn test_large_hidpi_cells_fit_the_budget() {
        // 36px font at a device pixel ratio of 3
        assert_eq!(atlas_dimensions(72, 150).ok(), Some((256 * 72, 17 * 150)));
        assert!(matches!(
            atlas_dimensions(0, 150),
            Err(RenderError::InvalidMetrics { .. })
        ));
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let metrics = CellMetrics::new(2.0, 2.0, 1.0);
        let atlas = build_atlas(&BarRasterizer, &Palette::default(), metrics).unwrap();

        let mut cache = GlyphAtlasCache::new();
        let first = cache.request(metrics);
        let second = cache.request(metrics);
        assert!(!cache.install(first.token, atlas.clone()));
        assert!(cache.atlas().is_none());
        assert!(cache.install(second.token, atlas));
        assert!(cache.atlas().is_some());
        assert!(cache.is_settled());
    }

    #[test]
    fn test_previous_atlas_survives_new_request() {
        let metrics = CellMetrics::new(2.0, 2.0, 1.0);
        let atlas = build_atlas(&BarRasterizer, &Palette::default(), metrics).unwrap();
        let mut cache = GlyphAtlasCache::new();
        let req = cache.request(metrics);
        cache.install(req.token, atlas);
        cache.request(CellMetrics::new(4.0, 4.0, 3.0));
        assert!(!cache.is_settled());
        assert_eq!(cache.atlas().map(|a| a.metrics()), Some(metrics));

        cache.invalidate();
        assert!(cache.atlas().is_none());
    }
}
