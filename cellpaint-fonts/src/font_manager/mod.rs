//! Font management with a fallback chain.
//!
//! Supports:
//! - Primary font with bold/italic/bold-italic variants
//! - An optional font file loaded ahead of system fonts
//! - Automatic fallback chain for missing glyphs
//! - Synthetic bold/italic when a styled face is not installed

mod fallbacks;
mod loader;

use cellpaint_config::{CellMetrics, FontConfig};
use fontdb::{Database, Family};
use parking_lot::Mutex;
use swash::FontRef;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Angle, Format, Transform};

use crate::error::FontError;
use crate::metrics::{FontMetrics, calculate_cell_metrics};
use crate::raster::{GlyphBitmap, GlyphRasterizer, GlyphStyle, TextMeasurer};

pub use fallbacks::FALLBACK_FAMILIES;
pub use loader::{FontData, load_font_file};

/// Slant applied when no italic face is available
const SYNTHETIC_ITALIC_DEGREES: f32 = 12.0;

/// Manages the styled faces and fallback chain for one font size.
///
/// Font indices are assigned as follows:
/// - 0: Primary/regular font
/// - 1: Bold font (if available)
/// - 2: Italic font (if available)
/// - 3: Bold-italic font (if available)
/// - 4..: Fallback fonts
pub struct FontManager {
    primary: FontData,
    bold: Option<FontData>,
    italic: Option<FontData>,
    bold_italic: Option<FontData>,
    fallbacks: Vec<FontData>,

    /// Font size in device pixels
    size_px: f32,
    device_pixel_ratio: f32,

    /// Scaler caches shared by every rasterize call
    scale_context: Mutex<ScaleContext>,
}

impl std::fmt::Debug for FontManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontManager")
            .field("font_count", &self.font_count())
            .field("size_px", &self.size_px)
            .finish()
    }
}

impl FontManager {
    /// Load fonts for a configuration at the given device pixel ratio.
    pub fn new(config: &FontConfig, device_pixel_ratio: f32) -> Result<Self, FontError> {
        let mut font_db = Database::new();
        font_db.load_system_fonts();
        log::info!("Loaded {} system fonts", font_db.len());

        let dpr = if device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        let size_px = (config.size * dpr).max(1.0);

        let fallbacks = Self::build_fallback_chain(&font_db);
        log::info!("Loaded {} fallback fonts", fallbacks.len());

        let mut manager = if let Some(path) = &config.path {
            log::info!("Loading primary font from {:?}", path);
            let primary = load_font_file(path)?;
            Self::from_font_data(primary, size_px)
        } else {
            Self::load_family(&font_db, config, size_px, &fallbacks)?
        };
        manager.fallbacks = fallbacks;
        manager.device_pixel_ratio = dpr;
        Ok(manager)
    }

    /// Build a manager around a single face with no styled variants.
    pub fn from_font_data(primary: FontData, size_px: f32) -> Self {
        Self {
            primary,
            bold: None,
            italic: None,
            bold_italic: None,
            fallbacks: Vec::new(),
            size_px: size_px.max(1.0),
            device_pixel_ratio: 1.0,
            scale_context: Mutex::new(ScaleContext::new()),
        }
    }

    /// Load the configured family and its styled faces, falling back to a
    /// generic monospace face and then the fallback chain.
    fn load_family(
        font_db: &Database,
        config: &FontConfig,
        size_px: f32,
        fallbacks: &[FontData],
    ) -> Result<Self, FontError> {
        let family = Family::Name(&config.family);
        let regular_id = loader::query_face(font_db, family, config.weight, fontdb::Style::Normal);

        let Some(primary) = regular_id.and_then(|id| loader::load_face(font_db, id)) else {
            log::warn!(
                "Primary font '{}' not found, trying generic monospace",
                config.family
            );
            let generic =
                loader::query_face(font_db, Family::Monospace, config.weight, fontdb::Style::Normal)
                    .and_then(|id| loader::load_face(font_db, id))
                    .or_else(|| fallbacks.first().cloned())
                    .ok_or_else(|| FontError::NotFound(config.family.clone()))?;
            return Ok(Self::from_font_data(generic, size_px));
        };
        log::info!("Successfully loaded primary font: {}", config.family);

        // fontdb returns the closest face, which may be the regular one.
        let styled = |weight: u16, style: fontdb::Style, name: &str| {
            let id = loader::query_face(font_db, family, weight, style)?;
            if Some(id) == regular_id {
                log::debug!("No distinct {} face for '{}'", name, config.family);
                return None;
            }
            let face = loader::load_face(font_db, id);
            if face.is_some() {
                log::info!("Loaded {} face for '{}'", name, config.family);
            }
            face
        };

        let mut manager = Self::from_font_data(primary, size_px);
        manager.bold = styled(config.weight_bold, fontdb::Style::Normal, "bold");
        manager.italic = styled(config.weight, fontdb::Style::Italic, "italic");
        manager.bold_italic = styled(config.weight_bold, fontdb::Style::Italic, "bold italic");
        Ok(manager)
    }

    fn build_fallback_chain(font_db: &Database) -> Vec<FontData> {
        let mut fallbacks = Vec::new();
        for family_name in FALLBACK_FAMILIES {
            if let Some(font_data) = loader::load_font_from_db(font_db, family_name) {
                log::debug!("Added fallback font: {}", family_name);
                fallbacks.push(font_data);
            }
        }
        fallbacks
    }

    /// Index of the face serving a style, 0 when the variant is missing.
    fn styled_font_index(&self, style: GlyphStyle) -> usize {
        match (style.bold, style.italic) {
            (true, true) if self.bold_italic.is_some() => 3,
            (true, false) if self.bold.is_some() => 1,
            (false, true) if self.italic.is_some() => 2,
            _ => 0,
        }
    }

    /// Find a glyph across the styled face, the primary face and fallbacks.
    ///
    /// # Returns
    /// `(font_index, glyph_id)` where font_index identifies which font contains the glyph.
    pub fn find_glyph(&self, character: char, style: GlyphStyle) -> Option<(usize, u16)> {
        let styled_index = self.styled_font_index(style);
        for index in [styled_index, 0] {
            let font = self.get_font(index)?;
            let glyph_id = font.font_ref().charmap().map(character);
            if glyph_id != 0 {
                return Some((index, glyph_id));
            }
        }

        for (idx, fallback) in self.fallbacks.iter().enumerate() {
            let glyph_id = fallback.font_ref().charmap().map(character);
            if glyph_id != 0 {
                log::trace!(
                    "Character '{}' (U+{:04X}) found in fallback font index {}",
                    character,
                    character as u32,
                    4 + idx
                );
                return Some((4 + idx, glyph_id));
            }
        }
        None
    }

    /// Get font by index (see struct documentation for layout).
    pub fn get_font(&self, font_index: usize) -> Option<&FontData> {
        match font_index {
            0 => Some(&self.primary),
            1 => self.bold.as_ref(),
            2 => self.italic.as_ref(),
            3 => self.bold_italic.as_ref(),
            idx => self.fallbacks.get(idx - 4),
        }
    }

    pub fn primary_font(&self) -> FontRef<'_> {
        self.primary.font_ref()
    }

    /// Number of fonts loaded (primary + styled + fallbacks).
    pub fn font_count(&self) -> usize {
        1 + self.bold.is_some() as usize
            + self.italic.is_some() as usize
            + self.bold_italic.is_some() as usize
            + self.fallbacks.len()
    }

    pub fn size_px(&self) -> f32 {
        self.size_px
    }

    pub fn font_metrics(&self) -> FontMetrics {
        FontMetrics::from_font(self.primary.font_ref(), self.size_px)
    }

    /// Cell metrics for this font; `letter_spacing` is in CSS pixels.
    pub fn cell_metrics(&self, letter_spacing: f32, line_spacing: f32) -> CellMetrics {
        calculate_cell_metrics(
            &self.font_metrics(),
            letter_spacing * self.device_pixel_ratio,
            line_spacing,
        )
    }

    fn advance(&self, character: char, style: GlyphStyle) -> f32 {
        let (font_index, glyph_id) = self.find_glyph(character, style).unwrap_or((0, 0));
        let font = self
            .get_font(font_index)
            .map(FontData::font_ref)
            .unwrap_or_else(|| self.primary.font_ref());
        let units_per_em = font.metrics(&[]).units_per_em.max(1) as f32;
        font.glyph_metrics(&[]).advance_width(glyph_id) * self.size_px / units_per_em
    }
}

impl GlyphRasterizer for FontManager {
    fn rasterize(
        &self,
        ch: char,
        style: GlyphStyle,
        metrics: &CellMetrics,
    ) -> Option<GlyphBitmap> {
        if ch.is_control() {
            return None;
        }
        let (font_index, glyph_id) = self.find_glyph(ch, style)?;
        let font = self.get_font(font_index)?.font_ref();

        let mut context = self.scale_context.lock();
        let mut scaler = context.builder(font).size(self.size_px).hint(true).build();

        let sources = [
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::ColorOutline(0),
            Source::Outline,
        ];
        let mut render = Render::new(&sources);
        render.format(Format::Alpha);
        if style.bold && !matches!(font_index, 1 | 3) {
            render.embolden(self.size_px / 24.0);
        }
        if style.italic && !matches!(font_index, 2 | 3) {
            render.transform(Some(Transform::skew(
                Angle::from_degrees(SYNTHETIC_ITALIC_DEGREES),
                Angle::from_degrees(0.0),
            )));
        }
        let image = render.render(&mut scaler, glyph_id)?;
        let placement = image.placement;
        if placement.width == 0 || placement.height == 0 {
            return None;
        }

        let coverage = match image.content {
            Content::Mask => image.data,
            // Color glyphs keep only their alpha; tinting happens at blit time.
            Content::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
            Content::SubpixelMask => image
                .data
                .chunks_exact(4)
                .map(|px| ((px[0] as u32 * 299 + px[1] as u32 * 587 + px[2] as u32 * 114) / 1000) as u8)
                .collect(),
        };

        Some(GlyphBitmap {
            width: placement.width,
            height: placement.height,
            left: placement.left,
            top: metrics.baseline as i32 - placement.top,
            coverage,
        })
    }
}

impl TextMeasurer for FontManager {
    fn measure(&self, text: &str, style: GlyphStyle) -> f64 {
        text.chars().map(|ch| self.advance(ch, style) as f64).sum()
    }
}
