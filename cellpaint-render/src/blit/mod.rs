//! Raster backend: blits pre-rendered atlas tiles onto an RGBA surface.
//!
//! Text is painted onto `surface` row band by row band. Selection, cursor
//! and link underline live in a separate overlay that is composited by
//! [`AtlasBlitRenderer::frame`], so moving any of them never repaints text.

mod cells;
mod overlay;

use std::num::NonZeroUsize;
use std::sync::Arc;

use cellpaint_config::CellMetrics;
use cellpaint_fonts::{GlyphBitmap, GlyphRasterizer, GlyphStyle};
use image::RgbaImage;
use lru::LruCache;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::atlas::{self, GlyphAtlas, GlyphAtlasCache};
use crate::error::RenderError;
use crate::grid::GridSource;
use crate::link::LinkHoverRange;
use crate::paint::{self, PixelRect};
use crate::renderer::{RendererId, RendererOptions, TerminalRenderer};
use crate::selection::{SelectionRange, SelectionRect};

use overlay::OverlayState;

/// Glyph masks kept for cells outside the atlas fast path
const FALLBACK_CACHE_SIZE: usize = 512;

/// `(codepoint, bold, italic)`
type FallbackKey = (u32, bool, bool);

/// A resolved atlas generation.
struct AtlasResult {
    token: u64,
    result: Result<GlyphAtlas, RenderError>,
}

pub struct AtlasBlitRenderer {
    id: RendererId,
    runtime: Handle,
    rasterizer: Arc<dyn GlyphRasterizer>,
    options: RendererOptions,
    metrics: CellMetrics,
    cols: usize,
    rows: usize,

    /// Text layer
    surface: RgbaImage,

    atlas: GlyphAtlasCache,
    atlas_tx: mpsc::UnboundedSender<AtlasResult>,
    atlas_rx: mpsc::UnboundedReceiver<AtlasResult>,
    /// Token of the last generation handed to the runtime
    in_flight: Option<u64>,

    fallback_glyphs: LruCache<FallbackKey, Option<Arc<GlyphBitmap>>>,
    overlay: OverlayState,
    focused: bool,
}

impl std::fmt::Debug for AtlasBlitRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtlasBlitRenderer")
            .field("id", &self.id)
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("metrics", &self.metrics)
            .field("atlas_ready", &self.atlas.atlas().is_some())
            .finish()
    }
}

impl AtlasBlitRenderer {
    /// Create a renderer and start generating its first atlas on `runtime`.
    pub fn new(
        id: RendererId,
        runtime: Handle,
        rasterizer: Arc<dyn GlyphRasterizer>,
        options: RendererOptions,
        cols: usize,
        rows: usize,
        metrics: CellMetrics,
    ) -> Self {
        let (atlas_tx, atlas_rx) = mpsc::unbounded_channel();
        let surface = Self::blank_surface(&options, cols, rows, metrics);
        let mut renderer = Self {
            id,
            runtime,
            rasterizer,
            options,
            metrics,
            cols,
            rows,
            surface,
            atlas: GlyphAtlasCache::new(),
            atlas_tx,
            atlas_rx,
            in_flight: None,
            fallback_glyphs: LruCache::new(
                NonZeroUsize::new(FALLBACK_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
            overlay: OverlayState::default(),
            focused: true,
        };
        renderer.spawn_generation();
        renderer
    }

    fn blank_surface(
        options: &RendererOptions,
        cols: usize,
        rows: usize,
        metrics: CellMetrics,
    ) -> RgbaImage {
        let width = cols as u32 * metrics.tile_width();
        let height = rows as u32 * metrics.tile_height();
        RgbaImage::from_pixel(
            width,
            height,
            image::Rgba(options.palette.background.to_rgba(255)),
        )
    }

    pub fn id(&self) -> RendererId {
        self.id
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// The text layer without overlays.
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn atlas(&self) -> Option<&GlyphAtlas> {
        self.atlas.atlas()
    }

    pub fn selection_rects(&self) -> &[SelectionRect] {
        &self.overlay.selection_rects
    }

    /// Issue a new atlas request and build it in the background.
    fn spawn_generation(&mut self) {
        let request = self.atlas.request(self.metrics);
        let tx = self.atlas_tx.clone();
        let rasterizer = Arc::clone(&self.rasterizer);
        let palette = self.options.palette.clone();
        self.in_flight = Some(request.token);

        self.runtime.spawn(async move {
            let result = atlas::generate(rasterizer, palette, request.metrics).await;
            if tx
                .send(AtlasResult {
                    token: request.token,
                    result,
                })
                .is_err()
            {
                log::debug!(
                    "Renderer dropped before atlas generation {} resolved",
                    request.token
                );
            }
        });
    }

    /// Install the newest resolved generation, discarding stale ones.
    fn drain_atlas_results(&mut self) {
        let mut latest = None;
        while let Ok(message) = self.atlas_rx.try_recv() {
            if message.token == self.atlas.latest_token() {
                latest = Some(message);
            } else {
                log::debug!("Discarding stale atlas generation {}", message.token);
            }
        }
        if let Some(message) = latest {
            self.accept_atlas(message);
        }
    }

    fn accept_atlas(&mut self, message: AtlasResult) {
        match message.result {
            Ok(atlas) => {
                if self.atlas.install(message.token, atlas) {
                    log::info!(
                        "Renderer {}: atlas generation {} installed",
                        self.id,
                        message.token
                    );
                }
            }
            Err(e) => {
                log::warn!(
                    "Renderer {}: atlas generation {} failed: {}",
                    self.id,
                    message.token,
                    e
                );
                self.atlas.mark_failed(message.token);
            }
        }
    }

    /// Wait until the latest requested atlas has resolved. Returns whether
    /// an atlas is installed afterwards.
    pub async fn wait_for_atlas(&mut self) -> bool {
        self.drain_atlas_results();
        while self.in_flight == Some(self.atlas.latest_token()) && !self.atlas.is_settled() {
            let Some(message) = self.atlas_rx.recv().await else {
                break;
            };
            if message.token == self.atlas.latest_token() {
                self.accept_atlas(message);
            } else {
                log::debug!("Discarding stale atlas generation {}", message.token);
            }
        }
        self.atlas.atlas().is_some()
    }

    /// Cached direct rasterization for cells outside the atlas.
    fn fallback_glyph(&mut self, codepoint: u32, style: GlyphStyle) -> Option<Arc<GlyphBitmap>> {
        let key = (codepoint, style.bold, style.italic);
        if let Some(hit) = self.fallback_glyphs.get(&key) {
            return hit.clone();
        }
        let mask = char::from_u32(codepoint)
            .and_then(|ch| self.rasterizer.rasterize(ch, style, &self.metrics))
            .map(Arc::new);
        self.fallback_glyphs.put(key, mask.clone());
        mask
    }

    /// Pixel rectangle of a cell spanning `width` columns.
    fn cell_rect(&self, row: usize, col: usize, width: usize) -> PixelRect {
        let (cw, ch) = (self.metrics.tile_width(), self.metrics.tile_height());
        PixelRect::new(
            col as i64 * cw as i64,
            row as i64 * ch as i64,
            cw * width as u32,
            ch,
        )
    }
}

impl TerminalRenderer for AtlasBlitRenderer {
    fn resize(&mut self, cols: usize, rows: usize, metrics: CellMetrics, metrics_changed: bool) {
        self.cols = cols;
        self.rows = rows;
        if metrics_changed {
            self.handle_metrics_change(metrics);
        } else {
            self.metrics = metrics;
            self.surface = Self::blank_surface(&self.options, cols, rows, metrics);
        }
    }

    fn render(&mut self, grid: &dyn GridSource, start: usize, end: usize) {
        self.drain_atlas_results();
        let atlas = self.atlas.shared();
        if atlas.is_none() && !self.atlas.has_failed() {
            log::trace!(
                "Renderer {}: atlas not ready, deferring rows {}..={}",
                self.id,
                start,
                end
            );
            return;
        }
        // Without an atlas every cell takes the direct rasterization path
        self.paint_rows(atlas.as_deref(), grid, start, end);
        self.update_cursor(grid);
    }

    fn clear(&mut self) {
        let (w, h) = self.surface.dimensions();
        paint::fill_rect(
            &mut self.surface,
            PixelRect::new(0, 0, w, h),
            self.options.palette.background,
        );
        self.overlay = OverlayState::default();
    }

    fn set_selection(
        &mut self,
        grid: &dyn GridSource,
        range: Option<SelectionRange>,
        column_mode: bool,
    ) {
        self.overlay.set_selection(grid, range, column_mode);
    }

    fn set_link_hover(&mut self, grid: &dyn GridSource, range: Option<LinkHoverRange>) {
        self.overlay.set_link_hover(grid, range);
    }

    fn handle_cursor_move(&mut self, grid: &dyn GridSource) {
        self.update_cursor(grid);
    }

    fn handle_metrics_change(&mut self, metrics: CellMetrics) {
        log::info!(
            "Renderer {}: cell metrics now {}x{}",
            self.id,
            metrics.width,
            metrics.height
        );
        self.metrics = metrics;
        self.fallback_glyphs.clear();
        self.surface = Self::blank_surface(&self.options, self.cols, self.rows, metrics);
        self.spawn_generation();
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
