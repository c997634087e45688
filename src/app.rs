//! Render jobs: from a text snapshot to a PNG or HTML file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use cellpaint_config::{CellMetrics, Config, RendererBackend};
use cellpaint_fonts::{FontManager, GlyphRasterizer, TextMeasurer};
use cellpaint_render::{
    AtlasBlitRenderer, GridSnapshot, LinkHoverRange, RendererId, RendererOptions, SelectionRange,
    StructuredRowRenderer, TerminalRenderer,
};
use image::RgbaImage;
use tokio::runtime::Handle;

use crate::cli::{Point, RenderArgs};

/// Everything needed to render one snapshot.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub text: String,
    pub output: PathBuf,
    pub backend: RendererBackend,
    pub cols: usize,
    pub rows: usize,
    pub cursor: Option<Point>,
    pub selection: Option<SelectionRange>,
    pub link: Option<LinkHoverRange>,
    pub focused: bool,
}

impl RenderJob {
    /// Combine CLI arguments with config defaults and read the input file.
    pub fn from_args(args: &RenderArgs, config: &Config) -> Result<Self> {
        let text = fs::read_to_string(&args.input)
            .with_context(|| format!("reading {}", args.input.display()))?;
        Ok(Self {
            text,
            output: args.output.clone(),
            backend: args.backend.map(Into::into).unwrap_or(config.backend),
            cols: args.cols.unwrap_or(config.cols).max(1),
            rows: args.rows.unwrap_or(config.rows).max(1),
            cursor: args.cursor,
            selection: args.select.map(|(start, end)| SelectionRange {
                start,
                end,
                column_mode: args.column,
            }),
            link: args.link.map(|(start, end)| LinkHoverRange::new(start, end)),
            focused: !args.unfocused,
        })
    }

    /// Lay the text out into a grid. Without an explicit cursor it is hidden
    /// below the last row.
    pub fn grid(&self) -> GridSnapshot {
        let mut grid = GridSnapshot::from_text(&self.text, self.cols, self.rows);
        let (col, row) = self.cursor.unwrap_or((0, self.rows));
        grid.set_cursor(col, row);
        grid
    }
}

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn renderer_options(config: &Config) -> Result<RendererOptions> {
    Ok(RendererOptions {
        palette: config.palette()?,
        cursor: config.cursor.clone(),
        font: config.font.clone(),
        device_pixel_ratio: config.device_pixel_ratio,
    })
}

/// Drive the overlay operations shared by both backends.
fn apply_overlays(renderer: &mut dyn TerminalRenderer, grid: &GridSnapshot, job: &RenderJob) {
    renderer.set_focused(job.focused);
    let column_mode = job.selection.is_some_and(|s| s.column_mode);
    renderer.set_selection(grid, job.selection, column_mode);
    renderer.set_link_hover(grid, job.link);
}

/// Paint a job with the atlas blitter and return the composited frame.
pub async fn render_raster(
    job: &RenderJob,
    options: RendererOptions,
    rasterizer: Arc<dyn GlyphRasterizer>,
    metrics: CellMetrics,
) -> RgbaImage {
    let grid = job.grid();
    let mut renderer = AtlasBlitRenderer::new(
        RendererId(0),
        Handle::current(),
        rasterizer,
        options,
        job.cols,
        job.rows,
        metrics,
    );
    if !renderer.wait_for_atlas().await {
        log::warn!("Glyph atlas unavailable; output holds the background only");
    }
    renderer.render(&grid, 0, job.rows.saturating_sub(1));
    apply_overlays(&mut renderer, &grid, job);
    renderer.frame()
}

/// Build the structured tree for a job and wrap it in a standalone HTML page.
///
/// Font probing runs to completion first so anomalous glyphs are sized.
pub fn render_structured(
    job: &RenderJob,
    options: RendererOptions,
    measurer: Box<dyn TextMeasurer>,
    metrics: CellMetrics,
) -> String {
    let grid = job.grid();
    let mut renderer =
        StructuredRowRenderer::new(RendererId(0), measurer, options, job.cols, job.rows, metrics);
    while renderer.run_idle().more {}
    renderer.render(&grid, 0, job.rows.saturating_sub(1));
    apply_overlays(&mut renderer, &grid, job);

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        renderer.stylesheet(),
        renderer.to_markup()
    )
}

/// Load fonts, render `job` and write the output file.
pub async fn run(job: RenderJob, config: &Config) -> Result<()> {
    let options = renderer_options(config)?;
    let fonts = FontManager::new(&config.font, config.device_pixel_ratio)
        .context("loading fonts")?;
    let metrics = fonts.cell_metrics(config.font.letter_spacing, config.font.line_height);
    log::info!(
        "Rendering {}x{} grid with {:?} backend, cell {}x{}",
        job.cols,
        job.rows,
        job.backend,
        metrics.width,
        metrics.height
    );

    match job.backend {
        RendererBackend::Raster => {
            let frame = render_raster(&job, options, Arc::new(fonts), metrics).await;
            frame
                .save(&job.output)
                .with_context(|| format!("writing {}", job.output.display()))?;
        }
        RendererBackend::Structured => {
            let html = render_structured(&job, options, Box::new(fonts), metrics);
            fs::write(&job.output, html)
                .with_context(|| format!("writing {}", job.output.display()))?;
        }
    }
    log::info!("Wrote {}", job.output.display());
    Ok(())
}
