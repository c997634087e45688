//! Tests for the atlas blit backend
//!
//! These tests verify:
//! - Atlas tiles are blitted for fast-path cells
//! - The fallback path for styles the atlas does not carry
//! - Atlas generation tokens, not-ready deferral and failed generations
//! - Overlay compositing (selection, cursor)

mod common;

use std::sync::Arc;

use cellpaint_config::{
    Cell, CellAttributes, CellFlags, CellMetrics, CursorStyle, DEFAULT_BG, DEFAULT_FG, Palette,
};
use cellpaint_render::{
    AtlasBlitRenderer, GridSnapshot, RendererId, RendererOptions, SelectionRange, SelectionRect,
    TerminalRenderer,
};
use common::{BoxRasterizer, metrics};
use image::RgbaImage;
use tokio::runtime::Handle;

fn renderer(cols: usize, rows: usize, options: RendererOptions) -> AtlasBlitRenderer {
    AtlasBlitRenderer::new(
        RendererId(1),
        Handle::current(),
        Arc::new(BoxRasterizer),
        options,
        cols,
        rows,
        metrics(),
    )
}

/// Grid with the cursor parked below the viewport.
fn grid(text: &str, cols: usize, rows: usize, attrs: CellAttributes) -> GridSnapshot {
    let mut grid = GridSnapshot::from_text_with(text, cols, rows, attrs);
    grid.set_cursor(0, rows + 10);
    grid
}

fn pixel(img: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
    img.get_pixel(x, y).0
}

fn rgba(color: cellpaint_config::Color) -> [u8; 4] {
    color.to_rgba(255)
}

fn all_pixels(img: &RgbaImage, expected: [u8; 4]) -> bool {
    img.pixels().all(|p| p.0 == expected)
}

mod fast_path {
    use super::*;

    #[tokio::test]
    async fn test_grid_of_a_blits_palette_tile_after_clearing_band() {
        let palette = Palette::default();
        let mut r = renderer(4, 2, RendererOptions::default());
        assert!(r.wait_for_atlas().await);

        // Paint something with a background first so the band must be cleared
        let noisy = grid("BBBB\nBBBB", 4, 2, CellAttributes::new(3, 4, CellFlags::empty()));
        r.render(&noisy, 0, 1);
        assert_eq!(pixel(r.surface(), 0, 5), rgba(palette.ansi[4]));

        let attrs = CellAttributes::new(1, DEFAULT_BG, CellFlags::empty());
        r.render(&grid("AAAA\nAAAA", 4, 2, attrs), 0, 1);

        let atlas = r.atlas().expect("atlas installed");
        let (tx, ty, tw, th) = atlas.tile_rect(65, 2);
        let background = rgba(palette.background);
        for row in 0..2u32 {
            for col in 0..4u32 {
                for dy in 0..th {
                    for dx in 0..tw {
                        let tile = pixel(atlas.image(), tx + dx, ty + dy);
                        let expected = if tile[3] == 255 { tile } else { background };
                        assert_eq!(
                            pixel(r.surface(), col * tw + dx, row * th + dy),
                            expected,
                            "cell ({col}, {row}) pixel ({dx}, {dy})"
                        );
                    }
                }
            }
        }
        assert_eq!(pixel(r.surface(), 1, 1), rgba(palette.ansi[1]));
    }

    #[tokio::test]
    async fn test_bold_low_color_uses_bright_palette() {
        let palette = Palette::default();
        let mut r = renderer(1, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        r.render(
            &grid("A", 1, 1, CellAttributes::new(2, DEFAULT_BG, CellFlags::BOLD)),
            0,
            0,
        );
        assert_eq!(pixel(r.surface(), 0, 0), rgba(palette.ansi[10]));
    }

    #[tokio::test]
    async fn test_unset_cells_draw_nothing() {
        let palette = Palette::default();
        let mut r = renderer(3, 1, RendererOptions::default());
        r.wait_for_atlas().await;

        let mut g = GridSnapshot::new(3, 1);
        g.set_cursor(0, 5);
        g.set_cell(
            0,
            1,
            Cell {
                codepoint: 0,
                width: 1,
                attributes: CellAttributes::new(1, DEFAULT_BG, CellFlags::UNDERLINE),
            },
        );
        r.render(&g, 0, 0);
        assert!(all_pixels(r.surface(), rgba(palette.background)));
    }

    #[tokio::test]
    async fn test_underline_below_baseline() {
        let palette = Palette::default();
        let mut r = renderer(1, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        r.render(
            &grid("A", 1, 1, CellAttributes::new(1, DEFAULT_BG, CellFlags::UNDERLINE)),
            0,
            0,
        );
        // Glyph covers rows 0..4, row 4 is clear, row 5 is the underline
        assert_eq!(pixel(r.surface(), 0, 3), rgba(palette.ansi[1]));
        assert_eq!(pixel(r.surface(), 0, 4), rgba(palette.background));
        assert_eq!(pixel(r.surface(), 3, 5), rgba(palette.ansi[1]));
    }

    #[tokio::test]
    async fn test_inverse_swaps_background() {
        let palette = Palette::default();
        let mut r = renderer(1, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        r.render(
            &grid("A", 1, 1, CellAttributes::new(5, DEFAULT_BG, CellFlags::INVERSE)),
            0,
            0,
        );
        assert_eq!(pixel(r.surface(), 0, 5), rgba(palette.ansi[5]));
        // Foreground becomes the default background
        assert_eq!(pixel(r.surface(), 0, 0), rgba(palette.background));
    }
}

mod fallback_path {
    use super::*;

    #[tokio::test]
    async fn test_bold_default_foreground_is_rasterized_directly() {
        let palette = Palette::default();
        let mut r = renderer(1, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        r.render(
            &grid("A", 1, 1, CellAttributes::new(DEFAULT_FG, DEFAULT_BG, CellFlags::BOLD)),
            0,
            0,
        );
        assert_eq!(pixel(r.surface(), 2, 2), rgba(palette.foreground));
    }

    #[tokio::test]
    async fn test_extended_color_resolves_through_palette() {
        let palette = Palette::default();
        let mut r = renderer(1, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        r.render(&grid("A", 1, 1, CellAttributes::new(100, DEFAULT_BG, CellFlags::empty())), 0, 0);
        assert_eq!(pixel(r.surface(), 0, 0), rgba(palette.indexed(100)));
    }

    #[tokio::test]
    async fn test_dim_blends_halfway() {
        let palette = Palette::default();
        let mut r = renderer(1, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        r.render(&grid("A", 1, 1, CellAttributes::new(1, DEFAULT_BG, CellFlags::DIM)), 0, 0);
        let px = pixel(r.surface(), 0, 0);
        assert_ne!(px, rgba(palette.ansi[1]));
        assert_ne!(px, rgba(palette.background));
        assert_eq!(px[3], 255);
    }

    #[tokio::test]
    async fn test_wide_glyph_outside_atlas() {
        let palette = Palette::default();
        let mut r = renderer(3, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        let mut g = grid("", 3, 1, CellAttributes::default());
        g.set_cell(0, 0, Cell::wide('\u{4e00}', CellAttributes::new(1, 2, CellFlags::empty())));
        r.render(&g, 0, 0);
        // Background spans both columns
        assert_eq!(pixel(r.surface(), 7, 5), rgba(palette.ansi[2]));
        assert_eq!(pixel(r.surface(), 8, 5), rgba(palette.background));
        assert_eq!(pixel(r.surface(), 0, 0), rgba(palette.ansi[1]));
    }
}

mod atlas_lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_render_before_atlas_is_ready_is_a_noop() {
        let palette = Palette::default();
        let mut r = renderer(2, 1, RendererOptions::default());
        let g = grid("AA", 2, 1, CellAttributes::new(1, 3, CellFlags::empty()));

        // Nothing has yielded to the runtime yet
        r.render(&g, 0, 0);
        assert!(r.atlas().is_none());
        assert!(all_pixels(r.surface(), rgba(palette.background)));

        // Retrying once the atlas exists paints normally
        assert!(r.wait_for_atlas().await);
        r.render(&g, 0, 0);
        assert_eq!(pixel(r.surface(), 0, 0), rgba(palette.ansi[1]));
    }

    #[tokio::test]
    async fn test_stale_generation_is_discarded() {
        let mut r = renderer(2, 1, RendererOptions::default());
        let larger = CellMetrics::new(5.0, 7.0, 5.0);
        let latest = CellMetrics::new(6.0, 8.0, 6.0);

        r.handle_metrics_change(larger);
        r.handle_metrics_change(latest);
        assert!(r.wait_for_atlas().await);
        assert_eq!(r.atlas().map(|a| a.metrics()), Some(latest));
        assert_eq!(r.surface().dimensions(), (12, 8));
    }

    #[tokio::test]
    async fn test_previous_atlas_stays_readable_during_regeneration() {
        let mut r = renderer(2, 1, RendererOptions::default());
        r.wait_for_atlas().await;

        r.handle_metrics_change(CellMetrics::new(5.0, 7.0, 5.0));
        assert_eq!(r.atlas().map(|a| a.metrics()), Some(metrics()));

        r.wait_for_atlas().await;
        assert_eq!(r.atlas().map(|a| a.metrics().width), Some(5.0));
    }

    #[tokio::test]
    async fn test_failed_generation_paints_through_fallback() {
        let palette = Palette::default();
        // A 200x200 cell needs an atlas larger than the allocation budget
        let mut r = AtlasBlitRenderer::new(
            RendererId(2),
            Handle::current(),
            Arc::new(BoxRasterizer),
            RendererOptions::default(),
            2,
            1,
            CellMetrics::new(200.0, 200.0, 150.0),
        );
        assert!(!r.wait_for_atlas().await);
        r.render(&grid("AA", 2, 1, CellAttributes::new(1, DEFAULT_BG, CellFlags::empty())), 0, 0);

        assert_eq!(pixel(r.surface(), 0, 0), rgba(palette.ansi[1]));
        assert_eq!(pixel(r.surface(), 399, 149), rgba(palette.ansi[1]));
        // Below the baseline the glyph leaves the background
        assert_eq!(pixel(r.surface(), 10, 190), rgba(palette.background));
    }

    #[tokio::test]
    async fn test_resize_without_metrics_change_keeps_atlas() {
        let mut r = renderer(2, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        r.resize(5, 3, metrics(), false);
        assert!(r.atlas().is_some());
        assert_eq!(r.surface().dimensions(), (20, 18));
    }
}

mod overlays {
    use super::*;

    #[tokio::test]
    async fn test_reversed_same_row_selection_spans_columns_one_to_two() {
        let palette = Palette::default();
        let mut r = renderer(4, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        let g = grid("", 4, 1, CellAttributes::default());
        r.render(&g, 0, 0);

        r.set_selection(&g, Some(SelectionRange::new((2, 0), (1, 0))), false);
        assert_eq!(
            r.selection_rects(),
            [SelectionRect {
                col: 1,
                row: 0,
                width: 2,
                height: 1
            }]
        );

        let frame = r.frame();
        let background = rgba(palette.background);
        assert_eq!(pixel(&frame, 0, 0), background);
        assert_ne!(pixel(&frame, 4, 0), background);
        assert_ne!(pixel(&frame, 11, 5), background);
        assert_eq!(pixel(&frame, 12, 0), background);
        // The text layer is untouched
        assert!(all_pixels(r.surface(), background));
    }

    #[tokio::test]
    async fn test_selection_color_follows_focus() {
        let mut r = renderer(2, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        let g = grid("", 2, 1, CellAttributes::default());
        r.render(&g, 0, 0);
        r.set_selection(&g, Some(SelectionRange::new((0, 0), (1, 0))), false);

        let focused = pixel(&r.frame(), 0, 0);
        r.set_focused(false);
        let unfocused = pixel(&r.frame(), 0, 0);
        assert_ne!(focused, unfocused);

        r.set_selection(&g, None, false);
        assert!(r.selection_rects().is_empty());
    }

    #[tokio::test]
    async fn test_block_cursor_is_filled_when_focused_and_hollow_otherwise() {
        let palette = Palette::default();
        let mut r = renderer(2, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        let mut g = GridSnapshot::new(2, 1);
        g.set_cursor(1, 0);
        r.render(&g, 0, 0);

        let frame = r.frame();
        assert_eq!(pixel(&frame, 5, 2), rgba(palette.cursor));
        assert_eq!(pixel(&frame, 1, 2), rgba(palette.background));

        r.set_focused(false);
        let frame = r.frame();
        assert_eq!(pixel(&frame, 4, 0), rgba(palette.cursor));
        assert_eq!(pixel(&frame, 5, 2), rgba(palette.background));
    }

    #[tokio::test]
    async fn test_bar_cursor_width_scales_with_dpr() {
        let palette = Palette::default();
        let mut options = RendererOptions::default();
        options.cursor.style = CursorStyle::Bar;
        options.cursor.width = 1.0;
        options.device_pixel_ratio = 2.0;
        let mut r = renderer(1, 1, options);
        r.wait_for_atlas().await;
        let mut g = GridSnapshot::new(1, 1);
        g.set_cursor(0, 0);
        r.render(&g, 0, 0);

        let frame = r.frame();
        assert_eq!(pixel(&frame, 0, 3), rgba(palette.cursor));
        assert_eq!(pixel(&frame, 1, 3), rgba(palette.cursor));
        assert_eq!(pixel(&frame, 2, 3), rgba(palette.background));
    }

    #[tokio::test]
    async fn test_cursor_move_updates_overlay_only() {
        let palette = Palette::default();
        let mut r = renderer(2, 2, RendererOptions::default());
        r.wait_for_atlas().await;
        let mut g = GridSnapshot::new(2, 2);
        g.set_cursor(0, 0);
        r.render(&g, 0, 1);

        g.set_cursor(1, 1);
        r.handle_cursor_move(&g);
        let frame = r.frame();
        assert_eq!(pixel(&frame, 1, 1), rgba(palette.background));
        assert_eq!(pixel(&frame, 5, 7), rgba(palette.cursor));
    }

    #[tokio::test]
    async fn test_link_hover_underlines_span() {
        let palette = Palette::default();
        let mut r = renderer(4, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        let g = grid("", 4, 1, CellAttributes::default());
        r.render(&g, 0, 0);

        r.set_link_hover(&g, Some(cellpaint_render::LinkHoverRange::new((1, 0), (2, 0))));
        let frame = r.frame();
        assert_eq!(pixel(&frame, 0, 5), rgba(palette.background));
        assert_eq!(pixel(&frame, 4, 5), rgba(palette.foreground));
        assert_eq!(pixel(&frame, 11, 5), rgba(palette.foreground));
        assert_eq!(pixel(&frame, 12, 5), rgba(palette.background));
    }

    #[tokio::test]
    async fn test_clear_wipes_surface_and_overlays() {
        let palette = Palette::default();
        let mut r = renderer(2, 1, RendererOptions::default());
        r.wait_for_atlas().await;
        let mut g = grid("AB", 2, 1, CellAttributes::new(1, 2, CellFlags::empty()));
        g.set_cursor(0, 0);
        r.render(&g, 0, 0);
        r.set_selection(&g, Some(SelectionRange::new((0, 0), (1, 0))), true);

        r.clear();
        assert!(all_pixels(&r.frame(), rgba(palette.background)));
    }
}
