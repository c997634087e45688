//! cellpaint: render terminal cell grids.
//!
//! The workspace crates do the work:
//!
//! - `cellpaint-config`: cell model, palette and YAML configuration
//! - `cellpaint-fonts`: font discovery, rasterization and measurement
//! - `cellpaint-render`: the atlas blit and structured markup backends
//!
//! This crate adds the log bridge, the command line and render jobs that
//! turn a text snapshot into a PNG or an HTML page.

pub mod app;
pub mod cli;
pub mod debug;

pub use cellpaint_config as config;
pub use cellpaint_fonts as fonts;
pub use cellpaint_render as render;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
