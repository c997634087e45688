//! Command-line interface for cellpaint.
//!
//! This module handles CLI argument parsing and turns the `render`
//! subcommand into a [`crate::app::RenderJob`].

use std::path::PathBuf;

use cellpaint_config::RendererBackend;
use clap::{Args, Parser, Subcommand};

/// cellpaint - Render terminal cell grids to images or markup
#[derive(Parser, Debug)]
#[command(name = "cellpaint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file to use instead of ~/.config/cellpaint/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set debug log level (overrides config and DEBUG_LEVEL)
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevelArg>,
}

/// Log level argument for CLI
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevelArg {
    /// Convert to `log::LevelFilter`
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevelArg::Off => log::LevelFilter::Off,
            LogLevelArg::Error => log::LevelFilter::Error,
            LogLevelArg::Warn => log::LevelFilter::Warn,
            LogLevelArg::Info => log::LevelFilter::Info,
            LogLevelArg::Debug => log::LevelFilter::Debug,
            LogLevelArg::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Renderer backend argument for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// Glyph atlas blitting to a PNG image
    Raster,
    /// Span-per-run markup written as HTML
    Structured,
}

impl From<BackendArg> for RendererBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Raster => RendererBackend::Raster,
            BackendArg::Structured => RendererBackend::Structured,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a text snapshot of a terminal grid
    Render(RenderArgs),

    /// Print the effective configuration as YAML
    ShowConfig,
}

/// A `(col, row)` pair
pub type Point = (usize, usize);

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Text file holding one grid row per line
    pub input: PathBuf,

    /// Where to write the PNG or HTML output
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Renderer backend (defaults to the config's `backend`)
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// Grid width in cells
    #[arg(long)]
    pub cols: Option<usize>,

    /// Grid height in cells
    #[arg(long)]
    pub rows: Option<usize>,

    /// Cursor position as COL,ROW
    #[arg(long, value_name = "COL,ROW", value_parser = parse_point)]
    pub cursor: Option<Point>,

    /// Selection as COL,ROW:COL,ROW
    #[arg(long, value_name = "C,R:C,R", value_parser = parse_span)]
    pub select: Option<(Point, Point)>,

    /// Treat the selection as a rectangular block
    #[arg(long, requires = "select")]
    pub column: bool,

    /// Hovered link as COL,ROW:COL,ROW
    #[arg(long, value_name = "C,R:C,R", value_parser = parse_span)]
    pub link: Option<(Point, Point)>,

    /// Render as if the terminal had lost focus
    #[arg(long)]
    pub unfocused: bool,
}

/// Parse `COL,ROW`.
pub fn parse_point(value: &str) -> Result<Point, String> {
    let (col, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COL,ROW, got '{value}'"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid coordinate '{s}': {e}"))
    };
    Ok((parse(col)?, parse(row)?))
}

/// Parse `COL,ROW:COL,ROW`.
pub fn parse_span(value: &str) -> Result<(Point, Point), String> {
    let (start, end) = value
        .split_once(':')
        .ok_or_else(|| format!("expected COL,ROW:COL,ROW, got '{value}'"))?;
    Ok((parse_point(start)?, parse_point(end)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("3,7"), Ok((3, 7)));
        assert_eq!(parse_point(" 0 , 12 "), Ok((0, 12)));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn test_parse_span() {
        assert_eq!(parse_span("2,0:1,0"), Ok(((2, 0), (1, 0))));
        assert!(parse_span("2,0").is_err());
        assert!(parse_span("2,0:x").is_err());
    }

    #[test]
    fn test_render_command_line() {
        let cli = Cli::try_parse_from([
            "cellpaint",
            "render",
            "in.txt",
            "-o",
            "out.png",
            "--backend",
            "structured",
            "--cursor",
            "4,1",
            "--select",
            "0,0:5,2",
            "--column",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let Commands::Render(args) = cli.command else {
            panic!("expected render subcommand");
        };
        assert_eq!(args.backend, Some(BackendArg::Structured));
        assert_eq!(args.cursor, Some((4, 1)));
        assert_eq!(args.select, Some(((0, 0), (5, 2))));
        assert!(args.column);
        assert!(cli.log_level.is_some());
    }

    #[test]
    fn test_column_requires_selection() {
        let result = Cli::try_parse_from(["cellpaint", "render", "in.txt", "-o", "o", "--column"]);
        assert!(result.is_err());
    }
}
