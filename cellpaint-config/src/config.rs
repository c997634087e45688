//! Renderer configuration, persistence and validation.
//!
//! The configuration lives at `~/.config/cellpaint/config.yaml` (XDG
//! convention on every platform but Windows) and is written atomically.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::{Color, Palette};
use crate::error::ConfigError;
use crate::themes::Theme;
use crate::types::{CursorStyle, LogLevel, RendererBackend};

/// Font settings. Sizes are CSS pixels; the device pixel ratio is applied
/// when cell metrics are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    #[serde(default = "crate::defaults::font_family")]
    pub family: String,
    #[serde(default = "crate::defaults::font_size")]
    pub size: f32,
    #[serde(default = "crate::defaults::font_weight")]
    pub weight: u16,
    #[serde(default = "crate::defaults::font_weight_bold")]
    pub weight_bold: u16,
    #[serde(default = "crate::defaults::letter_spacing")]
    pub letter_spacing: f32,
    #[serde(default = "crate::defaults::line_height")]
    pub line_height: f32,
    /// Optional font file loaded ahead of system fonts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: crate::defaults::font_family(),
            size: crate::defaults::font_size(),
            weight: crate::defaults::font_weight(),
            weight_bold: crate::defaults::font_weight_bold(),
            letter_spacing: crate::defaults::letter_spacing(),
            line_height: crate::defaults::line_height(),
            path: None,
        }
    }
}

/// Cursor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    #[serde(default)]
    pub style: CursorStyle,
    #[serde(default = "crate::defaults::bool_true")]
    pub blink: bool,
    /// Width of the bar cursor in CSS pixels
    #[serde(default = "crate::defaults::cursor_width")]
    pub width: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            style: CursorStyle::default(),
            blink: crate::defaults::bool_true(),
            width: crate::defaults::cursor_width(),
        }
    }
}

/// Color settings: a built-in theme plus optional hex overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default = "crate::defaults::theme")]
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_inactive_background: Option<String>,
    /// Overrides for ANSI colors 0-15, in order; may be shorter than 16
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ansi: Vec<String>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            theme: crate::defaults::theme(),
            foreground: None,
            background: None,
            cursor: None,
            cursor_accent: None,
            selection_background: None,
            selection_inactive_background: None,
            ansi: Vec::new(),
        }
    }
}

impl ColorConfig {
    /// Resolve the theme and apply overrides.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let theme = Theme::by_name(&self.theme)
            .ok_or_else(|| ConfigError::UnknownTheme(self.theme.clone()))?;
        let mut palette = theme.palette();

        let apply = |field: &str, value: &Option<String>, target: &mut Color| {
            if let Some(hex) = value {
                *target = parse_color(field, hex)?;
            }
            Ok::<(), ConfigError>(())
        };
        apply("foreground", &self.foreground, &mut palette.foreground)?;
        apply("background", &self.background, &mut palette.background)?;
        apply("cursor", &self.cursor, &mut palette.cursor)?;
        apply("cursor_accent", &self.cursor_accent, &mut palette.cursor_accent)?;
        apply(
            "selection_background",
            &self.selection_background,
            &mut palette.selection_background,
        )?;
        apply(
            "selection_inactive_background",
            &self.selection_inactive_background,
            &mut palette.selection_inactive_background,
        )?;

        if self.ansi.len() > 16 {
            return Err(ConfigError::Validation(format!(
                "colors.ansi has {} entries, at most 16 allowed",
                self.ansi.len()
            )));
        }
        for (i, hex) in self.ansi.iter().enumerate() {
            palette.ansi[i] = parse_color(&format!("ansi[{i}]"), hex)?;
        }
        Ok(palette)
    }
}

fn parse_color(field: &str, hex: &str) -> Result<Color, ConfigError> {
    Color::from_hex(hex)
        .ok_or_else(|| ConfigError::Validation(format!("{field}: '{hex}' is not a #rrggbb color")))
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default)]
    pub cursor: CursorConfig,
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default = "crate::defaults::device_pixel_ratio")]
    pub device_pixel_ratio: f32,
    #[serde(default = "crate::defaults::cols")]
    pub cols: usize,
    #[serde(default = "crate::defaults::rows")]
    pub rows: usize,
    #[serde(default)]
    pub backend: RendererBackend,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            cursor: CursorConfig::default(),
            colors: ColorConfig::default(),
            device_pixel_ratio: crate::defaults::device_pixel_ratio(),
            cols: crate::defaults::cols(),
            rows: crate::defaults::rows(),
            backend: RendererBackend::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save_to(&config_path) {
                log::error!("Failed to save default config: {}", e);
                return Err(e);
            }
            Ok(config)
        }
    }

    /// Load and validate configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(ConfigError::from)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::from)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::from)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml).map_err(ConfigError::from)?;
        fs::rename(&temp_path, path).map_err(ConfigError::from)?;

        Ok(())
    }

    /// Get the configuration file path (using XDG convention)
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|dir| dir.join("cellpaint"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config").join("cellpaint"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    /// Check semantic constraints the YAML schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font.size.is_finite() && self.font.size > 0.0) {
            return Err(ConfigError::Validation(format!(
                "font.size must be positive, got {}",
                self.font.size
            )));
        }
        if !(self.font.line_height.is_finite() && self.font.line_height > 0.0) {
            return Err(ConfigError::Validation(format!(
                "font.line_height must be positive, got {}",
                self.font.line_height
            )));
        }
        for (field, weight) in [
            ("font.weight", self.font.weight),
            ("font.weight_bold", self.font.weight_bold),
        ] {
            if !(1..=1000).contains(&weight) {
                return Err(ConfigError::Validation(format!(
                    "{field} must be within 1..=1000, got {weight}"
                )));
            }
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(ConfigError::Validation(format!(
                "device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        if self.cursor.width < 0.0 {
            return Err(ConfigError::Validation(format!(
                "cursor.width must not be negative, got {}",
                self.cursor.width
            )));
        }
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::Validation(format!(
                "grid must have at least one cell, got {}x{}",
                self.cols, self.rows
            )));
        }
        self.colors.palette()?;
        Ok(())
    }

    /// Resolved palette
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        self.colors.palette()
    }

    /// Font size in device pixels
    pub fn font_size_px(&self) -> f32 {
        self.font.size * self.device_pixel_ratio
    }
}
