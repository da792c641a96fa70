//! User configuration: `config.toml` with an `[editor]` and a `[theme]` table.
//!
//! ```toml
//! [editor]
//! indent_width = 4
//! default_extension = "txt"
//!
//! [theme]
//! background = "#0d0d0d"
//! keyword = "#ffffff"
//! ```
//!
//! Every key is optional; unknown keys are rejected.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use lwedit_core::{DEFAULT_INDENT_WIDTH, EditorOptions};
use ratatui::style::Color;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub editor: EditorConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Spaces inserted by Tab and removed by Shift+Tab.
    pub indent_width: usize,
    /// Appended on Save As when the chosen path has no extension. Empty disables it.
    pub default_extension: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            default_extension: "txt".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn options(&self) -> EditorOptions {
        EditorOptions {
            indent_width: self.indent_width.max(1),
        }
    }

    /// `path` with the default extension appended if it has none.
    pub fn with_default_extension(&self, path: PathBuf) -> PathBuf {
        let extension = self.default_extension.trim_start_matches('.');
        if extension.is_empty() || path.extension().is_some() {
            return path;
        }
        path.with_extension(extension)
    }
}

/// Theme colors as written in the file (`#rrggbb` or a color name).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub background: String,
    pub foreground: String,
    pub gutter: String,
    pub keyword: String,
    pub string: String,
    pub comment: String,
    pub function: String,
    pub sidebar: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#0d0d0d".to_string(),
            foreground: "#e6e6e6".to_string(),
            gutter: "#aaaaaa".to_string(),
            keyword: "#ffffff".to_string(),
            string: "#dddddd".to_string(),
            comment: "#777777".to_string(),
            function: "#f2f2f2".to_string(),
            sidebar: "#141414".to_string(),
        }
    }
}

/// Resolved theme colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub gutter: Color,
    pub keyword: Color,
    pub string: Color,
    pub comment: Color,
    pub function: Color,
    pub sidebar: Color,
}

fn parse_color(key: &str, value: &str) -> Result<Color> {
    Color::from_str(value).map_err(|_| anyhow::anyhow!("theme.{key}: invalid color {value:?}"))
}

impl Theme {
    pub fn from_config(theme: &ThemeConfig) -> Result<Self> {
        Ok(Self {
            background: parse_color("background", &theme.background)?,
            foreground: parse_color("foreground", &theme.foreground)?,
            gutter: parse_color("gutter", &theme.gutter)?,
            keyword: parse_color("keyword", &theme.keyword)?,
            string: parse_color("string", &theme.string)?,
            comment: parse_color("comment", &theme.comment)?,
            function: parse_color("function", &theme.function)?,
            sidebar: parse_color("sidebar", &theme.sidebar)?,
        })
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(0x0d, 0x0d, 0x0d),
            foreground: Color::Rgb(0xe6, 0xe6, 0xe6),
            gutter: Color::Rgb(0xaa, 0xaa, 0xaa),
            keyword: Color::Rgb(0xff, 0xff, 0xff),
            string: Color::Rgb(0xdd, 0xdd, 0xdd),
            comment: Color::Rgb(0x77, 0x77, 0x77),
            function: Color::Rgb(0xf2, 0xf2, 0xf2),
            sidebar: Color::Rgb(0x14, 0x14, 0x14),
        }
    }
}

impl Config {
    pub fn parse(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        Theme::from_config(&config.theme)?;
        Ok(config)
    }

    /// Load `explicit` if given (it must exist), else the default location if it exists, else
    /// the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.is_file() => path,
                _ => return Ok(Self::default()),
            },
        };

        let source = fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config =
            Self::parse(&source).with_context(|| format!("parsing config {}", path.display()))?;
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn theme(&self) -> Theme {
        Theme::from_config(&self.theme).unwrap_or_default()
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lwedit").join(CONFIG_FILE_NAME))
}
