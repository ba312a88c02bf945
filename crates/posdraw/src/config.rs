//! Configuration types for pos to draw.io conversion.
//!
//! This module provides configuration structures that control how source
//! documents are loaded and how their elements are styled. All types
//! implement [`serde::Deserialize`] so they can be read from a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LoaderConfig`] - Chooses the [`LoadStrategy`] and the size threshold used by `auto`.
//! - [`ShapeConfig`] - Decides what happens to element kinds without a draw.io mapping.
//! - [`StyleConfig`] - Colors written into generated styles.
//!
//! # Example
//!
//! ```
//! # use posdraw::config::{AppConfig, UnknownShapePolicy};
//! let config = AppConfig::default();
//! assert_eq!(config.shapes().unknown(), UnknownShapePolicy::Skip);
//! assert_eq!(config.style().note_fill().to_string(), "#fff0c2");
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use posdraw_core::color::Color;
use posdraw_parser::{DEFAULT_SUBTREE_THRESHOLD, LoadStrategy};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Loader configuration section.
    #[serde(default)]
    loader: LoaderConfig,

    /// Shape mapping configuration section.
    #[serde(default)]
    shapes: ShapeConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(loader: LoaderConfig, shapes: ShapeConfig, style: StyleConfig) -> Self {
        Self {
            loader,
            shapes,
            style,
        }
    }

    /// Returns the loader configuration.
    pub fn loader(&self) -> &LoaderConfig {
        &self.loader
    }

    /// Returns the shape mapping configuration.
    pub fn shapes(&self) -> &ShapeConfig {
        &self.shapes
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns a copy with the load strategy replaced.
    pub fn with_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.loader.strategy = strategy;
        self
    }
}

/// How source documents are read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    strategy: LoadStrategy,

    /// Size in bytes at or above which `auto` streams the document.
    #[serde(default = "default_subtree_threshold")]
    subtree_threshold: u64,
}

fn default_subtree_threshold() -> u64 {
    DEFAULT_SUBTREE_THRESHOLD
}

impl LoaderConfig {
    /// Creates a new [`LoaderConfig`].
    pub fn new(strategy: LoadStrategy, subtree_threshold: u64) -> Self {
        Self {
            strategy,
            subtree_threshold,
        }
    }

    /// Returns the configured [`LoadStrategy`].
    pub fn strategy(&self) -> LoadStrategy {
        self.strategy
    }

    /// Returns the `auto` threshold in bytes.
    pub fn subtree_threshold(&self) -> u64 {
        self.subtree_threshold
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::new(LoadStrategy::default(), DEFAULT_SUBTREE_THRESHOLD)
    }
}

/// What to do with elements whose kind has no draw.io mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownShapePolicy {
    /// Leave them out and count them as excluded.
    #[default]
    Skip,
    /// Draw them as plain rectangles.
    Rectangle,
}

/// Shape mapping configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShapeConfig {
    #[serde(default)]
    unknown: UnknownShapePolicy,
}

impl ShapeConfig {
    pub fn new(unknown: UnknownShapePolicy) -> Self {
        Self { unknown }
    }

    /// Returns the policy for unmapped element kinds.
    pub fn unknown(&self) -> UnknownShapePolicy {
        self.unknown
    }
}

/// Colors used by generated styles.
///
/// Values accept any CSS color (`"#fff0c2"`, `"rgb(0, 0, 0)"`, `"black"`).
/// Alpha is dropped since draw.io style colors are opaque.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StyleConfig {
    /// Fill color of `note` shapes.
    #[serde(default = "default_note_fill")]
    note_fill: CssColor,

    /// Text color of every node and connector.
    #[serde(default = "default_font_color")]
    font_color: CssColor,
}

fn default_note_fill() -> CssColor {
    CssColor(Color::from_rgb(0xff, 0xf0, 0xc2))
}

fn default_font_color() -> CssColor {
    CssColor(Color::BLACK)
}

impl StyleConfig {
    /// Creates a new [`StyleConfig`].
    pub fn new(note_fill: Color, font_color: Color) -> Self {
        Self {
            note_fill: CssColor(note_fill),
            font_color: CssColor(font_color),
        }
    }

    /// Returns the fill color of `note` shapes.
    pub fn note_fill(&self) -> Color {
        self.note_fill.0
    }

    /// Returns the text color.
    pub fn font_color(&self) -> Color {
        self.font_color.0
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            note_fill: default_note_fill(),
            font_color: default_font_color(),
        }
    }
}

/// A [`Color`] read from a CSS color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
struct CssColor(Color);

impl FromStr for CssColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::new(s).map(CssColor)
    }
}

impl TryFrom<String> for CssColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.loader().strategy(), LoadStrategy::Auto);
        assert_eq!(config.loader().subtree_threshold(), 16 * 1024 * 1024);
        assert_eq!(config.shapes().unknown(), UnknownShapePolicy::Skip);
        assert_eq!(config.style().note_fill().to_hex(), "#fff0c2");
        assert_eq!(config.style().font_color(), Color::BLACK);
    }

    #[test]
    fn test_css_color_forms() {
        let red: CssColor = "red".parse().expect("named color");
        assert_eq!(red.0, Color::from_rgb(255, 0, 0));

        let rgb: CssColor = "rgb(1, 2, 3)".parse().expect("rgb() color");
        assert_eq!(rgb.0, Color::from_rgb(1, 2, 3));

        let hex: CssColor = "#336699".parse().expect("hex color");
        assert_eq!(hex.to_string(), "#336699");
    }

    #[test]
    fn test_css_color_rejects_garbage() {
        let err = "not-a-color".parse::<CssColor>().unwrap_err();
        assert!(err.contains("not-a-color"));
    }

    #[test]
    fn test_with_strategy() {
        let config = AppConfig::default().with_strategy(LoadStrategy::Full);
        assert_eq!(config.loader().strategy(), LoadStrategy::Full);
    }
}
