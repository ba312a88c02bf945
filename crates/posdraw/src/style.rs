//! Style strings for draw.io cells.
//!
//! draw.io keeps presentation in a single `style` attribute made of
//! `key=value` declarations separated by `;`. The order of declarations is
//! significant only for readability, but it is kept stable so the same
//! record always yields byte-identical output.

use std::fmt;

use posdraw_core::{
    color::{Color, ColorRole, normalize},
    element::{ElementRecord, ShapeKind},
    geometry::format_coordinate,
};

use crate::config::StyleConfig;

/// Connector declarations that never vary.
const CONNECTOR_BASE: [(&str, &str); 4] = [
    ("endArrow", "classic"),
    ("html", "1"),
    ("rounded", "0"),
    ("fillColor", "none"),
];

/// An ordered list of style declarations.
///
/// Displays as the draw.io `style` attribute value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclaration {
    entries: Vec<(&'static str, String)>,
}

impl StyleDeclaration {
    /// Creates an empty declaration list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key=value`.
    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.entries.push((key, value.into()));
    }

    /// Iterates over declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for StyleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Pushes the declarations that select the draw.io shape for `kind`.
fn push_primitives(style: &mut StyleDeclaration, kind: ShapeKind, config: &StyleConfig) {
    match kind {
        ShapeKind::Round | ShapeKind::Circle => {
            style.push("rounded", "1");
            style.push("shape", "ellipse");
        }
        ShapeKind::Rect | ShapeKind::Rectangle => {
            style.push("rounded", "0");
        }
        ShapeKind::Note => {
            style.push("rounded", "1");
            style.push("shape", "note");
            style.push("fillColor", config.note_fill().to_hex());
        }
        ShapeKind::RoundRectangle => {
            style.push("rounded", "1");
            style.push("arcSize", "20");
        }
        ShapeKind::Diamond => {
            style.push("shape", "diamond");
        }
        ShapeKind::SingleRightArrow | ShapeKind::SingleLeftArrow => {
            style.push("shape", "process");
            style.push("rounded", "0");
        }
    }
}

/// Computes the style of a node drawn as `kind`.
///
/// `kind` is passed separately from the record so that unmapped kinds can be
/// drawn with a substitute shape.
///
/// # Examples
///
/// ```
/// # use posdraw::{config::StyleConfig, style::shape_style};
/// # use posdraw_core::element::{ElementRecord, ShapeKind};
/// # use serde_json::json;
/// let record = ElementRecord::from_value("A", json!({"name": "rect"})).unwrap();
/// let style = shape_style(&record, ShapeKind::Rect, &StyleConfig::default());
/// assert_eq!(
///     style.to_string(),
///     "rounded=0;whiteSpace=wrap;html=1;fillColor=#ffffff;strokeColor=#000000;fontColor=#000000",
/// );
/// ```
pub fn shape_style(record: &ElementRecord, kind: ShapeKind, config: &StyleConfig) -> StyleDeclaration {
    let mut style = StyleDeclaration::new();
    push_primitives(&mut style, kind, config);

    style.push("whiteSpace", "wrap");
    style.push("html", "1");

    // Notes already carry their own fill.
    if kind != ShapeKind::Note {
        let fill = record.fill_style().and_then(|fill| fill.color());
        style.push("fillColor", normalize(fill, ColorRole::Fill).to_hex());
    }

    let line = record.line_style();
    match line.and_then(|line| line.color()) {
        Some(color) => style.push("strokeColor", normalize(Some(color), ColorRole::Stroke).to_hex()),
        None if kind != ShapeKind::Note => style.push("strokeColor", Color::BLACK.to_hex()),
        None => {}
    }

    style.push("fontColor", config.font_color().to_hex());

    if let Some(width) = line.and_then(|line| line.width()) {
        style.push("strokeWidth", format_coordinate(width));
    }

    style
}

/// Computes the style of a connector.
pub fn connector_style(record: &ElementRecord, config: &StyleConfig) -> StyleDeclaration {
    let mut style = StyleDeclaration::new();
    for (key, value) in CONNECTOR_BASE {
        style.push(key, value);
    }

    if let Some(line) = record.line_style() {
        if let Some(width) = line.width() {
            style.push("strokeWidth", format_coordinate(width));
        }
        if let Some(color) = line.color() {
            style.push("strokeColor", normalize(Some(color), ColorRole::Stroke).to_hex());
        }
    }

    style.push("fontColor", config.font_color().to_hex());
    style
}

/// Converts pos rich-text markup to the plain text draw.io displays.
///
/// ```
/// # use posdraw::style::clean_text;
/// assert_eq!(clean_text("line1<div>line2</div>"), "line1\nline2");
/// assert_eq!(clean_text("a&nbsp;b<br>c"), "a b\nc");
/// ```
pub fn clean_text(raw: &str) -> String {
    raw.replace("<div>", "\n")
        .replace("</div>", "")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("<br>", "\n")
        .replace("&nbsp;", " ")
}

/// Returns the text shown on the cell for `record`.
///
/// Uses the first text block; connectors without one fall back to their
/// plain `text` label. Records without text yield an empty string.
pub fn extract_display_text(record: &ElementRecord) -> String {
    let raw = match record.first_text() {
        Some(text) => Some(text),
        None if record.kind().is_linker() => record.plain_text(),
        None => None,
    };

    raw.map(clean_text).unwrap_or_default()
}
