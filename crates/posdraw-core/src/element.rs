//! Element records decoded from pos documents.
//!
//! Every entry of the element collection is one JSON object keyed by its
//! identifier. The object's `name` field selects the [`ElementKind`]; the
//! remaining fields are optional and only meaningful for some kinds:
//!
//! ```json
//! {
//!   "name": "rect",
//!   "props": { "x": 0, "y": 0, "w": 100, "h": 50 },
//!   "textBlock": [{ "text": "Start" }],
//!   "fillStyle": { "color": [255, 255, 255] },
//!   "lineStyle": { "color": "#333333", "width": 2 }
//! }
//! ```
//!
//! Connectors (`"name": "linker"`) add `from`, `to` and `points`.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    geometry::{Bounds, Point, Size},
    skip::SkipReason,
};

/// Shape kinds with a known draw.io mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Round,
    Circle,
    Rect,
    Rectangle,
    Note,
    RoundRectangle,
    Diamond,
    SingleRightArrow,
    SingleLeftArrow,
}

impl ShapeKind {
    /// Every supported shape kind.
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Round,
        ShapeKind::Circle,
        ShapeKind::Rect,
        ShapeKind::Rectangle,
        ShapeKind::Note,
        ShapeKind::RoundRectangle,
        ShapeKind::Diamond,
        ShapeKind::SingleRightArrow,
        ShapeKind::SingleLeftArrow,
    ];

    /// Looks up a shape kind by its pos `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns the pos `name` of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Round => "round",
            ShapeKind::Circle => "circle",
            ShapeKind::Rect => "rect",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Note => "note",
            ShapeKind::RoundRectangle => "roundRectangle",
            ShapeKind::Diamond => "diamond",
            ShapeKind::SingleRightArrow => "singleRightArrow",
            ShapeKind::SingleLeftArrow => "singleLeftArrow",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of an element record, derived from its `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A shape with a known draw.io mapping.
    Shape(ShapeKind),
    /// A connector between two shapes.
    Linker,
    /// Anything else; the converter's unknown-shape policy decides its fate.
    Other(String),
}

impl ElementKind {
    /// Name used by pos documents for connectors.
    pub const LINKER: &'static str = "linker";

    /// Classifies a pos `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use posdraw_core::element::{ElementKind, ShapeKind};
    /// assert_eq!(ElementKind::from_name("diamond"), ElementKind::Shape(ShapeKind::Diamond));
    /// assert_eq!(ElementKind::from_name("linker"), ElementKind::Linker);
    /// assert_eq!(ElementKind::from_name("uml.actor"), ElementKind::Other("uml.actor".into()));
    /// ```
    pub fn from_name(name: &str) -> Self {
        if name == Self::LINKER {
            return ElementKind::Linker;
        }
        ShapeKind::from_name(name)
            .map(ElementKind::Shape)
            .unwrap_or_else(|| ElementKind::Other(name.to_string()))
    }

    /// Returns the pos `name` this kind was classified from.
    pub fn name(&self) -> &str {
        match self {
            ElementKind::Shape(kind) => kind.name(),
            ElementKind::Linker => Self::LINKER,
            ElementKind::Other(name) => name,
        }
    }

    /// Returns `true` for connectors.
    pub fn is_linker(&self) -> bool {
        matches!(self, ElementKind::Linker)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a record's `textBlock` list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextBlock {
    #[serde(default)]
    text: Option<String>,
}

impl TextBlock {
    /// Returns the raw (markup-bearing) text of the block.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

/// Position and size of a shape (`props`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Props {
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    w: Option<f64>,
    #[serde(default)]
    h: Option<f64>,
}

impl Props {
    /// Builds the bounds rectangle, naming the first missing field on failure.
    pub fn bounds(&self) -> Result<Bounds, SkipReason> {
        let require = |value: Option<f64>, field: &'static str| {
            value.ok_or(SkipReason::MissingGeometry { field })
        };

        let top_left = Point::new(require(self.x, "x")?, require(self.y, "y")?);
        let size = Size::new(require(self.w, "w")?, require(self.h, "h")?);
        Ok(Bounds::new_from_top_left(top_left, size))
    }
}

/// Fill settings (`fillStyle`). The color is kept raw for the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FillStyle {
    #[serde(default)]
    color: Option<Value>,
}

impl FillStyle {
    /// Returns the raw source color, if any.
    pub fn color(&self) -> Option<&Value> {
        self.color.as_ref()
    }
}

/// Outline or connector line settings (`lineStyle`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LineStyle {
    #[serde(default)]
    color: Option<Value>,
    #[serde(default)]
    width: Option<f64>,
}

impl LineStyle {
    /// Returns the raw source color, if any.
    pub fn color(&self) -> Option<&Value> {
        self.color.as_ref()
    }

    /// Returns the explicit line width, if any.
    pub fn width(&self) -> Option<f64> {
        self.width
    }
}

/// One end of a connector (`from` / `to`).
///
/// Only the attached element matters; endpoint coordinates repeat the
/// first and last entries of `points`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    id: Option<String>,
}

impl Endpoint {
    /// Returns the identifier of the attached element, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// The JSON shape of a record, before the kind is resolved.
#[derive(Debug, Deserialize)]
#[serde(rename = "ElementRecord", rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    props: Option<Props>,
    #[serde(default)]
    text_block: Option<Vec<TextBlock>>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    fill_style: Option<FillStyle>,
    #[serde(default)]
    line_style: Option<LineStyle>,
    #[serde(default)]
    from: Option<Endpoint>,
    #[serde(default)]
    to: Option<Endpoint>,
    #[serde(default)]
    points: Option<Vec<Point>>,
}

/// A decoded pos element: a shape, a connector, or an unsupported kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRecord {
    id: String,
    kind: ElementKind,
    props: Option<Props>,
    text_blocks: Vec<TextBlock>,
    text: Option<String>,
    fill_style: Option<FillStyle>,
    line_style: Option<LineStyle>,
    from: Option<Endpoint>,
    to: Option<Endpoint>,
    points: Vec<Point>,
}

impl ElementRecord {
    /// Decodes a record from its JSON value.
    ///
    /// `id` is the key under which the record was stored in the collection;
    /// any `id` field inside the object is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SkipReason::Malformed`] when a field has the wrong JSON type
    /// and [`SkipReason::MissingKind`] when `name` is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// # use posdraw_core::element::{ElementKind, ElementRecord, ShapeKind};
    /// # use serde_json::json;
    /// let record = ElementRecord::from_value(
    ///     "A",
    ///     json!({"name": "rect", "props": {"x": 0, "y": 0, "w": 100, "h": 50}}),
    /// )
    /// .unwrap();
    /// assert_eq!(record.kind(), &ElementKind::Shape(ShapeKind::Rect));
    /// ```
    pub fn from_value(id: impl Into<String>, value: Value) -> Result<Self, SkipReason> {
        let raw: RawRecord =
            serde_json::from_value(value).map_err(|err| SkipReason::Malformed(err.to_string()))?;
        let name = raw.name.ok_or(SkipReason::MissingKind)?;

        Ok(Self {
            id: id.into(),
            kind: ElementKind::from_name(&name),
            props: raw.props,
            text_blocks: raw.text_block.unwrap_or_default(),
            text: raw.text,
            fill_style: raw.fill_style,
            line_style: raw.line_style,
            from: raw.from,
            to: raw.to,
            points: raw.points.unwrap_or_default(),
        })
    }

    /// Returns the record identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the record kind.
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Returns the raw position/size block.
    pub fn props(&self) -> Option<&Props> {
        self.props.as_ref()
    }

    /// Returns the raw text of the first text block.
    pub fn first_text(&self) -> Option<&str> {
        self.text_blocks.first().and_then(TextBlock::text)
    }

    /// Returns the plain `text` label some connectors carry instead of blocks.
    pub fn plain_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn fill_style(&self) -> Option<&FillStyle> {
        self.fill_style.as_ref()
    }

    pub fn line_style(&self) -> Option<&LineStyle> {
        self.line_style.as_ref()
    }

    /// Returns the connector source endpoint.
    pub fn from(&self) -> Option<&Endpoint> {
        self.from.as_ref()
    }

    /// Returns the connector target endpoint.
    pub fn to(&self) -> Option<&Endpoint> {
        self.to.as_ref()
    }

    /// Returns the connector route, endpoints included.
    pub fn points(&self) -> &[Point] {
        &self.points
    }
}
