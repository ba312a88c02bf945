//! The draw.io document model and its XML writer.
//!
//! A draw.io file is an `mxfile` holding one `diagram`, whose
//! `mxGraphModel` lists every cell under `root`. Two scaffolding cells come
//! first: cell `0` is the model root and cell `1` the default layer that all
//! converted cells hang from.
//!
//! ```xml
//! <mxfile host="app.diagrams.net" ...>
//!   <diagram name="Page-1" id="converted-diagram">
//!     <mxGraphModel dx="2000" ...>
//!       <root>
//!         <mxCell id="0"/>
//!         <mxCell id="1" parent="0"/>
//!         <mxCell id="A" value="Start" style="..." parent="1" vertex="1">
//!           <mxGeometry x="0" y="0" width="100" height="50" as="geometry"/>
//!         </mxCell>
//!       </root>
//!     </mxGraphModel>
//!   </diagram>
//! </mxfile>
//! ```

use std::{borrow::Cow, io, string::FromUtf8Error};

use quick_xml::{
    Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, Event, attributes::Attribute},
    name::QName,
};
use thiserror::Error;

use posdraw_core::geometry::{Bounds, Point, format_coordinate};

use crate::style::StyleDeclaration;

/// Identifier of the model root cell.
pub const ROOT_CELL_ID: &str = "0";

/// Identifier of the default layer cell every converted cell belongs to.
pub const LAYER_CELL_ID: &str = "1";

const MXFILE_ATTRIBUTES: [(&str, &str); 6] = [
    ("host", "app.diagrams.net"),
    ("modified", "2026-01-01T00:00:00.000Z"),
    ("agent", concat!("posdraw/", env!("CARGO_PKG_VERSION"))),
    ("version", "24.8.3"),
    ("etag", "converted_from_pos"),
    ("type", "device"),
];

const DIAGRAM_ATTRIBUTES: [(&str, &str); 2] = [("name", "Page-1"), ("id", "converted-diagram")];

const GRAPH_MODEL_ATTRIBUTES: [(&str, &str); 15] = [
    ("dx", "2000"),
    ("dy", "2000"),
    ("grid", "1"),
    ("gridSize", "10"),
    ("guides", "1"),
    ("tooltips", "1"),
    ("connect", "1"),
    ("arrows", "1"),
    ("fold", "1"),
    ("page", "1"),
    ("pageScale", "1"),
    ("pageWidth", "827"),
    ("pageHeight", "1169"),
    ("math", "0"),
    ("shadow", "0"),
];

/// Errors raised while serializing a [`Document`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("XML write failed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while writing XML: {0}")]
    Io(#[from] io::Error),

    #[error("generated XML is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

type Result<T> = std::result::Result<T, Error>;

/// A shape cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    id: String,
    value: String,
    style: StyleDeclaration,
    bounds: Bounds,
}

impl Vertex {
    pub fn new(
        id: impl Into<String>,
        value: impl Into<String>,
        style: StyleDeclaration,
        bounds: Bounds,
    ) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            style,
            bounds,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn style(&self) -> &StyleDeclaration {
        &self.style
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// A connector cell between two vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: String,
    value: String,
    style: StyleDeclaration,
    source: String,
    target: String,
    waypoints: Vec<Point>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        value: impl Into<String>,
        style: StyleDeclaration,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            style,
            source: source.into(),
            target: target.into(),
            waypoints: Vec::new(),
        }
    }

    /// Sets the bend points between source and target.
    pub fn with_waypoints(mut self, waypoints: Vec<Point>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn style(&self) -> &StyleDeclaration {
        &self.style
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }
}

/// A converted cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Vertex(Vertex),
    Edge(Edge),
}

impl Cell {
    pub fn id(&self) -> &str {
        match self {
            Cell::Vertex(vertex) => vertex.id(),
            Cell::Edge(edge) => edge.id(),
        }
    }
}

/// A single-page draw.io document.
///
/// Holds the converted cells in emission order; the scaffolding cells are
/// added when the document is written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    cells: Vec<Cell>,
}

impl Document {
    /// Creates a document with only the scaffolding cells.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_vertex(&mut self, vertex: Vertex) {
        self.cells.push(Cell::Vertex(vertex));
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.cells.push(Cell::Edge(edge));
    }

    /// Returns the converted cells in emission order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Vertex(vertex) => Some(vertex),
            Cell::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Edge(edge) => Some(edge),
            Cell::Vertex(_) => None,
        })
    }

    /// Serializes the document as indented XML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] if the XML writer fails.
    pub fn to_xml(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_xml(&mut writer)?;

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}

/// Types that serialize themselves as XML elements.
trait ToXml<W: io::Write> {
    fn write_xml(&self, writer: &mut Writer<W>) -> Result<()>;
}

impl<W: io::Write> ToXml<W> for Document {
    fn write_xml(&self, writer: &mut Writer<W>) -> Result<()> {
        write_start(writer, "mxfile", &MXFILE_ATTRIBUTES)?;
        write_start(writer, "diagram", &DIAGRAM_ATTRIBUTES)?;
        write_start(writer, "mxGraphModel", &GRAPH_MODEL_ATTRIBUTES)?;
        write_start(writer, "root", &[])?;

        write_empty(writer, "mxCell", &[("id", ROOT_CELL_ID)])?;
        write_empty(
            writer,
            "mxCell",
            &[("id", LAYER_CELL_ID), ("parent", ROOT_CELL_ID)],
        )?;

        for cell in &self.cells {
            match cell {
                Cell::Vertex(vertex) => vertex.write_xml(writer)?,
                Cell::Edge(edge) => edge.write_xml(writer)?,
            }
        }

        write_end(writer, "root")?;
        write_end(writer, "mxGraphModel")?;
        write_end(writer, "diagram")?;
        write_end(writer, "mxfile")
    }
}

impl<W: io::Write> ToXml<W> for Vertex {
    fn write_xml(&self, writer: &mut Writer<W>) -> Result<()> {
        let style = self.style.to_string();
        write_start(
            writer,
            "mxCell",
            &[
                ("id", self.id.as_str()),
                ("value", self.value.as_str()),
                ("style", style.as_str()),
                ("parent", LAYER_CELL_ID),
                ("vertex", "1"),
            ],
        )?;

        let x = format_coordinate(self.bounds.min_x());
        let y = format_coordinate(self.bounds.min_y());
        let width = format_coordinate(self.bounds.width());
        let height = format_coordinate(self.bounds.height());
        write_empty(
            writer,
            "mxGeometry",
            &[
                ("x", x.as_str()),
                ("y", y.as_str()),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("as", "geometry"),
            ],
        )?;

        write_end(writer, "mxCell")
    }
}

impl<W: io::Write> ToXml<W> for Edge {
    fn write_xml(&self, writer: &mut Writer<W>) -> Result<()> {
        let style = self.style.to_string();
        write_start(
            writer,
            "mxCell",
            &[
                ("id", self.id.as_str()),
                ("value", self.value.as_str()),
                ("style", style.as_str()),
                ("parent", LAYER_CELL_ID),
                ("source", self.source.as_str()),
                ("target", self.target.as_str()),
                ("edge", "1"),
            ],
        )?;

        let geometry = [("relative", "1"), ("as", "geometry")];
        if self.waypoints.is_empty() {
            write_empty(writer, "mxGeometry", &geometry)?;
        } else {
            write_start(writer, "mxGeometry", &geometry)?;
            write_start(writer, "Array", &[("as", "points")])?;
            for point in &self.waypoints {
                let x = format_coordinate(point.x());
                let y = format_coordinate(point.y());
                write_empty(writer, "mxPoint", &[("x", x.as_str()), ("y", y.as_str())])?;
            }
            write_end(writer, "Array")?;
            write_end(writer, "mxGeometry")?;
        }

        write_end(writer, "mxCell")
    }
}

/// Builds an attribute whose value is escaped for XML, newlines included.
///
/// quick-xml leaves line breaks in attribute values as-is, and XML parsers
/// normalize those to spaces on read. Writing them as character references
/// keeps multi-line labels intact. Characters XML 1.0 cannot carry at all
/// (most C0 controls, U+FFFE, U+FFFF) are dropped.
fn attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    let value: Cow<'_, str> = if value.chars().all(is_xml_char) {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(value.chars().filter(|&c| is_xml_char(c)).collect())
    };

    let escaped = escape(&*value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;");

    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    }
}

/// The `Char` production of XML 1.0.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for &(key, value) in attrs {
        elem.push_attribute(attribute(key, value));
    }
    elem
}

fn write_start<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
) -> Result<()> {
    writer.write_event(Event::Start(element(name, attrs)))?;
    Ok(())
}

fn write_empty<W: io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
) -> Result<()> {
    writer.write_event(Event::Empty(element(name, attrs)))?;
    Ok(())
}

fn write_end<W: io::Write>(writer: &mut Writer<W>, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use posdraw_core::geometry::Size;

    use super::*;

    fn style(key: &'static str, value: &str) -> StyleDeclaration {
        let mut style = StyleDeclaration::new();
        style.push(key, value);
        style
    }

    fn bounds(x: f64, y: f64, w: f64, h: f64) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_empty_document_has_scaffolding() {
        let xml = Document::new().to_xml().expect("Failed to write XML");

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<mxfile host="app.diagrams.net""#));
        assert!(xml.contains(r#"<diagram name="Page-1" id="converted-diagram">"#));
        assert!(xml.contains(r#"pageWidth="827" pageHeight="1169""#));
        assert!(xml.contains(r#"<mxCell id="0"/>"#));
        assert!(xml.contains(r#"<mxCell id="1" parent="0"/>"#));
        assert!(xml.ends_with("</mxfile>\n"));
    }

    #[test]
    fn test_vertex_xml() {
        let mut document = Document::new();
        document.push_vertex(Vertex::new(
            "A",
            "Start",
            style("rounded", "0"),
            bounds(10.0, 20.5, 100.0, 50.0),
        ));

        let xml = document.to_xml().expect("Failed to write XML");
        assert!(xml.contains(
            r#"<mxCell id="A" value="Start" style="rounded=0" parent="1" vertex="1">"#
        ));
        assert!(xml.contains(
            r#"<mxGeometry x="10" y="20.5" width="100" height="50" as="geometry"/>"#
        ));
    }

    #[test]
    fn test_edge_without_waypoints() {
        let mut document = Document::new();
        document.push_edge(Edge::new("L", "", style("shape", "x"), "A", "B"));

        let xml = document.to_xml().expect("Failed to write XML");
        assert!(xml.contains(
            r#"<mxCell id="L" value="" style="shape=x" parent="1" source="A" target="B" edge="1">"#
        ));
        assert!(xml.contains(r#"<mxGeometry relative="1" as="geometry"/>"#));
        assert!(!xml.contains("<Array"));
    }

    #[test]
    fn test_edge_waypoints() {
        let mut document = Document::new();
        document.push_edge(
            Edge::new("L", "", style("shape", "x"), "A", "B")
                .with_waypoints(vec![Point::new(1.0, 2.0), Point::new(3.5, -4.0)]),
        );

        let xml = document.to_xml().expect("Failed to write XML");
        assert!(xml.contains(r#"<Array as="points">"#));
        assert!(xml.contains(r#"<mxPoint x="1" y="2"/>"#));
        assert!(xml.contains(r#"<mxPoint x="3.5" y="-4"/>"#));
    }

    #[test]
    fn test_attribute_escaping() {
        let mut document = Document::new();
        document.push_vertex(Vertex::new(
            "A&B",
            "a < b\n\"c\"",
            style("rounded", "0"),
            bounds(0.0, 0.0, 1.0, 1.0),
        ));

        let xml = document.to_xml().expect("Failed to write XML");
        assert!(xml.contains(r#"id="A&amp;B""#));
        assert!(xml.contains(r#"value="a &lt; b&#10;&quot;c&quot;""#));
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let mut document = Document::new();
        document.push_vertex(Vertex::new(
            "A",
            "bell\u{7} tab\u{b}\tend\u{fffe}",
            style("rounded", "0"),
            bounds(0.0, 0.0, 1.0, 1.0),
        ));

        let xml = document.to_xml().expect("Failed to write XML");
        assert!(xml.contains(r#"value="bell tab&#9;end""#));
        assert!(!xml.chars().any(|c| !is_xml_char(c)));
    }

    #[test]
    fn test_xml_char_production() {
        for c in ['\t', '\n', '\r', ' ', 'é', '\u{D7FF}', '\u{E000}', '\u{10FFFF}'] {
            assert!(is_xml_char(c), "{c:?}");
        }
        for c in ['\0', '\u{1}', '\u{8}', '\u{b}', '\u{c}', '\u{1f}', '\u{fffe}', '\u{ffff}'] {
            assert!(!is_xml_char(c), "{c:?}");
        }
    }

    #[test]
    fn test_indentation() {
        let xml = Document::new().to_xml().expect("Failed to write XML");
        assert!(xml.contains("\n  <diagram"));
        assert!(xml.contains("\n        <mxCell id=\"0\"/>"));
    }

    #[test]
    fn test_cell_accessors() {
        let mut document = Document::new();
        document.push_vertex(Vertex::new("A", "", style("rounded", "0"), bounds(0.0, 0.0, 1.0, 1.0)));
        document.push_edge(Edge::new("L", "", style("shape", "x"), "A", "A"));

        assert_eq!(document.vertices().count(), 1);
        assert_eq!(document.edges().count(), 1);
        let ids: Vec<&str> = document.cells().iter().map(Cell::id).collect();
        assert_eq!(ids, vec!["A", "L"]);
    }
}
