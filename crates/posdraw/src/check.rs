//! Read-only checks of generated draw.io files.

use std::fmt;

use indexmap::IndexMap;
use quick_xml::{Reader, events::Event};
use thiserror::Error;

use crate::drawio::is_xml_char;

/// Errors raised while checking a draw.io file.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("not a draw.io file: root element is `{0}`, expected `mxfile`")]
    NotDrawio(String),

    #[error("document has no root element")]
    Empty,

    #[error("cell `{cell}` has a character XML does not allow in `{attribute}`")]
    InvalidCharacter { cell: String, attribute: String },
}

/// Rough visual category of a vertex, read from its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexCategory {
    Note,
    Ellipse,
    Diamond,
    RoundedRectangle,
    Rectangle,
}

impl VertexCategory {
    /// Classifies a vertex by its `style` attribute.
    ///
    /// ```
    /// # use posdraw::check::VertexCategory;
    /// assert_eq!(VertexCategory::from_style("rounded=1;shape=note"), VertexCategory::Note);
    /// assert_eq!(VertexCategory::from_style("rounded=1;arcSize=20"), VertexCategory::RoundedRectangle);
    /// assert_eq!(VertexCategory::from_style(""), VertexCategory::Rectangle);
    /// ```
    pub fn from_style(style: &str) -> Self {
        if style.contains("shape=note") {
            VertexCategory::Note
        } else if style.contains("shape=ellipse") {
            VertexCategory::Ellipse
        } else if style.contains("shape=diamond") {
            VertexCategory::Diamond
        } else if style.contains("rounded=1") {
            VertexCategory::RoundedRectangle
        } else {
            VertexCategory::Rectangle
        }
    }
}

impl fmt::Display for VertexCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VertexCategory::Note => "note",
            VertexCategory::Ellipse => "ellipse",
            VertexCategory::Diamond => "diamond",
            VertexCategory::RoundedRectangle => "rounded rectangle",
            VertexCategory::Rectangle => "rectangle",
        };
        f.write_str(label)
    }
}

/// Cell statistics of a draw.io file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    vertices: usize,
    edges: usize,
    categories: IndexMap<VertexCategory, usize>,
}

impl DocumentSummary {
    /// Parses `xml` and counts its vertex and edge cells.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError`] if the text is not well-formed XML or its root
    /// element is not `mxfile`.
    pub fn from_xml(xml: &str) -> Result<Self, CheckError> {
        let mut reader = Reader::from_str(xml);
        let mut summary = Self::default();
        let mut seen_root = false;

        loop {
            match reader.read_event()? {
                Event::Start(elem) | Event::Empty(elem) => {
                    if !seen_root {
                        let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
                        if name != "mxfile" {
                            return Err(CheckError::NotDrawio(name));
                        }
                        seen_root = true;
                        continue;
                    }

                    if elem.name().as_ref() != b"mxCell" {
                        continue;
                    }

                    let mut id = String::new();
                    let mut vertex = false;
                    let mut edge = false;
                    let mut style = String::new();
                    let mut invalid = None;
                    for attr in elem.attributes() {
                        let attr = attr.map_err(quick_xml::Error::from)?;
                        let value = attr.unescape_value()?;
                        if invalid.is_none() && !value.chars().all(is_xml_char) {
                            invalid = Some(String::from_utf8_lossy(attr.key.as_ref()).into_owned());
                        }
                        match attr.key.as_ref() {
                            b"id" => id = value.into_owned(),
                            b"vertex" => vertex = value == "1",
                            b"edge" => edge = value == "1",
                            b"style" => style = value.into_owned(),
                            _ => {}
                        }
                    }

                    if let Some(attribute) = invalid {
                        return Err(CheckError::InvalidCharacter {
                            cell: id,
                            attribute,
                        });
                    }

                    if vertex {
                        summary.vertices += 1;
                        *summary
                            .categories
                            .entry(VertexCategory::from_style(&style))
                            .or_default() += 1;
                    } else if edge {
                        summary.edges += 1;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !seen_root {
            return Err(CheckError::Empty);
        }
        Ok(summary)
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn edges(&self) -> usize {
        self.edges
    }

    /// Vertex counts per category, in first-seen order.
    pub fn categories(&self) -> &IndexMap<VertexCategory, usize> {
        &self.categories
    }
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes: {}", self.vertices)?;
        writeln!(f, "Connectors: {}", self.edges)?;
        writeln!(f, "Node categories:")?;
        for (category, count) in &self.categories {
            writeln!(f, "  {category}: {count}")?;
        }
        Ok(())
    }
}
