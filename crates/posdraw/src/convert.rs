//! Mapping of an element collection onto a draw.io document.
//!
//! Conversion runs in two passes over the collection. The first pass emits a
//! vertex for every shape record with complete geometry. The second pass
//! emits connectors, and only between vertices the first pass produced; this
//! makes the result independent of where connectors appear in the document.
//!
//! Problems with individual records never abort a conversion. They are
//! collected in the [`ConversionReport`] as [`SkippedElement`]s.

use indexmap::IndexSet;
use log::{debug, info, warn};

use posdraw_core::{
    collection::ElementCollection,
    element::{ElementKind, ElementRecord, ShapeKind},
    skip::{SkipReason, SkippedElement},
};

use crate::{
    config::{AppConfig, UnknownShapePolicy},
    drawio::{Document, Edge, LAYER_CELL_ID, ROOT_CELL_ID, Vertex},
    style::{connector_style, extract_display_text, shape_style},
};

/// Counts and skips gathered while converting one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionReport {
    nodes: usize,
    connectors: usize,
    excluded: usize,
    skipped: Vec<SkippedElement>,
}

impl ConversionReport {
    /// Number of vertices emitted.
    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// Number of connectors emitted.
    pub fn connectors(&self) -> usize {
        self.connectors
    }

    /// Number of records left out because their kind has no mapping.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Records that could not be converted, in the order they were met.
    pub fn skipped(&self) -> &[SkippedElement] {
        &self.skipped
    }

    fn skip(&mut self, id: &str, reason: SkipReason) {
        warn!(id, reason:% = reason; "Element skipped");
        self.skipped.push(SkippedElement::new(id, reason));
    }
}

/// The result of converting one element collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversion {
    document: Document,
    report: ConversionReport,
}

impl Conversion {
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn report(&self) -> &ConversionReport {
        &self.report
    }

    /// Splits the conversion into its document and report.
    pub fn into_parts(self) -> (Document, ConversionReport) {
        (self.document, self.report)
    }
}

/// Converts `collection` into a draw.io document.
pub fn convert(collection: &ElementCollection, config: &AppConfig) -> Conversion {
    let mut emitter = Emitter::new(config);

    for rejected in collection.rejected() {
        emitter
            .report
            .skip(rejected.id(), rejected.reason().clone());
    }

    for record in collection.iter() {
        emitter.emit_node(record);
    }
    debug!(nodes = emitter.report.nodes; "Node pass finished");

    for record in collection.iter().filter(|r| r.kind().is_linker()) {
        emitter.emit_connector(record);
    }
    debug!(connectors = emitter.report.connectors; "Connector pass finished");

    info!(
        nodes = emitter.report.nodes,
        connectors = emitter.report.connectors,
        excluded = emitter.report.excluded,
        skipped = emitter.report.skipped.len();
        "Conversion finished"
    );

    Conversion {
        document: emitter.document,
        report: emitter.report,
    }
}

fn is_reserved(id: &str) -> bool {
    id == ROOT_CELL_ID || id == LAYER_CELL_ID
}

struct Emitter<'a> {
    config: &'a AppConfig,
    document: Document,
    report: ConversionReport,
    emitted: IndexSet<&'a str>,
}

impl<'a> Emitter<'a> {
    fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            document: Document::new(),
            report: ConversionReport::default(),
            emitted: IndexSet::new(),
        }
    }

    /// Returns the shape to draw `kind` as, or `None` if it is not a node.
    fn node_shape(&mut self, record: &ElementRecord) -> Option<ShapeKind> {
        match record.kind() {
            ElementKind::Shape(kind) => Some(*kind),
            ElementKind::Linker => None,
            ElementKind::Other(name) => match self.config.shapes().unknown() {
                UnknownShapePolicy::Rectangle => Some(ShapeKind::Rect),
                UnknownShapePolicy::Skip => {
                    debug!(id = record.id(), kind = name.as_str(); "Unsupported element kind excluded");
                    self.report.excluded += 1;
                    None
                }
            },
        }
    }

    fn emit_node(&mut self, record: &'a ElementRecord) {
        let Some(kind) = self.node_shape(record) else {
            return;
        };

        let id = record.id();
        if is_reserved(id) {
            self.report.skip(id, SkipReason::ReservedId);
            return;
        }

        let bounds = match record.props().copied().unwrap_or_default().bounds() {
            Ok(bounds) => bounds,
            Err(reason) => {
                self.report.skip(id, reason);
                return;
            }
        };

        let text = extract_display_text(record);
        let style = shape_style(record, kind, self.config.style());
        debug!(id, kind:% = kind; "Vertex emitted");

        self.document.push_vertex(Vertex::new(id, text, style, bounds));
        self.emitted.insert(id);
        self.report.nodes += 1;
    }

    fn emit_connector(&mut self, record: &'a ElementRecord) {
        let id = record.id();
        if is_reserved(id) {
            self.report.skip(id, SkipReason::ReservedId);
            return;
        }

        let source = record.from().and_then(|end| end.id());
        let target = record.to().and_then(|end| end.id());

        let (Some(source), Some(target)) = (
            source.filter(|id| self.emitted.contains(*id)),
            target.filter(|id| self.emitted.contains(*id)),
        ) else {
            self.report.skip(
                id,
                SkipReason::MissingEndpoint {
                    source: source.map(str::to_string),
                    target: target.map(str::to_string),
                },
            );
            return;
        };

        let points = record.points();
        let waypoints = if points.len() > 2 {
            points[1..points.len() - 1].to_vec()
        } else {
            Vec::new()
        };

        let edge = Edge::new(
            id,
            extract_display_text(record),
            connector_style(record, self.config.style()),
            source,
            target,
        )
        .with_waypoints(waypoints);
        debug!(id, source, target; "Edge emitted");

        self.document.push_edge(edge);
        self.report.connectors += 1;
    }
}
