//! posdraw - Convert pos diagram documents to draw.io XML.
//!
//! Loading, shape and connector mapping, and XML output for pos documents.
//! The element records of a pos file become draw.io cells one to one and keep
//! their identifiers; connectors are only kept when both of their ends were
//! converted.

pub mod check;
pub mod config;
pub mod convert;
pub mod drawio;
pub mod inspect;
pub mod style;

mod error;

pub use posdraw_core::{collection, color, element, geometry, skip};
pub use posdraw_parser::{LoadOutcome, LoadStrategy};

pub use error::PosDrawError;

use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use log::{debug, info, trace};

use posdraw_parser::error::Diagnostic;

use collection::ElementCollection;
use config::AppConfig;
use convert::{Conversion, ConversionReport};
use drawio::Document;

/// Returns the default output path for a source document.
///
/// `diagram.pos` becomes `diagram.drawio.xml`, next to the input.
///
/// ```
/// # use std::path::Path;
/// # use posdraw::output_path_for;
/// assert_eq!(output_path_for(Path::new("in/a.pos")), Path::new("in/a.drawio.xml"));
/// ```
pub fn output_path_for(input: &Path) -> PathBuf {
    input.with_extension("drawio.xml")
}

/// What happened to one converted file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    input: PathBuf,
    output: PathBuf,
    strategy: LoadStrategy,
    warning: Option<Diagnostic>,
    report: ConversionReport,
}

impl FileReport {
    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Returns the strategy the document was actually loaded with.
    pub fn strategy(&self) -> LoadStrategy {
        self.strategy
    }

    /// Returns `false` when the document had no element collection.
    pub fn elements_found(&self) -> bool {
        self.warning.is_none()
    }

    /// Returns the warning raised for a document without an element
    /// collection.
    pub fn warning(&self) -> Option<&Diagnostic> {
        self.warning.as_ref()
    }

    pub fn report(&self) -> &ConversionReport {
        &self.report
    }
}

/// Converter for pos documents.
///
/// This provides an API for processing pos documents through loading,
/// mapping and XML output stages.
///
/// # Examples
///
/// ```rust,no_run
/// use posdraw::{Converter, config::AppConfig};
///
/// let converter = Converter::new(AppConfig::default());
///
/// // Load and convert in memory
/// let outcome = converter.load("diagram.pos").expect("Failed to load");
/// let conversion = converter.convert(&outcome.into_collection());
/// let xml = converter.render_xml(conversion.document()).expect("Failed to render");
///
/// // Or run the whole pipeline for a file
/// let report = converter
///     .convert_file("diagram.pos", "diagram.drawio.xml")
///     .expect("Failed to convert");
/// println!("{} nodes", report.report().nodes());
/// ```
#[derive(Debug, Default)]
pub struct Converter {
    config: AppConfig,
}

impl Converter {
    /// Create a new converter with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration in use.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load the element collection of the document at `path`.
    ///
    /// The file is opened once; its size picks the strategy when the
    /// configured strategy is `auto`.
    ///
    /// # Errors
    ///
    /// Returns `PosDrawError::Io` if the file cannot be opened and
    /// `PosDrawError::Parse` if it is not well-formed JSON.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadOutcome, PosDrawError> {
        self.load_path(path.as_ref()).map(|(outcome, _)| outcome)
    }

    fn load_path(&self, path: &Path) -> Result<(LoadOutcome, LoadStrategy), PosDrawError> {
        let mut file = File::open(path)?;
        let size = file.metadata().ok().map(|meta| meta.len());

        let loader_config = self.config.loader();
        let strategy = loader_config
            .strategy()
            .resolve(size, loader_config.subtree_threshold());
        info!(
            path:? = path,
            size:? = size,
            strategy:% = strategy;
            "Loading source document"
        );

        let outcome = strategy
            .loader()
            .load(&mut file)
            .map_err(|err| PosDrawError::new_parse_error(err, path))?;

        Ok((outcome, strategy))
    }

    /// Load an element collection from any reader.
    ///
    /// `LoadStrategy::Auto` streams, since the size of a reader is unknown.
    ///
    /// # Errors
    ///
    /// Returns `PosDrawError::Parse` if the input is not well-formed JSON.
    pub fn load_reader(
        &self,
        reader: &mut dyn Read,
        strategy: LoadStrategy,
    ) -> Result<LoadOutcome, PosDrawError> {
        posdraw_parser::load(reader, strategy)
            .map_err(|err| PosDrawError::new_parse_error(err, "<input>"))
    }

    /// Convert an element collection to a draw.io document.
    pub fn convert(&self, collection: &ElementCollection) -> Conversion {
        debug!(records = collection.len(); "Converting element collection");
        convert::convert(collection, &self.config)
    }

    /// Render a draw.io document to XML text.
    ///
    /// # Errors
    ///
    /// Returns `PosDrawError::Export` if the XML writer fails.
    pub fn render_xml(&self, document: &Document) -> Result<String, PosDrawError> {
        let xml = document.to_xml()?;
        trace!(bytes = xml.len(); "XML rendered");
        Ok(xml)
    }

    /// Convert the document at `input` and write the result to `output`.
    ///
    /// A document without an element collection still produces a valid,
    /// empty draw.io file. The output is written to a temporary file next to
    /// `output` and moved into place once complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be loaded or the output cannot
    /// be written. Skipped elements are not errors; they are listed in the
    /// returned [`FileReport`].
    pub fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<FileReport, PosDrawError> {
        let input = input.as_ref();
        let output = output.as_ref();

        let (outcome, strategy) = self.load_path(input)?;
        let warning = outcome.warning();
        if let Some(warning) = &warning {
            debug!(path:? = input, code:? = warning.code(); "{}", warning.message());
        }

        let (document, report) = self.convert(&outcome.into_collection()).into_parts();
        let xml = self.render_xml(&document)?;
        write_atomically(output, xml.as_bytes())?;

        info!(
            input:? = input,
            output:? = output,
            nodes = report.nodes(),
            connectors = report.connectors();
            "Document converted"
        );

        Ok(FileReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            strategy,
            warning,
            report,
        })
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), PosDrawError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(dir)?;
    temp_file.write_all(contents)?;
    temp_file
        .persist(path)
        .map_err(|err| PosDrawError::Io(err.error))?;
    Ok(())
}
