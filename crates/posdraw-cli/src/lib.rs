//! CLI logic for the posdraw converter.
//!
//! This module contains the subcommand drivers: batch conversion, source
//! inspection and output checking.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{error, info, warn};

use error_adapter::DiagnosticAdapter;
use posdraw::{
    Converter, LoadOutcome, LoadStrategy, PosDrawError, check::DocumentSummary,
    config::AppConfig, inspect::SourceSummary, output_path_for,
};

/// File extension of pos source documents.
const SOURCE_EXTENSION: &str = "pos";

/// Run the posdraw CLI application, printing results to stdout.
///
/// # Errors
///
/// Returns `PosDrawError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - Parsing errors of a single inspected document
/// - A batch in which at least one document failed
pub fn run(args: &Args) -> Result<(), PosDrawError> {
    let stdout = io::stdout();
    execute(args, &mut stdout.lock())
}

/// Run the posdraw CLI application, printing results to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn execute(args: &Args, out: &mut impl Write) -> Result<(), PosDrawError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Convert {
            inputs,
            output,
            strategy,
        } => convert(
            with_strategy(app_config, *strategy),
            inputs,
            output.as_deref(),
            out,
        ),
        Command::Inspect { input, strategy } => {
            inspect(with_strategy(app_config, *strategy), input, out)
        }
        Command::Check { input } => check(input, out),
    }
}

fn with_strategy(config: AppConfig, strategy: Option<LoadStrategy>) -> AppConfig {
    match strategy {
        Some(strategy) => config.with_strategy(strategy),
        None => config,
    }
}

/// Convert every discovered document, continuing past failures.
fn convert(
    config: AppConfig,
    inputs: &[PathBuf],
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<(), PosDrawError> {
    let documents = discover_documents(inputs)?;

    if output.is_some() && documents.len() != 1 {
        return Err(PosDrawError::Config(format!(
            "--output needs exactly one input document, found {}",
            documents.len()
        )));
    }

    if documents.is_empty() {
        warn!("No .pos documents found");
        return Ok(());
    }

    let jobs = plan_targets(documents, output)?;
    let converter = Converter::new(config);
    let total = jobs.len();
    let mut failed = 0;

    for (input, target) in &jobs {
        info!(input:? = input, output:? = target; "Processing document");

        match converter.convert_file(input, target) {
            Ok(file_report) => {
                if let Some(warning) = file_report.warning() {
                    warn!("{}", error_adapter::render_warning(warning, input));
                }
                let report = file_report.report();
                writeln!(
                    out,
                    "{} -> {} ({} nodes, {} connectors, {} skipped)",
                    input.display(),
                    target.display(),
                    report.nodes(),
                    report.connectors(),
                    report.skipped().len()
                )?;
            }
            Err(err) => {
                failed += 1;
                error!("{}", error_adapter::render(&err));
            }
        }
    }

    if failed > 0 {
        return Err(PosDrawError::Batch { failed, total });
    }

    info!(total; "Batch completed");
    Ok(())
}

fn inspect(config: AppConfig, input: &Path, out: &mut impl Write) -> Result<(), PosDrawError> {
    let converter = Converter::new(config);

    let outcome = converter.load(input)?;

    if let LoadOutcome::Found(collection) = &outcome {
        write!(out, "{}", SourceSummary::from_collection(collection))?;
    }
    if let Some(warning) = outcome.warning() {
        writeln!(out, "{}", DiagnosticAdapter::new(&warning, input))?;
    }
    Ok(())
}

/// Pairs every document with its output path.
///
/// Fails before anything is written when two documents resolve to the same
/// output path.
fn plan_targets(
    documents: Vec<PathBuf>,
    output: Option<&Path>,
) -> Result<Vec<(PathBuf, PathBuf)>, PosDrawError> {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut jobs = Vec::with_capacity(documents.len());

    for input in documents {
        let target = match output {
            Some(path) => path.to_path_buf(),
            None => output_path_for(&input),
        };
        if let Some(previous) = claimed.insert(target.clone(), input.clone()) {
            return Err(PosDrawError::Config(format!(
                "{} and {} would both be written to {}",
                previous.display(),
                input.display(),
                target.display()
            )));
        }
        jobs.push((input, target));
    }
    Ok(jobs)
}

fn check(input: &Path, out: &mut impl Write) -> Result<(), PosDrawError> {
    let xml = fs::read_to_string(input)?;
    let summary = DocumentSummary::from_xml(&xml)?;

    write!(out, "{summary}")?;
    Ok(())
}

/// Expands the command-line inputs into a list of source documents.
///
/// No inputs means the current directory. Directories contribute their
/// `.pos` files in sorted order; files are taken as given.
fn discover_documents(inputs: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
    if inputs.is_empty() {
        return source_files_in(Path::new("."));
    }

    let mut documents = Vec::new();
    for input in inputs {
        if input.is_dir() {
            documents.extend(source_files_in(input)?);
        } else {
            documents.push(input.clone());
        }
    }
    Ok(documents)
}

fn source_files_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
