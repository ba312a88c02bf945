//! Command-line argument definitions for the posdraw CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the configuration file and the
//! logging verbosity; each subcommand carries its own inputs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use posdraw::LoadStrategy;

/// Command-line arguments for the posdraw converter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert pos documents to draw.io XML
    Convert {
        /// Files or directories to convert (default: *.pos in the current directory)
        inputs: Vec<PathBuf>,

        /// Output file, only valid with a single input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Loading strategy (full, subtree, auto)
        #[arg(long)]
        strategy: Option<LoadStrategy>,
    },

    /// Summarize the elements of a pos document
    Inspect {
        /// Path to the pos document
        input: PathBuf,

        /// Loading strategy (full, subtree, auto)
        #[arg(long)]
        strategy: Option<LoadStrategy>,
    },

    /// Count the cells of a generated draw.io file
    Check {
        /// Path to the draw.io XML file
        input: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_convert_without_inputs() {
        let args = Args::try_parse_from(["posdraw", "convert"]).expect("Failed to parse");

        assert_eq!(args.log_level, "info");
        match args.command {
            Command::Convert {
                inputs,
                output,
                strategy,
            } => {
                assert!(inputs.is_empty());
                assert!(output.is_none());
                assert!(strategy.is_none());
            }
            other => panic!("Expected convert, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "posdraw",
            "inspect",
            "a.pos",
            "--strategy",
            "subtree",
            "--log-level",
            "debug",
            "--config",
            "cfg.toml",
        ])
        .expect("Failed to parse");

        assert_eq!(args.log_level, "debug");
        assert_eq!(args.config, Some(PathBuf::from("cfg.toml")));
        assert!(matches!(
            args.command,
            Command::Inspect {
                strategy: Some(LoadStrategy::Subtree),
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        assert!(Args::try_parse_from(["posdraw", "convert", "--strategy", "lazy"]).is_err());
    }
}
