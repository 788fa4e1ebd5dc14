//! CLI parse: clap types for layout-mirror. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Record a directory tree's content layout and replay it onto another copy
#[derive(Parser, Debug)]
#[command(name = "layout-mirror", version)]
#[command(
    about = "Record a directory tree's content layout and replay it onto another copy",
    long_about = "Analyze a directory tree and record which content lives at which relative \
path. The recording can later rearrange another copy of the tree so that identical files \
have the same relative paths.\n\nDo not run two replays against the same tree at once."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (replaces the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Do not make modifications to the filesystem
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// More output: per-file progress and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Summary format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze DIRECTORY and write its layout to FILE
    Record {
        /// The directory to analyze
        directory: PathBuf,
        /// The file to write the analysis to
        file: PathBuf,
    },
    /// Rearrange DIRECTORY to match the layout recorded in FILE
    Replay {
        /// The directory to rearrange
        directory: PathBuf,
        /// The recorded layout to follow
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
