//! CLI parse: clap types for Proctor. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Proctor CLI - Test harness runner for grading program submissions
#[derive(Parser)]
#[command(name = "proctor")]
#[command(about = "Run grading-harness suites against program submissions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable all harness diagnostics
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every context in a suite, or one selected context
    Run {
        /// Suite manifest path (JSON)
        #[arg(long)]
        suite: PathBuf,

        /// Run only the context with this id
        #[arg(long)]
        context: Option<String>,

        /// Directory for the capture logs (default: from config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Program backing entry-point contexts
        #[arg(long)]
        submission: Option<PathBuf>,
    },
    /// List the contexts defined in a suite
    List {
        /// Suite manifest path (JSON)
        #[arg(long)]
        suite: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
