//! Command-line argument definitions for the Marginalia CLI.
//!
//! [`Args`] is parsed from the command line using [`clap`]. Arguments select
//! the document to render, where the page is written, the configuration
//! file, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Marginalia renderer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input Markdown file
    #[arg(help = "Path to the input file", required_unless_present = "sample")]
    pub input: Option<String>,

    /// Path to the output HTML file
    #[arg(short, long, default_value = "out.html")]
    pub output: String,

    /// Path to configuration file (TOML). Without it `.marginalia.toml` beside
    /// the input is tried, then the working and user config directories
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Render the bundled sample document instead of a file
    #[arg(long, conflicts_with = "input")]
    pub sample: bool,

    /// Validate diagram and mind-map blocks without writing output
    #[arg(long)]
    pub check: bool,
}
