//! CLI logic for the Marginalia renderer.
//!
//! Renders a Markdown file, or the bundled sample, into a standalone HTML
//! page. With `--check` it only runs the diagram and mind-map blocks through
//! their engines and reports every failure.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path};

use log::{info, warn};
use thiserror::Error;

use marginalia::{
    DocumentBuilder, MarginaliaError,
    markdown::BlockReport,
    shell::SAMPLE_DOCUMENT,
};

const SAMPLE_TITLE: &str = "Marginalia";

/// Errors reported by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Marginalia(#[from] MarginaliaError),

    #[error("{} of {total} block(s) failed to render", failures.len())]
    Check {
        failures: Vec<BlockReport>,
        total: usize,
    },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Marginalia(err.into())
    }
}

/// Run the Marginalia CLI application
///
/// Loads the configuration (an explicit `--config`, or the first one found
/// beside the input document or in the usual places), installs its theme for
/// the process, and then renders or checks the document as [`execute`] does.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors, including invalid theme colors
/// - Structurally malformed Markdown
/// - Failed blocks in `--check` mode
pub fn run(args: &Args) -> Result<(), CliError> {
    let document = args.input.as_deref().filter(|_| !args.sample).map(Path::new);
    let app_config = config::load_config(args.config.as_ref(), document)?;
    let builder = DocumentBuilder::new(app_config);
    builder.install_theme()?;
    execute(args, &builder)
}

/// Render or check the document selected by `args` with `builder`.
///
/// # Errors
///
/// See [`run`].
pub fn execute(args: &Args, builder: &DocumentBuilder) -> Result<(), CliError> {
    let (document, title) = read_document(args)?;

    if args.check {
        return check(builder, &document);
    }

    info!(output_path = args.output; "Rendering document");
    let page = builder.render_page(&title, &document)?;
    fs::write(&args.output, page)?;
    info!(output_file = args.output; "HTML exported successfully");

    Ok(())
}

fn read_document(args: &Args) -> Result<(String, String), CliError> {
    match args.input.as_deref() {
        Some(input) if !args.sample => {
            info!(input_path = input; "Reading document");
            let document = fs::read_to_string(input)?;
            let title = Path::new(input)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| SAMPLE_TITLE.to_string());
            Ok((document, title))
        }
        _ => {
            info!("Using the bundled sample document");
            Ok((SAMPLE_DOCUMENT.to_string(), SAMPLE_TITLE.to_string()))
        }
    }
}

fn check(builder: &DocumentBuilder, document: &str) -> Result<(), CliError> {
    let reports = builder.check(document)?;
    let total = reports.len();

    let failures: Vec<BlockReport> = reports
        .into_iter()
        .filter(|report| {
            if let Err(err) = report.outcome() {
                warn!(target_id = report.target_id(), err:% = err; "Block failed");
                return true;
            }
            info!(target_id = report.target_id(); "Block ok");
            false
        })
        .collect();

    if failures.is_empty() {
        info!(blocks = total; "All blocks rendered");
        return Ok(());
    }
    Err(CliError::Check { failures, total })
}
