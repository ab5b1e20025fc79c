//! Marginalia - Markdown rendering with embedded diagrams.
//!
//! Renders Markdown into an HTML visual tree. Fences tagged `mermaid` become
//! flowcharts, fences tagged `markmap` become interactive mind maps, and
//! images become thumbnails with a fullscreen lightbox.

pub mod config;
pub mod diagram;
pub mod markdown;
pub mod media;
pub mod mindmap;
pub mod shell;
pub mod widget;

mod error;

pub use marginalia_core::{color, geometry, html, theme};

pub use error::{MarginaliaError, RenderError};

use log::{debug, info};

use marginalia_core::theme::DiagramTheme;

use config::AppConfig;
use markdown::{BlockReport, MarkdownRenderer, RenderRules, VisualTree};

/// Builder for rendering Marginalia documents.
///
/// # Examples
///
/// ```rust
/// use marginalia::{DocumentBuilder, config::AppConfig};
///
/// let builder = DocumentBuilder::new(AppConfig::default());
///
/// let tree = builder
///     .render("# Notes\n\n```mermaid\ngraph LR\nA --> B\n```\n")
///     .expect("Failed to render");
/// assert_eq!(tree.blocks().len(), 2);
///
/// let page = builder.render_page("Notes", "# Notes").expect("Failed to render");
/// assert!(page.starts_with("<!DOCTYPE html>"));
/// ```
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    renderer: MarkdownRenderer,
}

impl DocumentBuilder {
    /// Create a new document builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self {
            renderer: MarkdownRenderer::new(config),
        }
    }

    /// Replace the render rules used for every node.
    pub fn with_rules(mut self, rules: RenderRules) -> Self {
        self.renderer = self.renderer.with_rules(rules);
        self
    }

    pub fn config(&self) -> &AppConfig {
        self.renderer.config()
    }

    /// Install the configured theme for every diagram rendered by this
    /// process.
    ///
    /// # Errors
    ///
    /// Returns `MarginaliaError::Config` when a theme variable is not a valid
    /// color, or when a theme was already installed or used.
    pub fn install_theme(&self) -> Result<(), MarginaliaError> {
        let theme = self
            .config()
            .theme()
            .to_theme()
            .map_err(MarginaliaError::Config)?;
        DiagramTheme::install(theme).map_err(|err| MarginaliaError::Config(err.to_string()))?;
        debug!("Diagram theme installed");
        Ok(())
    }

    /// Render a document into its visual tree.
    ///
    /// # Errors
    ///
    /// Returns `MarginaliaError::Markdown` when the document is structurally
    /// malformed. Diagram failures are rendered as error cards instead.
    pub fn render(&self, document: &str) -> Result<VisualTree, MarginaliaError> {
        self.renderer.render(document)
    }

    /// Render a document into a standalone HTML page.
    ///
    /// # Errors
    ///
    /// See [`DocumentBuilder::render`].
    pub fn render_page(&self, title: &str, document: &str) -> Result<String, MarginaliaError> {
        let tree = self.render(document)?;
        let page = shell::page(title, &tree.to_markup());
        info!(title = title, bytes = page.len(); "Page rendered");
        Ok(page)
    }

    /// Run every diagram and mind-map block through its engine.
    ///
    /// # Errors
    ///
    /// Returns `MarginaliaError::Markdown` when the document is structurally
    /// malformed.
    pub fn check(&self, document: &str) -> Result<Vec<BlockReport>, MarginaliaError> {
        self.renderer.check(document)
    }
}
