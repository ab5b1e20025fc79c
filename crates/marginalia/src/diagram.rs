//! Flowchart rendering for `mermaid` code fences.
//!
//! [`DiagramEngine`] turns flowchart source into an SVG [`DiagramArtifact`]:
//! the source is parsed by [`marginalia_parser::flowchart`], laid out in
//! ranks and exported with render-target-scoped ids. [`DiagramBlock`] is the
//! per-fence component holding the committed artifact and the view state
//! around it.
//!
//! ```
//! use marginalia::diagram::DiagramEngine;
//!
//! let engine = DiagramEngine::default();
//! let artifact = engine.render("mermaid-0", "graph TD\nA-->B").unwrap();
//! assert!(artifact.svg().starts_with("<svg"));
//!
//! assert!(engine.render("mermaid-1", "graph TD\nA--").is_err());
//! ```

mod block;
mod export;
mod layout;
mod sequencer;

pub use block::{DiagramBlock, RenderRequest};
pub use sequencer::{RenderSequencer, Ticket};

use log::{debug, info};

use marginalia_core::{
    draw::TextDefinition,
    geometry::Size,
    html::Markup,
    theme::DiagramTheme,
};
use marginalia_parser::flowchart;

use crate::{config::LayoutConfig, error::RenderError};

/// A rendered flowchart.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramArtifact {
    target_id: String,
    svg: String,
    size: Size,
}

impl DiagramArtifact {
    /// The render target this artifact was produced for.
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// The SVG document.
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Intrinsic drawing size in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn to_markup(&self) -> Markup {
        Markup::raw(self.svg.as_str())
    }
}

/// Parses, lays out and exports flowcharts.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramEngine {
    layout: LayoutConfig,
}

impl DiagramEngine {
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Renders `source` for the render target `target_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Syntax`] for invalid flowchart source and
    /// [`RenderError::Layout`] if no layout could be computed.
    pub fn render(&self, target_id: &str, source: &str) -> Result<DiagramArtifact, RenderError> {
        info!(target_id; "Rendering flowchart");

        let chart =
            flowchart::parse(source).map_err(|err| RenderError::new_syntax_error(err, source))?;
        for warning in chart.warnings() {
            debug!(target_id, warning:% = warning; "Flowchart warning");
        }

        let theme = DiagramTheme::current();
        let text = theme_text(theme);
        let layout = layout::layout(&chart, &self.layout, &text)?;
        let svg = export::export(target_id, &chart, &layout, theme, &text);

        debug!(target_id, bytes = svg.len(); "Flowchart rendered");
        Ok(DiagramArtifact {
            target_id: target_id.to_string(),
            svg,
            size: layout.size(),
        })
    }
}

/// Label style for diagram text in the given theme.
pub(crate) fn theme_text(theme: &DiagramTheme) -> TextDefinition {
    let mut text = TextDefinition::new();
    text.set_font_family(theme.font_family());
    text.set_font_size(theme.font_size());
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_records_target_and_size() {
        let artifact = DiagramEngine::default()
            .render("mermaid-7", "graph LR\nA[Start] --> B{Check}")
            .unwrap();
        assert_eq!(artifact.target_id(), "mermaid-7");
        assert!(artifact.size().width() > artifact.size().height());
        assert_eq!(artifact.to_markup().to_html(), artifact.svg());
    }

    #[test]
    fn test_syntax_error_keeps_source() {
        let err = DiagramEngine::default()
            .render("mermaid-0", "graph TD\nA--")
            .unwrap_err();
        match err {
            RenderError::Syntax { src, err } => {
                assert_eq!(src, "graph TD\nA--");
                assert!(err.errors().next().is_some());
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_diagram_kind() {
        let err = DiagramEngine::default()
            .render("mermaid-0", "sequenceDiagram\nA->>B: hi")
            .unwrap_err();
        assert!(matches!(err, RenderError::Syntax { .. }));
    }
}
