//! Error types for Marginalia operations.
//!
//! [`MarginaliaError`] is what the document-level entry points return. A
//! [`RenderError`] belongs to a single diagram or mind-map block: block
//! components catch it and show an error card, so it only reaches callers
//! through [`MarginaliaError::Render`] when they invoke an engine directly.

use std::io;

use thiserror::Error;

use marginalia_parser::error::ParseError;

/// The main error type for Marginalia operations.
#[derive(Debug, Error)]
pub enum MarginaliaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The Markdown event stream was structurally malformed.
    #[error("Markdown error: {0}")]
    Markdown(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Failure to turn one diagram or mind-map block into an artifact.
///
/// # Diagnostic Variants
///
/// `Syntax` keeps the block source next to the structured diagnostics so
/// spans can be reported against it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("{err}")]
    Syntax { err: ParseError, src: String },

    #[error("Layout error: {0}")]
    Layout(String),
}

impl RenderError {
    /// Create a new `Syntax` error with the associated block source.
    pub fn new_syntax_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Syntax {
            err,
            src: src.into(),
        }
    }

    /// Returns the parse diagnostics, if this is a syntax failure.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Syntax { err, .. } => Some(err),
            Self::Layout(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use marginalia_parser::{
        Span,
        error::{Diagnostic, ErrorCode},
    };

    use super::*;

    #[test]
    fn test_syntax_error_displays_first_diagnostic() {
        let diagnostic =
            Diagnostic::error("unexpected end of input").with_code(ErrorCode::E101).with_label(
                Span::new(10..12),
                "edge has no target",
            );
        let err = RenderError::new_syntax_error(ParseError::from(diagnostic), "graph TD\nA--");

        assert!(err.to_string().contains("unexpected end of input"));
        assert!(err.parse_error().is_some());
    }

    #[test]
    fn test_render_error_is_transparent_in_top_level_error() {
        let err = MarginaliaError::from(RenderError::Layout("no ranks".to_string()));
        assert_eq!(err.to_string(), "Layout error: no ranks");
    }
}
