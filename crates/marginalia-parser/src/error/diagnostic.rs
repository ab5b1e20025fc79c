use std::fmt;

use crate::{error::ErrorCode, span::Span};

/// How serious a diagnostic is.
///
/// Errors abort the parse; warnings are carried alongside a successful
/// result (for example on ignored `linkStyle` statements).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A message attached to a span of the block source.
///
/// The primary label points at the offending text; secondary labels add
/// context such as "subgraph opened here".
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

/// A single error or warning with source locations.
///
/// Rendered by the CLI roughly as:
///
/// ```text
/// error[E101]: edge is missing its target node
///   |
/// 2 | A--
///   |  ^^ edge starts here
///   |
///   = help: complete the edge, e.g. `A --> B`
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Span of the first primary label, if any.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::span)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Moves every label `offset` bytes to the right.
    ///
    /// Used when a diagnostic was produced against a slice of a larger source.
    pub fn shifted(mut self, offset: usize) -> Self {
        for label in &mut self.labels {
            label.span = label.span.shift(offset);
        }
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_without_code_display() {
        let diag = Diagnostic::warning("`linkStyle` is ignored");
        assert!(diag.severity().is_warning());
        assert_eq!(diag.to_string(), "warning: `linkStyle` is ignored");
    }

    #[test]
    fn test_labels_keep_order_and_kind() {
        let diag = Diagnostic::error("unbalanced subgraph")
            .with_code(ErrorCode::E103)
            .with_label(Span::new(40..43), "`end` here")
            .with_secondary_label(Span::new(0..8), "no open subgraph");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.primary_span(), Some(Span::new(40..43)));
    }

    #[test]
    fn test_shifted_moves_all_labels() {
        let diag = Diagnostic::error("x")
            .with_label(Span::new(1..2), "a")
            .with_secondary_label(Span::new(3..5), "b")
            .shifted(10);

        assert_eq!(diag.labels()[0].span(), Span::new(11..12));
        assert_eq!(diag.labels()[1].span(), Span::new(13..15));
    }

    #[test]
    fn test_help_is_optional() {
        assert!(Diagnostic::error("x").help().is_none());
        let diag = Diagnostic::error("x").with_help("try `graph TD`");
        assert_eq!(diag.help(), Some("try `graph TD`"));
    }
}
