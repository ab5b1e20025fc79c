use std::fmt;

use crate::error::Diagnostic;

/// Failure of a parse: one or more error diagnostics, possibly interleaved
/// with warnings collected before the first error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterates over the error-severity diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity().is_error())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.errors();
        if let Some(first) = errors.next() {
            write!(f, "{first}")?;
            let rest = errors.count();
            if rest > 0 {
                write!(f, " (+{rest} more)")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}

/// Accumulates diagnostics so a pass can report every problem it finds
/// instead of stopping at the first.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns the warnings on success, or every diagnostic when any error
    /// was emitted.
    pub(crate) fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_display_counts_only_errors() {
        let err = ParseError::new(vec![
            Diagnostic::warning("`click` is ignored"),
            Diagnostic::error("first").with_code(ErrorCode::E100),
            Diagnostic::error("second"),
        ]);
        assert_eq!(err.to_string(), "error[E100]: first (+1 more)");
    }

    #[test]
    fn test_display_single() {
        let err: ParseError = Diagnostic::error("diagram is empty").into();
        assert_eq!(err.to_string(), "error: diagram is empty");
    }

    #[test]
    fn test_collector_warnings_survive_success() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("`linkStyle` is ignored"));

        let warnings = collector.finish().expect("no errors emitted");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_collector_error_returns_everything() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("w"));
        collector.emit(Diagnostic::error("e1"));
        collector.emit(Diagnostic::error("e2"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
        assert_eq!(err.errors().count(), 2);
    }
}
