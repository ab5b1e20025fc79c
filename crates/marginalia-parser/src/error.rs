//! Diagnostics produced while parsing diagram blocks.
//!
//! Every problem found in a `mermaid` or `markmap` block is reported as a
//! [`Diagnostic`]: a severity, an optional [`ErrorCode`], a message, labelled
//! spans into the block source and an optional help line. A failed parse
//! returns all collected diagnostics wrapped in a [`ParseError`].
//!
//! ```
//! # use marginalia_parser::error::{Diagnostic, ErrorCode};
//! # use marginalia_parser::Span;
//! let diag = Diagnostic::error("invalid color `reddish` for `fill`")
//!     .with_code(ErrorCode::E202)
//!     .with_label(Span::new(24..31), "expected a color")
//!     .with_help("use a name such as `red` or a hex value such as `#f00`");
//!
//! assert_eq!(diag.to_string(), "error[E202]: invalid color `reddish` for `fill`");
//! ```

mod diagnostic;
mod error_code;
mod parse_error;

pub(crate) use parse_error::DiagnosticCollector;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
