//! # Marginalia Parser
//!
//! Parsers for the diagram dialects that Marginalia renders from fenced code
//! blocks:
//!
//! - [`flowchart`] - Mermaid `graph`/`flowchart` syntax (```` ```mermaid ````)
//! - [`outline`] - Markmap heading/list outlines (```` ```markmap ````)
//!
//! Both report problems as [`error::Diagnostic`]s with spans relative to the
//! block body, so callers can point at the exact offending text.
//!
//! ## Usage
//!
//! ```
//! # use marginalia_parser::{flowchart, outline, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let chart = flowchart::parse("graph TD\nA --> B")?;
//!     assert_eq!(chart.edges().len(), 1);
//!
//!     let tree = outline::transform("# Topic\n## Branch");
//!     assert_eq!(tree.node_count(), 2);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flowchart;
pub mod outline;
mod span;

pub use span::{Span, Spanned};
