//! Error codes, grouped by the phase that reports them:
//! `E0xx` lexical, `E1xx` syntax, `E2xx` validation.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A node label or quoted string was opened but never closed.
    E001,

    /// A character that cannot start any token at this position.
    E002,

    /// The parser found a token it did not expect.
    E100,

    /// The input ended in the middle of a construct, such as an edge with
    /// no target node.
    E101,

    /// The block does not start with a supported diagram header.
    ///
    /// Only `graph` and `flowchart` are understood.
    E102,

    /// A `subgraph` without a matching `end`, or an `end` with no open
    /// subgraph.
    E103,

    /// The diagram contains nothing to draw.
    E200,

    /// `class` or `:::` refers to a name never declared with `classDef`.
    /// Reported as a warning; the class may still be styled by page CSS.
    E201,

    /// A `style` or `classDef` property is unknown or has an invalid value.
    E202,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Short description of the code, suitable for a diagnostic index.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unterminated label",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "unsupported diagram type",
            ErrorCode::E103 => "unbalanced subgraph",
            ErrorCode::E200 => "empty diagram",
            ErrorCode::E201 => "undefined class",
            ErrorCode::E202 => "invalid style property",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
