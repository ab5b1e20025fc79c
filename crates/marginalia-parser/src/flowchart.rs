//! Mermaid flowchart dialect.
//!
//! [`parse`] turns the body of a ```` ```mermaid ```` block into a
//! [`Flowchart`]: nodes in order of first appearance, edges, subgraphs and
//! resolved per-node styles. See [`parser`] for the accepted grammar.

mod builder;
mod parser;
mod types;

pub use types::{
    ArrowHead, Direction, FlowEdge, FlowNode, Flowchart, LineStyle, NodeShape, NodeStyle,
    Subgraph,
};

use log::{debug, trace};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    flowchart::builder::FlowchartBuilder,
    span::Span,
};

/// Parses a flowchart.
///
/// All statement errors are collected before failing, so one pass reports
/// every broken line. Warnings for ignored statements are kept on the result.
///
/// # Errors
///
/// Returns a [`ParseError`] with one diagnostic per problem.
///
/// # Example
///
/// ```
/// # use marginalia_parser::flowchart;
/// let chart = flowchart::parse("graph LR\nA[Start] -->|go| B{Done?}").unwrap();
/// assert_eq!(chart.nodes().count(), 2);
/// assert_eq!(chart.edges()[0].label(), Some("go"));
/// ```
pub fn parse(source: &str) -> Result<Flowchart, ParseError> {
    let statements = parser::split_statements(source)?;

    let Some((header, body)) = statements.split_first() else {
        return Err(Diagnostic::error("diagram is empty")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(0..source.len()), "no content")
            .with_help("start the block with `graph TD`")
            .into());
    };

    let direction = match parser::parse_header(header)? {
        Some(keyword) => Direction::from_keyword(keyword.inner()).ok_or_else(|| {
            Diagnostic::error(format!("unknown direction `{}`", keyword.inner()))
                .with_code(ErrorCode::E100)
                .with_label(keyword.span(), "direction")
                .with_help("use one of `TD`, `TB`, `BT`, `LR` or `RL`")
        })?,
        None => Direction::default(),
    };
    debug!(direction:% = direction, statements = body.len(); "Parsing flowchart");

    let mut collector = DiagnosticCollector::new();
    let mut builder = FlowchartBuilder::new(direction);
    for raw in body {
        match parser::parse_statement(raw) {
            Ok(statement) => builder.apply(statement, &mut collector),
            Err(diagnostic) => collector.emit(diagnostic),
        }
    }

    let mut chart = builder.finish(header.span(), &mut collector);
    chart.warnings = collector.finish()?;
    trace!(chart:? = chart; "Parsed flowchart");

    Ok(chart)
}
