//! Folds parsed statements into a validated [`Flowchart`].

use indexmap::IndexMap;
use log::trace;

use marginalia_core::color::Color;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    flowchart::{
        parser::{Link, NodeRef, Statement, StyleProp},
        types::{Direction, FlowEdge, FlowNode, Flowchart, NodeStyle, Subgraph},
    },
    span::{Span, Spanned},
};

/// Accumulates statements in source order.
///
/// Class and style resolution happen in [`FlowchartBuilder::finish`] because
/// `classDef` may appear after the nodes that use it.
pub(crate) struct FlowchartBuilder {
    chart: Flowchart,
    open_subgraphs: Vec<usize>,
    class_uses: Vec<(Spanned<String>, Spanned<String>)>,
    style_overrides: Vec<(Spanned<String>, NodeStyle)>,
}

impl FlowchartBuilder {
    pub(crate) fn new(direction: Direction) -> Self {
        Self {
            chart: Flowchart {
                direction,
                ..Flowchart::default()
            },
            open_subgraphs: Vec::new(),
            class_uses: Vec::new(),
            style_overrides: Vec::new(),
        }
    }

    pub(crate) fn apply(&mut self, statement: Statement, collector: &mut DiagnosticCollector) {
        trace!(statement:? = statement; "Applying flowchart statement");
        match statement {
            Statement::Chain { first, links } => self.add_chain(first, links),
            Statement::SubgraphStart { id, title } => {
                let index = self.chart.subgraphs.len();
                let parent = self.open_subgraphs.last().copied();
                self.chart
                    .subgraphs
                    .push(Subgraph::new(id.inner().clone(), title, parent, id.span()));
                self.open_subgraphs.push(index);
            }
            Statement::End(span) => {
                if self.open_subgraphs.pop().is_none() {
                    collector.emit(
                        Diagnostic::error("`end` without an open subgraph")
                            .with_code(ErrorCode::E103)
                            .with_label(span, "nothing to close")
                            .with_help("remove this `end` or add a matching `subgraph`"),
                    );
                }
            }
            Statement::ClassDef { names, props } => {
                let style = resolve_style(&props, collector);
                for name in names {
                    let merged = self
                        .chart
                        .class_defs
                        .get(name.inner())
                        .copied()
                        .unwrap_or_default()
                        .merged_with(&style);
                    self.chart.class_defs.insert(name.into_inner(), merged);
                }
            }
            Statement::Class { nodes, class } => {
                for node in nodes {
                    self.ensure_node(&node);
                    self.class_uses.push((node, class.clone()));
                }
            }
            Statement::Style { node, props } => {
                let style = resolve_style(&props, collector);
                self.ensure_node(&node);
                self.style_overrides.push((node, style));
            }
            Statement::Ignored { keyword, span } => {
                collector.emit(
                    Diagnostic::warning(format!("`{keyword}` statements are not supported"))
                        .with_label(span, "ignored"),
                );
            }
        }
    }

    /// Validates cross-statement references and returns the finished chart.
    pub(crate) fn finish(
        mut self,
        header: Span,
        collector: &mut DiagnosticCollector,
    ) -> Flowchart {
        for &index in self.open_subgraphs.iter().rev() {
            let subgraph = &self.chart.subgraphs[index];
            collector.emit(
                Diagnostic::error(format!("subgraph `{}` is never closed", subgraph.id()))
                    .with_code(ErrorCode::E103)
                    .with_label(subgraph.span(), "opened here")
                    .with_help("add `end` after the subgraph's contents"),
            );
        }

        if self.chart.nodes.is_empty() {
            collector.emit(
                Diagnostic::error("flowchart has no nodes")
                    .with_code(ErrorCode::E200)
                    .with_label(header, "diagram declared here")
                    .with_help("add at least one node, e.g. `A --> B`"),
            );
        }

        for (node, class) in &self.class_uses {
            if !self.chart.class_defs.contains_key(class.inner()) {
                collector.emit(
                    Diagnostic::warning(format!("class `{}` is not defined", class.inner()))
                        .with_code(ErrorCode::E201)
                        .with_label(class.span(), "no matching `classDef`")
                        .with_help(format!(
                            "declare it with `classDef {} fill:#f96` to style it",
                            class.inner()
                        )),
                );
            }
            if let Some(flow_node) = self.chart.nodes.get_mut(node.inner()) {
                flow_node.add_class(class.inner());
            }
        }

        let class_defs: &IndexMap<String, NodeStyle> = &self.chart.class_defs;
        for flow_node in self.chart.nodes.values_mut() {
            let style = flow_node
                .classes()
                .iter()
                .filter_map(|class| class_defs.get(class))
                .fold(NodeStyle::default(), |acc, style| acc.merged_with(style));
            flow_node.set_style(style);
        }

        for (node, style) in &self.style_overrides {
            if let Some(flow_node) = self.chart.nodes.get_mut(node.inner()) {
                let merged = flow_node.style().merged_with(style);
                flow_node.set_style(merged);
            }
        }

        self.chart
    }

    fn add_chain(&mut self, first: Vec<NodeRef>, links: Vec<Link>) {
        for node in &first {
            self.declare(node);
        }

        let mut sources = first;
        for link in links {
            for target in &link.targets {
                self.declare(target);
            }
            let op = link.op.inner();
            for source in &sources {
                for target in &link.targets {
                    self.chart.edges.push(FlowEdge::new(
                        source.id.inner(),
                        target.id.inner(),
                        op.label.clone(),
                        op.line,
                        (op.tail, op.head),
                        source.id.span().union(target.id.span()),
                    ));
                }
            }
            sources = link.targets;
        }
    }

    /// Records a node mention, applying a shape and `:::class` if present.
    fn declare(&mut self, node: &NodeRef) {
        self.ensure_node(&node.id);
        if let Some(flow_node) = self.chart.nodes.get_mut(node.id.inner()) {
            if let Some((shape, label)) = &node.shape {
                flow_node.set_shape(*shape, label.clone());
            }
        }
        if let Some(class) = &node.class {
            self.class_uses.push((node.id.clone(), class.clone()));
        }
    }

    /// Creates the node on first mention and assigns it to the innermost open subgraph.
    fn ensure_node(&mut self, id: &Spanned<String>) {
        if self.chart.nodes.contains_key(id.inner()) {
            return;
        }
        self.chart
            .nodes
            .insert(id.inner().clone(), FlowNode::new(id.inner(), id.span()));
        if let Some(&index) = self.open_subgraphs.last() {
            self.chart.subgraphs[index].add_member(id.inner());
        }
    }
}

/// Validates `key:value` pairs into a [`NodeStyle`].
///
/// Invalid values are errors; unknown properties only warn.
fn resolve_style(props: &[StyleProp], collector: &mut DiagnosticCollector) -> NodeStyle {
    let mut style = NodeStyle::default();

    for prop in props {
        let value = prop.value.inner();
        let invalid = |what: &str| {
            Diagnostic::error(format!("invalid {what} `{value}` for `{}`", prop.key.inner()))
                .with_code(ErrorCode::E202)
                .with_label(prop.value.span(), format!("expected a {what}"))
        };

        match prop.key.inner().as_str() {
            "fill" | "stroke" | "color" => match Color::new(value) {
                Ok(color) => match prop.key.inner().as_str() {
                    "fill" => style.set_fill(color),
                    "stroke" => style.set_stroke(color),
                    _ => style.set_color(color),
                },
                Err(_) => collector.emit(invalid("color")),
            },
            "stroke-width" => match value.trim_end_matches("px").trim().parse::<f32>() {
                Ok(width) if width >= 0.0 => style.set_stroke_width(width),
                _ => collector.emit(invalid("width")),
            },
            key => collector.emit(
                Diagnostic::warning(format!("style property `{key}` is not supported"))
                    .with_code(ErrorCode::E202)
                    .with_label(prop.key.span(), "ignored"),
            ),
        }
    }

    style
}
