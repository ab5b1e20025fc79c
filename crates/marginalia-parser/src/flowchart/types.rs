//! The parsed, validated flowchart model handed to the layout engine.

use std::fmt;

use indexmap::IndexMap;

use marginalia_core::color::Color;

use crate::{error::Diagnostic, span::Span};

/// Flow direction of the diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `TD` or `TB`
    #[default]
    TopDown,
    /// `BT`
    BottomUp,
    /// `LR`
    LeftRight,
    /// `RL`
    RightLeft,
}

impl Direction {
    /// Parses a Mermaid direction keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "TD" | "TB" => Some(Self::TopDown),
            "BT" => Some(Self::BottomUp),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }

    /// Returns true when ranks advance along the x axis.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::LeftRight | Self::RightLeft)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = match self {
            Self::TopDown => "TD",
            Self::BottomUp => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        };
        f.write_str(keyword)
    }
}

/// Outline drawn around a node label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// `A[text]`
    #[default]
    Rect,
    /// `A(text)`
    Rounded,
    /// `A([text])`
    Stadium,
    /// `A[[text]]`
    Subroutine,
    /// `A[(text)]`
    Cylinder,
    /// `A((text))`
    Circle,
    /// `A{text}`
    Diamond,
    /// `A{{text}}`
    Hexagon,
    /// `A>text]`
    Flag,
}

/// Stroke pattern of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineStyle {
    #[default]
    Solid,
    Dotted,
    Thick,
}

/// Marker at one end of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArrowHead {
    #[default]
    None,
    Arrow,
    Circle,
    Cross,
}

/// Visual overrides from `style` and `classDef` statements.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodeStyle {
    fill: Option<Color>,
    stroke: Option<Color>,
    color: Option<Color>,
    stroke_width: Option<f32>,
}

impl NodeStyle {
    pub fn fill(&self) -> Option<Color> {
        self.fill
    }

    pub fn stroke(&self) -> Option<Color> {
        self.stroke
    }

    /// Label text color.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn stroke_width(&self) -> Option<f32> {
        self.stroke_width
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn set_fill(&mut self, color: Color) {
        self.fill = Some(color);
    }

    pub(crate) fn set_stroke(&mut self, color: Color) {
        self.stroke = Some(color);
    }

    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = Some(color);
    }

    pub(crate) fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = Some(width);
    }

    /// Returns `self` with every property set in `other` overriding it.
    pub fn merged_with(self, other: &NodeStyle) -> NodeStyle {
        NodeStyle {
            fill: other.fill.or(self.fill),
            stroke: other.stroke.or(self.stroke),
            color: other.color.or(self.color),
            stroke_width: other.stroke_width.or(self.stroke_width),
        }
    }
}

/// A node of the flowchart.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    id: String,
    label: String,
    shape: NodeShape,
    classes: Vec<String>,
    style: NodeStyle,
    span: Span,
}

impl FlowNode {
    pub(crate) fn new(id: impl Into<String>, span: Span) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            shape: NodeShape::default(),
            classes: Vec::new(),
            style: NodeStyle::default(),
            span,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display text; defaults to the id when the node was never given a label.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    /// Class names in the order they were applied.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Resolved style: class styles in application order, then `style` overrides.
    pub fn style(&self) -> &NodeStyle {
        &self.style
    }

    /// Span of the first mention of this node.
    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn set_shape(&mut self, shape: NodeShape, label: String) {
        self.shape = shape;
        self.label = label;
    }

    pub(crate) fn add_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
    }

    pub(crate) fn set_style(&mut self, style: NodeStyle) {
        self.style = style;
    }
}

/// A directed (or undirected) link between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    from: String,
    to: String,
    label: Option<String>,
    line: LineStyle,
    head: ArrowHead,
    tail: ArrowHead,
    span: Span,
}

impl FlowEdge {
    pub(crate) fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        label: Option<String>,
        line: LineStyle,
        (tail, head): (ArrowHead, ArrowHead),
        span: Span,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label,
            line,
            head,
            tail,
            span,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn line(&self) -> LineStyle {
        self.line
    }

    /// Marker at the `to` end.
    pub fn head(&self) -> ArrowHead {
        self.head
    }

    /// Marker at the `from` end; only set for bidirectional edges like `<-->`.
    pub fn tail(&self) -> ArrowHead {
        self.tail
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// A `subgraph ... end` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    id: String,
    title: String,
    parent: Option<usize>,
    members: Vec<String>,
    span: Span,
}

impl Subgraph {
    pub(crate) fn new(id: String, title: String, parent: Option<usize>, span: Span) -> Self {
        Self {
            id,
            title,
            parent,
            members: Vec::new(),
            span,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Index of the enclosing subgraph in [`Flowchart::subgraphs`].
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Ids of nodes first declared directly inside this subgraph.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn add_member(&mut self, id: &str) {
        if !self.members.iter().any(|m| m == id) {
            self.members.push(id.to_string());
        }
    }
}

/// A parsed flowchart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Flowchart {
    pub(crate) direction: Direction,
    pub(crate) nodes: IndexMap<String, FlowNode>,
    pub(crate) edges: Vec<FlowEdge>,
    pub(crate) subgraphs: Vec<Subgraph>,
    pub(crate) class_defs: IndexMap<String, NodeStyle>,
    pub(crate) warnings: Vec<Diagnostic>,
}

impl Flowchart {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Nodes in order of first appearance.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &FlowNode> {
        self.nodes.values()
    }

    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.get(id)
    }

    /// Position of a node in [`Flowchart::nodes`].
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn subgraphs(&self) -> &[Subgraph] {
        &self.subgraphs
    }

    pub fn class_def(&self, name: &str) -> Option<&NodeStyle> {
        self.class_defs.get(name)
    }

    /// Warnings for statements that were accepted but ignored.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Every node id inside subgraph `index`, including nested subgraphs.
    pub fn subgraph_nodes(&self, index: usize) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        let mut pending = vec![index];
        while let Some(current) = pending.pop() {
            if let Some(subgraph) = self.subgraphs.get(current) {
                ids.extend(subgraph.members.iter().map(String::as_str));
            }
            pending.extend(
                self.subgraphs
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.parent == Some(current))
                    .map(|(i, _)| i),
            );
        }
        ids
    }

    /// Nesting depth of subgraph `index`; top-level subgraphs have depth 0.
    pub fn subgraph_depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = self.subgraphs.get(index).and_then(Subgraph::parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.subgraphs.get(parent).and_then(Subgraph::parent);
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_keywords() {
        assert_eq!(Direction::from_keyword("TB"), Some(Direction::TopDown));
        assert_eq!(Direction::from_keyword("RL"), Some(Direction::RightLeft));
        assert_eq!(Direction::from_keyword("XY"), None);
        assert!(Direction::LeftRight.is_horizontal());
        assert!(!Direction::BottomUp.is_horizontal());
    }

    #[test]
    fn test_style_merge_prefers_override() {
        let mut base = NodeStyle::default();
        base.set_fill(Color::new("red").unwrap());
        base.set_stroke_width(2.0);

        let mut over = NodeStyle::default();
        over.set_fill(Color::new("blue").unwrap());

        let merged = base.merged_with(&over);
        assert_eq!(merged.fill(), Some(Color::new("blue").unwrap()));
        assert_eq!(merged.stroke_width(), Some(2.0));
    }

    #[test]
    fn test_node_label_defaults_to_id() {
        let node = FlowNode::new("Start", Span::new(0..5));
        assert_eq!(node.label(), "Start");
        assert_eq!(node.shape(), NodeShape::Rect);
    }
}
