//! Folding the Markdown event stream into an owned node tree.

use std::{collections::HashMap, fmt};

use log::trace;
use pulldown_cmark::{
    Alignment, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use super::anchors::Slugger;
use crate::error::MarginaliaError;

/// A fence language that is rendered instead of displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dialect {
    /// Flowcharts, rendered by the diagram engine.
    Mermaid,
    /// Outlines, rendered as mind maps.
    Markmap,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::Mermaid, Dialect::Markmap];

    /// Matches a fence language tag exactly.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dialect| dialect.tag() == tag)
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::Markmap => "markmap",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl ColumnAlignment {
    /// The CSS `text-align` value, if any.
    pub fn css(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

impl From<Alignment> for ColumnAlignment {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::None => Self::None,
            Alignment::Left => Self::Left,
            Alignment::Center => Self::Center,
            Alignment::Right => Self::Right,
        }
    }
}

/// A fenced or indented code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    language: Option<String>,
    body: String,
    /// Dialect and its document-order index, for dialect fences.
    dialect: Option<(Dialect, usize)>,
}

impl CodeBlock {
    /// The first token of the fence info string.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// The literal body, without its final newline.
    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect.map(|(dialect, _)| dialect)
    }

    /// Index of this fence among fences of the same dialect.
    pub fn ordinal(&self) -> Option<usize> {
        self.dialect.map(|(_, ordinal)| ordinal)
    }

    /// The deterministic render target, such as `mermaid-0`.
    pub fn target_id(&self) -> Option<String> {
        self.dialect
            .map(|(dialect, ordinal)| format!("{}-{ordinal}", dialect.tag()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading { level: u8, anchor: String },
    BlockQuote,
    CodeBlock(CodeBlock),
    HtmlBlock,
    List { start: Option<u64> },
    Item,
    TaskListMarker(bool),
    Table { alignments: Vec<ColumnAlignment> },
    TableHead,
    TableRow,
    TableCell { header: bool, alignment: ColumnAlignment },
    Emphasis,
    Strong,
    Strikethrough,
    Link { dest: String, title: String },
    Image { url: String, title: String, ordinal: usize },
    Text(String),
    Code(String),
    Html(String),
    InlineHtml(String),
    SoftBreak,
    HardBreak,
    Rule,
    /// Constructs the enabled extensions never produce.
    Other,
}

/// A node of the parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    children: Vec<Node>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Concatenated text of this node's inline content.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
            NodeKind::SoftBreak | NodeKind::HardBreak => out.push(' '),
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Returns true for a list item that starts with a task checkbox.
    pub fn is_task_item(&self) -> bool {
        if self.kind != NodeKind::Item {
            return false;
        }
        // Loose lists wrap the marker in a paragraph
        let first = match self.children.first() {
            Some(node) if node.kind == NodeKind::Paragraph => node.children.first(),
            first => first,
        };
        matches!(first.map(Node::kind), Some(NodeKind::TaskListMarker(_)))
    }

    /// Visits this node and its descendants in document order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Parses `document` into a tree rooted at a [`NodeKind::Document`] node.
///
/// # Errors
///
/// Returns [`MarginaliaError::Markdown`] when the event stream does not nest.
pub fn parse(document: &str) -> Result<Node, MarginaliaError> {
    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(document, parser_options()) {
        builder.handle(event)?;
    }
    builder.finish()
}

struct TreeBuilder {
    stack: Vec<Node>,
    slugger: Slugger,
    fences: HashMap<Dialect, usize>,
    images: usize,
    alignments: Vec<ColumnAlignment>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            stack: vec![Node::new(NodeKind::Document)],
            slugger: Slugger::default(),
            fences: HashMap::new(),
            images: 0,
            alignments: Vec::new(),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

impl TreeBuilder {
    fn handle(&mut self, event: Event<'_>) -> Result<(), MarginaliaError> {
        match event {
            Event::Start(tag) => {
                let kind = self.open(tag);
                self.stack.push(Node::new(kind));
            }
            Event::End(tag) => self.close(tag)?,
            Event::Text(text) => self.text(text),
            Event::Code(code) => self.leaf(NodeKind::Code(code.into_string())),
            Event::Html(html) => self.leaf(NodeKind::Html(html.into_string())),
            Event::InlineHtml(html) => self.leaf(NodeKind::InlineHtml(html.into_string())),
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak),
            Event::HardBreak => self.leaf(NodeKind::HardBreak),
            Event::Rule => self.leaf(NodeKind::Rule),
            Event::TaskListMarker(checked) => self.leaf(NodeKind::TaskListMarker(checked)),
            _ => self.leaf(NodeKind::Other),
        }
        Ok(())
    }

    fn open(&mut self, tag: Tag<'_>) -> NodeKind {
        match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            // The anchor is assigned once the heading text is known
            Tag::Heading { level, .. } => NodeKind::Heading {
                level: heading_level(level),
                anchor: String::new(),
            },
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                NodeKind::CodeBlock(CodeBlock {
                    language,
                    body: String::new(),
                    dialect: None,
                })
            }
            Tag::HtmlBlock => NodeKind::HtmlBlock,
            Tag::List(start) => NodeKind::List { start },
            Tag::Item => NodeKind::Item,
            Tag::Table(alignments) => {
                self.alignments = alignments.into_iter().map(ColumnAlignment::from).collect();
                NodeKind::Table {
                    alignments: self.alignments.clone(),
                }
            }
            Tag::TableHead => NodeKind::TableHead,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => {
                let (header, column) = match self.stack.last() {
                    Some(parent) => (parent.kind == NodeKind::TableHead, parent.children.len()),
                    None => (false, 0),
                };
                NodeKind::TableCell {
                    header,
                    alignment: self.alignments.get(column).copied().unwrap_or_default(),
                }
            }
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                dest: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => {
                let ordinal = self.images;
                self.images += 1;
                NodeKind::Image {
                    url: dest_url.into_string(),
                    title: title.into_string(),
                    ordinal,
                }
            }
            _ => NodeKind::Other,
        }
    }

    fn close(&mut self, tag: TagEnd) -> Result<(), MarginaliaError> {
        if self.stack.len() < 2 {
            return Err(MarginaliaError::Markdown(format!(
                "unbalanced end of {tag:?}"
            )));
        }
        let Some(mut node) = self.stack.pop() else {
            return Err(MarginaliaError::Markdown("empty node stack".to_string()));
        };

        let heading_text = matches!(node.kind, NodeKind::Heading { .. }).then(|| node.text_content());
        match &mut node.kind {
            NodeKind::Heading { anchor, .. } => {
                *anchor = self.slugger.slug(heading_text.as_deref().unwrap_or_default());
            }
            NodeKind::CodeBlock(block) => {
                if block.body.ends_with('\n') {
                    block.body.pop();
                }
                if let Some(dialect) = block.language.as_deref().and_then(Dialect::from_tag) {
                    let counter = self.fences.entry(dialect).or_default();
                    block.dialect = Some((dialect, *counter));
                    *counter += 1;
                }
                trace!(language:? = block.language.as_deref(), dialect:? = block.dialect; "Closed code block");
            }
            NodeKind::Table { .. } => self.alignments.clear(),
            _ => {}
        }

        self.push_child(node);
        Ok(())
    }

    fn text(&mut self, text: CowStr<'_>) {
        if let Some(Node {
            kind: NodeKind::CodeBlock(block),
            ..
        }) = self.stack.last_mut()
        {
            block.body.push_str(&text);
            return;
        }
        self.leaf(NodeKind::Text(text.into_string()));
    }

    fn leaf(&mut self, kind: NodeKind) {
        self.push_child(Node::new(kind));
    }

    fn push_child(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn finish(mut self) -> Result<Node, MarginaliaError> {
        if self.stack.len() != 1 {
            return Err(MarginaliaError::Markdown(format!(
                "{} unclosed node(s) at end of document",
                self.stack.len().saturating_sub(1)
            )));
        }
        self.stack
            .pop()
            .ok_or_else(|| MarginaliaError::Markdown("empty node stack".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(document: &str) -> Vec<Node> {
        parse(document).unwrap().children
    }

    fn code_block(node: &Node) -> &CodeBlock {
        match node.kind() {
            NodeKind::CodeBlock(block) => block,
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_fence_language_and_body() {
        let nodes = blocks("```mermaid title\ngraph TD\nA-->B\n```\n");
        let block = code_block(&nodes[0]);
        assert_eq!(block.language(), Some("mermaid"));
        assert_eq!(block.body(), "graph TD\nA-->B");
        assert_eq!(block.target_id().as_deref(), Some("mermaid-0"));
    }

    #[test]
    fn test_only_one_trailing_newline_is_stripped() {
        let nodes = blocks("```\nline\n\n```\n");
        assert_eq!(code_block(&nodes[0]).body(), "line\n");
    }

    #[test]
    fn test_dialect_ordinals_count_per_dialect() {
        let nodes = blocks(
            "```mermaid\ngraph TD\n```\n\n```markmap\n# a\n```\n\n```rust\nfn main() {}\n```\n\n```mermaid\ngraph LR\n```\n",
        );
        let ids: Vec<Option<String>> = nodes.iter().map(|n| code_block(n).target_id()).collect();
        assert_eq!(
            ids,
            vec![
                Some("mermaid-0".to_string()),
                Some("markmap-0".to_string()),
                None,
                Some("mermaid-1".to_string()),
            ]
        );
    }

    #[test]
    fn test_dialect_tag_is_exact() {
        assert_eq!(Dialect::from_tag("mermaid"), Some(Dialect::Mermaid));
        assert_eq!(Dialect::from_tag("Mermaid"), None);
        assert_eq!(Dialect::from_tag(""), None);

        let nodes = blocks("    indented code\n");
        assert_eq!(code_block(&nodes[0]).language(), None);
    }

    #[test]
    fn test_duplicate_headings_get_distinct_anchors() {
        let anchors: Vec<String> = blocks("# A\n# A\n")
            .iter()
            .map(|n| match n.kind() {
                NodeKind::Heading { anchor, .. } => anchor.clone(),
                other => panic!("expected heading, got {other:?}"),
            })
            .collect();
        assert_eq!(anchors, ["a", "a-1"]);
    }

    #[test]
    fn test_table_cells_know_header_and_alignment() {
        let nodes = blocks("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        let table = &nodes[0];
        let head = &table.children()[0];
        assert_eq!(
            head.children()[1].kind(),
            &NodeKind::TableCell {
                header: true,
                alignment: ColumnAlignment::Right
            }
        );
        let row = &table.children()[1];
        assert_eq!(
            row.children()[0].kind(),
            &NodeKind::TableCell {
                header: false,
                alignment: ColumnAlignment::Left
            }
        );
    }

    #[test]
    fn test_task_items() {
        let nodes = blocks("- [x] done\n- [ ] todo\n- plain\n");
        let items = nodes[0].children();
        assert!(items[0].is_task_item());
        assert!(items[1].is_task_item());
        assert!(!items[2].is_task_item());
    }

    #[test]
    fn test_images_are_numbered() {
        let root = parse("![a](/a.png) ![b](https://x.test/b.png)").unwrap();
        let mut ordinals = Vec::new();
        root.walk(&mut |node| {
            if let NodeKind::Image { ordinal, .. } = node.kind() {
                ordinals.push(*ordinal);
            }
        });
        assert_eq!(ordinals, [0, 1]);
    }

    #[test]
    fn test_unbalanced_end_is_structural_error() {
        let mut builder = TreeBuilder::default();
        let err = builder.handle(Event::End(TagEnd::Paragraph)).unwrap_err();
        assert!(matches!(err, MarginaliaError::Markdown(_)));

        let mut builder = TreeBuilder::default();
        builder.handle(Event::Start(Tag::Paragraph)).unwrap();
        assert!(matches!(builder.finish(), Err(MarginaliaError::Markdown(_))));
    }
}
