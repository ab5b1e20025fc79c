//! Markmap outline dialect.
//!
//! [`transform`] turns the body of a ```` ```markmap ```` block into an
//! [`Outline`] tree. Headings nest by level, list items nest under the most
//! recent heading by list depth, and free paragraphs become leaves of the
//! section they appear in. Inline formatting is flattened to plain text.
//!
//! ```
//! # use marginalia_parser::outline;
//! let outline = outline::transform("# Root\n## Left\n- leaf\n## Right");
//! let root = outline.root();
//! assert_eq!(root.content(), "Root");
//! assert_eq!(root.children().len(), 2);
//! assert_eq!(root.children()[0].children()[0].content(), "leaf");
//! ```

use log::{debug, trace};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

/// A node of the mind-map tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutlineNode {
    content: String,
    depth: usize,
    children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn new(content: String) -> Self {
        Self {
            content,
            depth: 0,
            children: Vec::new(),
        }
    }

    /// Plain-text label.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Distance from the root; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn children(&self) -> &[OutlineNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::len).sum::<usize>()
    }

    /// Levels below this node; 0 for a leaf.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    fn assign_depth(&mut self, depth: usize) {
        self.depth = depth;
        for child in &mut self.children {
            child.assign_depth(depth + 1);
        }
    }
}

/// A transformed outline with a single root.
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    root: OutlineNode,
}

impl Outline {
    pub fn root(&self) -> &OutlineNode {
        &self.root
    }

    /// Total number of nodes, including a synthetic root.
    pub fn node_count(&self) -> usize {
        self.root.len()
    }

    /// Follows child indexes from the root; the empty path is the root.
    pub fn get(&self, path: &[usize]) -> Option<&OutlineNode> {
        path.iter()
            .try_fold(&self.root, |node, &index| node.children.get(index))
    }
}

/// A flattened entry before nesting: `rank` orders entries like heading levels.
#[derive(Debug)]
struct Entry {
    rank: usize,
    content: String,
}

/// Tracks which kind of block is collecting inline text.
#[derive(Debug, Default)]
struct Collector {
    entries: Vec<Entry>,
    heading_rank: usize,
    list_depth: usize,
    /// Text of a list item not yet flushed into `entries`.
    pending_item: Option<String>,
    /// Text of the heading, paragraph or code block being read.
    buffer: Option<String>,
}

impl Collector {
    fn push_text(&mut self, text: &str) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.push_str(text);
        } else if let Some(item) = self.pending_item.as_mut() {
            item.push_str(text);
        }
    }

    fn flush_item(&mut self) {
        if let Some(text) = self.pending_item.take() {
            self.push_entry(self.heading_rank + self.list_depth, text);
        }
    }

    fn push_entry(&mut self, rank: usize, text: String) {
        let content = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !content.is_empty() {
            self.entries.push(Entry { rank, content });
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                self.flush_item();
                self.buffer = Some(String::new());
            }
            Event::End(TagEnd::Heading(level)) => {
                self.heading_rank = level as usize;
                let text = self.buffer.take().unwrap_or_default();
                self.push_entry(self.heading_rank, text);
            }
            Event::Start(Tag::List(_)) => {
                self.flush_item();
                self.list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                self.list_depth = self.list_depth.saturating_sub(1);
            }
            Event::Start(Tag::Item) => {
                self.flush_item();
                self.pending_item = Some(String::new());
            }
            Event::End(TagEnd::Item) => self.flush_item(),
            Event::Start(Tag::Paragraph) => {
                // Paragraphs inside an item extend the item's own label
                if self.pending_item.is_none() {
                    self.buffer = Some(String::new());
                }
            }
            Event::End(TagEnd::Paragraph) => {
                if let Some(text) = self.buffer.take() {
                    let rank = self.heading_rank + self.list_depth + 1;
                    self.push_entry(rank, text);
                } else if let Some(item) = self.pending_item.as_mut() {
                    item.push(' ');
                }
            }
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush_item();
                self.buffer = Some(String::new());
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(text) = self.buffer.take() {
                    let rank = self.heading_rank + self.list_depth + 1;
                    self.push_entry(rank, text);
                }
            }
            Event::Text(text) | Event::Code(text) => self.push_text(&text),
            Event::SoftBreak | Event::HardBreak => self.push_text(" "),
            _ => {}
        }
    }
}

/// Transforms outline text into a tree.
///
/// A single top-level node becomes the root. Several top-level nodes are
/// gathered under a synthetic root with empty content, and text with no
/// headings, items or paragraphs yields a lone empty root.
pub fn transform(source: &str) -> Outline {
    let mut collector = Collector::default();
    for event in Parser::new(source) {
        collector.handle(event);
    }
    collector.flush_item();

    debug!(entries = collector.entries.len(); "Transforming outline");
    let mut top = nest(collector.entries);
    let mut root = if top.len() == 1 {
        top.remove(0)
    } else {
        OutlineNode {
            children: top,
            ..OutlineNode::default()
        }
    };
    root.assign_depth(0);
    trace!(nodes = root.len(); "Transformed outline");

    Outline { root }
}

/// Nests flat entries: each entry becomes a child of the closest preceding
/// entry with a lower rank.
fn nest(entries: Vec<Entry>) -> Vec<OutlineNode> {
    let mut top: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<(usize, OutlineNode)> = Vec::new();

    fn attach(node: OutlineNode, stack: &mut [(usize, OutlineNode)], top: &mut Vec<OutlineNode>) {
        match stack.last_mut() {
            Some((_, parent)) => parent.children.push(node),
            None => top.push(node),
        }
    }

    for entry in entries {
        while stack.last().is_some_and(|(rank, _)| *rank >= entry.rank) {
            if let Some((_, done)) = stack.pop() {
                attach(done, &mut stack, &mut top);
            }
        }
        stack.push((entry.rank, OutlineNode::new(entry.content)));
    }
    while let Some((_, done)) = stack.pop() {
        attach(done, &mut stack, &mut top);
    }

    top
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(nodes: &[OutlineNode]) -> Vec<&str> {
        nodes.iter().map(OutlineNode::content).collect()
    }

    #[test]
    fn test_headings_nest_by_level() {
        let outline = transform("# Root\n## A\n### A1\n## B");
        let root = outline.root();
        assert_eq!(root.content(), "Root");
        assert_eq!(contents(root.children()), ["A", "B"]);
        assert_eq!(contents(root.children()[0].children()), ["A1"]);
        assert_eq!(outline.get(&[0, 0]).unwrap().depth(), 2);
    }

    #[test]
    fn test_multiple_top_level_nodes_get_synthetic_root() {
        let outline = transform("# One\n# Two");
        assert_eq!(outline.root().content(), "");
        assert_eq!(contents(outline.root().children()), ["One", "Two"]);
        assert_eq!(outline.node_count(), 3);
    }

    #[test]
    fn test_lists_nest_under_heading() {
        let outline = transform("# Root\n- a\n  - a1\n  - a2\n- b\n");
        let root = outline.root();
        assert_eq!(contents(root.children()), ["a", "b"]);
        assert_eq!(contents(root.children()[0].children()), ["a1", "a2"]);
    }

    #[test]
    fn test_paragraph_is_leaf_of_section() {
        let outline = transform("# Root\n## Notes\nSome *formatted* text\n");
        let notes = &outline.root().children()[0];
        assert_eq!(contents(notes.children()), ["Some formatted text"]);
        assert!(notes.children()[0].is_leaf());
    }

    #[test]
    fn test_inline_code_and_links_flatten() {
        let outline = transform("# Use `cargo` and [docs](https://docs.rs)");
        assert_eq!(outline.root().content(), "Use cargo and docs");
    }

    #[test]
    fn test_list_without_heading() {
        let outline = transform("- one\n- two\n");
        assert_eq!(contents(outline.root().children()), ["one", "two"]);
    }

    #[test]
    fn test_empty_outline_is_lone_empty_root() {
        for source in ["", "\n\n", "   \n\t"] {
            let outline = transform(source);
            assert_eq!(outline.root().content(), "");
            assert!(outline.root().is_leaf());
            assert_eq!(outline.node_count(), 1);
        }
    }

    #[test]
    fn test_height() {
        let outline = transform("# Root\n## A\n- a1\n  - a2\n## B");
        assert_eq!(outline.root().height(), 3);
        assert_eq!(outline.get(&[1]).unwrap().height(), 0);
    }

    #[test]
    fn test_get_out_of_range() {
        let outline = transform("# Root");
        assert!(outline.get(&[]).is_some());
        assert!(outline.get(&[3]).is_none());
    }
}
