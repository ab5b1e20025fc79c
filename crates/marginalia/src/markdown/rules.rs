//! The render-rule dispatch table.
//!
//! Every node maps to exactly one [`RuleKey`]: its kind, and for code blocks
//! also its dialect. Each key has a default [`RenderRule`], and a host may
//! replace any of them with [`RenderRules::with_rule`].

use std::fmt;

use indexmap::IndexMap;
use log::debug;

use marginalia_core::html::{Element, Markup};

use super::{
    anchors,
    tree::{CodeBlock, Dialect, Node, NodeKind},
};
use crate::{
    config::AppConfig,
    diagram::{DiagramBlock, DiagramEngine},
    media::ImageViewer,
    mindmap::MindMapBlock,
    widget::Icon,
};

/// Maps one node to its visual representation.
pub type RenderRule = fn(&RenderContext<'_>, &Node) -> Markup;

/// The dispatch key of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Document,
    Paragraph,
    Heading,
    BlockQuote,
    /// A code block without a rendered dialect.
    CodeBlock,
    MermaidFence,
    MarkmapFence,
    HtmlBlock,
    List,
    Item,
    TaskListMarker,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link,
    Image,
    Text,
    Code,
    Html,
    SoftBreak,
    HardBreak,
    Rule,
    Other,
}

impl RuleKey {
    pub const ALL: [RuleKey; 27] = [
        Self::Document,
        Self::Paragraph,
        Self::Heading,
        Self::BlockQuote,
        Self::CodeBlock,
        Self::MermaidFence,
        Self::MarkmapFence,
        Self::HtmlBlock,
        Self::List,
        Self::Item,
        Self::TaskListMarker,
        Self::Table,
        Self::TableHead,
        Self::TableRow,
        Self::TableCell,
        Self::Emphasis,
        Self::Strong,
        Self::Strikethrough,
        Self::Link,
        Self::Image,
        Self::Text,
        Self::Code,
        Self::Html,
        Self::SoftBreak,
        Self::HardBreak,
        Self::Rule,
        Self::Other,
    ];

    pub fn of(node: &Node) -> Self {
        match node.kind() {
            NodeKind::Document => Self::Document,
            NodeKind::Paragraph => Self::Paragraph,
            NodeKind::Heading { .. } => Self::Heading,
            NodeKind::BlockQuote => Self::BlockQuote,
            NodeKind::CodeBlock(block) => match block.dialect() {
                Some(Dialect::Mermaid) => Self::MermaidFence,
                Some(Dialect::Markmap) => Self::MarkmapFence,
                None => Self::CodeBlock,
            },
            NodeKind::HtmlBlock => Self::HtmlBlock,
            NodeKind::List { .. } => Self::List,
            NodeKind::Item => Self::Item,
            NodeKind::TaskListMarker(_) => Self::TaskListMarker,
            NodeKind::Table { .. } => Self::Table,
            NodeKind::TableHead => Self::TableHead,
            NodeKind::TableRow => Self::TableRow,
            NodeKind::TableCell { .. } => Self::TableCell,
            NodeKind::Emphasis => Self::Emphasis,
            NodeKind::Strong => Self::Strong,
            NodeKind::Strikethrough => Self::Strikethrough,
            NodeKind::Link { .. } => Self::Link,
            NodeKind::Image { .. } => Self::Image,
            NodeKind::Text(_) => Self::Text,
            NodeKind::Code(_) => Self::Code,
            NodeKind::Html(_) | NodeKind::InlineHtml(_) => Self::Html,
            NodeKind::SoftBreak => Self::SoftBreak,
            NodeKind::HardBreak => Self::HardBreak,
            NodeKind::Rule => Self::Rule,
            NodeKind::Other => Self::Other,
        }
    }

    fn default_rule(self) -> RenderRule {
        match self {
            Self::Document => render_document,
            Self::Paragraph => render_paragraph,
            Self::Heading => render_heading,
            Self::BlockQuote => render_blockquote,
            Self::CodeBlock => render_code_block,
            Self::MermaidFence => render_mermaid,
            Self::MarkmapFence => render_markmap,
            Self::HtmlBlock => render_html_block,
            Self::List => render_list,
            Self::Item => render_item,
            Self::TaskListMarker => render_task_marker,
            Self::Table => render_table,
            Self::TableHead => render_table_head,
            Self::TableRow => render_table_row,
            Self::TableCell => render_table_cell,
            Self::Emphasis => render_emphasis,
            Self::Strong => render_strong,
            Self::Strikethrough => render_strikethrough,
            Self::Link => render_link,
            Self::Image => render_image,
            Self::Text => render_text,
            Self::Code => render_inline_code,
            Self::Html => render_html,
            Self::SoftBreak => render_soft_break,
            Self::HardBreak => render_hard_break,
            Self::Rule => render_rule,
            Self::Other => render_other,
        }
    }
}

/// The dispatch table.
#[derive(Clone)]
pub struct RenderRules {
    rules: IndexMap<RuleKey, RenderRule>,
}

impl Default for RenderRules {
    fn default() -> Self {
        Self {
            rules: RuleKey::ALL
                .into_iter()
                .map(|key| (key, key.default_rule()))
                .collect(),
        }
    }
}

impl fmt::Debug for RenderRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.rules.keys()).finish()
    }
}

impl RenderRules {
    /// Replaces the rule for `key`.
    pub fn with_rule(mut self, key: RuleKey, rule: RenderRule) -> Self {
        self.rules.insert(key, rule);
        self
    }

    pub fn get(&self, key: RuleKey) -> RenderRule {
        self.rules
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.default_rule())
    }
}

/// What a rule sees besides its node.
pub struct RenderContext<'a> {
    rules: &'a RenderRules,
    config: &'a AppConfig,
    engine: DiagramEngine,
}

impl<'a> RenderContext<'a> {
    pub fn new(rules: &'a RenderRules, config: &'a AppConfig) -> Self {
        Self {
            rules,
            config,
            engine: DiagramEngine::new(*config.layout()),
        }
    }

    pub fn config(&self) -> &AppConfig {
        self.config
    }

    pub fn engine(&self) -> &DiagramEngine {
        &self.engine
    }

    /// Dispatches `node` to its rule.
    pub fn render(&self, node: &Node) -> Markup {
        (self.rules.get(RuleKey::of(node)))(self, node)
    }

    pub fn render_children(&self, node: &Node) -> Vec<Markup> {
        node.children().iter().map(|child| self.render(child)).collect()
    }

    /// An element of `tag` holding the rendered children of `node`.
    pub fn wrap(&self, tag: &str, node: &Node) -> Element {
        Element::new(tag).with_children(self.render_children(node))
    }
}

fn code_block(node: &Node) -> Option<&CodeBlock> {
    match node.kind() {
        NodeKind::CodeBlock(block) => Some(block),
        _ => None,
    }
}

fn render_document(cx: &RenderContext<'_>, node: &Node) -> Markup {
    cx.wrap("div", node).with_class("marginalia-document").into()
}

// Paragraphs are divs so block-level media may nest in them.
fn render_paragraph(cx: &RenderContext<'_>, node: &Node) -> Markup {
    cx.wrap("div", node).with_class("marginalia-paragraph").into()
}

fn render_heading(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let NodeKind::Heading { level, anchor } = node.kind() else {
        return Markup::text(node.text_content());
    };
    let class = match level {
        1 => Some("marginalia-h1 text-3xl font-bold mt-8 mb-4"),
        2 => Some("marginalia-h2 text-2xl font-semibold mt-6 mb-3"),
        3 => Some("marginalia-h3 text-xl font-semibold mt-5 mb-2"),
        4 => Some("marginalia-h4 text-lg font-medium mt-4 mb-2"),
        _ => None,
    };
    Element::new(format!("h{level}"))
        .with_attr("id", anchor.as_str())
        .with_opt_attr("class", class)
        .with_child(anchors::self_link(anchor, cx.render_children(node)))
        .into()
}

fn render_blockquote(cx: &RenderContext<'_>, node: &Node) -> Markup {
    cx.wrap("blockquote", node)
        .with_class("marginalia-blockquote")
        .into()
}

fn render_code_block(_: &RenderContext<'_>, node: &Node) -> Markup {
    let Some(block) = code_block(node) else {
        return Markup::text(node.text_content());
    };

    let code = Element::new("code")
        .with_opt_attr("class", block.language().map(|lang| format!("language-{lang}")))
        .with_child(Markup::text(block.body()));
    let mut figure = Element::new("div").with_class("marginalia-code");
    if let Some(language) = block.language() {
        figure.push(
            Element::new("span")
                .with_class("marginalia-code-language")
                .with_child(Markup::text(language)),
        );
    }
    figure.push(Element::new("pre").with_child(code));
    figure.into()
}

fn render_mermaid(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let Some((block, target_id)) = code_block(node).and_then(|b| Some((b, b.target_id()?))) else {
        return render_code_block(cx, node);
    };
    debug!(target_id = target_id.as_str(); "Rendering diagram fence");
    let mut diagram = DiagramBlock::new(target_id, block.body(), *cx.engine());
    diagram.render_now();
    diagram.view_static()
}

fn render_markmap(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let Some((block, target_id)) = code_block(node).and_then(|b| Some((b, b.target_id()?))) else {
        return render_code_block(cx, node);
    };
    debug!(target_id = target_id.as_str(); "Rendering mind map fence");
    MindMapBlock::new(target_id, block.body(), *cx.config().mindmap()).view_static()
}

fn render_html_block(_: &RenderContext<'_>, node: &Node) -> Markup {
    let html: String = node
        .children()
        .iter()
        .filter_map(|child| match child.kind() {
            NodeKind::Html(html) => Some(html.as_str()),
            _ => None,
        })
        .collect();
    Markup::raw(html)
}

fn render_html(_: &RenderContext<'_>, node: &Node) -> Markup {
    match node.kind() {
        NodeKind::Html(html) | NodeKind::InlineHtml(html) => Markup::raw(html.as_str()),
        _ => Markup::text(""),
    }
}

fn render_list(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let NodeKind::List { start } = node.kind() else {
        return cx.wrap("ul", node).into();
    };
    let mut list = match start {
        Some(start) => {
            Element::new("ol").with_opt_attr("start", (*start != 1).then(|| start.to_string()))
        }
        None => Element::new("ul"),
    };
    let tasks = node.children().iter().any(Node::is_task_item);
    list.set_attr(
        "class",
        if tasks {
            "marginalia-list contains-task-list"
        } else {
            "marginalia-list"
        },
    );
    list.with_children(cx.render_children(node)).into()
}

fn render_item(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let item = cx.wrap("li", node);
    if node.is_task_item() {
        item.with_class("task-list-item").into()
    } else {
        item.into()
    }
}

fn render_task_marker(_: &RenderContext<'_>, node: &Node) -> Markup {
    let checked = matches!(node.kind(), NodeKind::TaskListMarker(true));
    Element::new("input")
        .with_attr("type", "checkbox")
        .with_attr("disabled", "")
        .with_opt_attr("checked", checked.then_some(""))
        .with_class("task-list-item-checkbox")
        .into()
}

fn render_table(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let mut table = Element::new("table").with_class("marginalia-table");
    let mut body = Vec::new();
    for child in node.children() {
        match child.kind() {
            NodeKind::TableRow => body.push(cx.render(child)),
            _ => table.push(cx.render(child)),
        }
    }
    if !body.is_empty() {
        table.push(Element::new("tbody").with_children(body));
    }
    Element::new("div")
        .with_class("marginalia-table-wrapper overflow-x-auto")
        .with_child(table)
        .into()
}

fn render_table_head(cx: &RenderContext<'_>, node: &Node) -> Markup {
    Element::new("thead")
        .with_child(cx.wrap("tr", node))
        .into()
}

fn render_table_row(cx: &RenderContext<'_>, node: &Node) -> Markup {
    cx.wrap("tr", node).into()
}

fn render_table_cell(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let (tag, alignment) = match node.kind() {
        NodeKind::TableCell { header, alignment } => (if *header { "th" } else { "td" }, alignment.css()),
        _ => ("td", None),
    };
    cx.wrap(tag, node)
        .with_opt_attr("style", alignment.map(|align| format!("text-align: {align}")))
        .into()
}

/// Returns true for targets that leave the site.
pub fn is_external(dest: &str) -> bool {
    let lower = dest.get(..8).unwrap_or(dest).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn render_link(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let NodeKind::Link { dest, title } = node.kind() else {
        return cx.wrap("span", node).into();
    };
    let link = Element::new("a")
        .with_attr("href", dest.as_str())
        .with_opt_attr("title", (!title.is_empty()).then_some(title.as_str()))
        .with_children(cx.render_children(node));
    if !is_external(dest) {
        return link.into();
    }
    link.with_attr("target", "_blank")
        .with_attr("rel", "noopener noreferrer")
        .with_class("marginalia-link-external")
        .with_child(Icon::ExternalLink.to_element("marginalia-icon-inline"))
        .into()
}

fn render_image(cx: &RenderContext<'_>, node: &Node) -> Markup {
    let NodeKind::Image { url, ordinal, .. } = node.kind() else {
        return Markup::text(node.text_content());
    };
    ImageViewer::new(url.as_str(), node.text_content(), cx.config().media())
        .with_id(format!("image-{ordinal}"))
        .view_static()
}

fn render_emphasis(cx: &RenderContext<'_>, node: &Node) -> Markup {
    cx.wrap("em", node).into()
}

fn render_strong(cx: &RenderContext<'_>, node: &Node) -> Markup {
    cx.wrap("strong", node).into()
}

fn render_strikethrough(cx: &RenderContext<'_>, node: &Node) -> Markup {
    cx.wrap("del", node).into()
}

fn render_soft_break(_: &RenderContext<'_>, _: &Node) -> Markup {
    Markup::text("\n")
}

fn render_hard_break(_: &RenderContext<'_>, _: &Node) -> Markup {
    Element::new("br").into()
}

fn render_rule(_: &RenderContext<'_>, _: &Node) -> Markup {
    Element::new("hr").with_class("marginalia-rule").into()
}

fn render_other(cx: &RenderContext<'_>, node: &Node) -> Markup {
    cx.wrap("span", node).into()
}

fn render_text(_: &RenderContext<'_>, node: &Node) -> Markup {
    match node.kind() {
        NodeKind::Text(text) => Markup::text(text.as_str()),
        _ => Markup::text(node.text_content()),
    }
}

fn render_inline_code(_: &RenderContext<'_>, node: &Node) -> Markup {
    Element::new("code")
        .with_class("marginalia-inline-code")
        .with_child(Markup::text(node.text_content()))
        .into()
}
