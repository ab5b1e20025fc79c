//! The Markdown pipeline.
//!
//! A document is parsed into a [`Node`] tree (tables, strikethrough and task
//! lists enabled, raw HTML passed through), headings receive unique anchors,
//! and every node is dispatched to its [`RenderRule`]. Fences tagged
//! `mermaid` or `markmap` are rendered by the diagram and mind-map engines
//! instead of being shown as code.
//!
//! Block render failures stay inside their block: a broken diagram becomes an
//! error card and the rest of the document renders normally. Only a
//! structural failure of the Markdown itself is returned as an error.
//!
//! ```
//! let tree = marginalia::markdown::render("# Hello\n\nWorld").unwrap();
//! assert_eq!(tree.blocks().len(), 2);
//! assert!(tree.to_html().contains(r#"<h1 id="hello""#));
//! ```

mod anchors;
mod rules;
mod tree;

pub use anchors::{Slugger, slugify};
pub use rules::{RenderContext, RenderRule, RenderRules, RuleKey, is_external};
pub use tree::{CodeBlock, ColumnAlignment, Dialect, Node, NodeKind, parse};

use log::{debug, info};

use marginalia_core::html::{Element, Markup};

use crate::{
    config::AppConfig,
    diagram::DiagramEngine,
    error::{MarginaliaError, RenderError},
    mindmap,
};

/// The rendered document: one markup node per top-level block.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualTree {
    blocks: Vec<Markup>,
}

impl VisualTree {
    pub fn blocks(&self) -> &[Markup] {
        &self.blocks
    }

    /// Wraps the blocks in the document container.
    pub fn to_markup(&self) -> Markup {
        Element::new("div")
            .with_class("marginalia-document")
            .with_children(self.blocks.iter().cloned())
            .into()
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            block.write_html(&mut out);
        }
        out
    }
}

/// The outcome of running one dialect block through its engine.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockReport {
    dialect: Dialect,
    ordinal: usize,
    source: String,
    outcome: Result<(), RenderError>,
}

impl BlockReport {
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The fence body handed to the engine.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target_id(&self) -> String {
        format!("{}-{}", self.dialect.tag(), self.ordinal)
    }

    pub fn outcome(&self) -> Result<(), &RenderError> {
        self.outcome.as_ref().map(|_| ())
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Renders documents with a rule table and configuration.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    rules: RenderRules,
    config: AppConfig,
}

impl MarkdownRenderer {
    pub fn new(config: AppConfig) -> Self {
        Self {
            rules: RenderRules::default(),
            config,
        }
    }

    pub fn with_rules(mut self, rules: RenderRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Renders `document` into one markup node per top-level block.
    ///
    /// # Errors
    ///
    /// Returns [`MarginaliaError::Markdown`] for structurally malformed input.
    pub fn render(&self, document: &str) -> Result<VisualTree, MarginaliaError> {
        info!(bytes = document.len(); "Rendering document");
        let root = parse(document)?;
        let cx = RenderContext::new(&self.rules, &self.config);
        let blocks = root
            .children()
            .iter()
            .map(|node| {
                debug!(rule:? = RuleKey::of(node); "Rendering block");
                cx.render(node)
            })
            .collect::<Vec<_>>();
        info!(blocks = blocks.len(); "Document rendered");
        Ok(VisualTree { blocks })
    }

    /// Runs every dialect block of `document` through its engine without
    /// producing markup.
    ///
    /// # Errors
    ///
    /// Returns [`MarginaliaError::Markdown`] for structurally malformed input.
    pub fn check(&self, document: &str) -> Result<Vec<BlockReport>, MarginaliaError> {
        let root = parse(document)?;
        let engine = DiagramEngine::new(*self.config.layout());

        let mut fences = Vec::new();
        root.walk(&mut |node| {
            if let NodeKind::CodeBlock(block) = node.kind() {
                fences.push(block);
            }
        });

        let reports: Vec<BlockReport> = fences
            .into_iter()
            .filter_map(|block| {
                let (dialect, ordinal) = block.dialect().zip(block.ordinal())?;
                let target_id = block.target_id()?;
                let outcome = match dialect {
                    Dialect::Mermaid => engine.render(&target_id, block.body()).map(|_| ()),
                    Dialect::Markmap => mindmap::transform(block.body()).map(|_| ()),
                };
                debug!(target_id = target_id.as_str(), ok = outcome.is_ok(); "Checked block");
                Some(BlockReport {
                    dialect,
                    ordinal,
                    source: block.body().to_string(),
                    outcome,
                })
            })
            .collect();

        info!(
            blocks = reports.len(),
            failed = reports.iter().filter(|r| !r.is_ok()).count();
            "Checked document"
        );
        Ok(reports)
    }
}

/// Renders `document` with the default rules and configuration.
///
/// # Errors
///
/// Returns [`MarginaliaError::Markdown`] for structurally malformed input.
pub fn render(document: &str) -> Result<VisualTree, MarginaliaError> {
    MarkdownRenderer::default().render(document)
}

/// Checks the dialect blocks of `document` with the default configuration.
///
/// # Errors
///
/// Returns [`MarginaliaError::Markdown`] for structurally malformed input.
pub fn check(document: &str) -> Result<Vec<BlockReport>, MarginaliaError> {
    MarkdownRenderer::default().check(document)
}

/// The placeholder shown until the host has mounted the viewer.
pub fn skeleton() -> Markup {
    let line = |width: &str| {
        Markup::from(Element::new("div").with_class(format!("marginalia-skeleton-line h-4 {width}")))
    };
    Element::new("div")
        .with_class("marginalia-skeleton animate-pulse")
        .with_attr("aria-busy", "true")
        .with_children([line("w-3/4"), line("w-1/2"), line("w-5/6")])
        .into()
}

/// A document view that paints a skeleton until it is mounted.
///
/// Diagram and mind-map output depends on the host surface, so nothing is
/// rendered before [`MarkdownViewer::mount`].
#[derive(Debug, Clone)]
pub struct MarkdownViewer {
    document: String,
    renderer: MarkdownRenderer,
    mounted: bool,
}

impl MarkdownViewer {
    pub fn new(document: impl Into<String>, renderer: MarkdownRenderer) -> Self {
        Self {
            document: document.into(),
            renderer,
            mounted: false,
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn set_document(&mut self, document: impl Into<String>) {
        self.document = document.into();
    }

    /// Marks the first interactive paint as done.
    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// # Errors
    ///
    /// Propagates [`MarginaliaError::Markdown`] once mounted.
    pub fn view(&self) -> Result<Markup, MarginaliaError> {
        if !self.mounted {
            return Ok(skeleton());
        }
        Ok(self.renderer.render(&self.document)?.to_markup())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_block_per_top_level_node() {
        let tree = render("# Title\n\nPara\n\n- a\n- b\n\n> quote\n\n---\n").unwrap();
        let tags: Vec<&str> = tree
            .blocks()
            .iter()
            .map(|b| b.as_element().unwrap().tag())
            .collect();
        assert_eq!(tags, ["h1", "div", "ul", "blockquote", "hr"]);
    }

    #[test]
    fn test_broken_diagram_is_isolated() {
        let tree = render("```mermaid\ngraph TD\nA--\n```\n\nAfter\n").unwrap();
        assert_eq!(tree.blocks().len(), 2);
        let html = tree.to_html();
        assert!(html.contains("Failed to render Mermaid diagram"));
        assert!(html.contains("graph TD\nA--"));
        assert!(html.contains("After"));
    }

    #[test]
    fn test_check_reports_each_dialect_block() {
        let reports = check(
            "```mermaid\ngraph TD\nA-->B\n```\n\n- item\n\n  ```markmap\n  ```\n\n```mermaid\nnot a graph\n```\n",
        )
        .unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].target_id(), "mermaid-0");
        assert_eq!(reports[0].source(), "graph TD\nA-->B");
        assert!(reports[0].is_ok());
        assert_eq!(reports[1].dialect(), Dialect::Markmap);
        assert!(reports[1].is_ok());
        assert_eq!(reports[2].target_id(), "mermaid-1");
        assert!(!reports[2].is_ok());
    }

    #[test]
    fn test_blank_markmap_fence_checks_ok() {
        let reports = check("```markmap
   
	
```
").unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].target_id(), "markmap-0");
        assert!(reports[0].is_ok());
    }

    #[test]
    fn test_viewer_shows_skeleton_until_mounted() {
        let mut viewer = MarkdownViewer::new("# Hi", MarkdownRenderer::default());
        let skeleton = viewer.view().unwrap();
        let root = skeleton.as_element().unwrap();
        assert!(root.has_class("animate-pulse"));
        assert_eq!(root.children().len(), 3);
        assert!(!viewer.is_mounted());

        viewer.mount();
        assert!(viewer.is_mounted());
        let html = viewer.view().unwrap().to_html();
        assert!(html.starts_with(r#"<div class="marginalia-document">"#));
        assert!(html.contains(r#"<h1 id="hi""#));

        viewer.set_document("# Bye");
        assert_eq!(viewer.document(), "# Bye");
        assert!(viewer.view().unwrap().to_html().contains(r#"<h1 id="bye""#));
    }
}
