//! Integration tests for the document rendering API.

use std::time::Instant;

use marginalia::{
    DocumentBuilder,
    config::AppConfig,
    diagram::{DiagramBlock, DiagramEngine},
    html::{Element, Markup},
    markdown::{self, Dialect, MarkdownRenderer, MarkdownViewer, RenderRules, RuleKey},
    media::{ImageViewer, LoadState},
    mindmap::{self, MindMapBlock},
    widget::{Clipboard, ClipboardError, MemoryClipboard},
};

fn elements<'a>(markup: &'a Markup, tag: &str) -> Vec<&'a Element> {
    markup
        .as_element()
        .map(|root| root.find_all(&|e| e.tag() == tag))
        .unwrap_or_default()
}

#[test]
fn test_duplicate_headings_scenario() {
    let tree = markdown::render("# A\n# A\n").expect("Failed to render");
    assert_eq!(tree.blocks().len(), 2);

    let ids: Vec<&str> = tree
        .blocks()
        .iter()
        .map(|block| {
            let heading = block.as_element().expect("heading element");
            assert_eq!(heading.tag(), "h1");
            heading.attr("id").expect("anchor id")
        })
        .collect();
    assert_eq!(ids, ["a", "a-1"]);
}

#[test]
fn test_mermaid_fence_scenario() {
    let reports = markdown::check("```mermaid\ngraph TD\nA-->B\n```\n").expect("Failed to check");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].dialect(), Dialect::Mermaid);
    assert_eq!(reports[0].source(), "graph TD\nA-->B");
    assert!(reports[0].is_ok());

    let tree = markdown::render("```mermaid\ngraph TD\nA--\n```\n").expect("Failed to render");
    let block = &tree.blocks()[0];
    let card = block
        .as_element()
        .and_then(|root| root.find(&|e| e.has_class("marginalia-error-card")))
        .expect("error card");
    let pre = card.find(&|e| e.tag() == "pre").expect("source listing");
    assert_eq!(pre.text_content(), "graph TD\nA--");
    assert!(elements(block, "svg").is_empty());
}

#[test]
fn test_unreachable_image_scenario() {
    let config = AppConfig::default();
    let mut viewer = ImageViewer::new("https://unreachable.invalid/pic.png", "Pic", config.media());
    assert_eq!(viewer.state(), LoadState::Pending);

    viewer.on_error();
    assert_eq!(viewer.state(), LoadState::Failed);
    assert!(!viewer.open_fullscreen());
    let view = viewer.view();
    assert!(view.to_html().contains("Failed to load image"));
    assert!(elements(&view, "img").is_empty());
}

#[test]
fn test_loaded_thumbnail_fullscreen_scenario() {
    let config = AppConfig::default();
    let mut viewer = ImageViewer::new("/photos/lake.jpg", "A lake", config.media());
    viewer.on_load();
    let before = viewer.view();

    assert!(viewer.open_fullscreen());
    let open = viewer.view();
    let images = elements(&open, "img");
    assert_eq!(images.len(), 2);
    assert!(images[1].attr("src").unwrap().contains("w=1920"));
    assert!(images[0].attr("src").unwrap().contains("w=800"));
    let dialog = open
        .as_element()
        .and_then(|root| root.find(&|e| e.attr("role") == Some("dialog")))
        .expect("dialog");
    assert!(dialog.text_content().contains("A lake"));

    viewer.close_fullscreen();
    assert_eq!(viewer.state(), LoadState::Loaded);
    assert_eq!(viewer.view(), before);
}

#[test]
fn test_failures_are_isolated_per_block() {
    let deep_outline: String = (0..=mindmap::MAX_DEPTH + 1)
        .map(|level| format!("{}- item\n", "  ".repeat(level)))
        .collect();
    let document = format!(
        "# Title\n\n```mermaid\ngraph TD\nA--\n```\n\n```markmap\n{deep_outline}```\n\n```mermaid\ngraph LR\nX --> Y\n```\n\nDone.\n"
    );
    let tree = markdown::render(&document).expect("Failed to render");
    assert_eq!(tree.blocks().len(), 5);

    let html = tree.to_html();
    assert!(html.contains("Failed to render Mermaid diagram"));
    assert!(html.contains("Failed to render Markmap"));
    assert!(html.contains(r#"id="mermaid-1""#));
    assert!(html.contains("Done."));
}

#[test]
fn test_empty_markmap_fence_draws_without_error() {
    let tree = markdown::render("```markmap\n```\n\n```markmap\n   \n```\n").expect("Failed to render");
    let html = tree.to_html();
    assert!(!html.contains("Failed to render Markmap"));
    assert!(html.contains(r#"id="markmap-0""#));
    assert!(html.contains(r#"id="markmap-1""#));
}

#[test]
fn test_builder_renders_page() {
    let builder = DocumentBuilder::default();
    let page = builder
        .render_page("Notes", "# Notes\n\n[docs](https://example.com)")
        .expect("Failed to render page");
    assert!(page.contains("<title>Notes</title>"));
    assert!(page.contains(r#"target="_blank""#));
    assert!(page.contains(r#"<div class="marginalia-document">"#));
}

#[test]
fn test_builder_with_custom_rules() {
    fn plain_mermaid(_: &markdown::RenderContext<'_>, node: &markdown::Node) -> Markup {
        let body = match node.kind() {
            markdown::NodeKind::CodeBlock(block) => block.body(),
            _ => "",
        };
        Element::new("pre")
            .with_class("mermaid")
            .with_child(Markup::text(body))
            .into()
    }

    let builder = DocumentBuilder::new(AppConfig::default())
        .with_rules(RenderRules::default().with_rule(RuleKey::MermaidFence, plain_mermaid));
    let html = builder
        .render("```mermaid\ngraph TD\nA-->B\n```\n")
        .expect("Failed to render")
        .to_html();
    assert_eq!(html, "<pre class=\"mermaid\">graph TD\nA--&gt;B</pre>");
}

#[test]
fn test_viewer_paints_skeleton_before_mount() {
    let mut viewer = MarkdownViewer::new("# Hidden until mounted", MarkdownRenderer::default());
    assert!(!viewer.view().unwrap().to_html().contains("Hidden"));
    viewer.mount();
    assert!(viewer.view().unwrap().to_html().contains("Hidden until mounted"));
}

#[test]
fn test_latest_diagram_request_wins() {
    let mut block = DiagramBlock::new("mermaid-0", "graph TD\nOld-->Older", DiagramEngine::default());
    let first = block.request_render();
    let second = block.set_source("graph TD\nNew-->Newer");

    let second_result = second.run(block.engine());
    let first_result = first.run(block.engine());
    assert!(block.complete(second.ticket(), second_result));
    assert!(!block.complete(first.ticket(), first_result));

    let svg = block.artifact().expect("artifact").svg();
    assert!(svg.contains("New"));
    assert!(!svg.contains("Older"));
}

struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Denied("permission denied".to_string()))
    }
}

#[test]
fn test_clipboard_failure_is_silent() {
    let mut block = MindMapBlock::new("markmap-0", "# Root\n## Leaf", *AppConfig::default().mindmap());
    let now = Instant::now();

    assert!(!block.copy_source(&mut DeniedClipboard, now));
    assert!(!block.is_copy_acknowledged());
    assert!(block.error().is_none());

    let mut clipboard = MemoryClipboard::new();
    assert!(block.copy_source(&mut clipboard, now));
    assert_eq!(clipboard.contents(), Some("# Root\n## Leaf"));
}
