//! The component shown for one `mermaid` fence.

use std::time::Instant;

use log::{debug, warn};

use marginalia_core::html::{Element, Markup};

use super::{DiagramArtifact, DiagramEngine, RenderSequencer, Ticket};
use crate::{
    error::RenderError,
    widget::{self, Clipboard, CopyFeedback, Icon, Modal},
};

const FAILURE_NOTICE: &str = "Failed to render Mermaid diagram";
const DIALOG_TITLE: &str = "Mermaid Diagram";
const DIALOG_CLASS: &str = "max-w-[90vw] max-h-[90vh] overflow-auto";

/// A render the host should run and report back through [`DiagramBlock::complete`].
///
/// The engine call may happen anywhere (another thread, a task queue); only
/// the completion carrying the latest ticket is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    ticket: Ticket,
    target_id: String,
    source: String,
}

impl RenderRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Runs the request on `engine`.
    pub fn run(&self, engine: &DiagramEngine) -> Result<DiagramArtifact, RenderError> {
        engine.render(&self.target_id, &self.source)
    }
}

/// View state of a diagram fence.
///
/// A new block paints an empty container. Each change of source issues a
/// [`RenderRequest`]; its result replaces the container contents wholesale
/// when it commits. A failed render shows an error card with the literal
/// source instead, and is never retried.
#[derive(Debug)]
pub struct DiagramBlock {
    target_id: String,
    source: String,
    engine: DiagramEngine,
    sequencer: RenderSequencer,
    committed: Option<Result<DiagramArtifact, RenderError>>,
    copy: CopyFeedback,
    fullscreen: Modal<Result<DiagramArtifact, RenderError>>,
}

impl DiagramBlock {
    /// Creates a block rendering into `target_id`. Nothing is rendered yet.
    pub fn new(target_id: impl Into<String>, source: impl Into<String>, engine: DiagramEngine) -> Self {
        Self {
            target_id: target_id.into(),
            source: source.into(),
            engine,
            sequencer: RenderSequencer::new(),
            committed: None,
            copy: CopyFeedback::default(),
            fullscreen: Modal::new(DIALOG_TITLE),
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn engine(&self) -> &DiagramEngine {
        &self.engine
    }

    /// Replaces the source and requests a render of it.
    pub fn set_source(&mut self, source: impl Into<String>) -> RenderRequest {
        self.source = source.into();
        self.request_render()
    }

    /// Requests a render of the current source.
    pub fn request_render(&mut self) -> RenderRequest {
        RenderRequest {
            ticket: self.sequencer.issue(),
            target_id: self.target_id.clone(),
            source: self.source.clone(),
        }
    }

    /// Commits the result of the render issued with `ticket`.
    ///
    /// Returns `false` and drops `result` if a newer render was requested
    /// since.
    pub fn complete(&mut self, ticket: Ticket, result: Result<DiagramArtifact, RenderError>) -> bool {
        if !self.sequencer.try_commit(ticket) {
            return false;
        }

        if let Err(err) = &result {
            warn!(target_id = self.target_id.as_str(), err:% = err; "Diagram render failed");
        }
        self.committed = Some(result);

        // An open dialog shows the current source, not the one it was opened with
        if self.fullscreen.is_open() {
            self.fullscreen.open(self.render_fullscreen());
        }
        true
    }

    /// Requests, runs and commits a render of the current source.
    pub fn render_now(&mut self) {
        let request = self.request_render();
        let result = request.run(&self.engine);
        self.complete(request.ticket(), result);
    }

    /// Returns true while a requested render has not committed.
    pub fn is_pending(&self) -> bool {
        self.sequencer.is_pending()
    }

    /// The committed artifact, if the last committed render succeeded.
    pub fn artifact(&self) -> Option<&DiagramArtifact> {
        self.committed.as_ref()?.as_ref().ok()
    }

    /// The committed error, if the last committed render failed.
    pub fn error(&self) -> Option<&RenderError> {
        self.committed.as_ref()?.as_ref().err()
    }

    /// Copies the raw source to `clipboard`.
    pub fn copy_source(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> bool {
        self.copy.copy(clipboard, &self.source, now)
    }

    /// Advances timed view state, such as the copied acknowledgment.
    pub fn tick(&mut self, now: Instant) {
        self.copy.tick(now);
    }

    pub fn is_copy_acknowledged(&self) -> bool {
        self.copy.is_acknowledged()
    }

    /// Opens the fullscreen dialog with its own render of the source.
    pub fn open_fullscreen(&mut self) {
        debug!(target_id = self.target_id.as_str(); "Opening fullscreen diagram");
        let rendered = self.render_fullscreen();
        self.fullscreen.open(rendered);
    }

    pub fn close_fullscreen(&mut self) {
        self.fullscreen.close();
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_open()
    }

    /// The artifact rendered for the fullscreen dialog, while it is open.
    pub fn fullscreen_artifact(&self) -> Option<&DiagramArtifact> {
        self.fullscreen.content()?.as_ref().ok()
    }

    fn fullscreen_target(&self) -> String {
        format!("{}-fullscreen", self.target_id)
    }

    fn render_fullscreen(&self) -> Result<DiagramArtifact, RenderError> {
        self.engine.render(&self.fullscreen_target(), &self.source)
    }

    /// Renders the block's current view.
    pub fn view(&self) -> Markup {
        self.build_view(false).into()
    }

    /// Renders the view written into a static page.
    ///
    /// A closed fullscreen dialog with its own render is included so the
    /// page script can reveal it, and the root carries the source for the
    /// copy button.
    pub fn view_static(&self) -> Markup {
        self.build_view(true).into()
    }

    fn build_view(&self, static_page: bool) -> Element {
        let mut root = Element::new("div")
            .with_class("marginalia-diagram")
            .with_attr("data-dialect", "mermaid")
            .with_attr("data-target", self.target_id.as_str());

        match &self.committed {
            Some(Err(err)) => {
                root.push(widget::error_card(FAILURE_NOTICE, &err.to_string(), &self.source));
                return root;
            }
            Some(Ok(_)) if !self.is_pending() => root.set_attr("data-state", "rendered"),
            _ => root.set_attr("data-state", "pending"),
        }

        let copy = if static_page {
            root.set_attr("data-source", self.source.as_str());
            widget::swappable_copy_button()
        } else {
            widget::copy_button(self.copy.is_acknowledged())
        };
        let toolbar = Element::new("div")
            .with_class("marginalia-toolbar")
            .with_child(copy)
            .with_child(widget::icon_button("fullscreen", "View fullscreen", Icon::Maximize));

        let mut content = Element::new("div")
            .with_class("marginalia-diagram-content")
            .with_attr("id", format!("{}-container", self.target_id));
        if let Some(artifact) = self.artifact() {
            content.push(artifact.to_markup());
        }

        root.push(
            widget::card("relative group")
                .with_child(toolbar)
                .with_child(content),
        );

        let dialog_id = format!("{}-dialog", self.target_id);
        if let Some(rendered) = self.fullscreen.content() {
            if let Some(dialog) = self.fullscreen.view(&dialog_id, DIALOG_CLASS, self.dialog_body(rendered)) {
                root.push(dialog);
            }
        } else if static_page {
            let rendered = self.render_fullscreen();
            root.push(
                self.fullscreen
                    .view_closed(&dialog_id, DIALOG_CLASS, self.dialog_body(&rendered)),
            );
        }

        root
    }

    fn dialog_body(&self, rendered: &Result<DiagramArtifact, RenderError>) -> Markup {
        let body = match rendered {
            Ok(artifact) => artifact.to_markup(),
            Err(err) => widget::error_card(FAILURE_NOTICE, &err.to_string(), &self.source).into(),
        };
        Element::new("div")
            .with_class("marginalia-dialog-body")
            .with_child(body)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::widget::MemoryClipboard;

    fn block(source: &str) -> DiagramBlock {
        DiagramBlock::new("mermaid-0", source, DiagramEngine::default())
    }

    fn element(markup: &Markup) -> &Element {
        markup.as_element().unwrap()
    }

    #[test]
    fn test_new_block_paints_empty_container() {
        let block = block("graph TD\nA-->B");
        let view = block.view();
        let root = element(&view);
        assert_eq!(root.attr("data-state"), Some("pending"));
        let content = root.find(&|e| e.has_class("marginalia-diagram-content")).unwrap();
        assert!(content.children().is_empty());
    }

    #[test]
    fn test_render_now_fills_container() {
        let mut block = block("graph TD\nA-->B");
        block.render_now();
        assert!(block.artifact().is_some());

        let html = block.view().to_html();
        assert!(html.contains(r#"data-state="rendered""#));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn test_invalid_source_shows_error_card_with_source() {
        let mut block = block("graph TD\nA--");
        block.render_now();
        assert!(block.error().is_some());

        let view = block.view();
        let root = element(&view);
        let card = root.find(&|e| e.has_class("marginalia-error-card")).unwrap();
        assert!(card.text_content().contains(FAILURE_NOTICE));
        let pre = card.find(&|e| e.tag() == "pre").unwrap();
        assert_eq!(pre.text_content(), "graph TD\nA--");
        assert!(root.find(&|e| e.tag() == "svg").is_none());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut block = block("graph TD\nA-->B");
        let slow = block.request_render();
        let fast = block.set_source("graph TD\nX-->Y");

        let fast_result = fast.run(block.engine());
        let slow_result = slow.run(block.engine());
        assert!(block.complete(fast.ticket(), fast_result));
        assert!(!block.complete(slow.ticket(), slow_result));

        assert!(block.artifact().unwrap().svg().contains(r#"data-node="X""#));
    }

    #[test]
    fn test_fixing_source_recovers_from_error() {
        let mut block = block("graph TD\nA--");
        block.render_now();
        assert!(block.error().is_some());

        let request = block.set_source("graph TD\nA-->B");
        let result = request.run(block.engine());
        block.complete(request.ticket(), result);
        assert!(block.error().is_none());
        assert!(block.artifact().is_some());
    }

    #[test]
    fn test_copy_acknowledgment() {
        let mut block = block("graph TD\nA-->B");
        block.render_now();
        let mut clipboard = MemoryClipboard::new();
        let now = Instant::now();

        assert!(block.copy_source(&mut clipboard, now));
        assert_eq!(clipboard.contents(), Some("graph TD\nA-->B"));
        assert!(block.view().to_html().contains(r#"data-icon="check""#));

        block.tick(now + Duration::from_secs(2));
        assert!(block.view().to_html().contains(r#"data-icon="copy""#));
    }

    #[test]
    fn test_fullscreen_renders_independently() {
        let mut block = block("graph TD\nA-->B");
        block.render_now();
        block.open_fullscreen();

        let inline = block.artifact().unwrap();
        let fullscreen = block.fullscreen_artifact().unwrap();
        assert_eq!(fullscreen.target_id(), "mermaid-0-fullscreen");
        assert_ne!(inline.svg(), fullscreen.svg());
        assert!(block.view().to_html().contains(DIALOG_TITLE));

        block.close_fullscreen();
        assert!(!block.is_fullscreen());
        assert!(block.artifact().is_some());
        assert!(!block.view().to_html().contains(DIALOG_TITLE));
    }

    #[test]
    fn test_static_view_ships_closed_dialog_and_source() {
        let mut block = block("graph TD\nA-->B");
        block.render_now();

        let view = block.view_static();
        let root = element(&view);
        assert_eq!(root.attr("data-source"), Some("graph TD\nA-->B"));
        let overlay = root.find(&|e| e.has_class("marginalia-dialog-overlay")).unwrap();
        assert_eq!(overlay.attr("data-state"), Some("closed"));
        let html = view.to_html();
        assert!(html.contains(r#"id="mermaid-0-fullscreen""#));
        assert!(html.contains(r#"data-icon="check""#));
        assert!(!block.is_fullscreen());
        assert!(block.fullscreen_artifact().is_none());
    }

    #[test]
    fn test_static_view_of_failed_block_is_error_card_only() {
        let mut block = block("graph TD\nA--");
        block.render_now();
        let html = block.view_static().to_html();
        assert!(html.contains("marginalia-error-card"));
        assert!(!html.contains("marginalia-dialog-overlay"));
    }
}
