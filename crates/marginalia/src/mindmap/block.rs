//! The component shown for one `markmap` fence.

use std::time::Instant;

use log::{debug, warn};

use marginalia_core::{
    geometry::Point,
    html::{Element, Markup},
};

use super::{MindMap, transform};
use crate::{
    config::MindMapConfig,
    error::RenderError,
    widget::{self, Clipboard, CopyFeedback, Icon, Modal},
};

const FAILURE_NOTICE: &str = "Failed to render Markmap";
const DIALOG_TITLE: &str = "Markmap Visualization";
const DIALOG_CLASS: &str = "max-w-[95vw] max-h-[95vh]";

/// View state of a mind-map fence.
///
/// Transforming outline text is synchronous, so the block renders as soon
/// as it is created and again whenever its source changes. A changed source
/// replaces the tree in place, keeping the surface but resetting folds.
#[derive(Debug)]
pub struct MindMapBlock {
    target_id: String,
    source: String,
    config: MindMapConfig,
    state: Result<MindMap, RenderError>,
    copy: CopyFeedback,
    fullscreen: Modal<Result<MindMap, RenderError>>,
}

impl MindMapBlock {
    pub fn new(target_id: impl Into<String>, source: impl Into<String>, config: MindMapConfig) -> Self {
        let target_id = target_id.into();
        let source = source.into();
        let state = Self::create(&target_id, &source, config, false);
        Self {
            target_id,
            source,
            config,
            state,
            copy: CopyFeedback::default(),
            fullscreen: Modal::new(DIALOG_TITLE),
        }
    }

    fn create(
        target_id: &str,
        source: &str,
        config: MindMapConfig,
        fullscreen: bool,
    ) -> Result<MindMap, RenderError> {
        let surface = if fullscreen {
            config.fullscreen_viewport()
        } else {
            config.inline_viewport()
        };
        transform(source)
            .map(|outline| MindMap::create(target_id, surface, config, outline))
            .inspect_err(|err| {
                warn!(target_id = target_id, err:% = err; "Mind map render failed");
            })
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replaces the source, updating the existing surface when there is one.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        match transform(&self.source) {
            Ok(outline) => match &mut self.state {
                Ok(map) => map.set_data(outline),
                Err(_) => {
                    self.state = Ok(MindMap::create(
                        self.target_id.as_str(),
                        self.config.inline_viewport(),
                        self.config,
                        outline,
                    ));
                }
            },
            Err(err) => {
                warn!(target_id = self.target_id.as_str(), err:% = err; "Mind map render failed");
                self.state = Err(err);
            }
        }
        self.refresh_fullscreen();
    }

    fn refresh_fullscreen(&mut self) {
        if self.fullscreen.is_open() {
            let rendered = self.render_fullscreen();
            self.fullscreen.open(rendered);
        }
    }

    pub fn mind_map(&self) -> Option<&MindMap> {
        self.state.as_ref().ok()
    }

    /// The inline surface, for fold, zoom and pan interactions.
    pub fn mind_map_mut(&mut self) -> Option<&mut MindMap> {
        self.state.as_mut().ok()
    }

    pub fn error(&self) -> Option<&RenderError> {
        self.state.as_ref().err()
    }

    /// Copies the raw source to `clipboard`.
    pub fn copy_source(&mut self, clipboard: &mut dyn Clipboard, now: Instant) -> bool {
        self.copy.copy(clipboard, &self.source, now)
    }

    pub fn tick(&mut self, now: Instant) {
        self.copy.tick(now);
    }

    pub fn is_copy_acknowledged(&self) -> bool {
        self.copy.is_acknowledged()
    }

    /// Opens the fullscreen dialog on a surface of its own.
    ///
    /// Folds and zoom made inline are not carried over.
    pub fn open_fullscreen(&mut self) {
        debug!(target_id = self.target_id.as_str(); "Opening fullscreen mind map");
        let rendered = self.render_fullscreen();
        self.fullscreen.open(rendered);
    }

    fn render_fullscreen(&self) -> Result<MindMap, RenderError> {
        let target_id = format!("{}-fullscreen", self.target_id);
        Self::create(&target_id, &self.source, self.config, true)
    }

    /// The fullscreen surface, while the dialog is open.
    pub fn fullscreen_mut(&mut self) -> Option<&mut MindMap> {
        self.fullscreen.content_mut()?.as_mut().ok()
    }

    pub fn close_fullscreen(&mut self) {
        self.fullscreen.close();
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_open()
    }

    /// Handles a wheel step over the inline surface.
    pub fn wheel(&mut self, delta_y: f32, anchor: Point) {
        if let Some(map) = self.mind_map_mut() {
            let factor = if delta_y < 0.0 { 1.1 } else { 1.0 / 1.1 };
            map.zoom_by(factor, anchor);
        }
    }

    pub fn view(&self) -> Markup {
        self.build_view(false).into()
    }

    /// Renders the view written into a static page, with a closed
    /// fullscreen dialog on its own surface and the source for copying.
    pub fn view_static(&self) -> Markup {
        self.build_view(true).into()
    }

    fn build_view(&self, static_page: bool) -> Element {
        let mut root = Element::new("div")
            .with_class("marginalia-mindmap")
            .with_attr("data-dialect", "markmap")
            .with_attr("data-target", self.target_id.as_str());

        let map = match &self.state {
            Ok(map) => map,
            Err(err) => {
                root.set_attr("data-state", "error");
                root.push(widget::error_card(FAILURE_NOTICE, &err.to_string(), &self.source));
                return root;
            }
        };
        root.set_attr("data-state", "rendered");

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

        let size = map.viewport().size();
        let surface = Element::new("div")
            .with_class("marginalia-mindmap-viewport")
            .with_attr("id", format!("{}-container", self.target_id))
            .with_attr(
                "style",
                format!("height: {}px; max-width: {}px", size.height(), size.width()),
            )
            .with_child(map.to_markup());

        root.push(
            widget::card("relative group")
                .with_child(toolbar)
                .with_child(surface),
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

    fn dialog_body(&self, rendered: &Result<MindMap, RenderError>) -> Markup {
        let body = match rendered {
            Ok(map) => map.to_markup(),
            Err(err) => widget::error_card(FAILURE_NOTICE, &err.to_string(), &self.source).into(),
        };
        Element::new("div")
            .with_class("marginalia-dialog-body marginalia-mindmap-viewport")
            .with_child(body)
            .into()
    }
}
