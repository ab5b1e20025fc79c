//! Mind-map rendering for `markmap` code fences.
//!
//! [`transform`] turns outline text into a tree. A [`MindMap`] binds that
//! tree to one drawing surface: it owns the fold state and the [`Viewport`],
//! and re-fits the drawing whenever the tree or its folds change. Zooming
//! and panning only move the viewport.
//!
//! ```
//! use marginalia::{config::MindMapConfig, mindmap::{self, MindMap}};
//!
//! let outline = mindmap::transform("# Root\n## Left\n## Right").unwrap();
//! let config = MindMapConfig::default();
//! let mut map = MindMap::create("markmap-0", config.inline_viewport(), config, outline);
//! assert!(map.toggle_fold(&[]));
//! assert!(map.to_svg().contains("Root"));
//! ```

mod block;
mod export;
mod layout;
mod viewport;

pub use block::MindMapBlock;
pub use viewport::Viewport;

use std::collections::BTreeSet;

use log::{debug, info};

use marginalia_core::{
    geometry::{Point, Size},
    html::Markup,
    theme::DiagramTheme,
};
use marginalia_parser::outline::{self, Outline};

use crate::{config::MindMapConfig, diagram::theme_text, error::RenderError};

use layout::MindMapLayout;

/// Deepest outline the recursive tree layout accepts.
pub const MAX_DEPTH: usize = 64;

/// Transforms outline text into a mind-map tree.
///
/// Text without any headings, items or paragraphs becomes a lone empty root.
///
/// # Errors
///
/// Returns [`RenderError::Layout`] when the outline nests deeper than
/// [`MAX_DEPTH`] levels.
pub fn transform(source: &str) -> Result<Outline, RenderError> {
    let outline = outline::transform(source);
    let height = outline.root().height();
    if height > MAX_DEPTH {
        return Err(RenderError::Layout(format!(
            "outline nests {height} levels deep; at most {MAX_DEPTH} can be drawn"
        )));
    }
    Ok(outline)
}

/// An outline drawn on one surface, with its fold and view state.
#[derive(Debug, Clone)]
pub struct MindMap {
    target_id: String,
    config: MindMapConfig,
    outline: Outline,
    folded: BTreeSet<Vec<usize>>,
    viewport: Viewport,
    layout: MindMapLayout,
}

impl MindMap {
    /// Draws `outline` on a surface of `surface` size, fitted to it.
    pub fn create(
        target_id: impl Into<String>,
        surface: Size,
        config: MindMapConfig,
        outline: Outline,
    ) -> Self {
        let target_id = target_id.into();
        info!(target_id = target_id.as_str(), nodes = outline.node_count(); "Creating mind map");

        let layout = Self::compute_layout(&outline, &BTreeSet::new(), &config);
        let mut map = Self {
            target_id,
            config,
            outline,
            folded: BTreeSet::new(),
            viewport: Viewport::new(surface),
            layout,
        };
        map.fit();
        map
    }

    fn compute_layout(
        outline: &Outline,
        folded: &BTreeSet<Vec<usize>>,
        config: &MindMapConfig,
    ) -> MindMapLayout {
        let text = theme_text(DiagramTheme::current());
        layout::layout(outline, folded, config, &text)
    }

    fn relayout(&mut self) {
        self.layout = Self::compute_layout(&self.outline, &self.folded, &self.config);
        self.fit();
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Replaces the tree, clearing folds.
    pub fn set_data(&mut self, outline: Outline) {
        self.outline = outline;
        self.folded.clear();
        self.relayout();
    }

    /// Fits the whole visible tree into the surface.
    pub fn fit(&mut self) {
        self.viewport
            .fit(self.layout.bounds(), self.config.max_fit_scale());
    }

    /// Folds or unfolds the node at `path`.
    ///
    /// Returns `false` when `path` names no node or a leaf.
    pub fn toggle_fold(&mut self, path: &[usize]) -> bool {
        match self.outline.get(path) {
            Some(node) if !node.is_leaf() => {}
            _ => return false,
        }

        if !self.folded.remove(path) {
            self.folded.insert(path.to_vec());
        }
        debug!(target_id = self.target_id.as_str(), path:? = path; "Toggled fold");
        self.relayout();
        true
    }

    pub fn is_folded(&self, path: &[usize]) -> bool {
        self.folded.contains(path)
    }

    /// Number of nodes currently drawn.
    pub fn visible_nodes(&self) -> usize {
        self.layout.nodes().len()
    }

    /// Zooms by `factor` around the surface point `anchor`.
    pub fn zoom_by(&mut self, factor: f32, anchor: Point) {
        self.viewport.zoom_by(factor, anchor);
    }

    /// Pans by a surface-space offset.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.viewport.pan_by(dx, dy);
    }

    /// The current drawing as an SVG document.
    pub fn to_svg(&self) -> String {
        export::export(
            &self.target_id,
            &self.layout,
            &self.viewport,
            DiagramTheme::current(),
            &theme_text(DiagramTheme::current()),
        )
    }

    pub fn to_markup(&self) -> Markup {
        Markup::raw(self.to_svg())
    }
}
