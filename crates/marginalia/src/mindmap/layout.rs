//! Horizontal tidy-tree layout.
//!
//! The root sits on the left and every child column grows to the right.
//! A node's subtree takes the larger of its own height and the stacked
//! heights of its children, and each parent is vertically centered on the
//! block its children occupy. Folded nodes are laid out as leaves.

use std::collections::BTreeSet;

use marginalia_core::{
    draw::{Text, TextDefinition},
    geometry::{Bounds, Insets, Point, Size},
};
use marginalia_parser::outline::{Outline, OutlineNode};

use crate::config::MindMapConfig;

const LABEL_PADDING_X: f32 = 6.0;
const LABEL_PADDING_Y: f32 = 4.0;

/// A positioned outline node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlacedNode {
    path: Vec<usize>,
    content: String,
    depth: usize,
    branch: usize,
    bounds: Bounds,
    has_children: bool,
    folded: bool,
}

impl PlacedNode {
    /// Child indices from the root down to this node.
    pub(crate) fn path(&self) -> &[usize] {
        &self.path
    }

    pub(crate) fn content(&self) -> &str {
        &self.content
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Index of the top-level branch this node belongs to.
    pub(crate) fn branch(&self) -> usize {
        self.branch
    }

    /// The label box; its bottom edge is the node's underline.
    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn has_children(&self) -> bool {
        self.has_children
    }

    pub(crate) fn is_folded(&self) -> bool {
        self.folded
    }

    /// Where links from the parent arrive: the left end of the underline.
    pub(crate) fn link_in(&self) -> Point {
        Point::new(self.bounds.min_x(), self.bounds.max_y())
    }

    /// Where links to children leave: the right end of the underline.
    pub(crate) fn link_out(&self) -> Point {
        Point::new(self.bounds.max_x(), self.bounds.max_y())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MindMapLayout {
    nodes: Vec<PlacedNode>,
    links: Vec<(usize, usize)>,
    bounds: Bounds,
}

impl MindMapLayout {
    /// Visible nodes in pre-order.
    pub(crate) fn nodes(&self) -> &[PlacedNode] {
        &self.nodes
    }

    /// `(parent, child)` indices into [`MindMapLayout::nodes`].
    pub(crate) fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Label size and subtree extent of a node, before positioning.
struct Measured {
    label: Size,
    subtree_height: f32,
    folded: bool,
    children: Vec<Measured>,
}

pub(crate) fn layout(
    outline: &Outline,
    folded: &BTreeSet<Vec<usize>>,
    config: &MindMapConfig,
    text: &TextDefinition,
) -> MindMapLayout {
    let mut path = Vec::new();
    let measured = measure(outline.root(), &mut path, folded, config, text);

    let mut placer = Placer {
        config,
        nodes: Vec::new(),
        links: Vec::new(),
    };
    let mut path = Vec::new();
    placer.place(outline.root(), &measured, &mut path, None, 0.0, 0.0, 0);

    let bounds = placer
        .nodes
        .iter()
        .map(PlacedNode::bounds)
        .reduce(|acc, bounds| acc.merge(&bounds))
        .unwrap_or_default();

    MindMapLayout {
        nodes: placer.nodes,
        links: placer.links,
        bounds,
    }
}

fn measure(
    node: &OutlineNode,
    path: &mut Vec<usize>,
    folded: &BTreeSet<Vec<usize>>,
    config: &MindMapConfig,
    text: &TextDefinition,
) -> Measured {
    let label = Text::new(text, node.content())
        .calculate_size()
        .add_padding(Insets::new(
            LABEL_PADDING_Y,
            LABEL_PADDING_X,
            LABEL_PADDING_Y,
            LABEL_PADDING_X,
        ));
    let is_folded = !node.is_leaf() && folded.contains(path.as_slice());

    let children: Vec<Measured> = if is_folded {
        Vec::new()
    } else {
        node.children()
            .iter()
            .enumerate()
            .map(|(index, child)| {
                path.push(index);
                let measured = measure(child, path, folded, config, text);
                path.pop();
                measured
            })
            .collect()
    };

    let stacked = children.iter().map(|c| c.subtree_height).sum::<f32>()
        + config.vertical_spacing() * children.len().saturating_sub(1) as f32;

    Measured {
        label,
        subtree_height: label.height().max(stacked),
        folded: is_folded,
        children,
    }
}

struct Placer<'a> {
    config: &'a MindMapConfig,
    nodes: Vec<PlacedNode>,
    links: Vec<(usize, usize)>,
}

impl Placer<'_> {
    /// Places `node` with its subtree starting at `top` and its label at `left`.
    #[allow(clippy::too_many_arguments)]
    fn place(
        &mut self,
        node: &OutlineNode,
        measured: &Measured,
        path: &mut Vec<usize>,
        parent: Option<usize>,
        left: f32,
        top: f32,
        branch: usize,
    ) {
        let center_y = top + measured.subtree_height / 2.0;
        let bounds = Bounds::from_origin(
            Point::new(left, center_y - measured.label.height() / 2.0),
            measured.label,
        );

        let index = self.nodes.len();
        self.nodes.push(PlacedNode {
            path: path.clone(),
            content: node.content().to_string(),
            depth: path.len(),
            branch,
            bounds,
            has_children: !node.is_leaf(),
            folded: measured.folded,
        });
        if let Some(parent) = parent {
            self.links.push((parent, index));
        }

        let stacked = measured
            .children
            .iter()
            .map(|c| c.subtree_height)
            .sum::<f32>()
            + self.config.vertical_spacing() * measured.children.len().saturating_sub(1) as f32;
        let child_left = bounds.max_x() + self.config.horizontal_spacing();
        let mut child_top = center_y - stacked / 2.0;

        for (child_index, (child, child_measured)) in
            node.children().iter().zip(&measured.children).enumerate()
        {
            // Top-level children start their own branch
            let child_branch = if path.is_empty() { child_index } else { branch };
            path.push(child_index);
            self.place(
                child,
                child_measured,
                path,
                Some(index),
                child_left,
                child_top,
                child_branch,
            );
            path.pop();
            child_top += child_measured.subtree_height + self.config.vertical_spacing();
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use marginalia_parser::outline;

    use super::*;

    const SAMPLE: &str = "# Central Idea\n\n## Branch 1\n\n- Sub-topic A\n- Sub-topic B\n\n## Branch 2\n\n- Sub-topic C\n\n## Branch 3\n";

    fn lay_out(folded: &[Vec<usize>]) -> MindMapLayout {
        let outline = outline::transform(SAMPLE);
        let folded: BTreeSet<Vec<usize>> = folded.iter().cloned().collect();
        layout(&outline, &folded, &MindMapConfig::default(), &TextDefinition::new())
    }

    fn node<'a>(layout: &'a MindMapLayout, path: &[usize]) -> &'a PlacedNode {
        layout.nodes().iter().find(|n| n.path() == path).unwrap()
    }

    #[test]
    fn test_every_node_placed_once() {
        let layout = lay_out(&[]);
        assert_eq!(layout.nodes().len(), 7);
        assert_eq!(layout.links().len(), 6);
        assert_eq!(layout.nodes()[0].content(), "Central Idea");
    }

    #[test]
    fn test_children_are_right_of_parent() {
        let layout = lay_out(&[]);
        for &(parent, child) in layout.links() {
            let parent = &layout.nodes()[parent];
            let child = &layout.nodes()[child];
            assert!(child.bounds().min_x() > parent.bounds().max_x());
            assert_eq!(child.depth(), parent.depth() + 1);
        }
    }

    #[test]
    fn test_siblings_do_not_overlap() {
        let layout = lay_out(&[]);
        let branches: Vec<Bounds> = (0..3).map(|i| node(&layout, &[i]).bounds()).collect();
        assert!(branches[0].max_y() <= branches[1].min_y());
        assert!(branches[1].max_y() <= branches[2].min_y());
    }

    #[test]
    fn test_parent_centered_on_children() {
        let layout = lay_out(&[]);
        let parent = node(&layout, &[0]).bounds().center().y();
        let first = node(&layout, &[0, 0]).bounds().center().y();
        let second = node(&layout, &[0, 1]).bounds().center().y();
        assert_approx_eq!(f32, parent, (first + second) / 2.0, epsilon = 0.01);
    }

    #[test]
    fn test_branch_inherited_from_top_level_child() {
        let layout = lay_out(&[]);
        assert_eq!(node(&layout, &[1, 0]).branch(), 1);
        assert_eq!(node(&layout, &[2]).branch(), 2);
    }

    #[test]
    fn test_folded_node_hides_subtree() {
        let layout = lay_out(&[vec![0]]);
        assert_eq!(layout.nodes().len(), 5);
        let branch = node(&layout, &[0]);
        assert!(branch.is_folded());
        assert!(branch.has_children());
        assert!(layout.nodes().iter().all(|n| !n.path().starts_with(&[0, 0])));
    }

    #[test]
    fn test_folding_a_leaf_is_ignored() {
        let layout = lay_out(&[vec![2]]);
        assert_eq!(layout.nodes().len(), 7);
        assert!(!node(&layout, &[2]).is_folded());
    }
}
