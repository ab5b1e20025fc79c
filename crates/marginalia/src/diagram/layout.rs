//! Layered placement of flowchart nodes, edges and subgraph boxes.
//!
//! Rank assignment and in-rank ordering come from `rust-sugiyama`. The
//! result is computed top-down and then mapped onto the chart's direction,
//! so only the final coordinate transform knows about `LR`, `BT` and `RL`.

use std::{
    collections::{BTreeMap, BTreeSet},
    panic,
};

use log::{debug, trace};
use rust_sugiyama::configure::Config;

use marginalia_core::{
    draw::{Text, TextDefinition},
    geometry::{Bounds, Insets, Point, Size},
};
use marginalia_parser::flowchart::{Direction, Flowchart, NodeShape};

use crate::{config::LayoutConfig, error::RenderError};

/// Horizontal padding between a node label and its shape.
const NODE_PADDING_X: f32 = 15.0;
const NODE_PADDING_Y: f32 = 8.0;
/// Vertical radius of a cylinder's elliptical caps.
pub(crate) const CYLINDER_RY: f32 = 6.0;
/// Distance of a subroutine's inner rules from its sides.
pub(crate) const SUBROUTINE_INSET: f32 = 8.0;
const CLUSTER_PADDING: f32 = 16.0;
const LABEL_PADDING: f32 = 4.0;
/// `rust-sugiyama` spacing between neighbours, divided back out of its x coordinates.
const VERTEX_SPACING: f64 = 10.0;
const SELF_LOOP_REACH: f32 = 40.0;

#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeBox {
    center: Point,
    size: Size,
    shape: NodeShape,
}

impl NodeBox {
    pub(crate) fn center(&self) -> Point {
        self.center
    }

    pub(crate) fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.center.to_bounds(self.size)
    }

    /// Point where the segment from the center toward `target` leaves the shape.
    fn boundary_toward(&self, target: Point) -> Point {
        let dx = target.x() - self.center.x();
        let dy = target.y() - self.center.y();
        if dx.abs() < f32::EPSILON && dy.abs() < f32::EPSILON {
            return self.center;
        }

        let half_w = self.size.width() / 2.0;
        let half_h = self.size.height() / 2.0;
        let t = match self.shape {
            NodeShape::Circle => half_w / dx.hypot(dy),
            NodeShape::Diamond => 1.0 / (dx.abs() / half_w + dy.abs() / half_h),
            _ => (half_w / dx.abs()).min(half_h / dy.abs()),
        };
        let t = t.min(1.0);
        self.center.add_point(Point::new(dx * t, dy * t))
    }

    fn translate(&mut self, offset: Point) {
        self.center = self.center.add_point(offset);
    }
}

/// A measured label positioned by its center.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LabelBox {
    center: Point,
    size: Size,
}

impl LabelBox {
    pub(crate) fn center(&self) -> Point {
        self.center
    }

    pub(crate) fn size(&self) -> Size {
        self.size
    }

    fn bounds(&self) -> Bounds {
        self.center.to_bounds(self.size)
    }
}

/// A cubic edge path between two node boundaries.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EdgeRoute {
    edge: usize,
    start: Point,
    controls: (Point, Point),
    end: Point,
    label: Option<LabelBox>,
}

impl EdgeRoute {
    /// Index of the routed edge in [`Flowchart::edges`].
    pub(crate) fn edge(&self) -> usize {
        self.edge
    }

    pub(crate) fn label(&self) -> Option<LabelBox> {
        self.label
    }

    pub(crate) fn path_data(&self) -> String {
        let (c1, c2) = self.controls;
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x(),
            self.start.y(),
            c1.x(),
            c1.y(),
            c2.x(),
            c2.y(),
            self.end.x(),
            self.end.y()
        )
    }

    fn translate(&mut self, offset: Point) {
        self.start = self.start.add_point(offset);
        self.end = self.end.add_point(offset);
        self.controls = (
            self.controls.0.add_point(offset),
            self.controls.1.add_point(offset),
        );
        if let Some(label) = &mut self.label {
            label.center = label.center.add_point(offset);
        }
    }
}

/// A titled box drawn around the members of a subgraph.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClusterBox {
    subgraph: usize,
    bounds: Bounds,
    title: LabelBox,
}

impl ClusterBox {
    /// Index of the subgraph in [`Flowchart::subgraphs`].
    pub(crate) fn subgraph(&self) -> usize {
        self.subgraph
    }

    pub(crate) fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn title(&self) -> LabelBox {
        self.title
    }
}

/// The positioned chart, with the top-left content corner at `(padding, padding)`.
#[derive(Debug, Clone)]
pub(crate) struct FlowLayout {
    nodes: Vec<NodeBox>,
    edges: Vec<EdgeRoute>,
    clusters: Vec<ClusterBox>,
    size: Size,
}

impl FlowLayout {
    /// Node boxes in [`Flowchart::nodes`] order.
    pub(crate) fn nodes(&self) -> &[NodeBox] {
        &self.nodes
    }

    pub(crate) fn edges(&self) -> &[EdgeRoute] {
        &self.edges
    }

    /// Cluster boxes, outermost first so nested boxes draw on top.
    pub(crate) fn clusters(&self) -> &[ClusterBox] {
        &self.clusters
    }

    /// Total drawing size including padding.
    pub(crate) fn size(&self) -> Size {
        self.size
    }
}

/// Where `rust-sugiyama` put a node.
#[derive(Debug, Clone, Copy)]
struct Placement {
    component: usize,
    rank: usize,
    order: f64,
}

/// Lays out `chart`, measuring labels with `text`.
pub(crate) fn layout(
    chart: &Flowchart,
    config: &LayoutConfig,
    text: &TextDefinition,
) -> Result<FlowLayout, RenderError> {
    let node_sizes: Vec<(NodeShape, Size)> = chart
        .nodes()
        .map(|node| {
            let label = Text::new(text, node.label()).calculate_size();
            (node.shape(), shape_size(node.shape(), label))
        })
        .collect();

    let mut edge_pairs: Vec<(u32, u32)> = Vec::new();
    for edge in chart.edges() {
        if let (Some(from), Some(to)) = (chart.node_index(edge.from()), chart.node_index(edge.to())) {
            // Self-loops are routed separately
            if from != to {
                edge_pairs.push((from as u32, to as u32));
            }
        }
    }

    let placements = rank_nodes(node_sizes.len(), &edge_pairs)?;
    let mut nodes = place_nodes(&node_sizes, &placements, chart.direction(), config);
    let mut clusters = place_clusters(chart, &nodes, text);
    let mut edges = route_edges(chart, &nodes, text);

    let content = nodes
        .iter()
        .map(NodeBox::bounds)
        .chain(clusters.iter().map(|cluster| cluster.bounds))
        .chain(edges.iter().filter_map(|route| route.label.map(|label| label.bounds())))
        .chain(edges.iter().map(route_bounds))
        .reduce(|acc, bounds| acc.merge(&bounds))
        .unwrap_or_default();

    let padding = config.padding();
    let offset = Point::new(padding - content.min_x(), padding - content.min_y());
    for node in &mut nodes {
        node.translate(offset);
    }
    for cluster in &mut clusters {
        cluster.bounds = cluster.bounds.translate(offset);
        cluster.title.center = cluster.title.center.add_point(offset);
    }
    for route in &mut edges {
        route.translate(offset);
    }

    let size = Size::new(
        content.width() + padding * 2.0,
        content.height() + padding * 2.0,
    );
    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        clusters = clusters.len(),
        width = size.width(),
        height = size.height();
        "Flowchart laid out"
    );

    Ok(FlowLayout {
        nodes,
        edges,
        clusters,
        size,
    })
}

/// Outer size of a node shape holding a label of `label` size.
fn shape_size(shape: NodeShape, label: Size) -> Size {
    let width = label.width() + NODE_PADDING_X * 2.0;
    let height = label.height() + NODE_PADDING_Y * 2.0;
    match shape {
        NodeShape::Rect | NodeShape::Rounded => Size::new(width, height),
        NodeShape::Stadium | NodeShape::Hexagon => Size::new(width + height / 2.0, height),
        NodeShape::Flag => Size::new(width + height / 4.0, height),
        NodeShape::Subroutine => Size::new(width + SUBROUTINE_INSET * 2.0, height),
        NodeShape::Cylinder => Size::new(width, height + CYLINDER_RY * 2.0),
        NodeShape::Circle => {
            let diameter = width.max(height);
            Size::new(diameter, diameter)
        }
        // Half-diagonals large enough for the label rectangle to fit inside
        NodeShape::Diamond => Size::new(
            label.width() * 2.0 + height,
            label.height() * 2.0 + height,
        ),
    }
}

/// Assigns every node a component, a rank and an in-rank order.
fn rank_nodes(node_count: usize, edges: &[(u32, u32)]) -> Result<Vec<Placement>, RenderError> {
    let mut placements: Vec<Option<Placement>> = vec![None; node_count];
    let mut component_count = 0;

    if !edges.is_empty() {
        debug!(nodes = node_count, edges = edges.len(); "Applying Sugiyama algorithm");

        let sugiyama_edges = edges.to_vec();
        let layouts = panic::catch_unwind(move || {
            let config = Config {
                minimum_length: 1,
                vertex_spacing: VERTEX_SPACING,
                ..Default::default()
            };
            rust_sugiyama::from_edges(&sugiyama_edges, &config)
        })
        .map_err(|err| {
            let message = if let Some(panic_msg) = err.downcast_ref::<String>() {
                panic_msg.clone()
            } else if let Some(panic_msg) = err.downcast_ref::<&str>() {
                (*panic_msg).to_string()
            } else {
                "unknown error".to_string()
            };
            RenderError::Layout(format!("layered layout engine panicked: {message}"))
        })?;

        // Components in order of their first declared node
        let mut components: Vec<Vec<(usize, (f64, f64))>> = layouts
            .into_iter()
            .map(|(coords, _, _)| {
                coords
                    .into_iter()
                    .filter(|&(id, _)| id < node_count)
                    .collect::<Vec<_>>()
            })
            .filter(|coords| !coords.is_empty())
            .collect();
        components.sort_by_key(|coords| coords.iter().map(|&(id, _)| id).min());

        for coords in components {
            let ranks = ranks_from_heights(&coords, edges);
            for (&(id, (x, _)), rank) in coords.iter().zip(ranks) {
                placements[id] = Some(Placement {
                    component: component_count,
                    rank,
                    order: x / VERTEX_SPACING,
                });
            }
            component_count += 1;
        }
    }

    // Isolated nodes become single-node components after the connected ones
    Ok(placements
        .into_iter()
        .map(|placement| {
            placement.unwrap_or_else(|| {
                component_count += 1;
                Placement {
                    component: component_count - 1,
                    rank: 0,
                    order: 0.0,
                }
            })
        })
        .collect())
}

/// Turns distinct y coordinates into rank indices, oriented so most edges point down.
fn ranks_from_heights(coords: &[(usize, (f64, f64))], edges: &[(u32, u32)]) -> Vec<usize> {
    // Keyed on rounded heights so float noise does not split a rank
    let key = |y: f64| (y * 1000.0).round() as i64;
    let levels: BTreeMap<i64, usize> = coords
        .iter()
        .map(|&(_, (_, y))| key(y))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(rank, level)| (level, rank))
        .collect();

    let mut ranks: Vec<usize> = coords.iter().map(|&(_, (_, y))| levels[&key(y)]).collect();

    let rank_of = |id: u32| {
        coords
            .iter()
            .position(|&(node, _)| node == id as usize)
            .map(|pos| ranks[pos] as i64)
    };
    let downward: i64 = edges
        .iter()
        .filter_map(|&(from, to)| Some((rank_of(to)? - rank_of(from)?).signum()))
        .sum();

    if downward < 0 {
        let deepest = levels.len().saturating_sub(1);
        for rank in &mut ranks {
            *rank = deepest - *rank;
        }
    }
    trace!(ranks:? = ranks; "Derived ranks");
    ranks
}

/// Places node centers top-down, then maps them onto `direction`.
fn place_nodes(
    sizes: &[(NodeShape, Size)],
    placements: &[Placement],
    direction: Direction,
    config: &LayoutConfig,
) -> Vec<NodeBox> {
    let horizontal = direction.is_horizontal();
    // Extent across a rank and along the rank axis
    let breadth = |size: Size| if horizontal { size.height() } else { size.width() };
    let depth = |size: Size| if horizontal { size.width() } else { size.height() };

    let rank_count = placements.iter().map(|p| p.rank + 1).max().unwrap_or(0);
    let mut rank_depths = vec![0.0_f32; rank_count];
    for (placement, (_, size)) in placements.iter().zip(sizes) {
        let slot = &mut rank_depths[placement.rank];
        *slot = slot.max(depth(*size));
    }
    let mut rank_centers = Vec::with_capacity(rank_count);
    let mut cursor = 0.0;
    for rank_depth in &rank_depths {
        rank_centers.push(cursor + rank_depth / 2.0);
        cursor += rank_depth + config.rank_spacing();
    }

    let component_count = placements.iter().map(|p| p.component + 1).max().unwrap_or(0);
    let mut across = vec![0.0_f32; placements.len()];
    let mut cursor = 0.0;
    for component in 0..component_count {
        let members: Vec<usize> = (0..placements.len())
            .filter(|&i| placements[i].component == component)
            .collect();
        let unit = members
            .iter()
            .map(|&i| breadth(sizes[i].1))
            .fold(0.0_f32, f32::max)
            + config.node_spacing();

        let mut left = f32::MAX;
        let mut right = f32::MIN;
        for &i in &members {
            across[i] = placements[i].order as f32 * unit;
            let half = breadth(sizes[i].1) / 2.0;
            left = left.min(across[i] - half);
            right = right.max(across[i] + half);
        }
        for &i in &members {
            across[i] += cursor - left;
        }
        if !members.is_empty() {
            cursor += right - left + config.node_spacing();
        }
    }

    placements
        .iter()
        .zip(sizes)
        .zip(across)
        .map(|((placement, &(shape, size)), u)| {
            let v = rank_centers[placement.rank];
            let center = match direction {
                Direction::TopDown => Point::new(u, v),
                Direction::BottomUp => Point::new(u, -v),
                Direction::LeftRight => Point::new(v, u),
                Direction::RightLeft => Point::new(-v, u),
            };
            NodeBox {
                center,
                size,
                shape,
            }
        })
        .collect()
}

/// Boxes every non-empty subgraph around its members and nested boxes.
fn place_clusters(chart: &Flowchart, nodes: &[NodeBox], text: &TextDefinition) -> Vec<ClusterBox> {
    let subgraphs = chart.subgraphs();
    let mut order: Vec<usize> = (0..subgraphs.len()).collect();
    // Innermost first, so parents can include their children's boxes
    order.sort_by_key(|&i| std::cmp::Reverse(chart.subgraph_depth(i)));

    let mut boxes: Vec<Option<ClusterBox>> = vec![None; subgraphs.len()];
    for index in order {
        let subgraph = &subgraphs[index];
        let member_bounds = subgraph
            .members()
            .iter()
            .filter_map(|id| chart.node_index(id))
            .map(|i| nodes[i].bounds());
        let child_bounds = subgraphs
            .iter()
            .enumerate()
            .filter(|(_, child)| child.parent() == Some(index))
            .filter_map(|(child, _)| boxes[child].map(|b| b.bounds));

        let Some(inner) = member_bounds
            .chain(child_bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
        else {
            continue;
        };

        let title_size = Text::new(text, subgraph.title()).calculate_size();
        let bounds = inner.add_padding(Insets::new(
            CLUSTER_PADDING + title_size.height(),
            CLUSTER_PADDING,
            CLUSTER_PADDING,
            CLUSTER_PADDING,
        ));
        // Wide titles widen the box symmetrically
        let extra = (title_size.width() + CLUSTER_PADDING * 2.0 - bounds.width()).max(0.0) / 2.0;
        let bounds = bounds.add_padding(Insets::new(0.0, extra, 0.0, extra));
        let title = LabelBox {
            center: Point::new(
                bounds.center().x(),
                bounds.min_y() + CLUSTER_PADDING / 2.0 + title_size.height() / 2.0,
            ),
            size: title_size,
        };

        boxes[index] = Some(ClusterBox {
            subgraph: index,
            bounds,
            title,
        });
    }

    let mut clusters: Vec<ClusterBox> = boxes.into_iter().flatten().collect();
    clusters.sort_by_key(|cluster| chart.subgraph_depth(cluster.subgraph));
    clusters
}

fn route_edges(chart: &Flowchart, nodes: &[NodeBox], text: &TextDefinition) -> Vec<EdgeRoute> {
    let horizontal = chart.direction().is_horizontal();

    chart
        .edges()
        .iter()
        .enumerate()
        .filter_map(|(index, edge)| {
            let from = nodes[chart.node_index(edge.from())?];
            let to = nodes[chart.node_index(edge.to())?];
            let label_size = edge
                .label()
                .filter(|label| !label.is_empty())
                .map(|label| {
                    Text::new(text, label)
                        .calculate_size()
                        .add_padding(Insets::uniform(LABEL_PADDING))
                });

            if edge.from() == edge.to() {
                return Some(self_loop(index, &from, label_size));
            }

            let start = from.boundary_toward(to.center);
            let end = to.boundary_toward(from.center);
            let mid = start.midpoint(end);
            let controls = if horizontal {
                (Point::new(mid.x(), start.y()), Point::new(mid.x(), end.y()))
            } else {
                (Point::new(start.x(), mid.y()), Point::new(end.x(), mid.y()))
            };

            Some(EdgeRoute {
                edge: index,
                start,
                controls,
                end,
                // The curve is symmetric, so its midpoint is the chord midpoint
                label: label_size.map(|size| LabelBox { center: mid, size }),
            })
        })
        .collect()
}

/// A loop leaving and re-entering the right side of `node`.
fn self_loop(index: usize, node: &NodeBox, label: Option<Size>) -> EdgeRoute {
    let center = node.center;
    let right = center.x() + node.size.width() / 2.0;
    let quarter = node.size.height() / 4.0;
    let start = Point::new(right, center.y() - quarter);
    let end = Point::new(right, center.y() + quarter);

    EdgeRoute {
        edge: index,
        start,
        controls: (
            start.add_point(Point::new(SELF_LOOP_REACH, -quarter)),
            end.add_point(Point::new(SELF_LOOP_REACH, quarter)),
        ),
        end,
        label: label.map(|size| LabelBox {
            center: Point::new(right + SELF_LOOP_REACH + size.width() / 2.0, center.y()),
            size,
        }),
    }
}

/// Bounding box of an edge's control polygon.
fn route_bounds(route: &EdgeRoute) -> Bounds {
    let points = [route.start, route.controls.0, route.controls.1, route.end];
    let min_x = points.iter().map(|p| p.x()).fold(f32::MAX, f32::min);
    let min_y = points.iter().map(|p| p.y()).fold(f32::MAX, f32::min);
    let max_x = points.iter().map(|p| p.x()).fold(f32::MIN, f32::max);
    let max_y = points.iter().map(|p| p.y()).fold(f32::MIN, f32::max);
    Bounds::from_origin(Point::new(min_x, min_y), Size::new(max_x - min_x, max_y - min_y))
}
