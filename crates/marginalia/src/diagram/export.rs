//! SVG export of a laid-out flowchart.
//!
//! Marker ids are prefixed with the render target id, so several diagrams
//! (or the inline and fullscreen copies of one diagram) can share a page
//! without their `url(#...)` references resolving to each other.

use svg::{
    Document,
    node::element::{Circle, Definitions, Group, Line, Marker, Path, Polygon, Rectangle},
};

use marginalia_core::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, Text, TextDefinition},
    geometry::{Point, Size},
    theme::DiagramTheme,
};
use marginalia_parser::flowchart::{ArrowHead, FlowEdge, FlowNode, Flowchart, LineStyle, NodeShape};

use super::layout::{CYLINDER_RY, FlowLayout, SUBROUTINE_INSET};

/// Renders `layout` of `chart` into a standalone SVG document string.
pub(crate) fn export(
    target_id: &str,
    chart: &Flowchart,
    layout: &FlowLayout,
    theme: &DiagramTheme,
    text: &TextDefinition,
) -> String {
    let mut output = LayeredOutput::new();

    for cluster in layout.clusters() {
        let bounds = cluster.bounds();
        let rect = Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", theme.tertiary_color().to_string())
            .set("stroke", theme.primary_border_color().to_string())
            .set("stroke-width", 1)
            .set("data-subgraph", chart.subgraphs()[cluster.subgraph()].id());
        output.add_to_layer(RenderLayer::Cluster, Box::new(rect));

        let title = cluster.title();
        let content = chart.subgraphs()[cluster.subgraph()].title();
        output.merge(Text::new(text, content).render_to_layers(title.center()));
    }

    for route in layout.edges() {
        let edge = &chart.edges()[route.edge()];
        let path = edge_path(target_id, edge, &route.path_data(), theme);
        output.add_to_layer(RenderLayer::Edge, Box::new(path));

        if let (Some(label), Some(content)) = (route.label(), edge.label()) {
            let background = label.center().to_bounds(label.size());
            let rect = Rectangle::new()
                .set("x", background.min_x())
                .set("y", background.min_y())
                .set("width", background.width())
                .set("height", background.height())
                .set("fill", theme.secondary_color().to_string());
            output.add_to_layer(RenderLayer::EdgeLabel, Box::new(rect));
            output.merge(Text::new(text, content).render_to_layers(label.center()));
        }
    }

    for (node, placed) in chart.nodes().zip(layout.nodes()) {
        let drawable = NodeDrawable::new(node, placed.size(), theme, text);
        output.merge(drawable.render_to_layers(placed.center()));
    }

    let size = layout.size();
    let mut document = Document::new()
        .set("id", target_id)
        .set("width", "100%")
        .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
        .set("style", format!("max-width: {}px;", size.width()))
        .set("role", "graphics-document document")
        .set("aria-roledescription", "flowchart")
        .add(marker_definitions(target_id, theme.line_color()));

    for node in output.render() {
        document = document.add(node);
    }

    document.to_string()
}

fn edge_path(target_id: &str, edge: &FlowEdge, data: &str, theme: &DiagramTheme) -> Path {
    let stroke_width = match edge.line() {
        LineStyle::Thick => 3.5,
        LineStyle::Solid | LineStyle::Dotted => 1.5,
    };

    let mut path = Path::new()
        .set("d", data)
        .set("fill", "none")
        .set("stroke", theme.line_color().to_string())
        .set("stroke-width", stroke_width)
        .set("data-edge", format!("{}-{}", edge.from(), edge.to()));

    if edge.line() == LineStyle::Dotted {
        path = path.set("stroke-dasharray", "3 3");
    }
    if let Some(marker) = marker_url(target_id, edge.tail(), MarkerEnd::Start) {
        path = path.set("marker-start", marker);
    }
    if let Some(marker) = marker_url(target_id, edge.head(), MarkerEnd::End) {
        path = path.set("marker-end", marker);
    }
    path
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerEnd {
    Start,
    End,
}

impl MarkerEnd {
    fn suffix(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

fn marker_id(target_id: &str, kind: &str, end: MarkerEnd) -> String {
    format!("{target_id}-{kind}-{}", end.suffix())
}

/// Reference to the marker drawn for `head` at one end of an edge.
fn marker_url(target_id: &str, head: ArrowHead, end: MarkerEnd) -> Option<String> {
    let kind = match head {
        ArrowHead::None => return None,
        ArrowHead::Arrow => "arrow",
        ArrowHead::Circle => "circle",
        ArrowHead::Cross => "cross",
    };
    Some(format!("url(#{})", marker_id(target_id, kind, end)))
}

/// Arrow, circle and cross markers for both edge ends.
fn marker_definitions(target_id: &str, color: Color) -> Definitions {
    let mut defs = Definitions::new();

    for end in [MarkerEnd::Start, MarkerEnd::End] {
        let orient = match end {
            MarkerEnd::Start => "auto-start-reverse",
            MarkerEnd::End => "auto",
        };
        let marker = |kind: &str| {
            Marker::new()
                .set("id", marker_id(target_id, kind, end))
                .set("viewBox", "0 0 10 10")
                .set("refY", 5)
                .set("markerWidth", 6)
                .set("markerHeight", 6)
                .set("orient", orient)
        };

        let arrow = marker("arrow").set("refX", 9).add(
            Path::new()
                .set("d", "M 0 0 L 10 5 L 0 10 z")
                .set("fill", color.to_string()),
        );
        let circle = marker("circle").set("refX", 5).add(
            Circle::new()
                .set("cx", 5)
                .set("cy", 5)
                .set("r", 4)
                .set("fill", color.to_string()),
        );
        let cross = marker("cross").set("refX", 5).add(
            Path::new()
                .set("d", "M 1 1 L 9 9 M 1 9 L 9 1")
                .set("stroke", color.to_string())
                .set("stroke-width", 2),
        );

        defs = defs.add(arrow).add(circle).add(cross);
    }

    defs
}

/// A flowchart node shape with its centered label.
#[derive(Debug)]
struct NodeDrawable<'a> {
    node: &'a FlowNode,
    size: Size,
    fill: Color,
    stroke: Color,
    stroke_width: f32,
    text: TextDefinition,
}

impl<'a> NodeDrawable<'a> {
    fn new(node: &'a FlowNode, size: Size, theme: &DiagramTheme, text: &TextDefinition) -> Self {
        let style = node.style();
        let mut text = text.clone();
        text.set_color(Some(style.color().unwrap_or(theme.primary_text_color())));

        Self {
            node,
            size,
            fill: style.fill().unwrap_or(theme.primary_color()),
            stroke: style.stroke().unwrap_or(theme.primary_border_color()),
            stroke_width: style.stroke_width().unwrap_or(1.0),
            text,
        }
    }
}

impl Drawable for NodeDrawable<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let (w, h) = (self.size.width(), self.size.height());
        let left = position.x() - w / 2.0;
        let top = position.y() - h / 2.0;
        let right = left + w;
        let bottom = top + h;
        let (cx, cy) = (position.x(), position.y());

        let rect = |radius: f32| {
            Rectangle::new()
                .set("x", left)
                .set("y", top)
                .set("width", w)
                .set("height", h)
                .set("rx", radius)
                .set("ry", radius)
        };
        let polygon = |points: &[(f32, f32)]| {
            let points: Vec<String> = points.iter().map(|(x, y)| format!("{x},{y}")).collect();
            Polygon::new().set("points", points.join(" "))
        };

        // Children inherit fill and stroke from the group
        let mut group = Group::new()
            .set("data-node", self.node.id())
            .set("fill", self.fill.to_string())
            .set("stroke", self.stroke.to_string())
            .set("stroke-width", self.stroke_width);

        group = match self.node.shape() {
            NodeShape::Rect => group.add(rect(0.0)),
            NodeShape::Rounded => group.add(rect(5.0)),
            NodeShape::Stadium => group.add(rect(h / 2.0)),
            NodeShape::Subroutine => {
                let mut group = group.add(rect(0.0));
                for x in [left + SUBROUTINE_INSET, right - SUBROUTINE_INSET] {
                    group = group.add(
                        Line::new()
                            .set("x1", x)
                            .set("y1", top)
                            .set("x2", x)
                            .set("y2", bottom),
                    );
                }
                group
            }
            NodeShape::Cylinder => {
                let rx = w / 2.0;
                let body = h - CYLINDER_RY * 2.0;
                let data = format!(
                    "M {left} {} a {rx} {ry} 0 0 0 {w} 0 a {rx} {ry} 0 0 0 {neg_w} 0 l 0 {body} a {rx} {ry} 0 0 0 {w} 0 l 0 {neg_body}",
                    top + CYLINDER_RY,
                    ry = CYLINDER_RY,
                    neg_w = -w,
                    neg_body = -body,
                );
                group.add(Path::new().set("d", data))
            }
            NodeShape::Circle => {
                group.add(Circle::new().set("cx", cx).set("cy", cy).set("r", w / 2.0))
            }
            NodeShape::Diamond => {
                group.add(polygon(&[(cx, top), (right, cy), (cx, bottom), (left, cy)]))
            }
            NodeShape::Hexagon => {
                let inset = h / 4.0;
                group.add(polygon(&[
                    (left + inset, top),
                    (right - inset, top),
                    (right, cy),
                    (right - inset, bottom),
                    (left + inset, bottom),
                    (left, cy),
                ]))
            }
            NodeShape::Flag => {
                let notch = h / 4.0;
                group.add(polygon(&[
                    (left, top),
                    (right, top),
                    (right, bottom),
                    (left, bottom),
                    (left + notch, cy),
                ]))
            }
        };

        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Node, Box::new(group));
        output.merge(Text::new(&self.text, self.node.label()).render_to_layers(position));
        output
    }

    fn size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use marginalia_parser::flowchart;

    use super::*;
    use crate::{config::LayoutConfig, diagram::layout::layout};

    fn render(target_id: &str, source: &str) -> String {
        let chart = flowchart::parse(source).unwrap();
        let text = TextDefinition::new();
        let layout = layout(&chart, &LayoutConfig::default(), &text).unwrap();
        export(target_id, &chart, &layout, &DiagramTheme::default(), &text)
    }

    #[test]
    fn test_document_root() {
        let svg = render("mermaid-0", "graph TD\nA --> B");
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"id="mermaid-0""#));
        assert!(svg.contains(r#"aria-roledescription="flowchart""#));
    }

    #[test]
    fn test_markers_are_scoped_to_target() {
        let svg = render("mermaid-3-fullscreen", "graph TD\nA --> B");
        assert!(svg.contains(r#"id="mermaid-3-fullscreen-arrow-end""#));
        assert!(svg.contains("url(#mermaid-3-fullscreen-arrow-end)"));
        assert!(!svg.contains("url(#mermaid-3-arrow-end)"));
    }

    #[test]
    fn test_edge_styles() {
        let svg = render("m", "graph LR\nA -.-> B\nB ==> C\nC --- D\nD --o E\nE <--> F");
        assert!(svg.contains(r#"stroke-dasharray="3 3""#));
        assert!(svg.contains(r#"stroke-width="3.5""#));
        assert!(svg.contains("url(#m-circle-end)"));
        assert!(svg.contains("url(#m-arrow-start)"));
    }

    #[test]
    fn test_labels_are_rendered() {
        let svg = render("m", "graph TD\nA{Is it?} -->|Yes| B[Done]");
        assert!(svg.contains("Is it?"));
        assert!(svg.contains("Yes"));
        assert!(svg.contains("Done"));
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn test_style_overrides_theme() {
        let svg = render("m", "graph TD\nA --> B\nstyle A fill:#ff0000");
        assert!(svg.contains(&Color::new("#ff0000").unwrap().to_string()));
    }

    #[test]
    fn test_subgraph_box() {
        let svg = render("m", "graph TD\nsubgraph s [Backend]\nA --> B\nend");
        assert!(svg.contains(r#"data-subgraph="s""#));
        assert!(svg.contains("Backend"));
    }
}
