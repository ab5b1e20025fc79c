//! SVG export of a laid-out mind map.

use svg::{
    Document,
    node::element::{Circle, Group, Line, Path, Rectangle},
};

use marginalia_core::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, Text, TextDefinition},
    theme::DiagramTheme,
};

use super::{layout::MindMapLayout, viewport::Viewport};

/// Branch colors, cycled by top-level branch.
const BRANCH_COLORS: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];
const FOLD_CIRCLE_RADIUS: f32 = 4.0;

fn branch_color(branch: usize, theme: &DiagramTheme) -> Color {
    Color::new(BRANCH_COLORS[branch % BRANCH_COLORS.len()]).unwrap_or_else(|_| theme.line_color())
}

/// Dot-separated child indices, as carried by the `data-path` attribute.
pub(crate) fn path_key(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Renders `layout` on a surface of the viewport's size.
pub(crate) fn export(
    target_id: &str,
    layout: &MindMapLayout,
    viewport: &Viewport,
    theme: &DiagramTheme,
    text: &TextDefinition,
) -> String {
    let mut output = LayeredOutput::new();
    let nodes = layout.nodes();

    for &(parent, child) in layout.links() {
        let from = nodes[parent].link_out();
        let to = nodes[child].link_in();
        let mid_x = (from.x() + to.x()) / 2.0;
        let data = format!(
            "M {} {} C {} {}, {} {}, {} {}",
            from.x(),
            from.y(),
            mid_x,
            from.y(),
            mid_x,
            to.y(),
            to.x(),
            to.y()
        );
        let link = Path::new()
            .set("d", data)
            .set("data-path", path_key(nodes[child].path()))
            .set("fill", "none")
            .set("stroke", branch_color(nodes[child].branch(), theme).to_string())
            .set("stroke-width", 1.5);
        output.add_to_layer(RenderLayer::Edge, Box::new(link));
    }

    for node in nodes {
        let color = branch_color(node.branch(), theme).to_string();
        let bounds = node.bounds();
        let key = path_key(node.path());

        let underline = Line::new()
            .set("x1", bounds.min_x())
            .set("y1", bounds.max_y())
            .set("x2", bounds.max_x())
            .set("y2", bounds.max_y())
            .set("stroke", color.as_str())
            .set("stroke-width", 1.5);
        let mut group = Group::new()
            .set("data-path", key.as_str())
            .set("data-depth", node.depth().to_string())
            .add(underline);

        // Labels stay inside the node's group so folding hides them too
        for label in Text::new(text, node.content())
            .render_to_layers(bounds.center())
            .render()
        {
            group = group.add(label);
        }

        if node.has_children() {
            let anchor = node.link_out();
            let fill = if node.is_folded() { color.as_str() } else { "#fff" };
            group = group.add(
                Circle::new()
                    .set("cx", anchor.x())
                    .set("cy", anchor.y())
                    .set("r", FOLD_CIRCLE_RADIUS)
                    .set("fill", fill)
                    .set("stroke", color.as_str())
                    .set("stroke-width", 1.5)
                    .set("data-action", "toggle")
                    .set("data-folded", node.is_folded().to_string())
                    .set("data-path", key.as_str()),
            );
        }
        output.add_to_layer(RenderLayer::Node, Box::new(group));
    }

    let size = viewport.size();
    let translate = viewport.translate();
    let mut content = Group::new()
        .set("transform", viewport.transform())
        .set("data-viewport", "true")
        .set("data-scale", viewport.scale())
        .set("data-x", translate.x())
        .set("data-y", translate.y());
    for node in output.render() {
        content = content.add(node);
    }

    Document::new()
        .set("id", target_id)
        .set("width", size.width())
        .set("height", size.height())
        .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
        .set("role", "graphics-document document")
        .set("aria-roledescription", "mindmap")
        .add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", "none")
                .set("pointer-events", "all")
                .set("data-action", "pan"),
        )
        .add(content)
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use marginalia_core::geometry::Size;
    use marginalia_parser::outline;

    use super::*;
    use crate::{config::MindMapConfig, mindmap::layout::layout};

    fn render(source: &str, folded: &[Vec<usize>]) -> String {
        let outline = outline::transform(source);
        let folded: BTreeSet<Vec<usize>> = folded.iter().cloned().collect();
        let text = TextDefinition::new();
        let layout = layout(&outline, &folded, &MindMapConfig::default(), &text);
        let mut viewport = Viewport::new(Size::new(800.0, 400.0));
        viewport.fit(layout.bounds(), 2.0);
        export("markmap-0", &layout, &viewport, &DiagramTheme::default(), &text)
    }

    #[test]
    fn test_path_key() {
        assert_eq!(path_key(&[]), "");
        assert_eq!(path_key(&[0, 2, 1]), "0.2.1");
    }

    #[test]
    fn test_labels_links_and_toggles() {
        let svg = render("# Root\n## A\n- a1\n## B", &[]);
        assert!(svg.contains(r#"id="markmap-0""#));
        for label in ["Root", "A", "a1", "B"] {
            assert!(svg.contains(label), "{label}");
        }
        assert_eq!(svg.matches("<path").count(), 3);
        // Root and A have children
        assert_eq!(svg.matches(r#"data-action="toggle""#).count(), 2);
        assert!(svg.contains("transform=\"translate("));
    }

    #[test]
    fn test_branch_colors_differ() {
        let svg = render("# Root\n## A\n## B", &[]);
        assert!(svg.contains(&Color::new(BRANCH_COLORS[0]).unwrap().to_string()));
        assert!(svg.contains(&Color::new(BRANCH_COLORS[1]).unwrap().to_string()));
    }

    #[test]
    fn test_folded_circle_is_filled() {
        let open = render("# Root\n## A\n- a1", &[]);
        let folded = render("# Root\n## A\n- a1", &[vec![0]]);
        assert!(!folded.contains("a1"));
        assert!(open.contains("a1"));
        assert!(folded.matches(r##"fill="#fff""##).count() < open.matches(r##"fill="#fff""##).count());
        assert!(folded.contains(r#"data-folded="true""#));
    }

    #[test]
    fn test_links_and_labels_carry_paths() {
        let svg = render("# Root\n## A\n- a1", &[]);
        // The link into a1 and a1's own group
        assert_eq!(svg.matches(r#"data-path="0.0""#).count(), 2);
        // Each node wraps its own label
        assert_eq!(svg.matches(r#"data-layer="text""#).count(), 3);
    }

    #[test]
    fn test_content_group_exposes_view_state() {
        let svg = render("# Root\n## A", &[]);
        assert!(svg.contains(r#"data-viewport="true""#));
        assert!(svg.contains("data-scale="));
        assert!(svg.contains("data-x="));
    }
}
