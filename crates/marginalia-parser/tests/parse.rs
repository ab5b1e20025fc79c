use marginalia_parser::{
    Span,
    error::{ErrorCode, Severity},
    flowchart::{self, ArrowHead, Direction, LineStyle, NodeShape},
    outline,
};
use proptest::prelude::*;

#[test]
fn test_decision_flowchart() {
    let source = r#"flowchart LR
    Start([Start]) --> Check{Is it working?}
    Check -->|Yes| Done[(Ship it)]
    Check -- No --> Fix[[Debug]]
    Fix -.-> Check
"#;
    let chart = flowchart::parse(source).expect("valid flowchart");

    assert_eq!(chart.direction(), Direction::LeftRight);
    let ids: Vec<&str> = chart.nodes().map(|n| n.id()).collect();
    assert_eq!(ids, ["Start", "Check", "Done", "Fix"]);
    assert_eq!(chart.node("Check").unwrap().shape(), NodeShape::Diamond);
    assert_eq!(chart.node("Check").unwrap().label(), "Is it working?");

    let labels: Vec<Option<&str>> = chart.edges().iter().map(|e| e.label()).collect();
    assert_eq!(labels, [None, Some("Yes"), Some("No"), None]);
    assert_eq!(chart.edges()[3].line(), LineStyle::Dotted);
    assert_eq!(chart.edges()[3].head(), ArrowHead::Arrow);
}

#[test]
fn test_incomplete_edge_reports_location() {
    let source = "graph TD\nA--";
    let err = flowchart::parse(source).unwrap_err();
    let diag = &err.diagnostics()[0];

    assert_eq!(diag.code(), Some(ErrorCode::E101));
    assert_eq!(diag.severity(), Severity::Error);
    let span = diag.primary_span().unwrap();
    assert_eq!(&source[span.start()..span.end()], "--");
}

#[test]
fn test_unsupported_diagram_type() {
    let err = flowchart::parse("sequenceDiagram\nAlice->>Bob: Hi").unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E102));
    assert_eq!(err.diagnostics()[0].primary_span(), Some(Span::new(0..15)));
}

#[test]
fn test_semicolon_separated_statements() {
    let chart = flowchart::parse("graph TD; A-->B; B-->C;").unwrap();
    assert_eq!(chart.edges().len(), 2);
}

#[test]
fn test_outline_sample_tree() {
    let source = "# Marginalia\n## Diagrams\n- Flowcharts\n- Mind maps\n## Media\n- Lightbox\n";
    let tree = outline::transform(source);
    let root = tree.root();

    assert_eq!(root.content(), "Marginalia");
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children()[0].children().len(), 2);
    assert_eq!(tree.get(&[1, 0]).unwrap().content(), "Lightbox");
    assert_eq!(tree.node_count(), 6);
}

proptest! {
    #[test]
    fn prop_linear_chain_has_one_edge_per_link(len in 1usize..20) {
        let ids: Vec<String> = (0..=len).map(|i| format!("n{i}")).collect();
        let source = format!("graph TD\n{}", ids.join(" --> "));
        let chart = flowchart::parse(&source).unwrap();
        prop_assert_eq!(chart.nodes().count(), len + 1);
        prop_assert_eq!(chart.edges().len(), len);
    }

    #[test]
    fn prop_node_labels_round_trip(label in "[A-Za-z0-9 ,.!?']{1,24}") {
        let source = format!("graph TD\nA[\"{label}\"]");
        let chart = flowchart::parse(&source).unwrap();
        prop_assert_eq!(chart.node("A").unwrap().label(), label.as_str());
    }

    #[test]
    fn prop_parse_never_panics(source in "\\PC{0,80}") {
        let _ = flowchart::parse(&source);
        let _ = outline::transform(&source);
    }

    #[test]
    fn prop_heading_count_matches_nodes(count in 1usize..12) {
        let source: String = (0..count).map(|i| format!("## Topic {i}\n")).collect();
        let tree = outline::transform(&format!("# Root\n{source}"));
        prop_assert_eq!(tree.root().children().len(), count);
    }
}
