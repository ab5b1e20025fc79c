use std::fs;

use tempfile::tempdir;

use marginalia::{DocumentBuilder, config::AppConfig};
use marginalia_cli::{Args, CliError, execute};

fn args(input: Option<String>, output: String) -> Args {
    Args {
        input,
        output,
        config: None,
        log_level: "off".to_string(),
        sample: false,
        check: false,
    }
}

#[test]
fn e2e_render_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("notes.md");
    let output = temp_dir.path().join("notes.html");
    fs::write(
        &input,
        "# Notes\n\n```mermaid\ngraph LR\nA[Read] --> B[Write]\n```\n\n```markmap\n# Plan\n## Now\n## Later\n```\n",
    )
    .expect("Failed to write input");

    let args = args(
        Some(input.to_string_lossy().to_string()),
        output.to_string_lossy().to_string(),
    );
    execute(&args, &DocumentBuilder::default()).expect("Failed to render");

    let html = fs::read_to_string(&output).expect("Failed to read output");
    assert!(html.contains("<title>notes</title>"));
    assert!(html.contains(r#"id="mermaid-0""#));
    assert!(html.contains(r#"id="markmap-0""#));
}

#[test]
fn e2e_render_sample() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("sample.html");
    let mut args = args(None, output.to_string_lossy().to_string());
    args.sample = true;

    execute(&args, &DocumentBuilder::default()).expect("Failed to render sample");
    let html = fs::read_to_string(&output).expect("Failed to read output");
    assert!(html.contains("<title>Marginalia</title>"));
    assert!(!html.contains("marginalia-error-card"));
}

#[test]
fn e2e_check_reports_failures_without_output() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("broken.md");
    let output = temp_dir.path().join("broken.html");
    fs::write(&input, "```mermaid\ngraph TD\nA--\n```\n\n```mermaid\ngraph TD\nA-->B\n```\n")
        .expect("Failed to write input");

    let mut args = args(
        Some(input.to_string_lossy().to_string()),
        output.to_string_lossy().to_string(),
    );
    args.check = true;

    let err = execute(&args, &DocumentBuilder::default()).unwrap_err();
    match err {
        CliError::Check { failures, total } => {
            assert_eq!(total, 2);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].target_id(), "mermaid-0");
        }
        other => panic!("Expected check failure, got {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args(
        Some(temp_dir.path().join("missing.md").to_string_lossy().to_string()),
        temp_dir.path().join("out.html").to_string_lossy().to_string(),
    );
    let err = execute(&args, &DocumentBuilder::new(AppConfig::default())).unwrap_err();
    assert!(err.to_string().starts_with("I/O error"));
}

#[test]
fn e2e_rendered_page_drives_pending_images() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("photos.md");
    let output = temp_dir.path().join("photos.html");
    fs::write(&input, "# Photos\n\n![Harbour at dusk](harbour.png)\n")
        .expect("Failed to write input");

    let args = args(
        Some(input.to_string_lossy().to_string()),
        output.to_string_lossy().to_string(),
    );
    execute(&args, &DocumentBuilder::default()).expect("Failed to render");
    let html = fs::read_to_string(&output).expect("Failed to read output");

    // The figure starts pending with a hidden thumbnail behind a skeleton.
    assert!(html.contains(r#"data-state="pending""#));
    assert!(html.contains(r#"class="marginalia-image-thumbnail hidden""#));
    assert!(html.contains("marginalia-skeleton"));
    assert!(html.contains(r#"data-failure-text="#));

    // The page script flips it to loaded once the thumbnail arrives.
    let head = &html[..html.find("</head>").expect("Missing head")];
    assert!(head.contains(r#"document.addEventListener("load""#));
    assert!(head.contains(r#"figure.setAttribute("data-state", "loaded")"#));
    assert!(head.contains(r#"img.classList.remove("hidden")"#));
    assert!(head.contains(r#"img.closest("figure.marginalia-image")"#));
    assert!(head.contains(r#"contains("marginalia-image-thumbnail")"#));

    // The lightbox is on the page, closed, for the fullscreen button to open.
    assert!(html.contains(r#"data-action="fullscreen""#));
    assert!(html.contains(r#"id="image-0-dialog""#));
    assert!(html.contains(r#"data-state="closed""#));
}
