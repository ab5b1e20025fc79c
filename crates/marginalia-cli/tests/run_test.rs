//! `run` installs the process-wide theme, so it gets a test binary of its own.

use std::fs;

use tempfile::tempdir;

use marginalia_cli::{Args, run};

#[test]
fn e2e_run_with_config_file() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = temp_dir.path().join("config.toml");
    fs::write(
        &config,
        "[theme]\nprimary_color = \"#123456\"\n\n[media]\nquality = 60\n",
    )
    .expect("Failed to write config");
    let input = temp_dir.path().join("doc.md");
    fs::write(&input, "```mermaid\ngraph TD\nA-->B\n```\n\n![pic](/pic.png)\n")
        .expect("Failed to write input");
    let output = temp_dir.path().join("doc.html");

    let args = Args {
        input: Some(input.to_string_lossy().to_string()),
        output: output.to_string_lossy().to_string(),
        config: Some(config.to_string_lossy().to_string()),
        log_level: "off".to_string(),
        sample: false,
        check: false,
    };

    run(&args).expect("Failed to run");
    let html = fs::read_to_string(&output).expect("Failed to read output");
    assert!(html.contains("q=60"));
    assert!(html.contains("<svg"));
}
