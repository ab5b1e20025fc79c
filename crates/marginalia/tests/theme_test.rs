//! Theme installation touches process-wide state, so it lives in its own
//! test binary.

use marginalia::{DocumentBuilder, MarginaliaError, color::Color, config::AppConfig};

#[test]
fn test_configured_theme_is_used_once_installed() {
    let config: AppConfig = toml::from_str(
        r##"
        [theme]
        primary_color = "#ff0000"
        line_color = "#00ff00"
        "##,
    )
    .expect("Failed to parse config");
    let builder = DocumentBuilder::new(config);
    builder.install_theme().expect("Failed to install theme");

    let html = builder
        .render("```mermaid\ngraph TD\nA-->B\n```\n")
        .expect("Failed to render")
        .to_html();
    assert!(html.contains(&Color::new("#ff0000").unwrap().to_string()));
    assert!(html.contains(&Color::new("#00ff00").unwrap().to_string()));

    let err = builder.install_theme().unwrap_err();
    assert!(matches!(err, MarginaliaError::Config(_)));
}

#[test]
fn test_invalid_theme_color_is_rejected() {
    let config: AppConfig = toml::from_str("[theme]\nprimary_color = \"not-a-color\"\n")
        .expect("Failed to parse config");
    let err = DocumentBuilder::new(config).install_theme().unwrap_err();
    assert!(err.to_string().contains("primary_color"));
}
