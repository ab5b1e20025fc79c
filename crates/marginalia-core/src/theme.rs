//! Process-wide diagram theme.
//!
//! The theme is installed once at startup with [`DiagramTheme::install`] and
//! read by every diagram and mind-map render through
//! [`DiagramTheme::current`]. Rendering before installation uses
//! [`DiagramTheme::default`].
//!
//! ```
//! use marginalia_core::theme::DiagramTheme;
//!
//! let theme = DiagramTheme::current();
//! assert_eq!(theme.font_size(), 14);
//! ```

use std::sync::OnceLock;

use thiserror::Error;

use crate::color::Color;

static THEME: OnceLock<DiagramTheme> = OnceLock::new();

/// Returned when a theme is installed after the first render or a second time.
#[derive(Debug, Error)]
#[error("diagram theme is already initialized")]
pub struct ThemeAlreadyInstalled;

/// Theme variables applied to rendered diagrams.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramTheme {
    primary_color: Color,
    primary_text_color: Color,
    primary_border_color: Color,
    line_color: Color,
    secondary_color: Color,
    tertiary_color: Color,
    font_family: String,
    font_size: u16,
}

impl DiagramTheme {
    /// Creates a theme from explicit variables.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        primary_color: Color,
        primary_text_color: Color,
        primary_border_color: Color,
        line_color: Color,
        secondary_color: Color,
        tertiary_color: Color,
        font_family: impl Into<String>,
        font_size: u16,
    ) -> Self {
        Self {
            primary_color,
            primary_text_color,
            primary_border_color,
            line_color,
            secondary_color,
            tertiary_color,
            font_family: font_family.into(),
            font_size,
        }
    }

    /// Installs `theme` as the process-wide theme.
    ///
    /// # Errors
    ///
    /// Fails if a theme was already installed or already read by a render.
    pub fn install(theme: DiagramTheme) -> Result<(), ThemeAlreadyInstalled> {
        THEME.set(theme).map_err(|_| ThemeAlreadyInstalled)
    }

    /// Returns the installed theme, initializing the default on first use.
    pub fn current() -> &'static DiagramTheme {
        THEME.get_or_init(DiagramTheme::default)
    }

    /// Fill for flowchart nodes.
    pub fn primary_color(&self) -> Color {
        self.primary_color
    }

    /// Text color inside flowchart nodes.
    pub fn primary_text_color(&self) -> Color {
        self.primary_text_color
    }

    /// Stroke for flowchart nodes.
    pub fn primary_border_color(&self) -> Color {
        self.primary_border_color
    }

    /// Stroke for edges and mind-map links without a branch color.
    pub fn line_color(&self) -> Color {
        self.line_color
    }

    /// Background for edge labels.
    pub fn secondary_color(&self) -> Color {
        self.secondary_color
    }

    /// Fill for subgraph boxes.
    pub fn tertiary_color(&self) -> Color {
        self.tertiary_color
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }
}

impl Default for DiagramTheme {
    fn default() -> Self {
        let parse = |css: &str| Color::new(css).expect("built-in theme colors are valid CSS");
        Self {
            primary_color: parse("#3b82f6"),
            primary_text_color: parse("#ffffff"),
            primary_border_color: parse("#2563eb"),
            line_color: parse("#6b7280"),
            secondary_color: parse("#f3f4f6"),
            tertiary_color: parse("#e5e7eb"),
            font_family: "sans-serif".to_string(),
            font_size: 14,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_variables() {
        let theme = DiagramTheme::default();
        assert_eq!(theme.primary_color(), Color::new("#3b82f6").unwrap());
        assert_eq!(theme.line_color(), Color::new("#6b7280").unwrap());
        assert_eq!(theme.font_family(), "sans-serif");
    }

    #[test]
    fn test_second_install_is_rejected() {
        // Whichever of `current` or `install` ran first, the slot is now taken.
        let _ = DiagramTheme::current();
        assert!(DiagramTheme::install(DiagramTheme::default()).is_err());
    }
}
