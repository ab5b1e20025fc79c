//! Configuration types for Marginalia rendering.
//!
//! All types implement [`serde::Deserialize`] so the CLI (or any host) can
//! load them from TOML. Every section is optional; missing fields fall back
//! to the defaults documented on each type.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ThemeConfig`] - Diagram theme variables, converted to a [`DiagramTheme`].
//! - [`LayoutConfig`] - Flowchart spacing.
//! - [`MindMapConfig`] - Mind-map viewports and spacing.
//! - [`MediaConfig`] - Optimized image loading for local images.
//!
//! # Example
//!
//! ```
//! # use marginalia::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.media().endpoint(), "/_image");
//! assert!(config.theme().to_theme().is_ok());
//! ```

use serde::Deserialize;

use marginalia_core::{color::Color, geometry::Size, theme::DiagramTheme};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    theme: ThemeConfig,

    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    mindmap: MindMapConfig,

    #[serde(default)]
    media: MediaConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        theme: ThemeConfig,
        layout: LayoutConfig,
        mindmap: MindMapConfig,
        media: MediaConfig,
    ) -> Self {
        Self {
            theme,
            layout,
            mindmap,
            media,
        }
    }

    /// Returns the theme section.
    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    /// Returns the flowchart layout section.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the mind-map section.
    pub fn mindmap(&self) -> &MindMapConfig {
        &self.mindmap
    }

    /// Returns the media section.
    pub fn media(&self) -> &MediaConfig {
        &self.media
    }
}

/// Diagram theme variables as CSS color strings.
///
/// Converted into the process-wide [`DiagramTheme`] with
/// [`ThemeConfig::to_theme`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    primary_color: String,
    primary_text_color: String,
    primary_border_color: String,
    line_color: String,
    secondary_color: String,
    tertiary_color: String,
    font_family: String,
    font_size: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#3b82f6".to_string(),
            primary_text_color: "#fff".to_string(),
            primary_border_color: "#2563eb".to_string(),
            line_color: "#6b7280".to_string(),
            secondary_color: "#f3f4f6".to_string(),
            tertiary_color: "#e5e7eb".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 14,
        }
    }
}

impl ThemeConfig {
    /// Builds the [`DiagramTheme`] described by this section.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first variable that is not a valid CSS color.
    pub fn to_theme(&self) -> Result<DiagramTheme, String> {
        let parse = |name: &str, value: &str| {
            Color::new(value).map_err(|err| format!("Invalid theme color `{name}` in config: {err}"))
        };

        Ok(DiagramTheme::new(
            parse("primary_color", &self.primary_color)?,
            parse("primary_text_color", &self.primary_text_color)?,
            parse("primary_border_color", &self.primary_border_color)?,
            parse("line_color", &self.line_color)?,
            parse("secondary_color", &self.secondary_color)?,
            parse("tertiary_color", &self.tertiary_color)?,
            self.font_family.clone(),
            self.font_size,
        ))
    }
}

/// Flowchart layout spacing, in pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between neighbouring nodes of the same rank.
    node_spacing: f32,
    /// Gap between consecutive ranks.
    rank_spacing: f32,
    /// Margin around the whole drawing.
    padding: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 50.0,
            rank_spacing: 50.0,
            padding: 8.0,
        }
    }
}

impl LayoutConfig {
    pub fn new(node_spacing: f32, rank_spacing: f32, padding: f32) -> Self {
        Self {
            node_spacing,
            rank_spacing,
            padding,
        }
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }
}

/// Mind-map viewports and tree spacing.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MindMapConfig {
    inline_width: f32,
    inline_height: f32,
    fullscreen_width: f32,
    fullscreen_height: f32,
    horizontal_spacing: f32,
    vertical_spacing: f32,
    /// Upper bound for the auto-fit zoom; small trees are not blown up past it.
    max_fit_scale: f32,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            inline_width: 800.0,
            inline_height: 400.0,
            fullscreen_width: 1280.0,
            fullscreen_height: 720.0,
            horizontal_spacing: 80.0,
            vertical_spacing: 5.0,
            max_fit_scale: 2.0,
        }
    }
}

impl MindMapConfig {
    /// Size of the inline drawing surface.
    pub fn inline_viewport(&self) -> Size {
        Size::new(self.inline_width, self.inline_height)
    }

    /// Size of the drawing surface owned by the fullscreen modal.
    pub fn fullscreen_viewport(&self) -> Size {
        Size::new(self.fullscreen_width, self.fullscreen_height)
    }

    pub fn horizontal_spacing(&self) -> f32 {
        self.horizontal_spacing
    }

    pub fn vertical_spacing(&self) -> f32 {
        self.vertical_spacing
    }

    pub fn max_fit_scale(&self) -> f32 {
        self.max_fit_scale
    }
}

/// Optimized loading for local images.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Image optimization endpoint that local images are routed through.
    endpoint: String,
    quality: u8,
    thumbnail_width: u32,
    thumbnail_height: u32,
    fullscreen_width: u32,
    fullscreen_height: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            endpoint: "/_image".to_string(),
            quality: 75,
            thumbnail_width: 800,
            thumbnail_height: 600,
            fullscreen_width: 1920,
            fullscreen_height: 1080,
        }
    }
}

impl MediaConfig {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Intrinsic `(width, height)` of local thumbnails.
    pub fn thumbnail_size(&self) -> (u32, u32) {
        (self.thumbnail_width, self.thumbnail_height)
    }

    /// Intrinsic `(width, height)` of local images in the fullscreen view.
    pub fn fullscreen_size(&self) -> (u32, u32) {
        (self.fullscreen_width, self.fullscreen_height)
    }
}
