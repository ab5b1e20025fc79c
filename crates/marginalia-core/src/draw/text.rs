//! Text measurement and rendering for diagram labels.
//!
//! - [`TextDefinition`] - Reusable text style configuration
//! - [`Text`] - A measurable, renderable label combining content with a definition
//!
//! Sizes are measured with `cosmic-text` against the system font database.
//! When no usable font is available (headless CI containers, for instance)
//! measurement falls back to a column-width estimate so layouts stay stable.
//!
//! ```
//! # use marginalia_core::draw::{TextDefinition, Text};
//! let mut style = TextDefinition::new();
//! style.set_font_size(14);
//!
//! let text = Text::new(&style, "Is it working?");
//! let size = text.calculate_size();
//! assert!(size.width() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use svg::{self, node::Text as SvgText, node::element as svg_element};
use unicode_width::UnicodeWidthStr;

use crate::{
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Point, Size},
};

/// Visual style for text elements in diagrams.
///
/// | Property    | Default        |
/// |-------------|----------------|
/// | Font family | `"sans-serif"` |
/// | Font size   | `14`           |
/// | Text color  | `None` (SVG default, black) |
#[derive(Debug, Clone)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    color: Option<Color>,
}

impl TextDefinition {
    /// Creates a new text definition with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the font size in points.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    /// Sets the font family for the text.
    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    /// Sets the text color. `None` uses the SVG default.
    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 14,
            color: None,
        }
    }
}

/// A renderable text element combining content with styling.
///
/// Multi-line content (separated by `\n`) is rendered as one `<tspan>` per line.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn content(&self) -> &str {
        self.content
    }

    /// Calculate the size required to display this text.
    pub fn calculate_size(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(self.content, self.definition)
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let lines: Vec<&str> = self.content.lines().collect();
        if lines.is_empty() {
            return output;
        }

        let text_size = self.calculate_size();
        let line_height = text_size.height() / lines.len() as f32;
        // First baseline sits half a block above the center
        let first_y = position.y() - text_size.height() / 2.0 + line_height / 2.0;

        let mut rendered_text = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", first_y)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());

        if let Some(color) = self.definition.color() {
            rendered_text = rendered_text
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha());
        }

        for (index, line) in lines.into_iter().enumerate() {
            let dy = if index == 0 { 0.0 } else { line_height };
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", dy)
                .add(SvgText::new(line));
            rendered_text = rendered_text.add(tspan);
        }

        output.add_to_layer(RenderLayer::Text, Box::new(rendered_text));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

/// Holds the reusable font database used for measurement.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Measures `text` with real font metrics, falling back to an estimate
    /// when shaping produces no glyphs.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        // Points to pixels at standard DPI
        let font_size_px = text_def.font_size() as f32 * 1.33;
        let line_height = font_size_px * 1.15;
        let line_count = text.lines().count().max(1) as f32;

        let Ok(mut font_system) = self.font_system.lock() else {
            return estimate_text_size(text, font_size_px, line_height);
        };

        let metrics = Metrics::new(font_size_px, line_height);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let max_width = buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|last| last.x + last.w))
            .fold(0.0_f32, f32::max);

        if max_width <= 0.0 {
            return estimate_text_size(text, font_size_px, line_height);
        }

        Size::new(max_width, line_height * line_count)
    }
}

/// Column-width based estimate used when no font can shape the text.
fn estimate_text_size(text: &str, font_size_px: f32, line_height: f32) -> Size {
    let columns = text.lines().map(UnicodeWidthStr::width).max().unwrap_or(0);
    let line_count = text.lines().count().max(1);
    Size::new(
        columns as f32 * font_size_px * 0.55,
        line_height * line_count as f32,
    )
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_definition_defaults() {
        let def = TextDefinition::new();
        assert_eq!(def.font_size(), 14);
        assert_eq!(def.font_family(), "sans-serif");
        assert!(def.color().is_none());
    }

    #[test]
    fn test_text_calculate_size_empty() {
        let def = TextDefinition::new();
        let size = Text::new(&def, "").calculate_size();
        assert_eq!(size, Size::default());
    }

    #[test]
    fn test_text_calculate_size_multiline_is_taller() {
        let def = TextDefinition::new();
        let single = Text::new(&def, "Line 1").calculate_size();
        let multi = Text::new(&def, "Line 1\nLine 2\nLine 3").calculate_size();
        assert!(multi.height() > single.height());
    }

    #[test]
    fn test_larger_font_is_larger() {
        let mut small = TextDefinition::new();
        small.set_font_size(10);
        let mut large = TextDefinition::new();
        large.set_font_size(24);

        let small_size = Text::new(&small, "Test").calculate_size();
        let large_size = Text::new(&large, "Test").calculate_size();
        assert!(large_size.width() > small_size.width());
        assert!(large_size.height() > small_size.height());
    }

    #[test]
    fn test_estimate_handles_wide_characters() {
        let narrow = estimate_text_size("ab", 10.0, 12.0);
        let wide = estimate_text_size("日本", 10.0, 12.0);
        assert!(wide.width() > narrow.width());
    }

    #[test]
    fn test_render_emits_one_tspan_per_line() {
        let def = TextDefinition::new();
        let output = Text::new(&def, "one\ntwo").render_to_layers(Point::new(50.0, 50.0));
        let rendered: String = output.render().iter().map(|n| n.to_string()).collect();
        assert_eq!(rendered.matches("<tspan").count(), 2);
        assert!(rendered.contains("one"));
        assert!(rendered.contains("two"));
    }
}
