//! Drawable primitives shared by the flowchart and mind-map exporters.
//!
//! Everything that ends up inside a diagram SVG implements [`Drawable`]:
//! it knows its own size and can emit SVG nodes into a [`LayeredOutput`],
//! which takes care of z-ordering.

mod layer;
mod text;

pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use text::{Text, TextDefinition};

use crate::geometry::{Point, Size};

pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable centered at `position` to one or more layers.
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size of this drawable.
    fn size(&self) -> Size;
}
