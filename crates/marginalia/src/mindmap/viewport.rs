//! Zoom and pan state of a mind-map drawing surface.

use marginalia_core::geometry::{Bounds, Point, Size};

const MIN_SCALE: f32 = 0.1;
const MAX_SCALE: f32 = 8.0;
/// Margin kept free around fitted content.
const FIT_PADDING: f32 = 20.0;

/// Maps content coordinates onto a fixed-size surface.
///
/// A content point `p` is drawn at `translate + p * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    size: Size,
    scale: f32,
    translate: Point,
}

impl Viewport {
    /// An identity viewport of the given surface size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            scale: 1.0,
            translate: Point::default(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translate(&self) -> Point {
        self.translate
    }

    /// Centers `content` on the surface at the largest scale that fits,
    /// never above `max_scale`.
    pub fn fit(&mut self, content: Bounds, max_scale: f32) {
        let available_w = (self.size.width() - FIT_PADDING * 2.0).max(1.0);
        let available_h = (self.size.height() - FIT_PADDING * 2.0).max(1.0);

        let mut scale = max_scale;
        if content.width() > 0.0 {
            scale = scale.min(available_w / content.width());
        }
        if content.height() > 0.0 {
            scale = scale.min(available_h / content.height());
        }
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);

        let surface_center = Point::new(self.size.width() / 2.0, self.size.height() / 2.0);
        self.translate = surface_center.sub_point(content.center().scale(self.scale));
    }

    /// Zooms by `factor`, keeping the surface point `anchor` fixed.
    pub fn zoom_by(&mut self, factor: f32, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = scale / self.scale;
        self.translate = anchor.sub_point(anchor.sub_point(self.translate).scale(ratio));
        self.scale = scale;
    }

    /// Moves the content by a surface-space offset.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.translate = self.translate.add_point(Point::new(dx, dy));
    }

    /// Surface position of the content point `point`.
    pub fn to_surface(&self, point: Point) -> Point {
        self.translate.add_point(point.scale(self.scale))
    }

    /// SVG `transform` attribute value for the content group.
    pub fn transform(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            self.translate.x(),
            self.translate.y(),
            self.scale
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn content() -> Bounds {
        Bounds::from_origin(Point::new(0.0, 0.0), Size::new(1520.0, 180.0))
    }

    #[test]
    fn test_fit_centers_and_fits_width() {
        let mut viewport = Viewport::new(Size::new(800.0, 400.0));
        viewport.fit(content(), 2.0);

        assert_approx_eq!(f32, viewport.scale(), 0.5, epsilon = 0.001);
        let center = viewport.to_surface(content().center());
        assert_approx_eq!(f32, center.x(), 400.0, epsilon = 0.01);
        assert_approx_eq!(f32, center.y(), 200.0, epsilon = 0.01);
    }

    #[test]
    fn test_fit_respects_max_scale() {
        let mut viewport = Viewport::new(Size::new(800.0, 400.0));
        let tiny = Bounds::from_origin(Point::new(10.0, 10.0), Size::new(20.0, 10.0));
        viewport.fit(tiny, 2.0);
        assert_approx_eq!(f32, viewport.scale(), 2.0);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut viewport = Viewport::new(Size::new(800.0, 400.0));
        viewport.fit(content(), 2.0);
        let anchor = Point::new(300.0, 120.0);
        let before = (anchor.x() - viewport.translate().x()) / viewport.scale();

        viewport.zoom_by(1.5, anchor);
        let after = (anchor.x() - viewport.translate().x()) / viewport.scale();
        assert_approx_eq!(f32, before, after, epsilon = 0.01);
        assert_approx_eq!(f32, viewport.scale(), 0.75, epsilon = 0.001);
    }

    #[test]
    fn test_zoom_is_clamped_and_ignores_bad_factors() {
        let mut viewport = Viewport::new(Size::new(100.0, 100.0));
        viewport.zoom_by(1000.0, Point::default());
        assert_approx_eq!(f32, viewport.scale(), MAX_SCALE);

        viewport.zoom_by(0.0, Point::default());
        viewport.zoom_by(f32::NAN, Point::default());
        assert_approx_eq!(f32, viewport.scale(), MAX_SCALE);
    }

    #[test]
    fn test_pan_and_transform() {
        let mut viewport = Viewport::new(Size::new(100.0, 100.0));
        viewport.pan_by(12.0, -3.0);
        assert_eq!(viewport.transform(), "translate(12,-3) scale(1)");
    }
}
