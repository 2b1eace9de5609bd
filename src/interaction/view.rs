//! Pan/zoom transform.
//!
//! Purely presentational: the transform maps chart space to screen space and
//! never feeds back into the model or the layout.

use serde::Serialize;

use crate::tree::Point;

/// Affine transform `screen = chart * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    /// Horizontal translation in screen units.
    pub x: f32,
    /// Vertical translation in screen units.
    pub y: f32,
    /// Scale factor, clamped to the configured zoom range.
    pub k: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform { x: 0.0, y: 0.0, k: 1.0 };

    /// Chart space to screen space.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Screen space to chart space.
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Translate by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.x += dx;
        self.y += dy;
    }

    /// Scale by `factor` around the screen point `anchor`, clamping the
    /// resulting scale to `[min, max]`. The chart point under `anchor` stays put.
    pub fn zoom_at(&mut self, factor: f32, anchor: Point, min: f32, max: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let fixed = self.invert(anchor);
        self.k = (self.k * factor).clamp(min, max);
        self.x = anchor.x - fixed.x * self.k;
        self.y = anchor.y - fixed.y * self.k;
    }

    /// The SVG `transform` attribute value.
    pub fn to_attribute(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_invert() {
        let t = ViewTransform { x: 10.0, y: -5.0, k: 2.0 };
        let p = Point::new(3.0, 4.0);
        assert_eq!(t.apply(p), Point::new(16.0, 3.0));
        assert_eq!(t.invert(t.apply(p)), p);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut t = ViewTransform::IDENTITY;
        t.pan(20.0, 10.0);
        let anchor = Point::new(100.0, 50.0);
        let under = t.invert(anchor);

        t.zoom_at(2.0, anchor, 0.1, 8.0);
        assert_eq!(t.k, 2.0);
        let after = t.apply(under);
        assert!((after.x - anchor.x).abs() < 1e-4);
        assert!((after.y - anchor.y).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut t = ViewTransform::IDENTITY;
        t.zoom_at(100.0, Point::ORIGIN, 0.1, 8.0);
        assert_eq!(t.k, 8.0);
        t.zoom_at(1e-6, Point::ORIGIN, 0.1, 8.0);
        assert_eq!(t.k, 0.1);
        t.zoom_at(-1.0, Point::ORIGIN, 0.1, 8.0);
        assert_eq!(t.k, 0.1);
    }

    #[test]
    fn test_attribute() {
        assert_eq!(ViewTransform::IDENTITY.to_attribute(), "translate(0,0) scale(1)");
    }
}
