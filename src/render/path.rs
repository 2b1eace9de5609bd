//! Link geometry.

use std::fmt::Write;

use serde::Serialize;

use crate::config::Orientation;
use crate::tree::Point;

/// Screen-space endpoints of a link curve.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LinkPath {
    /// Parent end.
    pub source: Point,
    /// Child end.
    pub target: Point,
}

impl LinkPath {
    /// A link between two points.
    pub fn new(source: Point, target: Point) -> Self {
        Self { source, target }
    }

    /// A zero-length link folded onto `at`, used for entering and exiting links.
    pub fn collapsed(at: Point) -> Self {
        Self {
            source: at,
            target: at,
        }
    }

    /// Interpolate both endpoints towards `other`.
    pub fn lerp(self, other: LinkPath, t: f32) -> LinkPath {
        LinkPath {
            source: self.source.lerp(other.source, t),
            target: self.target.lerp(other.target, t),
        }
    }

    /// SVG path data for a cubic diagonal between the endpoints.
    ///
    /// The control points sit halfway along the depth axis, so curves leave
    /// the parent and reach the child perpendicular to their level.
    pub fn to_svg(&self, orientation: Orientation) -> String {
        let (s, t) = (self.source, self.target);
        let mut d = String::with_capacity(64);
        let _ = match orientation {
            Orientation::Vertical => {
                let my = (s.y + t.y) / 2.0;
                write!(d, "M{},{}C{},{} {},{} {},{}", s.x, s.y, s.x, my, t.x, my, t.x, t.y)
            }
            Orientation::Horizontal => {
                let mx = (s.x + t.x) / 2.0;
                write!(d, "M{},{}C{},{} {},{} {},{}", s.x, s.y, mx, s.y, mx, t.y, t.x, t.y)
            }
        };
        d
    }
}
