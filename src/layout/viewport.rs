//! Viewport sizing.
//!
//! The canvas width is fixed by configuration. Its height is re-fit after
//! every layout pass so it spans exactly the visible nodes plus the top and
//! bottom margins.

use serde::Serialize;

use crate::config::{ChartConfig, Orientation};
use crate::tree::{Point, TreeModel};

/// Screen-space bounding box of the visible nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extent {
    /// Smallest screen x.
    pub min_x: f32,
    /// Smallest screen y.
    pub min_y: f32,
    /// Largest screen x.
    pub max_x: f32,
    /// Largest screen y.
    pub max_y: f32,
}

impl Extent {
    /// Measure the visible nodes of `model` after projecting them to screen space.
    pub fn measure(model: &TreeModel, orientation: Orientation) -> Extent {
        let mut extent = Extent {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        };

        for id in model.visible() {
            let p = orientation.project(model.node(id).position());
            extent.min_x = extent.min_x.min(p.x);
            extent.min_y = extent.min_y.min(p.y);
            extent.max_x = extent.max_x.max(p.x);
            extent.max_y = extent.max_y.max(p.y);
        }

        extent
    }

    /// Screen height covered by the nodes.
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// An SVG `viewBox`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ViewBox {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl ViewBox {
    /// Fit the fixed-width canvas around `extent`.
    ///
    /// Vertically the box runs from `min_y - margin_top` to
    /// `max_y + margin_bottom`. Vertical trees are centered on the root
    /// (which sits at x = 0); horizontal trees start at `-margin_left`.
    pub fn fit(extent: &Extent, config: &ChartConfig) -> ViewBox {
        let x = match config.orientation {
            Orientation::Vertical => -config.width / 2.0,
            Orientation::Horizontal => -config.margin_left,
        };
        ViewBox {
            x,
            y: extent.min_y - config.margin_top,
            width: config.width,
            height: extent.height() + config.margin_top + config.margin_bottom,
        }
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: ViewBox, t: f32) -> ViewBox {
        let origin = Point::new(self.x, self.y).lerp(Point::new(other.x, other.y), t);
        let size = Point::new(self.width, self.height)
            .lerp(Point::new(other.width, other.height), t);
        ViewBox {
            x: origin.x,
            y: origin.y,
            width: size.x,
            height: size.y,
        }
    }

    /// The `viewBox` attribute value.
    pub fn to_attribute(&self) -> String {
        format!("{} {} {} {}", self.x, self.y, self.width, self.height)
    }
}
