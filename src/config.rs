//! Chart configuration.
//!
//! Every field has a default so hosts can pass a partial object (or nothing
//! at all). Field names are camelCase on the wire to match JS conventions.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tree::{HierarchyNode, Point};

/// Which screen axis the tree depth runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// Root at the top, depth grows downward.
    #[default]
    Vertical,
    /// Root on the left, depth grows to the right.
    Horizontal,
}

impl Orientation {
    /// Map a layout point (sibling axis in `x`, depth axis in `y`) to screen space.
    #[inline]
    pub fn project(self, point: Point) -> Point {
        match self {
            Orientation::Vertical => point,
            Orientation::Horizontal => Point::new(point.y, point.x),
        }
    }
}

/// Rule applied once at startup to decide which nodes start collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CollapseRule {
    /// Nothing collapsed.
    ExpandAll,
    /// Only the root stays open.
    RootOnly,
    /// The root and nodes whose name has exactly `length` characters stay open.
    KeepNameLength {
        /// Name length (in characters) that keeps a node open.
        length: usize,
    },
}

impl Default for CollapseRule {
    fn default() -> Self {
        CollapseRule::KeepNameLength { length: 7 }
    }
}

impl CollapseRule {
    /// Whether `node` should start collapsed.
    pub fn collapses(&self, node: &HierarchyNode) -> bool {
        match self {
            CollapseRule::ExpandAll => false,
            CollapseRule::RootOnly => node.depth() > 0,
            CollapseRule::KeepNameLength { length } => {
                node.depth() > 0 && node.name().chars().count() != *length
            }
        }
    }
}

/// Configuration for a tree chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Fixed canvas width.
    pub width: f32,
    /// Space above the topmost node.
    pub margin_top: f32,
    /// Space right of the chart.
    pub margin_right: f32,
    /// Space below the bottom node.
    pub margin_bottom: f32,
    /// Space left of the chart.
    pub margin_left: f32,
    /// Spacing between adjacent siblings.
    pub node_spacing: f32,
    /// Transition duration in milliseconds.
    pub duration_ms: f64,
    /// Transition duration when slow motion is requested.
    pub slow_duration_ms: f64,
    /// Depth axis direction.
    pub orientation: Orientation,
    /// Startup collapse rule.
    pub initial_collapse: CollapseRule,
    /// Pointer hit-test radius in chart units.
    pub hit_radius: f32,
    /// Smallest zoom scale.
    pub min_zoom: f32,
    /// Largest zoom scale.
    pub max_zoom: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 928.0,
            margin_top: 10.0,
            margin_right: 10.0,
            margin_bottom: 10.0,
            margin_left: 40.0,
            node_spacing: 200.0,
            duration_ms: 250.0,
            slow_duration_ms: 2500.0,
            orientation: Orientation::Vertical,
            initial_collapse: CollapseRule::default(),
            hit_radius: 12.0,
            min_zoom: 0.1,
            max_zoom: 8.0,
        }
    }
}

impl ChartConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Width left for the depth axis once horizontal margins are removed.
    pub fn available_width(&self) -> f32 {
        (self.width - self.margin_left - self.margin_right).max(0.0)
    }

    /// Transition duration, honouring the slow-motion modifier.
    pub fn duration(&self, slow: bool) -> f64 {
        if slow {
            self.slow_duration_ms
        } else {
            self.duration_ms
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TreeModel, TreeRecord};

    #[test]
    fn test_defaults() {
        let config = ChartConfig::default();
        assert_eq!(config.available_width(), 878.0);
        assert_eq!(config.duration(false), 250.0);
        assert_eq!(config.duration(true), 2500.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ChartConfig::from_json(r#"{"width": 500, "orientation": "horizontal"}"#)
            .expect("valid config");
        assert_eq!(config.width, 500.0);
        assert_eq!(config.orientation, Orientation::Horizontal);
        assert_eq!(config.margin_left, 40.0);
        assert_eq!(config.initial_collapse, CollapseRule::KeepNameLength { length: 7 });
    }

    #[test]
    fn test_collapse_rule_json() {
        let config = ChartConfig::from_json(r#"{"initialCollapse": {"kind": "rootOnly"}}"#)
            .expect("valid config");
        assert_eq!(config.initial_collapse, CollapseRule::RootOnly);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(ChartConfig::from_json("{width: }").is_err());
    }

    #[test]
    fn test_available_width_floors_at_zero() {
        let config = ChartConfig {
            width: 20.0,
            ..Default::default()
        };
        assert_eq!(config.available_width(), 0.0);
    }

    #[test]
    fn test_project_swaps_axes_for_horizontal() {
        let p = Point::new(3.0, 7.0);
        assert_eq!(Orientation::Vertical.project(p), p);
        assert_eq!(Orientation::Horizontal.project(p), Point::new(7.0, 3.0));
    }

    #[test]
    fn test_keep_name_length_rule() {
        let record = TreeRecord::with_children(
            "root",
            vec![TreeRecord::new("abcdefg"), TreeRecord::new("ab")],
        );
        let model = TreeModel::build(&record);
        let rule = CollapseRule::default();

        let flags: Vec<bool> = model.iter().map(|n| rule.collapses(n)).collect();
        assert_eq!(flags, vec![false, false, true]);
    }
}
