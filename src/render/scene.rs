//! Retained scene playback.
//!
//! The scene holds the transitions of the latest [`RenderPlan`] and samples
//! them at arbitrary timestamps. A new plan replaces the running one; since
//! the reconciler starts every transition from the sampled [`Frame`], an
//! interrupted animation continues from wherever its elements were.

use std::collections::BTreeMap;

use serde::Serialize;

use super::keys::KeySet;
use super::path::LinkPath;
use super::reconcile::{LinkTransition, NodeTransition, Phase, RenderPlan, VisualState};
use super::style::NodeStyle;
use crate::layout::ViewBox;
use crate::tree::{NodeId, Point};

/// Cubic ease-in-out on `[0, 1]`.
pub fn ease_cubic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// A node as drawn in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameNode {
    pub id: NodeId,
    /// Text drawn next to the marker.
    pub label: String,
    /// Marker shape and label placement.
    pub style: NodeStyle,
    /// Screen-space position at the sampled instant.
    pub position: Point,
    /// Fill and stroke opacity, 0 while entering starts and 1 once settled.
    pub opacity: f32,
}

/// A link as drawn in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameLink {
    /// Parent node.
    pub source: NodeId,
    /// Child node. Links are keyed by it.
    pub target: NodeId,
    /// Interpolated endpoints.
    pub path: LinkPath,
}

/// The scene sampled at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Rendered nodes in id order.
    pub nodes: Vec<FrameNode>,
    /// Rendered links in target id order.
    pub links: Vec<FrameLink>,
    /// SVG `viewBox`, eased along with the nodes.
    pub view_box: ViewBox,
    /// True while transitions are still running.
    pub animating: bool,
}

impl Frame {
    /// Keys of everything currently rendered, exiting elements included.
    pub fn keys(&self) -> KeySet {
        KeySet {
            nodes: self.nodes.iter().map(|n| n.id).collect(),
            links: self.links.iter().map(|l| (l.target, l.source)).collect(),
        }
    }

    /// The rendered node with this id.
    pub fn node(&self, id: NodeId) -> Option<&FrameNode> {
        self.nodes
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|i| &self.nodes[i])
    }

    /// The rendered link ending at `target`.
    pub fn link(&self, target: NodeId) -> Option<&FrameLink> {
        self.links
            .binary_search_by_key(&target, |l| l.target)
            .ok()
            .map(|i| &self.links[i])
    }
}

impl VisualState for Frame {
    fn node_position(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    fn node_opacity(&self, id: NodeId) -> Option<f32> {
        self.node(id).map(|n| n.opacity)
    }

    fn link_path(&self, target: NodeId) -> Option<LinkPath> {
        self.link(target).map(|l| l.path)
    }
}

/// Transitions of the current plan, keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, NodeTransition>,
    links: BTreeMap<NodeId, LinkTransition>,
    started_at: f64,
    duration_ms: f64,
    view_from: ViewBox,
    view_to: ViewBox,
    drawn: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Linear progress of the current plan at `now`, in `[0, 1]`.
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.started_at) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.drawn && self.progress(now) < 1.0
    }

    /// Start playing `plan` at `now`, superseding whatever was running.
    pub fn apply(&mut self, plan: &RenderPlan, now: f64) {
        self.view_from = if self.drawn {
            self.view_box(now)
        } else {
            plan.view_box
        };
        self.view_to = plan.view_box;
        self.nodes = plan.nodes.iter().map(|n| (n.id, n.clone())).collect();
        self.links = plan.links.iter().map(|l| (l.target, l.clone())).collect();
        self.started_at = now;
        self.duration_ms = plan.duration_ms;
        self.drawn = true;
    }

    fn view_box(&self, now: f64) -> ViewBox {
        self.view_from
            .lerp(self.view_to, ease_cubic_in_out(self.progress(now)))
    }

    /// Sample the scene at `now`. Exiting elements are gone once their
    /// transition has finished.
    pub fn frame(&self, now: f64) -> Frame {
        let progress = self.progress(now);
        let finished = progress >= 1.0;
        let t = ease_cubic_in_out(progress);

        let nodes = self
            .nodes
            .values()
            .filter(|n| !(finished && n.phase == Phase::Exit))
            .map(|n| FrameNode {
                id: n.id,
                label: n.label.clone(),
                style: n.style,
                position: n.from.lerp(n.to, t),
                opacity: n.from_opacity + (n.to_opacity - n.from_opacity) * t,
            })
            .collect();

        let links = self
            .links
            .values()
            .filter(|l| !(finished && l.phase == Phase::Exit))
            .map(|l| FrameLink {
                source: l.source,
                target: l.target,
                path: l.from.lerp(l.to, t),
            })
            .collect();

        Frame {
            nodes,
            links,
            view_box: self.view_box(now),
            animating: self.drawn && !finished,
        }
    }
}
