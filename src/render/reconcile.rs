//! Enter/update/exit reconciliation.
//!
//! Given the keys currently on screen and the keys of the freshly laid out
//! model, every element falls into exactly one partition:
//!
//! - **Enter** (new only): appears at the trigger node's pre-toggle position,
//!   faded out, and moves to its layout position while fading in.
//! - **Update** (both): moves from where it currently is to its layout position.
//! - **Exit** (old only): moves to the trigger node's post-toggle position
//!   while fading out, then leaves the scene. The model keeps the node.
//!
//! All transitions of one plan share a single duration so they stay in step.

use log::debug;
use serde::Serialize;

use super::keys::KeySet;
use super::path::LinkPath;
use super::style::{style, NodeStyle};
use crate::config::Orientation;
use crate::layout::ViewBox;
use crate::tree::{NodeId, Point, TreeModel};

/// Where elements currently are on screen.
///
/// Lets a new plan start from the in-flight state of an interrupted one.
pub trait VisualState {
    /// Current screen position of a rendered node.
    fn node_position(&self, id: NodeId) -> Option<Point>;

    /// Current opacity of a rendered node.
    fn node_opacity(&self, id: NodeId) -> Option<f32>;

    /// Current geometry of the rendered link ending at `target`.
    fn link_path(&self, target: NodeId) -> Option<LinkPath>;
}

/// Partition an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    /// Newly visible.
    Enter,
    /// Visible before and after.
    Update,
    /// No longer visible.
    Exit,
}

/// Animation of one node element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTransition {
    /// Node key.
    pub id: NodeId,
    /// Label text.
    pub label: String,
    /// Partition.
    pub phase: Phase,
    /// Presentation after the change.
    pub style: NodeStyle,
    /// Start position.
    pub from: Point,
    /// End position.
    pub to: Point,
    /// Start opacity.
    pub from_opacity: f32,
    /// End opacity.
    pub to_opacity: f32,
}

/// Animation of one link element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTransition {
    /// Link key: the child end.
    pub target: NodeId,
    /// Parent end.
    pub source: NodeId,
    /// Partition.
    pub phase: Phase,
    /// Start geometry.
    pub from: LinkPath,
    /// End geometry.
    pub to: LinkPath,
}

/// Everything a host needs to animate one redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    /// Node whose change caused the redraw.
    pub trigger: NodeId,
    /// Shared transition duration.
    pub duration_ms: f64,
    /// Node transitions in id order.
    pub nodes: Vec<NodeTransition>,
    /// Link transitions in target id order.
    pub links: Vec<LinkTransition>,
    /// View box to animate to.
    pub view_box: ViewBox,
}

impl RenderPlan {
    /// Node ids in the given partition.
    pub fn node_ids(&self, phase: Phase) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.phase == phase)
            .map(|n| n.id)
            .collect()
    }

    /// Link target ids in the given partition.
    pub fn link_ids(&self, phase: Phase) -> Vec<NodeId> {
        self.links
            .iter()
            .filter(|l| l.phase == phase)
            .map(|l| l.target)
            .collect()
    }
}

/// Builds render plans for one model.
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'a> {
    model: &'a TreeModel,
    orientation: Orientation,
}

impl<'a> Reconciler<'a> {
    /// A reconciler over a freshly laid out model.
    pub fn new(model: &'a TreeModel, orientation: Orientation) -> Self {
        Self { model, orientation }
    }

    fn screen(&self, point: Point) -> Point {
        self.orientation.project(point)
    }

    fn current(&self, id: NodeId) -> Point {
        self.screen(self.model.node(id).position())
    }

    fn previous(&self, id: NodeId) -> Point {
        self.screen(self.model.node(id).previous())
    }

    /// Diff `prev` against `next`.
    ///
    /// `trigger` must still hold its pre-toggle position in `previous()`,
    /// i.e. positions are stashed only after this call. Keys unknown to the
    /// model are skipped.
    pub fn reconcile(
        &self,
        prev: &KeySet,
        next: &KeySet,
        trigger: NodeId,
        visual: &impl VisualState,
        duration_ms: f64,
        view_box: ViewBox,
    ) -> RenderPlan {
        let enter_anchor = self.previous(trigger);
        let exit_anchor = self.current(trigger);

        let nodes: Vec<NodeTransition> = prev
            .nodes
            .union(&next.nodes)
            .filter(|id| self.model.contains(**id))
            .map(|&id| {
                let node = self.model.node(id);
                let on_screen = visual.node_position(id).unwrap_or_else(|| self.previous(id));
                let opacity = visual.node_opacity(id).unwrap_or(1.0);
                let (phase, from, to, from_opacity, to_opacity) =
                    match (prev.nodes.contains(&id), next.nodes.contains(&id)) {
                        (true, true) => (Phase::Update, on_screen, self.current(id), opacity, 1.0),
                        (false, true) => (Phase::Enter, enter_anchor, self.current(id), 0.0, 1.0),
                        _ => (Phase::Exit, on_screen, exit_anchor, opacity, 0.0),
                    };
                NodeTransition {
                    id,
                    label: node.name().to_owned(),
                    phase,
                    style: style(node),
                    from,
                    to,
                    from_opacity,
                    to_opacity,
                }
            })
            .collect();

        let mut targets: Vec<NodeId> = prev.links.keys().chain(next.links.keys()).copied().collect();
        targets.sort_unstable();
        targets.dedup();

        let links: Vec<LinkTransition> = targets
            .into_iter()
            .filter_map(|target| {
                let (source, phase) = match (prev.links.get(&target), next.links.get(&target)) {
                    (Some(_), Some(&source)) => (source, Phase::Update),
                    (None, Some(&source)) => (source, Phase::Enter),
                    (Some(&source), None) => (source, Phase::Exit),
                    (None, None) => return None,
                };
                if !self.model.contains(source) || !self.model.contains(target) {
                    return None;
                }
                let laid_out = LinkPath::new(self.current(source), self.current(target));
                let on_screen = || {
                    visual.link_path(target).unwrap_or_else(|| {
                        LinkPath::new(self.previous(source), self.previous(target))
                    })
                };
                let (from, to) = match phase {
                    Phase::Enter => (LinkPath::collapsed(enter_anchor), laid_out),
                    Phase::Update => (on_screen(), laid_out),
                    Phase::Exit => (on_screen(), LinkPath::collapsed(exit_anchor)),
                };
                Some(LinkTransition {
                    target,
                    source,
                    phase,
                    from,
                    to,
                })
            })
            .collect();

        let plan = RenderPlan {
            trigger,
            duration_ms,
            nodes,
            links,
            view_box,
        };
        debug!(
            "reconcile at {trigger}: {} enter, {} update, {} exit",
            plan.node_ids(Phase::Enter).len(),
            plan.node_ids(Phase::Update).len(),
            plan.node_ids(Phase::Exit).len()
        );
        plan
    }
}
