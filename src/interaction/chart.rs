//! TreeChart - the application context.
//!
//! Owns the model, the retained scene, the hit-test index, the view
//! transform and the wizard. Every gesture runs the same pipeline:
//!
//! 1. mutate collapse state
//! 2. re-run the tidy layout over the visible hierarchy
//! 3. fit the view box to the new extent
//! 4. reconcile what is on screen now against what is visible now
//! 5. hand the plan to the scene and stash positions for the next gesture
//!
//! Gestures are handled one at a time; a gesture arriving mid-animation
//! supersedes the running plan.

use log::{debug, info};

use super::view::ViewTransform;
use super::wizard::{Wizard, WizardStep};
use crate::config::ChartConfig;
use crate::error::{Result, TreeError};
use crate::layout::{Extent, TidyTreeLayout, ViewBox};
use crate::render::{svg, Frame, KeySet, Reconciler, RenderPlan, Scene};
use crate::spatial::SpatialIndex;
use crate::tree::{NodeId, Point, TreeModel, TreeRecord};

/// A collapsible tree chart.
pub struct TreeChart {
    model: TreeModel,
    config: ChartConfig,
    layout: TidyTreeLayout,
    scene: Scene,
    index: SpatialIndex,
    view: ViewTransform,
    wizard: Wizard,
}

impl TreeChart {
    /// Build the chart, apply the startup collapse rule and draw it.
    ///
    /// The first draw is already settled at time 0.
    pub fn new(record: &TreeRecord, config: ChartConfig) -> Self {
        let mut model = TreeModel::build(record);
        let rule = config.initial_collapse.clone();
        let collapsed = model.collapse_all(|node| rule.collapses(node));

        let mut chart = Self {
            layout: TidyTreeLayout::new((&config).into()),
            model,
            config,
            scene: Scene::new(),
            index: SpatialIndex::new(),
            view: ViewTransform::IDENTITY,
            wizard: Wizard::default(),
        };
        let root = chart.model.root();
        chart.redraw(root, 0.0, 0.0);

        info!(
            "tree chart ready: {} nodes, {} collapsed, {} visible",
            chart.model.len(),
            collapsed,
            chart.model.visible().len()
        );
        chart
    }

    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn transform(&self) -> ViewTransform {
        self.view
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Toggle a node and animate the change. `slow` selects the slow-motion duration.
    pub fn click(&mut self, id: NodeId, slow: bool, now: f64) -> Result<RenderPlan> {
        self.model.toggle(id)?;
        Ok(self.update(id, slow, now))
    }

    /// Toggle whatever node is drawn under a pointer position at `now`.
    ///
    /// `(sx, sy)` is in SVG user space, i.e. before the pan/zoom transform
    /// is undone. Returns `None` when nothing is within the hit radius.
    pub fn click_at(&mut self, sx: f32, sy: f32, slow: bool, now: f64) -> Result<Option<RenderPlan>> {
        match self.node_at(sx, sy, now) {
            Some(id) => self.click(id, slow, now).map(Some),
            None => Ok(None),
        }
    }

    /// The visible node drawn nearest to a pointer position at `now`, within
    /// the hit radius.
    ///
    /// While a transition runs, nodes are matched where they are drawn, not
    /// where they will settle. Exiting nodes cannot be hit.
    pub fn node_at(&self, sx: f32, sy: f32, now: f64) -> Option<NodeId> {
        let at = self.view.invert(Point::new(sx, sy));
        if self.scene.is_animating(now) {
            SpatialIndex::from_frame(&self.scene.frame(now), &self.model)
                .hit(at, self.config.hit_radius)
        } else {
            self.index.hit(at, self.config.hit_radius)
        }
    }

    /// Expand every ancestor of `id` and `id` itself.
    ///
    /// The animation starts from the topmost node that was opened, which was
    /// already on screen; if nothing had to open, from `id`.
    pub fn expand_path(&mut self, id: NodeId, now: f64) -> Result<RenderPlan> {
        let opened = self.model.expand_path(id)?;
        let trigger = opened.first().copied().unwrap_or(id);
        Ok(self.update(trigger, false, now))
    }

    /// Replace the wizard steps. Answers and bindings are reset.
    pub fn set_wizard_steps(&mut self, steps: Vec<WizardStep>) {
        debug!("wizard configured with {} steps", steps.len());
        self.wizard = Wizard::new(steps);
    }

    /// Make a wizard answer reveal `node`.
    pub fn bind_wizard_answer(&mut self, step: &str, value: &str, node: NodeId) -> Result<()> {
        if !self.model.contains(node) {
            return Err(TreeError::UnknownNode(node));
        }
        self.wizard.bind(step, value, node)
    }

    /// Skip the current wizard step without answering it.
    pub fn wizard_next(&mut self) {
        self.wizard.advance();
    }

    /// Go back to the previous wizard step. Answers and the tree are kept.
    pub fn wizard_back(&mut self) {
        self.wizard.back();
    }

    /// Record a wizard answer and reveal its bound node, if any.
    pub fn wizard_change(&mut self, step: &str, value: &str, now: f64) -> Result<Option<RenderPlan>> {
        match self.wizard.select(step, value)? {
            Some(node) => self.expand_path(node, now).map(Some),
            None => Ok(None),
        }
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.view.pan(dx, dy);
    }

    /// Zoom by `factor` around the screen point `(ax, ay)`.
    pub fn zoom(&mut self, factor: f32, ax: f32, ay: f32) {
        self.view.zoom_at(
            factor,
            Point::new(ax, ay),
            self.config.min_zoom,
            self.config.max_zoom,
        );
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    pub fn frame(&self, now: f64) -> Frame {
        self.scene.frame(now)
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.scene.is_animating(now)
    }

    /// The frame at `now` as an SVG document.
    pub fn svg(&self, now: f64) -> String {
        svg::render(
            &self.frame(now),
            self.config.orientation,
            &self.view.to_attribute(),
        )
    }

    /// Screen-space layout position of every node in id order; `None` for hidden nodes.
    pub fn positions(&self) -> Vec<Option<Point>> {
        let orientation = self.config.orientation;
        self.model
            .iter()
            .map(|node| {
                self.model
                    .is_visible(node.id())
                    .then(|| orientation.project(node.position()))
            })
            .collect()
    }

    // =========================================================================
    // Pipeline
    // =========================================================================

    fn update(&mut self, trigger: NodeId, slow: bool, now: f64) -> RenderPlan {
        let duration = self.config.duration(slow);
        self.redraw(trigger, duration, now)
    }

    fn redraw(&mut self, trigger: NodeId, duration_ms: f64, now: f64) -> RenderPlan {
        let on_screen = self.scene.frame(now);
        let prev = on_screen.keys();

        let result = self.layout.layout(&mut self.model);
        let orientation = self.config.orientation;
        let view_box = ViewBox::fit(&Extent::measure(&self.model, orientation), &self.config);
        let next = KeySet::visible(&self.model);

        let plan = Reconciler::new(&self.model, orientation).reconcile(
            &prev,
            &next,
            trigger,
            &on_screen,
            duration_ms,
            view_box,
        );
        self.scene.apply(&plan, now);
        self.model.stash_positions();
        self.index = SpatialIndex::from_model(&self.model, orientation);

        debug!(
            "redraw from {trigger}: {} visible, height {}, column {:.1}",
            result.node_count, result.tree_height, result.column_width
        );
        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollapseRule;
    use crate::render::Phase;

    /// R ─┬─ X ─┬─ x1
    ///    │     └─ x2 ── x21
    ///    └─ Y
    fn record() -> TreeRecord {
        TreeRecord::with_children(
            "R",
            vec![
                TreeRecord::with_children(
                    "X",
                    vec![
                        TreeRecord::new("x1"),
                        TreeRecord::with_children("x2", vec![TreeRecord::new("x21")]),
                    ],
                ),
                TreeRecord::new("Y"),
            ],
        )
    }

    fn expanded() -> TreeChart {
        TreeChart::new(
            &record(),
            ChartConfig {
                initial_collapse: CollapseRule::ExpandAll,
                ..Default::default()
            },
        )
    }

    fn ids(frame: &Frame) -> Vec<u32> {
        frame.nodes.iter().map(|n| n.id.raw()).collect()
    }

    #[test]
    fn test_initial_draw_is_settled() {
        let chart = expanded();
        assert!(!chart.is_animating(0.0));
        let frame = chart.frame(0.0);
        assert_eq!(ids(&frame), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(frame.links.len(), 5);
        for node in &frame.nodes {
            assert_eq!(node.position, chart.model().node(node.id).position());
            assert_eq!(node.opacity, 1.0);
        }
    }

    #[test]
    fn test_initial_collapse_rule() {
        // Default rule keeps names of length 7 open; none of these qualify.
        let chart = TreeChart::new(&record(), ChartConfig::default());
        assert_eq!(ids(&chart.frame(0.0)), vec![0, 1, 5]);
        assert!(chart.model().node(NodeId(1)).is_collapsed());
    }

    #[test]
    fn test_click_collapse_then_expand_restores_frame() {
        let mut chart = expanded();
        let before = chart.frame(0.0);

        let plan = chart.click(NodeId(1), false, 1000.0).unwrap();
        assert_eq!(plan.duration_ms, 250.0);
        assert_eq!(plan.node_ids(Phase::Exit), vec![NodeId(2), NodeId(3), NodeId(4)]);
        assert!(chart.is_animating(1100.0));
        assert_eq!(ids(&chart.frame(2000.0)), vec![0, 1, 5]);

        let plan = chart.click(NodeId(1), false, 3000.0).unwrap();
        assert_eq!(plan.node_ids(Phase::Enter), vec![NodeId(2), NodeId(3), NodeId(4)]);
        let after = chart.frame(4000.0);

        assert_eq!(ids(&after), ids(&before));
        for (a, b) in after.nodes.iter().zip(&before.nodes) {
            assert!((a.position.x - b.position.x).abs() < 1e-3);
            assert!((a.position.y - b.position.y).abs() < 1e-3);
            assert_eq!(a.style, b.style);
        }
        assert!((after.view_box.y - before.view_box.y).abs() < 1e-3);
        assert!((after.view_box.height - before.view_box.height).abs() < 1e-3);
    }

    #[test]
    fn test_slow_click_uses_slow_duration() {
        let mut chart = expanded();
        let plan = chart.click(NodeId(1), true, 0.0).unwrap();
        assert_eq!(plan.duration_ms, 2500.0);
        assert!(chart.is_animating(2000.0));
    }

    #[test]
    fn test_click_unknown_node_changes_nothing() {
        let mut chart = expanded();
        let before = chart.frame(0.0);
        assert!(chart.click(NodeId(99), false, 10.0).is_err());
        assert_eq!(chart.frame(10.0), before);
    }

    #[test]
    fn test_interrupted_exit_becomes_update() {
        let mut chart = expanded();
        chart.click(NodeId(1), false, 0.0).unwrap();
        let mid = chart.frame(125.0);
        let x1_mid = mid.node(NodeId(2)).unwrap().position;

        let plan = chart.click(NodeId(1), false, 125.0).unwrap();
        let x1 = plan.nodes.iter().find(|t| t.id == NodeId(2)).unwrap();
        assert_eq!(x1.phase, Phase::Update);
        assert_eq!(x1.from, x1_mid);
        assert!(x1.from_opacity > 0.0 && x1.from_opacity < 1.0);
    }

    #[test]
    fn test_click_at_hits_node_under_pointer() {
        let mut chart = expanded();
        let y = chart.model().node(NodeId(5)).position();
        assert_eq!(chart.node_at(y.x + 2.0, y.y + 2.0, 0.0), Some(NodeId(5)));
        assert!(chart.click_at(y.x + 500.0, y.y, false, 0.0).unwrap().is_none());

        let x = chart.model().node(NodeId(1)).position();
        chart.pan(30.0, -20.0);
        let plan = chart.click_at(x.x + 30.0, x.y - 20.0, false, 0.0).unwrap();
        assert_eq!(plan.map(|p| p.trigger), Some(NodeId(1)));
    }

    #[test]
    fn test_click_at_hits_node_where_it_is_drawn_mid_transition() {
        let mut chart = expanded();
        let y = NodeId(5);
        chart.click(NodeId(1), false, 0.0).unwrap();
        assert!(chart.is_animating(125.0));

        // Collapsing X shrinks the tree height, so Y is still moving.
        let drawn = chart.frame(125.0).node(y).unwrap().position;
        let settled = chart.model().node(y).position();
        assert!((drawn.y - settled.y).abs() > 2.0 * chart.config().hit_radius);

        assert_eq!(chart.node_at(drawn.x, drawn.y, 125.0), Some(y));
        assert_eq!(chart.node_at(settled.x, settled.y, 125.0), None);

        let plan = chart.click_at(drawn.x, drawn.y, false, 125.0).unwrap().unwrap();
        assert_eq!(plan.trigger, y);
    }

    #[test]
    fn test_click_at_ignores_exiting_nodes() {
        let mut chart = expanded();
        chart.click(NodeId(1), false, 0.0).unwrap();
        let x1 = chart.frame(125.0).node(NodeId(2)).unwrap().position;
        assert_ne!(chart.node_at(x1.x, x1.y, 125.0), Some(NodeId(2)));
    }

    #[test]
    fn test_expand_path_enters_from_opened_ancestor() {
        // Default rule: X and x2 start collapsed.
        let mut chart = TreeChart::new(&record(), ChartConfig::default());
        let x = NodeId(1);
        let drawn = chart.frame(0.0).node(x).unwrap().position;

        let plan = chart.expand_path(NodeId(4), 0.0).unwrap();
        assert_eq!(plan.trigger, x);
        let enters = plan.node_ids(Phase::Enter);
        assert_eq!(enters, vec![NodeId(2), NodeId(3), NodeId(4)]);
        for t in plan.nodes.iter().filter(|t| t.phase == Phase::Enter) {
            assert_eq!(t.from, drawn);
        }
        for l in plan.links.iter().filter(|l| l.phase == Phase::Enter) {
            assert_eq!(l.from.source, drawn);
        }
    }

    #[test]
    fn test_expand_path_on_open_node_animates_from_it() {
        let mut chart = expanded();
        let plan = chart.expand_path(NodeId(3), 0.0).unwrap();
        assert_eq!(plan.trigger, NodeId(3));
        assert!(plan.node_ids(Phase::Enter).is_empty());
    }

    #[test]
    fn test_pan_zoom_leave_layout_untouched() {
        let mut chart = expanded();
        let before = chart.positions();
        chart.pan(15.0, 15.0);
        chart.zoom(2.0, 100.0, 100.0);
        assert_eq!(chart.positions(), before);
        assert_eq!(chart.transform().k, 2.0);
        assert!(chart.svg(0.0).contains("scale(2)"));
    }

    #[test]
    fn test_expand_path_reveals_deep_node() {
        let mut chart = TreeChart::new(
            &record(),
            ChartConfig {
                initial_collapse: CollapseRule::RootOnly,
                ..Default::default()
            },
        );
        assert_eq!(chart.positions()[4], None);

        let plan = chart.expand_path(NodeId(3), 0.0).unwrap();
        // X was the topmost node to open.
        assert_eq!(plan.trigger, NodeId(1));
        assert!(chart.positions()[4].is_some());
        assert!(chart.model().is_visible(NodeId(4)));
    }

    #[test]
    fn test_wizard_change_expands_bound_node() {
        let mut chart = TreeChart::new(&record(), ChartConfig::default());
        chart.set_wizard_steps(vec![WizardStep::new("branch", ["left", "right"])]);
        chart.bind_wizard_answer("branch", "left", NodeId(3)).unwrap();
        assert!(chart.bind_wizard_answer("branch", "right", NodeId(40)).is_err());

        assert!(chart.wizard_change("branch", "right", 0.0).unwrap().is_none());
        let plan = chart.wizard_change("branch", "left", 0.0).unwrap().unwrap();
        assert_eq!(plan.trigger, NodeId(1));
        assert!(chart.model().is_visible(NodeId(4)));
        assert!(chart.wizard().is_complete());
    }

    #[test]
    fn test_wizard_navigation_leaves_tree_alone() {
        let mut chart = TreeChart::new(&record(), ChartConfig::default());
        chart.set_wizard_steps(vec![
            WizardStep::new("branch", ["left", "right"]),
            WizardStep::new("depth", ["shallow", "deep"]),
        ]);
        let before = chart.positions();

        chart.wizard_next();
        assert_eq!(chart.wizard().current_step().unwrap().name, "depth");
        chart.wizard_next();
        chart.wizard_next();
        assert!(chart.wizard().is_complete());
        chart.wizard_back();
        chart.wizard_back();
        assert_eq!(chart.wizard().current_step().unwrap().name, "branch");
        assert_eq!(chart.positions(), before);
        assert!(!chart.is_animating(0.0));
    }

    #[test]
    fn test_view_box_tracks_extent() {
        let mut chart = expanded();
        let tall = chart.frame(0.0).view_box;
        chart.click(NodeId(1), false, 0.0).unwrap();
        let short = chart.frame(1000.0).view_box;
        assert!(short.height < tall.height);
        assert_eq!(short.width, tall.width);
    }
}
