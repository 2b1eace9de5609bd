//! Buchheim-Junger-Leipert tidy tree layout algorithm.
//!
//! Implements the O(n) algorithm from "Improving Walker's Algorithm to Run in
//! Linear Time" (Buchheim, Junger, Leipert, 2002) over the *visible* part of
//! a [`TreeModel`]: collapsed subtrees take no room.
//!
//! The algorithm produces a sibling-axis coordinate per node. The depth axis
//! is `depth * column_width`, where the column width divides the available
//! width among the visible levels.
//!
//! # Algorithm Overview
//!
//! 1. **First walk (bottom-up):** Recursively assign preliminary coordinates
//!    to each node by merging subtree contours. Uses threads for O(1) amortized
//!    contour traversal.
//! 2. **Second walk (top-down):** Apply accumulated modifiers to convert
//!    preliminary coordinates to final positions, with the root pinned at 0.
//! 3. **Scaling:** Multiply by the node spacing and write positions back into
//!    the model.

use crate::config::ChartConfig;
use crate::tree::{NodeId, Point, TreeModel};

/// Configuration for the tidy tree layout.
#[derive(Debug, Clone)]
pub struct TidyTreeConfig {
    /// Distance between adjacent siblings, in chart units.
    pub node_spacing: f32,
    /// Width shared out among the visible levels.
    pub available_width: f32,
    /// Separation (in node spacings) between nodes that share a parent.
    pub sibling_separation: f32,
    /// Separation (in node spacings) between nodes of different parents.
    pub subtree_separation: f32,
}

impl Default for TidyTreeConfig {
    fn default() -> Self {
        Self::from(&ChartConfig::default())
    }
}

impl From<&ChartConfig> for TidyTreeConfig {
    fn from(config: &ChartConfig) -> Self {
        Self {
            node_spacing: config.node_spacing,
            available_width: config.available_width(),
            sibling_separation: 1.0,
            subtree_separation: 2.0,
        }
    }
}

/// Internal node data used during the Buchheim algorithm.
#[derive(Debug)]
struct LayoutNode {
    /// Model node this entry lays out.
    slot: NodeId,
    /// Depth in the tree (root = 0).
    depth: u32,
    /// Parent layout index (None for root).
    parent: Option<usize>,
    /// Visible children, in order.
    children: Vec<usize>,
    /// Preliminary coordinate (from first walk).
    prelim: f32,
    /// Modifier for subtree shift (accumulated in first walk, applied in second).
    modifier: f32,
    /// Contour thread for leaves.
    thread: Option<usize>,
    /// Ancestor pointer (for the "default ancestor" in apportion).
    ancestor: usize,
    /// Default ancestor carried between this node's children during the first walk.
    default_ancestor: Option<usize>,
    /// Shift value for even spacing of intermediate children.
    shift: f32,
    /// Change value for even spacing of intermediate children.
    change: f32,
    /// Number (left-to-right index among siblings).
    number: usize,
}

/// Summary of a layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TidyTreeResult {
    /// Deepest visible level (0 for a lone root).
    pub tree_height: u32,
    /// Depth-axis distance between consecutive levels.
    pub column_width: f32,
    /// Number of nodes laid out.
    pub node_count: usize,
}

/// The tidy tree layout engine.
#[derive(Debug, Clone)]
pub struct TidyTreeLayout {
    config: TidyTreeConfig,
}

impl TidyTreeLayout {
    /// Create a new tidy tree layout with the given configuration.
    pub fn new(config: TidyTreeConfig) -> Self {
        Self { config }
    }

    /// Create a tidy tree layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TidyTreeConfig::default())
    }

    /// Lay out every visible node of `model`, writing positions in place.
    ///
    /// Nodes hidden under a collapsed ancestor keep whatever position they
    /// had. The output is fully determined by the collapse state and child
    /// order; running it twice yields identical positions.
    pub fn layout(&self, model: &mut TreeModel) -> TidyTreeResult {
        let mut nodes: Vec<LayoutNode> = Vec::with_capacity(model.len());
        Self::build_layout_tree(model, model.root(), None, 0, &mut nodes);

        let tree_height = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        // tree_height floors at 0, so the divisor is at least 1.
        let column_width = self.config.available_width / (1 + tree_height) as f32;

        self.first_walk(0, &mut nodes);

        let mut final_x: Vec<f32> = vec![0.0; nodes.len()];
        // Pin the root at 0: start the modifier sum at -prelim(root).
        let root_offset = -nodes[0].prelim;
        self.second_walk_collect(0, root_offset, &nodes, &mut final_x);

        for (layout_idx, node) in nodes.iter().enumerate() {
            model.set_position(
                node.slot,
                Point::new(
                    final_x[layout_idx] * self.config.node_spacing,
                    node.depth as f32 * column_width,
                ),
            );
        }

        TidyTreeResult {
            tree_height,
            column_width,
            node_count: nodes.len(),
        }
    }

    /// Mirror the visible hierarchy into layout nodes, depth first.
    fn build_layout_tree(
        model: &TreeModel,
        id: NodeId,
        parent_layout_idx: Option<usize>,
        number: usize,
        layout_nodes: &mut Vec<LayoutNode>,
    ) -> usize {
        let node = model.node(id);
        let layout_idx = layout_nodes.len();

        layout_nodes.push(LayoutNode {
            slot: id,
            depth: node.depth(),
            parent: parent_layout_idx,
            children: Vec::with_capacity(node.children().len()),
            prelim: 0.0,
            modifier: 0.0,
            thread: None,
            ancestor: layout_idx,
            default_ancestor: None,
            shift: 0.0,
            change: 0.0,
            number,
        });

        let children: Vec<usize> = node
            .children()
            .iter()
            .enumerate()
            .map(|(number, &child)| {
                Self::build_layout_tree(model, child, Some(layout_idx), number, layout_nodes)
            })
            .collect();
        layout_nodes[layout_idx].children = children;
        layout_idx
    }

    /// Buchheim first walk: bottom-up assignment of preliminary coordinates.
    fn first_walk(&self, v: usize, nodes: &mut [LayoutNode]) {
        // Clone children indices to avoid borrow conflict during recursion
        let children: Vec<usize> = nodes[v].children.clone();
        for &child in &children {
            self.first_walk(child, nodes);
        }

        let left_sibling = self.left_sibling(v, nodes);

        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.execute_shifts(v, nodes);
            let midpoint = (nodes[first].prelim + nodes[last].prelim) / 2.0;
            if let Some(w) = left_sibling {
                nodes[v].prelim = nodes[w].prelim + self.separation(v, w, nodes);
                nodes[v].modifier = nodes[v].prelim - midpoint;
            } else {
                nodes[v].prelim = midpoint;
            }
        } else if let Some(w) = left_sibling {
            nodes[v].prelim = nodes[w].prelim + self.separation(v, w, nodes);
        }

        if let Some(parent) = nodes[v].parent {
            let default_ancestor = nodes[parent]
                .default_ancestor
                .unwrap_or(nodes[parent].children[0]);
            let next = self.apportion(v, left_sibling, default_ancestor, nodes);
            nodes[parent].default_ancestor = Some(next);
        }
    }

    fn left_sibling(&self, v: usize, nodes: &[LayoutNode]) -> Option<usize> {
        let parent = nodes[v].parent?;
        let number = nodes[v].number;
        (number > 0).then(|| nodes[parent].children[number - 1])
    }

    /// Separation between two contour nodes on the same level.
    fn separation(&self, a: usize, b: usize, nodes: &[LayoutNode]) -> f32 {
        if nodes[a].parent.is_some() && nodes[a].parent == nodes[b].parent {
            self.config.sibling_separation
        } else {
            self.config.subtree_separation
        }
    }

    /// Get the next node on the right contour of a subtree.
    fn next_right(&self, v: usize, nodes: &[LayoutNode]) -> Option<usize> {
        nodes[v].children.last().copied().or(nodes[v].thread)
    }

    /// Get the next node on the left contour of a subtree.
    fn next_left(&self, v: usize, nodes: &[LayoutNode]) -> Option<usize> {
        nodes[v].children.first().copied().or(nodes[v].thread)
    }

    /// Apportion: push `v`'s subtree right until it clears every subtree on its left.
    /// This is the core of Buchheim's linear-time improvement over Walker's algorithm.
    fn apportion(
        &self,
        v: usize,
        left_sibling: Option<usize>,
        mut default_ancestor: usize,
        nodes: &mut [LayoutNode],
    ) -> usize {
        let (Some(w), Some(parent)) = (left_sibling, nodes[v].parent) else {
            return default_ancestor;
        };

        // inside/outside contours of the right (v) and left (w) forests
        let mut v_inner_right = v;
        let mut v_outer_right = v;
        let mut v_inner_left = w;
        let mut v_outer_left = nodes[parent].children[0];

        let mut s_inner_right = nodes[v_inner_right].modifier;
        let mut s_outer_right = nodes[v_outer_right].modifier;
        let mut s_inner_left = nodes[v_inner_left].modifier;
        let mut s_outer_left = nodes[v_outer_left].modifier;

        let mut next_inner_left = self.next_right(v_inner_left, nodes);
        let mut next_inner_right = self.next_left(v_inner_right, nodes);

        while let (Some(il), Some(ir)) = (next_inner_left, next_inner_right) {
            v_inner_left = il;
            v_inner_right = ir;
            v_outer_left = self.next_left(v_outer_left, nodes).unwrap_or(v_outer_left);
            v_outer_right = self.next_right(v_outer_right, nodes).unwrap_or(v_outer_right);
            nodes[v_outer_right].ancestor = v;

            let shift = (nodes[v_inner_left].prelim + s_inner_left)
                - (nodes[v_inner_right].prelim + s_inner_right)
                + self.separation(v_inner_left, v_inner_right, nodes);

            if shift > 0.0 {
                let ancestor = self.next_ancestor(v_inner_left, v, default_ancestor, nodes);
                self.move_subtree(ancestor, v, shift, nodes);
                s_inner_right += shift;
                s_outer_right += shift;
            }

            s_inner_left += nodes[v_inner_left].modifier;
            s_inner_right += nodes[v_inner_right].modifier;
            s_outer_left += nodes[v_outer_left].modifier;
            s_outer_right += nodes[v_outer_right].modifier;

            next_inner_left = self.next_right(v_inner_left, nodes);
            next_inner_right = self.next_left(v_inner_right, nodes);
        }

        // Set threads
        if let Some(il) = next_inner_left {
            if self.next_right(v_outer_right, nodes).is_none() {
                nodes[v_outer_right].thread = Some(il);
                nodes[v_outer_right].modifier += s_inner_left - s_outer_right;
            }
        }

        if let Some(ir) = next_inner_right {
            if self.next_left(v_outer_left, nodes).is_none() {
                nodes[v_outer_left].thread = Some(ir);
                nodes[v_outer_left].modifier += s_inner_right - s_outer_left;
                default_ancestor = v;
            }
        }

        default_ancestor
    }

    /// The sibling of `v` whose subtree holds `v_inner_left`, else the default ancestor.
    fn next_ancestor(
        &self,
        v_inner_left: usize,
        v: usize,
        default_ancestor: usize,
        nodes: &[LayoutNode],
    ) -> usize {
        let candidate = nodes[v_inner_left].ancestor;
        if nodes[candidate].parent == nodes[v].parent {
            candidate
        } else {
            default_ancestor
        }
    }

    /// Move subtree: shift node wr and spread the shift across the siblings between wl and wr.
    fn move_subtree(&self, wl: usize, wr: usize, shift: f32, nodes: &mut [LayoutNode]) {
        let subtrees = (nodes[wr].number as f32 - nodes[wl].number as f32).max(1.0);
        let per_subtree = shift / subtrees;

        nodes[wr].change -= per_subtree;
        nodes[wr].shift += shift;
        nodes[wl].change += per_subtree;
        nodes[wr].prelim += shift;
        nodes[wr].modifier += shift;
    }

    /// Execute accumulated shifts for children of node v.
    fn execute_shifts(&self, v: usize, nodes: &mut [LayoutNode]) {
        // Clone children indices to avoid borrow conflict
        let children: Vec<usize> = nodes[v].children.clone();
        let mut shift = 0.0f32;
        let mut change = 0.0f32;

        for &child in children.iter().rev() {
            nodes[child].prelim += shift;
            nodes[child].modifier += shift;
            change += nodes[child].change;
            shift += nodes[child].shift + change;
        }
    }

    /// Second walk: apply accumulated modifiers to get final coordinates.
    fn second_walk_collect(
        &self,
        v: usize,
        modifier_sum: f32,
        nodes: &[LayoutNode],
        final_x: &mut [f32],
    ) {
        final_x[v] = nodes[v].prelim + modifier_sum;

        for &child in &nodes[v].children {
            self.second_walk_collect(child, modifier_sum + nodes[v].modifier, nodes, final_x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeRecord;

    fn layout() -> TidyTreeLayout {
        TidyTreeLayout::new(TidyTreeConfig {
            node_spacing: 100.0,
            available_width: 600.0,
            ..Default::default()
        })
    }

    fn leaves(names: &[&str]) -> Vec<TreeRecord> {
        names.iter().map(|n| TreeRecord::new(*n)).collect()
    }

    fn xs(model: &TreeModel) -> Vec<f32> {
        model.iter().map(|n| n.x()).collect()
    }

    #[test]
    fn test_single_node() {
        let mut model = TreeModel::build(&TreeRecord::new("root"));
        let result = layout().layout(&mut model);

        assert_eq!(result.node_count, 1);
        assert_eq!(result.tree_height, 0);
        assert_eq!(result.column_width, 600.0);
        assert_eq!(model.node(NodeId(0)).position(), Point::ORIGIN);
    }

    #[test]
    fn test_simple_tree() {
        // Tree:  0 → 1, 0 → 2
        let mut model = TreeModel::build(&TreeRecord::with_children("r", leaves(&["a", "b"])));
        let result = layout().layout(&mut model);

        assert_eq!(result.node_count, 3);
        assert_eq!(result.tree_height, 1);
        assert_eq!(result.column_width, 300.0);

        let root = model.node(NodeId(0)).position();
        let a = model.node(NodeId(1)).position();
        let b = model.node(NodeId(2)).position();

        // Root should be pinned at 0 and centered over children
        assert!(root.x.abs() < 0.01, "Root x should be 0, got {}", root.x);
        assert!(((a.x + b.x) / 2.0 - root.x).abs() < 0.01);
        assert!((b.x - a.x - 100.0).abs() < 0.01, "siblings one spacing apart");

        assert!(root.y.abs() < 0.01);
        assert!((a.y - 300.0).abs() < 0.01);
        assert!((b.y - 300.0).abs() < 0.01);
    }

    #[test]
    fn test_cousins_get_subtree_separation() {
        // root → A(a1, a2), B(b1, b2)
        let record = TreeRecord::with_children(
            "root",
            vec![
                TreeRecord::with_children("A", leaves(&["a1", "a2"])),
                TreeRecord::with_children("B", leaves(&["b1", "b2"])),
            ],
        );
        let mut model = TreeModel::build(&record);
        layout().layout(&mut model);

        // ids: root 0, A 1, a1 2, a2 3, B 4, b1 5, b2 6
        let expected = [0.0, -150.0, -200.0, -100.0, 150.0, 100.0, 200.0];
        for (got, want) in xs(&model).iter().zip(expected) {
            assert!((got - want).abs() < 0.01, "got {:?}", xs(&model));
        }
    }

    #[test]
    fn test_deeper_tree_depths() {
        // Tree:  0 → 1, 0 → 2, 1 → 3, 1 → 4, 2 → 5
        let record = TreeRecord::with_children(
            "0",
            vec![
                TreeRecord::with_children("1", leaves(&["3", "4"])),
                TreeRecord::with_children("2", leaves(&["5"])),
            ],
        );
        let mut model = TreeModel::build(&record);
        let result = layout().layout(&mut model);
        assert_eq!(result.column_width, 200.0);

        for node in model.iter() {
            let want = node.depth() as f32 * 200.0;
            assert!((node.y() - want).abs() < 0.01, "node {} y {}", node.id(), node.y());
        }
    }

    #[test]
    fn test_no_overlap_on_any_level() {
        // Asymmetric: left subtree deeper than right, plus a wide middle.
        let record = TreeRecord::with_children(
            "root",
            vec![
                TreeRecord::with_children(
                    "l",
                    vec![TreeRecord::with_children("l1", leaves(&["l11", "l12", "l13"]))],
                ),
                TreeRecord::new("m"),
                TreeRecord::with_children("r", leaves(&["r1", "r2", "r3", "r4"])),
            ],
        );
        let mut model = TreeModel::build(&record);
        layout().layout(&mut model);

        let max_depth = model.iter().map(|n| n.depth()).max().unwrap();
        for depth in 0..=max_depth {
            let mut row: Vec<f32> = model
                .iter()
                .filter(|n| n.depth() == depth)
                .map(|n| n.x())
                .collect();
            row.sort_by(f32::total_cmp);
            for pair in row.windows(2) {
                assert!(
                    pair[1] - pair[0] >= 100.0 - 0.01,
                    "level {depth} overlaps: {row:?}"
                );
            }
        }
    }

    #[test]
    fn test_collapsed_subtrees_take_no_room() {
        let record = TreeRecord::with_children(
            "root",
            vec![
                TreeRecord::with_children("A", leaves(&["a1", "a2", "a3"])),
                TreeRecord::new("B"),
            ],
        );
        let mut model = TreeModel::build(&record);
        model.collapse(NodeId(1));
        let result = layout().layout(&mut model);

        assert_eq!(result.node_count, 3);
        assert_eq!(result.tree_height, 1);
        let a = model.node(NodeId(1)).x();
        let b = model.node(NodeId(5)).x();
        assert!((b - a - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let record = TreeRecord::with_children(
            "root",
            vec![
                TreeRecord::with_children("A", leaves(&["a1", "a2"])),
                TreeRecord::new("B"),
                TreeRecord::with_children("C", leaves(&["c1"])),
            ],
        );
        let mut model = TreeModel::build(&record);
        let engine = layout();

        engine.layout(&mut model);
        let first: Vec<Point> = model.iter().map(|n| n.position()).collect();
        engine.layout(&mut model);
        let second: Vec<Point> = model.iter().map(|n| n.position()).collect();

        assert_eq!(first, second);
    }
}
