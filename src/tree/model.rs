//! TreeModel - the hierarchy arena.
//!
//! Nodes are stored in pre-order, so a node's id is also its arena slot and
//! every parent precedes its descendants. Nodes are never removed: collapsing
//! hides children, it does not destroy them.

use serde::Serialize;

use super::node::{HierarchyNode, NodeId, Point};
use super::record::TreeRecord;

/// A visible parent → child edge. Keyed for matching by `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Parent node.
    pub source: NodeId,
    /// Child node.
    pub target: NodeId,
}

/// The hierarchy arena.
#[derive(Debug, Clone)]
pub struct TreeModel {
    nodes: Vec<HierarchyNode>,
}

impl TreeModel {
    /// Wrap a nested record into a hierarchy.
    ///
    /// Ids are pre-order indices, so rebuilding from the same record always
    /// yields the same id for the same node path.
    pub fn build(record: &TreeRecord) -> Self {
        let mut nodes: Vec<HierarchyNode> = Vec::new();
        let mut stack: Vec<(&TreeRecord, Option<NodeId>, u32)> = vec![(record, None, 0)];

        // Children are pushed in reverse so they pop in order, which both
        // keeps ids in pre-order and appends to the parent's list in order.
        while let Some((record, parent, depth)) = stack.pop() {
            let id = NodeId(nodes.len() as u32);
            nodes.push(HierarchyNode::new(id, record.name.clone(), parent, depth));
            if let Some(parent) = parent {
                nodes[parent.index()].children.push(id);
            }
            for child in record.children.iter().rev() {
                stack.push((child, Some(id), depth + 1));
            }
        }

        // Pre-order: every child sits after its parent, so a reverse sweep
        // sees finished subtree heights.
        for i in (1..nodes.len()).rev() {
            let height = nodes[i].height + 1;
            if let Some(parent) = nodes[i].parent {
                let slot = &mut nodes[parent.index()].height;
                *slot = (*slot).max(height);
            }
        }

        Self { nodes }
    }

    /// The root id.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, visible or not.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a model holds at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` names a node of this model.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Look up a node.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut HierarchyNode> {
        self.nodes.get_mut(id.index())
    }

    /// Look up a node known to belong to this model.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a node of this model.
    #[inline]
    pub fn node(&self, id: NodeId) -> &HierarchyNode {
        &self.nodes[id.index()]
    }

    /// All nodes in id order, visible or not.
    pub fn iter(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter()
    }

    /// Visible nodes below (and including) `from`, in pre-order.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(from) {
            return out;
        }
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.index()].children.iter().rev().copied());
        }
        out
    }

    /// Visible nodes of the whole tree, in pre-order.
    pub fn visible(&self) -> Vec<NodeId> {
        self.descendants(self.root())
    }

    /// Visible parent → child edges, in pre-order of their targets.
    pub fn links(&self) -> Vec<Link> {
        self.visible()
            .into_iter()
            .filter_map(|target| {
                self.nodes[target.index()]
                    .parent
                    .map(|source| Link { source, target })
            })
            .collect()
    }

    /// Ids from the root down to `id`, inclusive. Empty for unknown ids.
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.get(id).map(|n| n.id);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.nodes[current.index()].parent;
        }
        path.reverse();
        path
    }

    /// Whether `id` is reachable from the root through visible children.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let path = self.path_to(id);
        !path.is_empty()
            && path
                .windows(2)
                .all(|pair| self.nodes[pair[0].index()].children.contains(&pair[1]))
    }

    /// Record every node's current position as its previous one.
    ///
    /// Runs over the full model, hidden nodes included, so that a later
    /// expand has a sensible origin.
    pub fn stash_positions(&mut self) {
        for node in &mut self.nodes {
            node.previous = node.position;
        }
    }

    pub(crate) fn set_position(&mut self, id: NodeId, position: Point) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.position = position;
        }
    }
}
