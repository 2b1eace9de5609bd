//! Collapse state tracking.
//!
//! A collapse moves a node's visible child list into its stash; an expand
//! moves it back. Both are O(1) moves of the same `Vec`, so a collapse
//! followed by an expand restores the identical subtree.
//!
//! Every state change invalidates the current layout. Callers re-run the
//! layout and reconcile afterwards.

use log::debug;

use super::model::TreeModel;
use super::node::{HierarchyNode, NodeId};
use crate::error::{Result, TreeError};

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Stashed children were restored.
    Expanded,
    /// Visible children were stashed.
    Collapsed,
    /// The node has no descendants; nothing changed.
    Leaf,
}

impl TreeModel {
    /// Collapse every node for which `predicate` holds.
    ///
    /// Evaluated over all nodes in id order, including nodes already hidden
    /// under a collapsed ancestor. Returns the number of nodes collapsed.
    pub fn collapse_all<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&HierarchyNode) -> bool,
    {
        let targets: Vec<NodeId> = self
            .iter()
            .filter(|&node| !node.children.is_empty() && predicate(node))
            .map(|node| node.id)
            .collect();

        for &id in &targets {
            self.collapse(id);
        }
        debug!("collapsed {} of {} nodes", targets.len(), self.len());
        targets.len()
    }

    /// Flip a node between expanded and collapsed.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `id` is not part of the model.
    pub fn toggle(&mut self, id: NodeId) -> Result<ToggleOutcome> {
        let node = self.get(id).ok_or(TreeError::UnknownNode(id))?;
        let outcome = if node.is_collapsed() {
            self.expand(id);
            ToggleOutcome::Expanded
        } else if !node.children.is_empty() {
            self.collapse(id);
            ToggleOutcome::Collapsed
        } else {
            ToggleOutcome::Leaf
        };
        debug!("toggle {id}: {outcome:?}");
        Ok(outcome)
    }

    /// Restore stashed children. Returns false if there was nothing to restore.
    pub fn expand(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if !node.is_collapsed() {
            return false;
        }
        node.children = node.hidden_children.take().unwrap_or_default();
        true
    }

    /// Stash visible children. Returns false if there were none.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        if node.children.is_empty() {
            return false;
        }
        node.hidden_children = Some(std::mem::take(&mut node.children));
        true
    }

    /// Whether the node currently shows its children.
    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| !n.children.is_empty())
    }

    /// Make `id` and its children visible by expanding the node and every ancestor.
    ///
    /// Returns the ids whose state changed, root first.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::UnknownNode`] if `id` is not part of the model.
    pub fn expand_path(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        if !self.contains(id) {
            return Err(TreeError::UnknownNode(id));
        }
        let changed: Vec<NodeId> = self
            .path_to(id)
            .into_iter()
            .filter(|&step| self.expand(step))
            .collect();
        debug!("expand path to {id}: {} nodes opened", changed.len());
        Ok(changed)
    }
}
