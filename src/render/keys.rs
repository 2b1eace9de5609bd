//! Keyed element sets.

use std::collections::{BTreeMap, BTreeSet};

use crate::tree::{NodeId, TreeModel};

/// The keys of a rendered (or renderable) element collection.
///
/// Nodes are keyed by id, links by their target id (a child has exactly one
/// incoming link, so the target identifies it).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    /// Node ids.
    pub nodes: BTreeSet<NodeId>,
    /// Link target → link source.
    pub links: BTreeMap<NodeId, NodeId>,
}

impl KeySet {
    /// An empty set, as before the first draw.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible nodes and links of `model`.
    pub fn visible(model: &TreeModel) -> Self {
        Self {
            nodes: model.visible().into_iter().collect(),
            links: model
                .links()
                .into_iter()
                .map(|link| (link.target, link.source))
                .collect(),
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no node is present.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
