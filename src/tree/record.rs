//! Input records.
//!
//! The chart is fed a nested `{ name, children? }` record. Any other field
//! (including an `id`) is ignored: ids are assigned internally.
//!
//! Hosts that keep their hierarchy as a flat edge list can use
//! [`TreeRecord::from_edges`], which is where cycles, shared children and
//! unreachable nodes are rejected before any model is built.

use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::Dfs;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TreeError};

/// A nested hierarchy record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    /// Node label.
    pub name: String,
    /// Ordered children. `null` and a missing field both mean "no children".
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<TreeRecord>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<TreeRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TreeRecord>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TreeRecord {
    /// A record without children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// A record with the given children.
    pub fn with_children(name: impl Into<String>, children: Vec<TreeRecord>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Parse a record from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Assemble a record from node labels and `[parent0, child0, parent1, child1, ...]` pairs.
    ///
    /// Children keep the order in which their edges appear. When `root` is
    /// `None` the first node without a parent is used.
    ///
    /// # Errors
    ///
    /// Fails when the edges do not describe a single tree over all `names`:
    /// cycles (self-loops included), nodes with two parents, nodes that the
    /// root cannot reach, or indices past the end of `names`.
    pub fn from_edges<S: AsRef<str>>(names: &[S], edges: &[u32], root: Option<u32>) -> Result<Self> {
        let count = names.len();
        if count == 0 {
            return Err(TreeError::Empty);
        }
        if edges.len() % 2 != 0 {
            return Err(TreeError::UnpairedEdges(edges.len()));
        }

        let check = |index: u32| {
            if index as usize >= count {
                Err(TreeError::OutOfBounds { index, count })
            } else {
                Ok(())
            }
        };

        let mut graph: StableDiGraph<u32, ()> = StableDiGraph::with_capacity(count, edges.len() / 2);
        let indices: Vec<NodeIndex> = (0..count as u32).map(|i| graph.add_node(i)).collect();
        let mut parent_of: Vec<Option<u32>> = vec![None; count];
        let mut children: Vec<Vec<u32>> = vec![Vec::new(); count];

        for pair in edges.chunks_exact(2) {
            let (parent, child) = (pair[0], pair[1]);
            check(parent)?;
            check(child)?;
            if parent == child {
                return Err(TreeError::Cycle(parent));
            }
            if let Some(first) = parent_of[child as usize] {
                return Err(TreeError::MultipleParents {
                    child,
                    first,
                    second: parent,
                });
            }
            parent_of[child as usize] = Some(parent);
            children[parent as usize].push(child);
            graph.add_edge(indices[parent as usize], indices[child as usize], ());
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(TreeError::Cycle(graph[cycle.node_id()]));
        }

        let root = match root {
            Some(r) => {
                check(r)?;
                r
            }
            // Acyclic with at most one parent each, so some node has none.
            None => parent_of.iter().position(Option::is_none).unwrap_or(0) as u32,
        };

        let mut reached = vec![false; count];
        let mut dfs = Dfs::new(&graph, indices[root as usize]);
        while let Some(index) = dfs.next(&graph) {
            reached[graph[index] as usize] = true;
        }
        if let Some(missing) = reached.iter().position(|r| !r) {
            return Err(TreeError::Disconnected(missing as u32));
        }

        Ok(Self::assemble(root, names, &children))
    }

    fn assemble<S: AsRef<str>>(id: u32, names: &[S], children: &[Vec<u32>]) -> Self {
        Self {
            name: names[id as usize].as_ref().to_owned(),
            children: children[id as usize]
                .iter()
                .map(|&child| Self::assemble(child, names, children))
                .collect(),
        }
    }
}
