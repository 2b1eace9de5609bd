//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

use crate::tree::NodeId;

/// Errors raised while building a hierarchy or driving the chart.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The input edges contain a cycle (self-loops included).
    #[error("hierarchy contains a cycle through node {0}")]
    Cycle(u32),

    /// A node is the target of more than one parent edge.
    #[error("node {child} has more than one parent ({first} and {second})")]
    MultipleParents {
        /// The node with two incoming edges.
        child: u32,
        /// The parent recorded first.
        first: u32,
        /// The conflicting parent.
        second: u32,
    },

    /// A node cannot be reached from the root.
    #[error("node {0} is not reachable from the root")]
    Disconnected(u32),

    /// An edge or root references a node index past the supplied names.
    #[error("edge references node {index}, but only {count} nodes were supplied")]
    OutOfBounds {
        /// The offending index.
        index: u32,
        /// Number of nodes supplied.
        count: usize,
    },

    /// The edge array has an odd number of entries.
    #[error("edge array must hold [parent, child] pairs, got {0} entries")]
    UnpairedEdges(usize),

    /// No nodes were supplied.
    #[error("hierarchy has no nodes")]
    Empty,

    /// The input record or config could not be parsed.
    #[error("malformed input: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The id does not name a node of the model.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The wizard has no step with this name.
    #[error("unknown wizard step `{0}`")]
    UnknownStep(String),

    /// The wizard step does not offer this option.
    #[error("wizard step `{step}` has no option `{value}`")]
    UnknownOption {
        /// Step name.
        step: String,
        /// Rejected value.
        value: String,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TreeError>;
