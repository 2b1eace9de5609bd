//! Node type and related structures.
//!
//! Nodes are the entries of the hierarchy arena. Each node has:
//! - A stable identifier (its pre-order index, never reassigned)
//! - A label, depth and subtree height
//! - The currently visible children and the children stashed by a collapse
//! - Layout coordinates from the latest pass and from the pass before it

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable node identifier.
///
/// Assigned from the pre-order traversal index at build time. It wraps a u32
/// for efficient storage and WebAssembly interop, and doubles as the key that
/// matches elements between render passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Arena slot of this node.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x * (1.0 - t) + other.x * t,
            self.y * (1.0 - t) + other.y * t,
        )
    }
}

/// One node of the hierarchy.
///
/// Between them `children` and `hidden_children` hold the node's descendants:
/// a collapse moves the visible list into the stash, an expand moves it back.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) hidden_children: Option<Vec<NodeId>>,
    pub(crate) depth: u32,
    pub(crate) height: u32,
    pub(crate) position: Point,
    pub(crate) previous: Point,
}

impl HierarchyNode {
    pub(crate) fn new(id: NodeId, name: String, parent: Option<NodeId>, depth: u32) -> Self {
        Self {
            id,
            name,
            parent,
            children: Vec::new(),
            hidden_children: None,
            depth,
            height: 0,
            position: Point::ORIGIN,
            previous: Point::ORIGIN,
        }
    }

    /// Stable identifier.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Label copied from the input record.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent id, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Currently visible children.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Children stashed by a collapse, if any.
    #[inline]
    pub fn hidden_children(&self) -> Option<&[NodeId]> {
        self.hidden_children.as_deref()
    }

    /// Distance from the root.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Height of the full subtree below this node (leaf = 0).
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Layout position from the latest pass.
    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Position stashed before the latest pass.
    #[inline]
    pub fn previous(&self) -> Point {
        self.previous
    }

    /// Sibling-axis coordinate.
    #[inline]
    pub fn x(&self) -> f32 {
        self.position.x
    }

    /// Depth-axis coordinate.
    #[inline]
    pub fn y(&self) -> f32 {
        self.position.y
    }

    /// True when the node's children are stashed.
    #[inline]
    pub fn is_collapsed(&self) -> bool {
        self.hidden_children.as_ref().is_some_and(|c| !c.is_empty())
    }
}
