//! R-tree over visible node positions, using the rstar crate.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::config::Orientation;
use crate::render::Frame;
use crate::tree::{NodeId, Point, TreeModel};

/// A node marker at its screen-space layout position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Node the marker belongs to.
    pub id: NodeId,
    /// Screen-space position.
    pub position: Point,
}

impl RTreeObject for Marker {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.position.x, self.position.y])
    }
}

impl PointDistance for Marker {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.position.x - point[0];
        let dy = self.position.y - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index of the currently visible nodes.
///
/// Rebuilt wholesale after every layout pass; bulk loading is cheaper than
/// moving every marker individually.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<Marker>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the visible nodes of `model` at their projected positions.
    pub fn from_model(model: &TreeModel, orientation: Orientation) -> Self {
        Self::from_markers(model.visible().into_iter().map(|id| Marker {
            id,
            position: orientation.project(model.node(id).position()),
        }))
    }

    /// Index the nodes of a sampled frame where they are drawn, skipping
    /// nodes that `model` no longer shows (they are on their way out).
    pub fn from_frame(frame: &Frame, model: &TreeModel) -> Self {
        Self::from_markers(
            frame
                .nodes
                .iter()
                .filter(|node| model.is_visible(node.id))
                .map(|node| Marker {
                    id: node.id,
                    position: node.position,
                }),
        )
    }

    /// Bulk-load an index from arbitrary markers.
    pub fn from_markers(markers: impl IntoIterator<Item = Marker>) -> Self {
        Self {
            tree: RTree::bulk_load(markers.into_iter().collect()),
        }
    }

    /// The node closest to `at`, if it lies within `radius`.
    pub fn hit(&self, at: Point, radius: f32) -> Option<NodeId> {
        let query = [at.x, at.y];
        self.tree
            .nearest_neighbor(&query)
            .filter(|marker| marker.distance_2(&query) <= radius * radius)
            .map(|marker| marker.id)
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
