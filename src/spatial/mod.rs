//! Hit testing.
//!
//! Node markers are tiny, so pointer events are resolved against an R-tree of
//! the visible nodes' chart-space positions instead of DOM hit regions.

mod rtree;

pub use rtree::{Marker, SpatialIndex};
