//! Hierarchy model and collapse state.
//!
//! The hierarchy lives in a flat arena indexed by [`NodeId`]. Ids are the
//! pre-order index of each node, assigned once at build time. Parent links are
//! plain ids, so there are no ownership cycles to manage.

mod collapse;
mod model;
mod node;
mod record;

pub use collapse::ToggleOutcome;
pub use model::{Link, TreeModel};
pub use node::{HierarchyNode, NodeId, Point};
pub use record::TreeRecord;
