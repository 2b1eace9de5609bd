//! Layout of the visible hierarchy.
//!
//! The tidy tree computes node positions in place on the model; the viewport
//! helpers then size the canvas to the result.

pub mod tidy_tree;
pub mod viewport;

pub use tidy_tree::{TidyTreeConfig, TidyTreeLayout, TidyTreeResult};
pub use viewport::{Extent, ViewBox};
