//! Incremental rendering.
//!
//! A redraw is a diff between the elements currently on screen and the
//! visible part of the model. [`Reconciler`] partitions the two keyed sets
//! into enter/update/exit transitions, [`Scene`] plays them back over time,
//! and [`svg`] turns a sampled [`Frame`] into markup.

mod keys;
mod path;
mod reconcile;
mod scene;
mod style;
pub mod svg;

pub use keys::KeySet;
pub use path::LinkPath;
pub use reconcile::{LinkTransition, NodeTransition, Phase, Reconciler, RenderPlan, VisualState};
pub use scene::{ease_cubic_in_out, Frame, FrameLink, FrameNode, Scene};
pub use style::{style, NodeKind, NodeStyle, Shape, TextAnchor};
