//! Interaction controller.
//!
//! [`TreeChart`] turns gestures (clicks, wizard answers, pan/zoom) into model
//! changes and render plans.

mod chart;
mod view;
mod wizard;

pub use chart::TreeChart;
pub use view::ViewTransform;
pub use wizard::{Wizard, WizardStep};
