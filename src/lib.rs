//! Collapsible Tree - WASM Module
//!
//! Lays out a hierarchy as a tidy tree, tracks which nodes are collapsed and
//! turns every expand/collapse into an animated enter/update/exit plan. It is
//! compiled to WebAssembly and exposes a JavaScript-friendly API via
//! wasm-bindgen; the host owns the DOM and drives time.
//!
//! # Architecture
//!
//! - `tree`: hierarchy arena, input records and collapse state
//! - `layout`: Buchheim tidy tree and view box fitting
//! - `render`: keyed reconciliation, retained scene and SVG output
//! - `spatial`: R-tree spatial indexing for O(log n) hit testing
//! - `interaction`: the chart controller (clicks, pan/zoom, wizard)

use js_sys::Float32Array;
use log::{info, Level};
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod spatial;
pub mod tree;

use config::ChartConfig;
use interaction::{TreeChart, WizardStep};
use tree::{NodeId, TreeRecord};

/// Position reported for nodes that are currently hidden.
const SENTINEL: f32 = 3.402_823e+38;

/// Initialize the WASM module: panic messages and `log` output go to the console.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(Level::Info);
    console_error_panic_hook::set_once();
}

/// Main entry point for the chart.
///
/// Wraps a [`TreeChart`] and exposes it to JavaScript. Timestamps are the
/// host's clock in milliseconds (e.g. `performance.now()`).
#[wasm_bindgen]
pub struct CollapsibleTreeWasm {
    chart: TreeChart,
}

#[wasm_bindgen]
impl CollapsibleTreeWasm {
    /// Create a chart from a nested `{ name, children }` object.
    ///
    /// `config` may be `undefined` or a partial config object.
    #[wasm_bindgen(constructor)]
    pub fn new(data: JsValue, config: JsValue) -> Result<CollapsibleTreeWasm, JsError> {
        let record: TreeRecord = serde_wasm_bindgen::from_value(data)?;
        Ok(Self::create(&record, parse_config(config)?))
    }

    /// Create a chart from JSON strings. An empty config string means defaults.
    #[wasm_bindgen(js_name = fromJson)]
    pub fn from_json(data: &str, config: &str) -> Result<CollapsibleTreeWasm, JsError> {
        let record = TreeRecord::from_json(data)?;
        let config = if config.trim().is_empty() {
            ChartConfig::default()
        } else {
            ChartConfig::from_json(config)?
        };
        Ok(Self::create(&record, config))
    }

    /// Create a chart from node names and flat `[parent, child, ...]` edge pairs.
    ///
    /// # Arguments
    ///
    /// * `names` - Node labels, indexed by node slot
    /// * `edges` - Flat array of directed parent→child edge pairs
    /// * `root_id` - The root slot (u32::MAX means auto-detect)
    /// * `config` - Partial config object or `undefined`
    #[wasm_bindgen(js_name = fromEdges)]
    pub fn from_edges(
        names: Vec<String>,
        edges: &[u32],
        root_id: u32,
        config: JsValue,
    ) -> Result<CollapsibleTreeWasm, JsError> {
        let root = if root_id == u32::MAX {
            None
        } else {
            Some(root_id)
        };
        let record = TreeRecord::from_edges(names.as_slice(), edges, root)?;
        Ok(Self::create(&record, parse_config(config)?))
    }

    // =========================================================================
    // Gestures
    // =========================================================================

    /// Toggle a node. Returns the render plan.
    ///
    /// `slow` selects the slow-motion duration (the alt-key modifier).
    pub fn click(&mut self, node_id: u32, slow: bool, now: f64) -> Result<JsValue, JsError> {
        let plan = self.chart.click(NodeId(node_id), slow, now)?;
        Ok(serde_wasm_bindgen::to_value(&plan)?)
    }

    /// Toggle the node under an SVG user-space point.
    ///
    /// Returns the render plan, or `null` when nothing was hit.
    #[wasm_bindgen(js_name = clickAt)]
    pub fn click_at(&mut self, x: f32, y: f32, slow: bool, now: f64) -> Result<JsValue, JsError> {
        match self.chart.click_at(x, y, slow, now)? {
            Some(plan) => Ok(serde_wasm_bindgen::to_value(&plan)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// The node drawn under an SVG user-space point at `now`, if any.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, x: f32, y: f32, now: f64) -> Option<u32> {
        self.chart.node_at(x, y, now).map(NodeId::raw)
    }

    /// Expand a node and all its ancestors. Returns the render plan.
    #[wasm_bindgen(js_name = expandPath)]
    pub fn expand_path(&mut self, node_id: u32, now: f64) -> Result<JsValue, JsError> {
        let plan = self.chart.expand_path(NodeId(node_id), now)?;
        Ok(serde_wasm_bindgen::to_value(&plan)?)
    }

    // =========================================================================
    // Wizard
    // =========================================================================

    /// Replace the wizard steps with an array of `{ name, options }`.
    #[wasm_bindgen(js_name = setWizardSteps)]
    pub fn set_wizard_steps(&mut self, steps: JsValue) -> Result<(), JsError> {
        let steps: Vec<WizardStep> = serde_wasm_bindgen::from_value(steps)?;
        self.chart.set_wizard_steps(steps);
        Ok(())
    }

    /// Bind a wizard answer to the node it reveals.
    #[wasm_bindgen(js_name = bindWizardAnswer)]
    pub fn bind_wizard_answer(&mut self, step: &str, value: &str, node_id: u32) -> Result<(), JsError> {
        Ok(self.chart.bind_wizard_answer(step, value, NodeId(node_id))?)
    }

    /// Record a wizard answer. Returns the render plan, or `null` if the
    /// answer is not bound to a node.
    #[wasm_bindgen(js_name = wizardChange)]
    pub fn wizard_change(&mut self, step: &str, value: &str, now: f64) -> Result<JsValue, JsError> {
        match self.chart.wizard_change(step, value, now)? {
            Some(plan) => Ok(serde_wasm_bindgen::to_value(&plan)?),
            None => Ok(JsValue::NULL),
        }
    }

    /// Skip the current wizard step.
    #[wasm_bindgen(js_name = wizardNext)]
    pub fn wizard_next(&mut self) {
        self.chart.wizard_next();
    }

    /// Return to the previous wizard step.
    #[wasm_bindgen(js_name = wizardBack)]
    pub fn wizard_back(&mut self) {
        self.chart.wizard_back();
    }

    /// Name of the step awaiting an answer, or `undefined` once the wizard is
    /// complete.
    #[wasm_bindgen(js_name = wizardStep)]
    pub fn wizard_step(&self) -> Option<String> {
        self.chart.wizard().current_step().map(|s| s.name.clone())
    }

    // =========================================================================
    // View
    // =========================================================================

    /// Translate the view by a screen-space delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.chart.pan(dx, dy);
    }

    /// Zoom by `factor` around a screen point.
    pub fn zoom(&mut self, factor: f32, x: f32, y: f32) {
        self.chart.zoom(factor, x, y);
    }

    /// The current pan/zoom as an SVG `transform` attribute value.
    pub fn transform(&self) -> String {
        self.chart.transform().to_attribute()
    }

    // =========================================================================
    // Sampling
    // =========================================================================

    /// The scene sampled at `now`: `{ nodes, links, viewBox, animating }`.
    pub fn frame(&self, now: f64) -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&self.chart.frame(now))?)
    }

    /// Whether a transition is still running at `now`.
    #[wasm_bindgen(js_name = isAnimating)]
    pub fn is_animating(&self, now: f64) -> bool {
        self.chart.is_animating(now)
    }

    /// The scene sampled at `now` as a standalone SVG document.
    pub fn svg(&self, now: f64) -> String {
        self.chart.svg(now)
    }

    /// Layout positions as a Float32Array `[x0, y0, x1, y1, ...]`, one pair
    /// per node id. Hidden nodes hold the f32::MAX sentinel.
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Float32Array {
        Float32Array::from(&interleave(&self.chart)[..])
    }

    /// Total number of nodes, hidden ones included.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.chart.model().len() as u32
    }

    /// Ids of the visible nodes in pre-order.
    #[wasm_bindgen(js_name = visibleNodeIds)]
    pub fn visible_node_ids(&self) -> Vec<u32> {
        self.chart.model().visible().into_iter().map(NodeId::raw).collect()
    }
}

impl CollapsibleTreeWasm {
    fn create(record: &TreeRecord, config: ChartConfig) -> Self {
        let chart = TreeChart::new(record, config);
        info!("collapsible tree created with {} nodes", chart.model().len());
        Self { chart }
    }
}

fn parse_config(config: JsValue) -> Result<ChartConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        Ok(ChartConfig::default())
    } else {
        Ok(serde_wasm_bindgen::from_value(config)?)
    }
}

/// Interleave x and y into `[x0, y0, x1, y1, ...]`.
fn interleave(chart: &TreeChart) -> Vec<f32> {
    let positions = chart.positions();
    let mut flat = Vec::with_capacity(positions.len() * 2);
    for position in positions {
        match position {
            Some(p) => flat.extend([p.x, p.y]),
            None => flat.extend([SENTINEL, SENTINEL]),
        }
    }
    flat
}
