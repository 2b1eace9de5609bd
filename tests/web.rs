//! Facade tests, run in a browser or node with `wasm-pack test`.

#![cfg(target_arch = "wasm32")]

use collapsible_tree_wasm::CollapsibleTreeWasm;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

const DATA: &str = r#"{
    "name": "flare",
    "children": [
        {"name": "analytics", "children": [{"name": "cluster"}, {"name": "graph"}]},
        {"name": "display"}
    ]
}"#;

const EXPAND_ALL: &str = r#"{"initialCollapse": {"kind": "expandAll"}}"#;

#[wasm_bindgen_test]
fn from_json_draws_visible_nodes() {
    let chart = CollapsibleTreeWasm::from_json(DATA, EXPAND_ALL).unwrap();
    assert_eq!(chart.node_count(), 5);
    assert_eq!(chart.visible_node_ids(), vec![0, 1, 2, 3, 4]);
    assert_eq!(chart.get_positions().length(), 10);
    assert!(!chart.is_animating(0.0));
}

#[wasm_bindgen_test]
fn click_hides_subtree_and_reports_sentinel() {
    let mut chart = CollapsibleTreeWasm::from_json(DATA, EXPAND_ALL).unwrap();
    let plan = chart.click(1, false, 0.0).unwrap();
    assert!(plan.is_object());
    assert!(chart.is_animating(100.0));
    assert_eq!(chart.visible_node_ids(), vec![0, 1, 4]);

    let positions = chart.get_positions().to_vec();
    assert_eq!(positions[4], 3.402_823e+38);
    assert!(chart.click(99, false, 0.0).is_err());
}

#[wasm_bindgen_test]
fn from_edges_rejects_cycles() {
    let names = vec!["a".to_string(), "b".to_string()];
    assert!(CollapsibleTreeWasm::from_edges(names.clone(), &[0, 1, 1, 0], u32::MAX, JsValue::UNDEFINED).is_err());
    let chart = CollapsibleTreeWasm::from_edges(names, &[0, 1], u32::MAX, JsValue::UNDEFINED).unwrap();
    assert_eq!(chart.node_count(), 2);
}

#[wasm_bindgen_test]
fn view_transform_and_svg() {
    let mut chart = CollapsibleTreeWasm::from_json(DATA, "").unwrap();
    chart.pan(10.0, 20.0);
    assert_eq!(chart.transform(), "translate(10,20) scale(1)");
    assert!(chart.svg(0.0).contains("translate(10,20)"));
    assert!(chart.wizard_change("missing", "x", 0.0).is_err());
}

#[wasm_bindgen_test]
fn node_at_and_wizard_navigation() {
    let expanded = CollapsibleTreeWasm::from_json(DATA, EXPAND_ALL).unwrap();
    let flat = expanded.get_positions().to_vec();
    assert_eq!(expanded.node_at(flat[8], flat[9], 0.0), Some(4));

    let mut chart = CollapsibleTreeWasm::from_json(DATA, "").unwrap();
    assert_eq!(chart.wizard_step(), None);
    chart.wizard_next();
    chart.wizard_back();
    assert_eq!(chart.wizard_step(), None);
}
