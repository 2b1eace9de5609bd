//! Per-node presentation.
//!
//! Style is a pure function of the node's collapse state, evaluated once per
//! node at reconcile time.

use serde::Serialize;

use crate::tree::HierarchyNode;

const PARENT_FILL: &str = "#555";
const LEAF_FILL: &str = "#999";
const NODE_RADIUS: f32 = 2.5;
const COLLAPSED_RADIUS: f32 = 4.5;
const LABEL_OFFSET: f32 = 6.0;

/// Collapse state as far as drawing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// No descendants at all.
    Leaf,
    /// Children visible.
    Expanded,
    /// Children stashed.
    Collapsed,
}

/// Marker shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Shape {
    /// A circle centred on the node.
    Circle {
        /// Radius in chart units.
        radius: f32,
    },
}

/// Label alignment relative to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAnchor {
    /// Text starts at the node.
    Start,
    /// Text ends at the node.
    End,
}

impl TextAnchor {
    /// The SVG `text-anchor` value.
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::End => "end",
        }
    }
}

/// Presentation attributes of one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    /// Collapse state the style was derived from.
    pub kind: NodeKind,
    /// Marker shape.
    pub shape: Shape,
    /// Marker fill colour.
    pub fill: &'static str,
    /// Label offset along the screen y axis.
    pub label_offset: f32,
    /// Label alignment.
    pub label_anchor: TextAnchor,
}

/// Style a node from its current collapse state.
pub fn style(node: &HierarchyNode) -> NodeStyle {
    let kind = if node.is_collapsed() {
        NodeKind::Collapsed
    } else if node.children().is_empty() {
        NodeKind::Leaf
    } else {
        NodeKind::Expanded
    };

    let (fill, radius) = match kind {
        NodeKind::Leaf => (LEAF_FILL, NODE_RADIUS),
        NodeKind::Expanded => (PARENT_FILL, NODE_RADIUS),
        NodeKind::Collapsed => (PARENT_FILL, COLLAPSED_RADIUS),
    };

    // Parents label above and to the left, leaves below and to the right.
    let (label_offset, label_anchor) = if kind == NodeKind::Leaf {
        (LABEL_OFFSET, TextAnchor::Start)
    } else {
        (-LABEL_OFFSET, TextAnchor::End)
    };

    NodeStyle {
        kind,
        shape: Shape::Circle { radius },
        fill,
        label_offset,
        label_anchor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeId, TreeModel, TreeRecord};

    fn model() -> TreeModel {
        TreeModel::build(&TreeRecord::with_children(
            "root",
            vec![TreeRecord::with_children("a", vec![TreeRecord::new("b")])],
        ))
    }

    #[test]
    fn test_leaf_style() {
        let model = model();
        let s = style(model.node(NodeId(2)));
        assert_eq!(s.kind, NodeKind::Leaf);
        assert_eq!(s.fill, "#999");
        assert_eq!(s.label_anchor, TextAnchor::Start);
        assert!(s.label_offset > 0.0);
    }

    #[test]
    fn test_style_follows_collapse_state() {
        let mut model = model();
        let a = NodeId(1);
        assert_eq!(style(model.node(a)).kind, NodeKind::Expanded);

        model.collapse(a);
        let collapsed = style(model.node(a));
        assert_eq!(collapsed.kind, NodeKind::Collapsed);
        assert_eq!(collapsed.fill, "#555");
        assert_eq!(collapsed.label_anchor, TextAnchor::End);
        assert_eq!(collapsed.shape, Shape::Circle { radius: 4.5 });
    }
}
