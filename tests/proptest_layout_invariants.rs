//! Property-based invariant tests for the org chart layout.
//!
//! For random trees (branching 0-6, depth 0-6):
//!
//! 1. Sibling subtree footprints never overlap.
//! 2. A parent's children row is centred under the parent.
//! 3. Layout is bit-for-bit repeatable.
//! 4. Every node box lies inside the canvas.
//! 5. Search returns the first pre-order match.
//! 6. Scroll targets are never negative.

use std::collections::HashMap;

use orgchart_layout::layout::compute_dimensions;
use orgchart_layout::{
    Layout, LayoutConfig, Query, TreeNode, ViewportConfig, compute_layout, find,
    scroll_target_for,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Tree shape only; ids are assigned afterwards so they stay unique.
#[derive(Debug, Clone)]
struct Shape(Vec<Shape>);

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = Just(Shape(Vec::new()));
    leaf.prop_recursive(6, 256, 6, |inner| {
        prop::collection::vec(inner, 0..=6).prop_map(Shape)
    })
}

fn build(shape: &Shape, next: &mut usize) -> TreeNode {
    let id = *next;
    *next += 1;
    let mut node = TreeNode::new(format!("n{id}")).with_field("tag", format!("t{}", id % 5));
    for child in &shape.0 {
        node.children.push(build(child, next));
    }
    node
}

fn tree_strategy() -> impl Strategy<Value = TreeNode> {
    shape_strategy().prop_map(|shape| build(&shape, &mut 0))
}

fn viewport_strategy() -> impl Strategy<Value = ViewportConfig> {
    (200.0f32..=2000.0, 200.0f32..=1500.0)
        .prop_map(|(width, height)| ViewportConfig { width, height })
}

/// Footprint span `[start, end)` of every subtree, derived from the placed
/// node and its measured width.
fn footprints(
    tree: &TreeNode,
    layout: &Layout,
    config: &LayoutConfig,
) -> HashMap<String, (f32, f32)> {
    let dims = compute_dimensions(tree, config).unwrap();
    let mut spans = HashMap::new();
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        let pos = layout.position(&node.id).unwrap();
        let width = dims.get(&node.id).unwrap().width;
        let start = pos.x + config.node_width / 2.0 - width / 2.0;
        spans.insert(node.id.clone(), (start, start + width));
        stack.extend(node.children.iter());
    }
    spans
}

fn preorder_ids(tree: &TreeNode) -> Vec<String> {
    let mut ids = Vec::new();
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        ids.push(node.id.clone());
        stack.extend(node.children.iter().rev());
    }
    ids
}

const EPS: f32 = 1e-2;

// ═════════════════════════════════════════════════════════════════════════
// 1. Sibling footprints are disjoint
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn sibling_subtrees_never_overlap(tree in tree_strategy()) {
        let config = LayoutConfig::default();
        let layout = compute_layout(Some(&tree), &config, &ViewportConfig::default()).unwrap();
        let spans = footprints(&tree, &layout, &config);
        let mut stack = vec![&tree];
        while let Some(node) = stack.pop() {
            for (i, a) in node.children.iter().enumerate() {
                for b in &node.children[i + 1..] {
                    let (a0, a1) = spans[&a.id];
                    let (b0, b1) = spans[&b.id];
                    prop_assert!(
                        a1 <= b0 + EPS || b1 <= a0 + EPS,
                        "siblings {} [{}, {}) and {} [{}, {}) overlap",
                        a.id, a0, a1, b.id, b0, b1
                    );
                }
            }
            stack.extend(node.children.iter());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Children are centred under their parent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn children_row_is_centred(tree in tree_strategy()) {
        let config = LayoutConfig::default();
        let layout = compute_layout(Some(&tree), &config, &ViewportConfig::default()).unwrap();
        let spans = footprints(&tree, &layout, &config);
        let mut stack = vec![&tree];
        while let Some(node) = stack.pop() {
            if let (Some(first), Some(last)) = (node.children.first(), node.children.last()) {
                let row_mid = (spans[&first.id].0 + spans[&last.id].1) / 2.0;
                let pos = layout.position(&node.id).unwrap();
                let node_mid = pos.x + config.node_width / 2.0;
                prop_assert!(
                    (row_mid - node_mid).abs() <= EPS,
                    "children of {} centred at {} but node centre is {}",
                    node.id, row_mid, node_mid
                );
            }
            stack.extend(node.children.iter());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn layout_is_repeatable(tree in tree_strategy(), viewport in viewport_strategy()) {
        let config = LayoutConfig::default();
        let a = compute_layout(Some(&tree), &config, &viewport).unwrap();
        let b = compute_layout(Some(&tree), &config, &viewport).unwrap();
        prop_assert_eq!(a.positions.len(), b.positions.len());
        for (id, pos) in &a.positions {
            let other = b.positions[id];
            prop_assert_eq!(pos.x.to_bits(), other.x.to_bits());
            prop_assert_eq!(pos.y.to_bits(), other.y.to_bits());
        }
        prop_assert_eq!(a, b);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Canvas containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn nodes_stay_on_canvas(tree in tree_strategy(), viewport in viewport_strategy()) {
        let config = LayoutConfig::default();
        let layout = compute_layout(Some(&tree), &config, &viewport).unwrap();
        prop_assert_eq!(layout.positions.len(), tree.node_count());
        for (id, pos) in &layout.positions {
            prop_assert!(pos.x >= 0.0 && pos.x < layout.canvas.width, "{} x={}", id, pos.x);
            prop_assert!(pos.y >= 0.0 && pos.y < layout.canvas.height, "{} y={}", id, pos.y);
            prop_assert!(pos.x + config.node_width <= layout.canvas.width + EPS);
            prop_assert!(pos.y + config.node_height <= layout.canvas.height + EPS);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Search determinism
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn search_returns_first_preorder_match(tree in tree_strategy(), tag in 0usize..5) {
        let query = Query::field("tag", &format!("t{tag}"));
        let expected = preorder_ids(&tree)
            .into_iter()
            .find(|id| id[1..].parse::<usize>().map(|n| n % 5 == tag).unwrap_or(false));
        let first = find(&tree, |node| query.matches(node)).map(|node| node.id.clone());
        let second = find(&tree, |node| query.matches(node)).map(|node| node.id.clone());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Scroll clamping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scroll_targets_are_never_negative(
        tree in tree_strategy(),
        viewport in viewport_strategy(),
    ) {
        let config = LayoutConfig::default();
        let layout = compute_layout(Some(&tree), &config, &viewport).unwrap();
        for id in layout.positions.keys() {
            let target = scroll_target_for(id, &layout, &viewport, &config).unwrap();
            prop_assert!(target.x >= 0.0, "{} scroll x={}", id, target.x);
            prop_assert!(target.y >= 0.0, "{} scroll y={}", id, target.y);
        }
    }
}
