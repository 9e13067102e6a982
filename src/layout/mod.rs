mod connector;
pub mod dimension;
mod error;
pub(crate) mod types;
pub use dimension::{Dimensions, compute_dimensions};
pub use error::LayoutError;
pub use types::*;
use connector::*;
use dimension::children_span;

use crate::config::{LayoutConfig, ViewportConfig};
use crate::ir::TreeNode;
use std::collections::BTreeMap;

/// Lays out a hierarchy top-down.
///
/// Sibling subtrees are packed left to right with one `horizontal_spacing`
/// gap, and each row of children is centred under its parent. `None` is a
/// degenerate input and yields an empty layout sized to the viewport.
pub fn compute_layout(
    root: Option<&TreeNode>,
    config: &LayoutConfig,
    viewport: &ViewportConfig,
) -> Result<Layout, LayoutError> {
    let Some(root) = root else {
        return Ok(Layout::empty(config, viewport));
    };

    let dims = compute_dimensions(root, config).inspect_err(|err| {
        tracing::warn!(root = %root.id, error = %err, "rejecting hierarchy");
    })?;
    let root_dim = dims.root();

    let canvas = CanvasMetrics {
        width: viewport
            .width
            .max(root_dim.width + 2.0 * (root_dim.left_offset + config.margin)),
        height: root_dim.height + 2.0 * config.margin,
        origin: Position::new(root_dim.left_offset + config.margin, config.margin),
    };

    let mut positions = BTreeMap::new();
    place(root, canvas.origin, &dims, config, &mut positions);
    let edges = build_edges(root, &positions, config);

    tracing::debug!(
        nodes = positions.len(),
        canvas_width = canvas.width,
        canvas_height = canvas.height,
        "computed org chart layout"
    );

    Ok(Layout {
        root_id: Some(root.id.clone()),
        positions,
        edges,
        canvas,
        node_width: config.node_width,
        node_height: config.node_height,
    })
}

impl Layout {
    /// Layout of an absent hierarchy: no nodes, canvas sized to the viewport.
    pub fn empty(config: &LayoutConfig, viewport: &ViewportConfig) -> Self {
        Self {
            root_id: None,
            positions: BTreeMap::new(),
            edges: Vec::new(),
            canvas: CanvasMetrics {
                width: viewport.width,
                height: viewport.height,
                origin: Position::new(0.0, 0.0),
            },
            node_width: config.node_width,
            node_height: config.node_height,
        }
    }
}

fn place(
    node: &TreeNode,
    at: Position,
    dims: &Dimensions,
    config: &LayoutConfig,
    positions: &mut BTreeMap<String, Position>,
) {
    positions.insert(node.id.clone(), at);
    if node.is_leaf() {
        return;
    }

    let child_width = |child: &TreeNode| {
        dims.get(&child.id)
            .map(|dim| dim.width)
            .unwrap_or(config.node_width)
    };
    let total = children_span(
        node.children.iter().map(child_width),
        config.horizontal_spacing,
    );
    // May start left of the parent; the root's left_offset pays for that.
    let mut cursor = at.x + (config.node_width - total) / 2.0;
    let child_y = at.y + config.node_height + config.vertical_spacing;
    for child in &node.children {
        let width = child_width(child);
        let child_x = cursor + (width - config.node_width) / 2.0;
        place(child, Position::new(child_x, child_y), dims, config, positions);
        cursor += width + config.horizontal_spacing;
    }
}
