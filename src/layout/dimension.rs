use std::collections::{HashMap, HashSet};

use super::*;

/// Subtree footprints for one layout pass, keyed by node id.
#[derive(Debug, Clone)]
pub struct Dimensions {
    root: Dimension,
    by_id: HashMap<String, Dimension>,
}

impl Dimensions {
    pub fn root(&self) -> Dimension {
        self.root
    }

    pub fn get(&self, id: &str) -> Option<Dimension> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Measures every subtree bottom-up, rejecting repeated ids and over-deep
/// input before any position is derived.
pub fn compute_dimensions(
    root: &TreeNode,
    config: &LayoutConfig,
) -> Result<Dimensions, LayoutError> {
    let mut by_id = HashMap::new();
    let mut visited = HashSet::new();
    let root_dim = measure(root, config, 0, &mut visited, &mut by_id)?;
    Ok(Dimensions {
        root: root_dim,
        by_id,
    })
}

/// Combined width of a sibling row: widths plus one gap between neighbours.
pub(super) fn children_span(widths: impl IntoIterator<Item = f32>, spacing: f32) -> f32 {
    let mut total = 0.0;
    let mut count = 0usize;
    for width in widths {
        total += width;
        count += 1;
    }
    if count > 1 {
        total += spacing * (count as f32 - 1.0);
    }
    total
}

fn measure<'a>(
    node: &'a TreeNode,
    config: &LayoutConfig,
    depth: usize,
    visited: &mut HashSet<&'a str>,
    by_id: &mut HashMap<String, Dimension>,
) -> Result<Dimension, LayoutError> {
    if depth > config.max_depth {
        return Err(LayoutError::DepthExceeded {
            id: node.id.clone(),
            max_depth: config.max_depth,
        });
    }
    if !visited.insert(node.id.as_str()) {
        return Err(LayoutError::DuplicateNode {
            id: node.id.clone(),
        });
    }

    let dimension = if node.is_leaf() {
        Dimension {
            width: config.node_width,
            height: config.node_height,
            left_offset: 0.0,
        }
    } else {
        let mut child_dims = Vec::with_capacity(node.children.len());
        for child in &node.children {
            child_dims.push(measure(child, config, depth + 1, visited, by_id)?);
        }
        let sum = children_span(
            child_dims.iter().map(|dim| dim.width),
            config.horizontal_spacing,
        );
        let tallest = child_dims
            .iter()
            .map(|dim| dim.height)
            .fold(0.0_f32, f32::max);
        let child_offset = child_dims
            .iter()
            .map(|dim| dim.left_offset)
            .fold(0.0_f32, f32::max);
        Dimension {
            width: config.node_width.max(sum),
            height: config.node_height + config.vertical_spacing + tallest,
            left_offset: ((sum - config.node_width) / 2.0).max(child_offset).max(0.0),
        }
    };

    by_id.insert(node.id.clone(), dimension);
    Ok(dimension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str) -> TreeNode {
        TreeNode::new(id)
    }

    #[test]
    fn leaf_is_one_node_box() {
        let config = LayoutConfig::default();
        let dims = compute_dimensions(&leaf("a"), &config).unwrap();
        assert_eq!(
            dims.root(),
            Dimension {
                width: config.node_width,
                height: config.node_height,
                left_offset: 0.0,
            }
        );
    }

    #[test]
    fn two_leaves_overflow_parent() {
        let config = LayoutConfig::default();
        let tree = leaf("root").with_child(leaf("a")).with_child(leaf("b"));
        let dims = compute_dimensions(&tree, &config).unwrap();
        let root = dims.root();
        assert_eq!(root.width, 480.0);
        assert_eq!(root.left_offset, 130.0);
        assert_eq!(
            root.height,
            config.node_height * 2.0 + config.vertical_spacing
        );
        assert_eq!(dims.len(), 3);
    }

    #[test]
    fn single_child_keeps_node_width() {
        let config = LayoutConfig::default();
        let tree = leaf("root").with_child(leaf("a"));
        let root = compute_dimensions(&tree, &config).unwrap().root();
        assert_eq!(root.width, config.node_width);
        assert_eq!(root.left_offset, 0.0);
    }

    #[test]
    fn deep_child_offset_propagates() {
        let config = LayoutConfig::default();
        let wide = leaf("mid")
            .with_child(leaf("a"))
            .with_child(leaf("b"))
            .with_child(leaf("c"));
        let tree = leaf("root").with_child(wide);
        let dims = compute_dimensions(&tree, &config).unwrap();
        let mid = dims.get("mid").unwrap();
        assert_eq!(mid.left_offset, (740.0 - 220.0) / 2.0);
        assert_eq!(dims.root().left_offset, mid.left_offset);
        assert_eq!(dims.root().width, mid.width);
    }

    #[test]
    fn tallest_child_sets_height() {
        let config = LayoutConfig::default();
        let tree = leaf("root")
            .with_child(leaf("a").with_child(leaf("a1")))
            .with_child(leaf("b"));
        let root = compute_dimensions(&tree, &config).unwrap().root();
        let level = config.node_height + config.vertical_spacing;
        assert_eq!(root.height, level * 2.0 + config.node_height);
    }

    #[test]
    fn repeated_id_is_structural_error() {
        let tree = leaf("root")
            .with_child(leaf("x"))
            .with_child(leaf("y").with_child(leaf("x")));
        let err = compute_dimensions(&tree, &LayoutConfig::default()).unwrap_err();
        assert_eq!(err, LayoutError::DuplicateNode { id: "x".to_string() });
    }

    #[test]
    fn depth_bound_is_enforced() {
        let config = LayoutConfig {
            max_depth: 3,
            ..LayoutConfig::default()
        };
        let mut tree = leaf("n5");
        for level in (0..5).rev() {
            tree = leaf(&format!("n{level}")).with_child(tree);
        }
        let err = compute_dimensions(&tree, &config).unwrap_err();
        assert!(matches!(err, LayoutError::DepthExceeded { max_depth: 3, .. }));
    }

    #[test]
    fn span_has_no_trailing_gap() {
        assert_eq!(children_span([10.0, 20.0, 30.0], 5.0), 70.0);
        assert_eq!(children_span([10.0], 5.0), 10.0);
        assert_eq!(children_span(std::iter::empty(), 5.0), 0.0);
    }
}
