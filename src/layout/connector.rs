use super::*;

/// Orthogonal connector from the bottom centre of `parent` to the top centre
/// of `child`, bending halfway through the vertical gap.
pub(super) fn connector_points(
    parent: Position,
    child: Position,
    config: &LayoutConfig,
) -> Vec<(f32, f32)> {
    let half = config.node_width / 2.0;
    let parent_x = parent.x + half;
    let child_x = child.x + half;
    let drop_y = parent.y + config.node_height;
    let bridge_y = drop_y + config.vertical_spacing / 2.0;
    vec![
        (parent_x, drop_y),
        (parent_x, bridge_y),
        (child_x, bridge_y),
        (child_x, child.y),
    ]
}

pub(super) fn build_edges(
    root: &TreeNode,
    positions: &BTreeMap<String, Position>,
    config: &LayoutConfig,
) -> Vec<EdgeLayout> {
    let mut edges = Vec::with_capacity(positions.len().saturating_sub(1));
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let Some(&parent) = positions.get(&node.id) else {
            continue;
        };
        for child in &node.children {
            let Some(&child_pos) = positions.get(&child.id) else {
                continue;
            };
            edges.push(EdgeLayout {
                from: node.id.clone(),
                to: child.id.clone(),
                points: connector_points(parent, child_pos, config),
            });
        }
        stack.extend(node.children.iter().rev());
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_segments_between_boxes() {
        let config = LayoutConfig::default();
        let parent = Position::new(100.0, 40.0);
        let child = Position::new(-30.0, 190.0);
        let edge = EdgeLayout {
            from: "p".into(),
            to: "c".into(),
            points: connector_points(parent, child, &config),
        };
        let segments: Vec<_> = edge.segments().collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start, (210.0, 130.0));
        assert_eq!(segments[0].end, (210.0, 160.0));
        assert_eq!(segments[1].end, (80.0, 160.0));
        assert_eq!(segments[2].end, (80.0, 190.0));
    }
}
