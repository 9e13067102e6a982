use std::collections::BTreeMap;

use serde::Serialize;

/// Footprint of the subtree rooted at one node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Dimension {
    pub width: f32,
    pub height: f32,
    /// How far the subtree may reach left of the node's own box.
    pub left_offset: f32,
}

/// Top-left corner of a node box in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasMetrics {
    pub width: f32,
    pub height: f32,
    /// Where the root box starts, used to centre it on first display.
    pub origin: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: (f32, f32),
    pub end: (f32, f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub from: String,
    pub to: String,
    /// Drop from the parent, bridge, rise into the child: four points.
    pub points: Vec<(f32, f32)>,
}

impl EdgeLayout {
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .windows(2)
            .map(|pair| Segment {
                start: pair[0],
                end: pair[1],
            })
    }
}

/// Result of one layout pass. A new tree always produces a new `Layout`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub root_id: Option<String>,
    pub positions: BTreeMap<String, Position>,
    pub edges: Vec<EdgeLayout>,
    pub canvas: CanvasMetrics,
    pub node_width: f32,
    pub node_height: f32,
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }
}
