use crate::ir::TreeNode;
use crate::layout::Layout;
use crate::navigation::{Highlight, ScrollTarget};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JSON hand-off of one layout pass to a host surface.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub root_id: Option<String>,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub origin: [f32; 2],
    pub node_width: f32,
    pub node_height: f32,
    pub nodes: Vec<NodeDump>,
    pub connectors: Vec<ConnectorDump>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll: Option<ScrollTarget>,
}

/// Placed node. `label` is the display name (the `name` field, else the id),
/// so a host can draw boxes without walking the hierarchy again.
#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub highlighted: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub from: String,
    pub to: String,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, tree: Option<&TreeNode>, highlight: &Highlight) -> Self {
        let labels = collect_labels(tree);
        let nodes = layout
            .positions
            .iter()
            .map(|(id, pos)| NodeDump {
                id: id.clone(),
                label: labels.get(id.as_str()).copied().unwrap_or(id.as_str()).to_string(),
                x: pos.x,
                y: pos.y,
                highlighted: highlight.is_highlighted(id),
            })
            .collect();

        let connectors = layout
            .edges
            .iter()
            .map(|edge| ConnectorDump {
                from: edge.from.clone(),
                to: edge.to.clone(),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            root_id: layout.root_id.clone(),
            canvas_width: layout.canvas.width,
            canvas_height: layout.canvas.height,
            origin: [layout.canvas.origin.x, layout.canvas.origin.y],
            node_width: layout.node_width,
            node_height: layout.node_height,
            nodes,
            connectors,
            scroll: None,
        }
    }

    pub fn with_scroll(mut self, scroll: Option<ScrollTarget>) -> Self {
        self.scroll = scroll;
        self
    }
}

fn collect_labels(tree: Option<&TreeNode>) -> HashMap<&str, &str> {
    let mut labels = HashMap::new();
    let mut stack: Vec<&TreeNode> = tree.into_iter().collect();
    while let Some(node) = stack.pop() {
        labels.insert(node.id.as_str(), node.label());
        stack.extend(node.children.iter());
    }
    labels
}

pub fn write_layout_dump(path: Option<&Path>, dump: &LayoutDump) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);
            serde_json::to_writer_pretty(writer, dump)?;
        }
        None => println!("{}", serde_json::to_string_pretty(dump)?),
    }
    Ok(())
}
