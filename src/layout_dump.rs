use crate::ir::LeafMetadata;
use crate::layout::{NodeId, TreeLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serializable snapshot of a computed layout: the annotated hierarchy as a
/// nested tree plus a flat edge list with connector points.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub recommended_width: f32,
    pub leaf_count: usize,
    pub tree_height: usize,
    pub root: NodeDump,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_length: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LeafMetadata>,
    pub children: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub path_points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &TreeLayout) -> Self {
        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                source_id: edge.source,
                target_id: edge.target,
                path_points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            recommended_width: layout.recommended_width,
            leaf_count: layout.leaf_count,
            tree_height: layout.tree_height,
            root: dump_node(layout, layout.root),
            edges,
        }
    }
}

fn dump_node(layout: &TreeLayout, id: NodeId) -> NodeDump {
    let node = layout.node(id);
    NodeDump {
        id,
        name: node.name.clone(),
        depth: node.depth,
        x: node.x,
        y: node.y,
        branch_length: node.branch_length,
        metadata: node.metadata.clone(),
        children: node
            .children
            .iter()
            .map(|&child| dump_node(layout, child))
            .collect(),
    }
}

pub fn write_layout_dump(path: &Path, layout: &TreeLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
