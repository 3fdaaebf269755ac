use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ir::LeafMetadata;

pub type NodeId = usize;

/// Depth-axis policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Ignore branch lengths; space nodes purely by topological depth.
    #[default]
    Dendrogram,
    /// Scale the depth axis by cumulative branch length from the root.
    Phylogram,
}

/// Available drawing area, in the same units the output coordinates use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Zero-size containers are an expected transient state before first paint,
/// so these are returned as values, never panicked on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("degenerate bounds {width}x{height}; layout not computed")]
    DegenerateBounds { width: f32, height: f32 },
    #[error("empty tree; nothing to lay out")]
    EmptyTree,
}

/// One positioned node. `y` is the rendered depth coordinate; `y_free` is
/// the coordinate the mode assigned before any leaf alignment, kept so the
/// connector geometry can bend at the true position.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    pub x: f32,
    pub y: f32,
    pub y_free: f32,
    pub branch_length: Option<f64>,
    pub cumulative_length: f64,
    pub is_leaf: bool,
    pub metadata: Option<LeafMetadata>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Right-angled connector from a parent to one child, as straight segments.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLayout {
    pub source: NodeId,
    pub target: NodeId,
    pub points: Vec<(f32, f32)>,
}

/// Fully annotated hierarchy, flattened into an arena indexed by [`NodeId`].
/// The root is always id 0 and nodes appear in pre-order.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout {
    pub nodes: Vec<LayoutNode>,
    pub root: NodeId,
    pub edges: Vec<EdgeLayout>,
    pub leaf_count: usize,
    /// Maximum topological depth (root = 0).
    pub tree_height: usize,
    pub width: f32,
    pub height: f32,
    /// Lateral extent needed to keep adjacent leaves at the configured
    /// minimum spacing. When this exceeds `width` the caller should grow
    /// the canvas instead of letting leaves compress.
    pub recommended_width: f32,
}

impl TreeLayout {
    pub fn node(&self, id: NodeId) -> &LayoutNode {
        &self.nodes[id]
    }

    pub fn leaves(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(|node| node.is_leaf)
    }
}
