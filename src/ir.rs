use serde::{Deserialize, Serialize};

/// One clade or leaf of a parsed tree. Topology only: coordinates live in
/// [`crate::layout::TreeLayout`], which is derived from this and never
/// mutates it back.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Display name. Empty for unnamed internal nodes.
    pub name: String,
    /// Distance to the parent. `None` means unspecified, not zero.
    pub branch_length: Option<f64>,
    /// Children in parsed order. Empty means leaf.
    pub children: Vec<TreeNode>,
    /// Attached once by the metadata binder; internal nodes stay `None`.
    pub metadata: Option<LeafMetadata>,
}

/// Per-leaf annotations looked up by name after parsing. Every field is
/// optional because a lookup miss is a normal state, and `0.0` is a
/// meaningful correlation value distinct from "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeafMetadata {
    pub genome: Option<String>,
    pub sequence_similarity: Option<f64>,
    pub expression_correlation: Option<f64>,
    pub external_link: Option<String>,
}

impl TreeNode {
    pub fn leaf(name: impl Into<String>, branch_length: Option<f64>) -> Self {
        Self {
            name: name.into(),
            branch_length,
            children: Vec::new(),
            metadata: None,
        }
    }

    pub fn clade(
        name: impl Into<String>,
        branch_length: Option<f64>,
        children: Vec<TreeNode>,
    ) -> Self {
        Self {
            name: name.into(),
            branch_length,
            children,
            metadata: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaves in pre-order (the order the layout engine assigns lateral
    /// positions in, absent a sibling sort).
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a TreeNode>) {
        if self.is_leaf() {
            out.push(self);
            return;
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(TreeNode::leaf_count).sum()
        }
    }

    /// Maximum edge count from this node down to any leaf.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_order_is_preorder() {
        let tree = TreeNode::clade(
            "",
            None,
            vec![
                TreeNode::leaf("A", None),
                TreeNode::clade(
                    "",
                    None,
                    vec![TreeNode::leaf("B", None), TreeNode::leaf("C", None)],
                ),
            ],
        );
        let names: Vec<&str> = tree.leaves().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn single_leaf_counts() {
        let tree = TreeNode::leaf("X", Some(0.5));
        assert!(tree.is_leaf());
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.height(), 0);
    }
}
