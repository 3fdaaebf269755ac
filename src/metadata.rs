use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ir::{LeafMetadata, TreeNode};

/// Caller-supplied annotation tables, each keyed by uppercased leaf name.
/// The four maps are independent: a leaf may appear in any subset of them,
/// and a miss leaves the corresponding metadata field absent rather than
/// zeroed. Passed in explicitly — there is no ambient registry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetadataLookup {
    pub genome: BTreeMap<String, String>,
    pub sequence_similarity: BTreeMap<String, f64>,
    pub expression_correlation: BTreeMap<String, f64>,
    pub external_link: BTreeMap<String, String>,
    /// Leaf name of the query/primary element. That leaf is fully similar
    /// to itself, so its similarity and correlation are forced to 1.0
    /// regardless of table content.
    pub query: Option<String>,
}

impl MetadataLookup {
    /// Resolves annotations for one leaf name. Lookups are case-insensitive
    /// (uppercased), matching the convention of the source identifiers.
    pub fn resolve(&self, name: &str) -> LeafMetadata {
        let key = name.trim().to_uppercase();
        let is_query = self
            .query
            .as_deref()
            .is_some_and(|query| query.trim().to_uppercase() == key);
        LeafMetadata {
            genome: self.genome.get(&key).cloned(),
            sequence_similarity: if is_query {
                Some(1.0)
            } else {
                self.sequence_similarity.get(&key).copied()
            },
            expression_correlation: if is_query {
                Some(1.0)
            } else {
                self.expression_correlation.get(&key).copied()
            },
            external_link: self.external_link.get(&key).cloned(),
        }
    }
}

/// Decorates every leaf of `root` in place. Internal nodes are left
/// untouched; re-binding with the same lookup is idempotent.
pub fn bind_metadata(root: &mut TreeNode, lookup: &MetadataLookup) {
    if root.is_leaf() {
        root.metadata = Some(lookup.resolve(&root.name));
        return;
    }
    for child in &mut root.children {
        bind_metadata(child, lookup);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_newick;

    fn lookup() -> MetadataLookup {
        let mut lookup = MetadataLookup::default();
        lookup
            .genome
            .insert("A".to_string(), "Zea mays".to_string());
        lookup.sequence_similarity.insert("A".to_string(), 0.83);
        lookup.expression_correlation.insert("A".to_string(), -0.2);
        lookup
            .external_link
            .insert("A".to_string(), "https://example.org/gene/A".to_string());
        lookup
    }

    #[test]
    fn binds_by_uppercased_name() {
        let mut tree = parse_newick("(a:1,B:2);").unwrap();
        bind_metadata(&mut tree, &lookup());
        let meta = tree.children[0].metadata.as_ref().unwrap();
        assert_eq!(meta.genome.as_deref(), Some("Zea mays"));
        assert_eq!(meta.sequence_similarity, Some(0.83));
        assert_eq!(meta.expression_correlation, Some(-0.2));
        assert_eq!(
            meta.external_link.as_deref(),
            Some("https://example.org/gene/A")
        );
    }

    #[test]
    fn missing_entries_stay_absent_not_zero() {
        let mut tree = parse_newick("(A,X);").unwrap();
        bind_metadata(&mut tree, &lookup());
        let meta = tree.children[1].metadata.as_ref().unwrap();
        assert_eq!(meta.genome, None);
        assert_eq!(meta.sequence_similarity, None);
        assert_eq!(meta.expression_correlation, None);
        assert_eq!(meta.external_link, None);
    }

    #[test]
    fn query_leaf_is_fully_similar_to_itself() {
        let mut l = lookup();
        l.query = Some("a".to_string());
        l.sequence_similarity.insert("A".to_string(), 0.4);
        let mut tree = parse_newick("(A,B);").unwrap();
        bind_metadata(&mut tree, &l);
        let meta = tree.children[0].metadata.as_ref().unwrap();
        assert_eq!(meta.sequence_similarity, Some(1.0));
        assert_eq!(meta.expression_correlation, Some(1.0));
        // Non-score fields still come from the tables.
        assert_eq!(meta.genome.as_deref(), Some("Zea mays"));
    }

    #[test]
    fn internal_nodes_receive_no_metadata() {
        let mut tree = parse_newick("((A,B)AB,C);").unwrap();
        bind_metadata(&mut tree, &lookup());
        assert!(tree.metadata.is_none());
        assert!(tree.children[0].metadata.is_none());
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "genome": {"A": "Oryza sativa"},
            "sequenceSimilarity": {"A": 0.9},
            "query": "A"
        }"#;
        let lookup: MetadataLookup = serde_json::from_str(json).unwrap();
        assert_eq!(lookup.genome.get("A").map(String::as_str), Some("Oryza sativa"));
        assert_eq!(lookup.query.as_deref(), Some("A"));
    }
}
