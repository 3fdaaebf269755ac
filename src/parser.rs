use crate::ir::TreeNode;
use thiserror::Error;

/// Characters that terminate a name in the Newick grammar.
const RESERVED: [char; 5] = ['(', ')', ',', ':', ';'];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty input")]
    EmptyInput,
    #[error("malformed tree grammar near {0:?}")]
    MalformedGrammar(String),
    #[error("invalid branch length {0:?}")]
    InvalidBranchLength(String),
    #[error("negative branch length {length} on {name:?}")]
    NegativeBranchLength { name: String, length: f64 },
}

/// Parses a Newick-style tree description into a [`TreeNode`] hierarchy.
///
/// `tree := clade ';'? | leaf` with `clade := '(' childlist ')' name? (':' number)?`
/// and `leaf := name (':' number)?`. Children are split on commas at
/// parenthesis nesting depth zero; no regular expressions are involved, so
/// nested names with irregular whitespace survive intact. An unparsable or
/// negative branch length is a hard error, never a silent NaN or zero.
pub fn parse_newick(text: &str) -> Result<TreeNode, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    let body = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    if body.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    parse_node(body)
}

fn parse_node(text: &str) -> Result<TreeNode, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::MalformedGrammar(String::new()));
    }

    if !text.starts_with('(') {
        return parse_leaf(text);
    }

    let close = matching_paren(text).ok_or_else(|| truncated(text))?;
    let interior = &text[1..close];
    let trailer = &text[close + 1..];

    let mut children = Vec::new();
    for part in split_top_level(interior) {
        if part.trim().is_empty() {
            return Err(truncated(text));
        }
        children.push(parse_node(part)?);
    }
    if children.is_empty() {
        return Err(truncated(text));
    }

    let (name, branch_length) = parse_label(trailer)?;
    Ok(TreeNode::clade(name, branch_length, children))
}

fn parse_leaf(text: &str) -> Result<TreeNode, ParseError> {
    if text.contains(['(', ')', ',', ';']) {
        return Err(truncated(text));
    }
    let (name, branch_length) = parse_label(text)?;
    Ok(TreeNode::leaf(name, branch_length))
}

/// Parses `name? (':' number)?`, splitting on the last colon so names that
/// somehow carry colons still resolve to the rightmost length field.
fn parse_label(text: &str) -> Result<(String, Option<f64>), ParseError> {
    if text.contains(['(', ')', ',', ';']) {
        return Err(truncated(text));
    }
    match text.rfind(':') {
        Some(idx) => {
            let name = text[..idx].trim().to_string();
            let length = parse_branch_length(&name, &text[idx + 1..])?;
            Ok((name, Some(length)))
        }
        None => Ok((text.trim().to_string(), None)),
    }
}

fn parse_branch_length(name: &str, raw: &str) -> Result<f64, ParseError> {
    let raw = raw.trim();
    if !is_decimal_literal(raw) {
        return Err(ParseError::InvalidBranchLength(raw.to_string()));
    }
    let length: f64 = raw
        .parse()
        .map_err(|_| ParseError::InvalidBranchLength(raw.to_string()))?;
    if length < 0.0 {
        return Err(ParseError::NegativeBranchLength {
            name: name.to_string(),
            length,
        });
    }
    Ok(length)
}

/// Standard decimal literal: optional sign, required integer part, optional
/// fractional part. Anything looser (exponents, bare dots, hex) is rejected
/// so a typo never turns into a NaN coordinate downstream.
fn is_decimal_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    if int_part.is_empty() || !int_part.chars().all(|ch| ch.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        Some(frac) => frac.chars().all(|ch| ch.is_ascii_digit()),
        None => true,
    }
}

/// Byte index of the `)` matching the `(` at index 0, if balanced.
fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on commas at nesting depth zero only.
fn split_top_level(interior: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in interior.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&interior[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&interior[start..]);
    parts
}

fn truncated(text: &str) -> ParseError {
    let snippet: String = text.chars().take(32).collect();
    ParseError::MalformedGrammar(snippet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_leaf_clade() {
        let tree = parse_newick("(A:1,B:2);").unwrap();
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].name, "A");
        assert_eq!(tree.children[0].branch_length, Some(1.0));
        assert_eq!(tree.children[1].name, "B");
        assert_eq!(tree.children[1].branch_length, Some(2.0));
    }

    #[test]
    fn parses_nested_clade_with_inner_name_and_length() {
        let tree = parse_newick("(A:0.1,(B:0.2,C:0.3)BC:0.4)root;").unwrap();
        assert_eq!(tree.name, "root");
        assert_eq!(tree.children.len(), 2);
        let inner = &tree.children[1];
        assert_eq!(inner.name, "BC");
        assert_eq!(inner.branch_length, Some(0.4));
        assert_eq!(inner.children.len(), 2);
    }

    #[test]
    fn bare_name_is_single_leaf_tree() {
        let tree = parse_newick("Solo;").unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.name, "Solo");
        assert_eq!(tree.branch_length, None);
    }

    #[test]
    fn trims_whitespace_in_names() {
        let tree = parse_newick("( A , B )").unwrap();
        assert_eq!(tree.children[0].name, "A");
        assert_eq!(tree.children[1].name, "B");
    }

    #[test]
    fn commas_split_only_at_depth_zero() {
        let tree = parse_newick("((A,B),(C,D));").unwrap();
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0].children.len(), 2);
        assert_eq!(tree.children[1].children.len(), 2);
        assert_eq!(tree.leaf_count(), 4);
    }

    #[test]
    fn empty_input_fails() {
        assert_eq!(parse_newick(""), Err(ParseError::EmptyInput));
        assert_eq!(parse_newick("   ;"), Err(ParseError::EmptyInput));
    }

    #[test]
    fn unbalanced_parenthesis_fails_without_partial_tree() {
        assert!(matches!(
            parse_newick("(A,B"),
            Err(ParseError::MalformedGrammar(_))
        ));
        assert!(matches!(
            parse_newick("(A,B));"),
            Err(ParseError::MalformedGrammar(_))
        ));
    }

    #[test]
    fn empty_child_list_fails() {
        assert!(matches!(
            parse_newick("();"),
            Err(ParseError::MalformedGrammar(_))
        ));
        assert!(matches!(
            parse_newick("(A,);"),
            Err(ParseError::MalformedGrammar(_))
        ));
    }

    #[test]
    fn unparsable_branch_length_is_hard_error() {
        assert_eq!(
            parse_newick("(A:fast,B:2);"),
            Err(ParseError::InvalidBranchLength("fast".to_string()))
        );
        assert_eq!(
            parse_newick("(A:1e-3,B:2);"),
            Err(ParseError::InvalidBranchLength("1e-3".to_string()))
        );
        assert_eq!(
            parse_newick("(A:.5,B:2);"),
            Err(ParseError::InvalidBranchLength(".5".to_string()))
        );
    }

    #[test]
    fn negative_branch_length_is_surfaced() {
        assert_eq!(
            parse_newick("(A:-1,B:2);"),
            Err(ParseError::NegativeBranchLength {
                name: "A".to_string(),
                length: -1.0,
            })
        );
    }

    #[test]
    fn unnamed_internal_nodes_keep_lengths() {
        let tree = parse_newick("((B:0.2,C:0.3):0.4,A:0.1);").unwrap();
        let inner = &tree.children[0];
        assert_eq!(inner.name, "");
        assert_eq!(inner.branch_length, Some(0.4));
    }

    #[test]
    fn polytomy_parses_all_children() {
        let tree = parse_newick("(A,B,C,D,E);").unwrap();
        assert_eq!(tree.children.len(), 5);
    }
}
