use tree_sitter::{Parser, Tree};

use crate::error::{CompareError, Result};

/// One CST leaf in source order: grammar type tag plus literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LeafToken {
    pub(crate) kind: &'static str,
    pub(crate) text: String,
}

/// Node/edge lists of the concrete syntax tree, in pre-order. Consumed by
/// external tree renderers; nothing in the similarity or duplication paths
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstGraph {
    pub nodes: Vec<CstGraphNode>,
    /// (parent id, child id) pairs.
    pub edges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstGraphNode {
    pub id: usize,
    pub kind: String,
    pub text: String,
}

pub(crate) fn parse(text: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_cpp::LANGUAGE.into())
        .map_err(|err| CompareError::parser(format!("cpp grammar rejected: {err}")))?;
    parser
        .parse(text, None)
        .ok_or_else(|| CompareError::parser("cpp parser produced no tree"))
}

pub(crate) fn leaf_tokens(tree: &Tree, source: &str) -> Vec<LeafToken> {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    let mut stack = vec![tree.root_node()];
    while let Some(node) = stack.pop() {
        if node.child_count() == 0 {
            out.push(LeafToken {
                kind: node.kind(),
                text: node.utf8_text(bytes).unwrap_or_default().to_string(),
            });
            continue;
        }
        for idx in (0..node.child_count()).rev() {
            if let Some(child) = node.child(idx) {
                stack.push(child);
            }
        }
    }
    out
}

pub(crate) fn cst_graph(tree: &Tree, source: &str) -> CstGraph {
    let bytes = source.as_bytes();
    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut stack = vec![(tree.root_node(), None::<usize>)];
    while let Some((node, parent)) = stack.pop() {
        let id = nodes.len();
        nodes.push(CstGraphNode {
            id,
            kind: node.kind().to_string(),
            text: node.utf8_text(bytes).unwrap_or_default().to_string(),
        });
        if let Some(parent_id) = parent {
            edges.push((parent_id, id));
        }
        for idx in (0..node.child_count()).rev() {
            if let Some(child) = node.child(idx) {
                stack.push((child, Some(id)));
            }
        }
    }
    CstGraph { nodes, edges }
}
