use tree_sitter::Node;

// Fixed punctuation tags discarded before structural comparison.
const PUNCTUATION: [&str; 10] = ["{", "}", "[", "]", "(", ")", ";", "'", "\"", ","];

/// A plain value copy of a syntax (sub)tree, holding only grammar type tags.
/// Reduction works on this copy so the parser's tree is never mutated while
/// being traversed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagNode {
    pub(crate) tag: &'static str,
    pub(crate) children: Vec<TagNode>,
}

fn is_punctuation(tag: &str) -> bool {
    PUNCTUATION.contains(&tag)
}

pub(crate) fn tag_tree(node: Node) -> TagNode {
    let mut children = Vec::with_capacity(node.child_count());
    for idx in 0..node.child_count() {
        if let Some(child) = node.child(idx) {
            children.push(tag_tree(child));
        }
    }
    TagNode {
        tag: node.kind(),
        children,
    }
}

/// Collapses syntactic scaffolding: punctuation children are discarded and any
/// node left with exactly one child is replaced by that child's reduction.
/// Applying `collapse` to its own output is a no-op.
pub(crate) fn collapse(node: &TagNode) -> TagNode {
    let kept: Vec<&TagNode> = node
        .children
        .iter()
        .filter(|child| !is_punctuation(child.tag))
        .collect();
    if kept.len() == 1 {
        return collapse(kept[0]);
    }
    TagNode {
        tag: node.tag,
        children: kept.into_iter().map(collapse).collect(),
    }
}

fn flatten(node: &TagNode, out: &mut Vec<&'static str>) {
    out.push(node.tag);
    for child in &node.children {
        flatten(child, out);
    }
}

/// Pre-order tag sequence of the reduced tree rooted at `root`.
pub(crate) fn tag_sequence(root: Node) -> Vec<&'static str> {
    let reduced = collapse(&tag_tree(root));
    let mut out = Vec::new();
    flatten(&reduced, &mut out);
    out
}
