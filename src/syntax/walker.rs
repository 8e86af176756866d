// Depth-first traversal over the owned syntax tree
//
// Pre-order, lazy, and restartable: every call to `walk` starts from
// scratch with its own explicit stack.

use super::{Child, SyntaxNode, Token};

/// One step of a walk: either an interior node or a leaf value
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Node(&'a SyntaxNode),
    Leaf(&'a Token),
}

impl<'a> Visit<'a> {
    pub fn as_node(&self) -> Option<&'a SyntaxNode> {
        match self {
            Visit::Node(node) => Some(node),
            Visit::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&'a Token> {
        match self {
            Visit::Leaf(token) => Some(token),
            Visit::Node(_) => None,
        }
    }
}

impl<'a> From<&'a Child> for Visit<'a> {
    fn from(child: &'a Child) -> Self {
        match child {
            Child::Node(node) => Visit::Node(node),
            Child::Leaf(token) => Visit::Leaf(token),
        }
    }
}

/// Iterator returned by `walk`
pub struct Walk<'a> {
    stack: Vec<Visit<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.stack.pop()?;
        if let Visit::Node(node) = visit {
            // reversed so the first child is popped next
            self.stack
                .extend(node.children().iter().rev().map(Visit::from));
        }
        Some(visit)
    }
}

/// Walk `node` and everything reachable from it, node first
pub fn walk(node: &SyntaxNode) -> Walk<'_> {
    Walk {
        stack: vec![Visit::Node(node)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse_python, NodeKind};

    fn labels(source: &str) -> Vec<String> {
        let tree = parse_python(source).unwrap();
        walk(tree.root())
            .map(|visit| match visit {
                Visit::Node(node) => node.kind().to_string(),
                Visit::Leaf(token) => format!("'{}'", token.text),
            })
            .collect()
    }

    #[test]
    fn test_pre_order() {
        assert_eq!(
            labels("p.add(x)\n"),
            vec![
                "module",
                "expression_statement",
                "call",
                "attribute",
                "'p'",
                "'add'",
                "argument_list",
                "'x'",
            ]
        );
    }

    #[test]
    fn test_walk_is_restartable() {
        let tree = parse_python("import os\ndef main():\n    pass\n").unwrap();
        let first: Vec<_> = walk(tree.root())
            .filter_map(|v| v.as_node().map(SyntaxNode::kind))
            .collect();
        let second: Vec<_> = walk(tree.root())
            .filter_map(|v| v.as_node().map(SyntaxNode::kind))
            .collect();
        assert_eq!(first, second);
        assert!(first.contains(&NodeKind::FunctionDef));
    }

    #[test]
    fn test_each_node_visited_once() {
        let tree = parse_python("a = b(c, d=e)\n").unwrap();
        let leaves: Vec<_> = walk(tree.root())
            .filter_map(|v| v.as_leaf().map(|t| t.text.as_str()))
            .collect();
        assert_eq!(leaves, vec!["a", "b", "c", "d", "e"]);
    }
}
