// Node queries built on the walker

use super::walker::walk;
use super::{NodeKind, SyntaxNode};

/// All nodes of exactly `kind` reachable from `nodes`, in discovery order
pub fn find_by_kind<'a, I>(nodes: I, kind: NodeKind) -> Vec<&'a SyntaxNode>
where
    I: IntoIterator<Item = &'a SyntaxNode>,
{
    nodes
        .into_iter()
        .flat_map(walk)
        .filter_map(|visit| visit.as_node())
        .filter(|node| node.kind() == kind)
        .collect()
}

/// The candidates whose subtree has a leaf whose text is exactly `token`
pub fn find_containing<'a, I>(nodes: I, token: &str) -> Vec<&'a SyntaxNode>
where
    I: IntoIterator<Item = &'a SyntaxNode>,
{
    nodes
        .into_iter()
        .filter(|node| {
            walk(node)
                .filter_map(|visit| visit.as_leaf())
                .any(|leaf| leaf.text == token)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_python;

    const SOURCE: &str = "\
import argparse
from os import path

def helper():
    return path.sep

def main():
    parser = argparse.ArgumentParser()
    parser.add_argument('--x')
    args = parser.parse_args()
";

    #[test]
    fn test_find_by_kind_in_discovery_order() {
        let tree = parse_python(SOURCE).unwrap();
        let funcs = find_by_kind([tree.root()], NodeKind::FunctionDef);
        let names: Vec<_> = funcs
            .iter()
            .map(|f| f.token_by_field("name").unwrap().text.as_str())
            .collect();
        assert_eq!(names, vec!["helper", "main"]);

        let imports = find_by_kind(tree.statements(), NodeKind::Import);
        assert_eq!(imports.len(), 1);
        assert_eq!(find_by_kind([tree.root()], NodeKind::ImportFrom).len(), 1);
    }

    #[test]
    fn test_find_containing_matches_whole_tokens() {
        let tree = parse_python(SOURCE).unwrap();
        let funcs = find_by_kind([tree.root()], NodeKind::FunctionDef);
        let with_parse = find_containing(funcs.iter().copied(), "parse_args");
        assert_eq!(with_parse.len(), 1);
        assert_eq!(with_parse[0].token_by_field("name").unwrap().text, "main");

        // substrings of a token do not count
        assert!(find_containing(funcs.iter().copied(), "parse").is_empty());
    }

    #[test]
    fn test_find_containing_keeps_duplicates() {
        let tree = parse_python(SOURCE).unwrap();
        let main = find_by_kind([tree.root()], NodeKind::FunctionDef)[1];
        let found = find_containing([main, main], "parser");
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_calls_containing_add_argument() {
        let tree = parse_python(SOURCE).unwrap();
        let calls = find_by_kind([tree.root()], NodeKind::Call);
        let adds = find_containing(calls, "add_argument");
        assert_eq!(adds.len(), 1);
        assert_eq!(adds[0].position().line, 9);
    }
}
