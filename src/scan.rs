//! Static argparse scan
//!
//! Lists the statements that build a parser straight from the syntax tree:
//! imports, the `ArgumentParser` assignment and every `add_argument` call.
//! No client code runs, so this works on scripts that cannot be loaded.

use crate::syntax::{find_by_kind, find_containing, NodeKind, SyntaxTree};

/// Token identifying the parser construction
pub const PARSER_TYPE: &str = "ArgumentParser";
/// Token identifying an option declaration
pub const ADD_ARGUMENT: &str = "add_argument";

/// One parser-related statement, with its source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgparseStatement {
    pub kind: NodeKind,
    pub line: usize,
    pub text: String,
}

/// Imports, then from-imports, then parser assignments, then `add_argument`
/// calls; each group in document order
pub fn argparse_statements(tree: &SyntaxTree, source: &str) -> Vec<ArgparseStatement> {
    let root = [tree.root()];

    let imports = find_by_kind(root, NodeKind::Import);
    let from_imports = find_by_kind(root, NodeKind::ImportFrom);
    let assignments = find_containing(find_by_kind(root, NodeKind::Assign), PARSER_TYPE);
    let calls = find_containing(find_by_kind(root, NodeKind::Call), ADD_ARGUMENT);

    imports
        .into_iter()
        .chain(from_imports)
        .chain(assignments)
        .chain(calls)
        .map(|node| ArgparseStatement {
            kind: node.kind(),
            line: node.position().line,
            text: node.text(source).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_python;

    const CLIENT: &str = "\
import argparse
import os, sys
from gooey import Gooey

@Gooey
def main():
    parser = argparse.ArgumentParser(description=\"My help Message\")
    parser.add_argument('filename', help=\"Name of the file to load\")
    parser.add_argument('-f', '--format', help='Format of output')
    verbose = parser.add_argument_group('verbosity')
    args = parser.parse_args()
";

    fn scan(source: &str) -> Vec<(NodeKind, usize, String)> {
        let tree = parse_python(source).unwrap();
        argparse_statements(&tree, source)
            .into_iter()
            .map(|s| (s.kind, s.line, s.text))
            .collect()
    }

    #[test]
    fn test_groups_in_order() {
        let found = scan(CLIENT);
        let expected = vec![
            (NodeKind::Import, 1, "import argparse".to_string()),
            (NodeKind::Import, 2, "import os, sys".to_string()),
            (NodeKind::ImportFrom, 3, "from gooey import Gooey".to_string()),
            (
                NodeKind::Assign,
                7,
                "parser = argparse.ArgumentParser(description=\"My help Message\")".to_string(),
            ),
            (
                NodeKind::Call,
                8,
                "parser.add_argument('filename', help=\"Name of the file to load\")".to_string(),
            ),
            (
                NodeKind::Call,
                9,
                "parser.add_argument('-f', '--format', help='Format of output')".to_string(),
            ),
        ];
        assert_eq!(found, expected);
    }

    #[test]
    fn test_bare_parser_type_import_is_matched() {
        let source = "from argparse import ArgumentParser\np = ArgumentParser()\n";
        let kinds: Vec<_> = scan(source).into_iter().map(|(k, line, _)| (k, line)).collect();
        assert_eq!(kinds, vec![(NodeKind::ImportFrom, 1), (NodeKind::Assign, 2)]);
    }

    #[test]
    fn test_script_without_parser_only_lists_imports() {
        let found = scan("import sys\nprint(sys.argv)\n");
        assert_eq!(found, vec![(NodeKind::Import, 1, "import sys".to_string())]);
    }
}
