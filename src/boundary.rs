//! Boundary resolution
//!
//! Finds where to cut the client script: the parse-call assignment inside the
//! module-level main function, and the line where main's region ends.
//!
//! tree-sitter (like Python's `ast`) reports where a block *starts*, so the end
//! of main is taken from the start of the next module-level statement.

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::syntax::{find_by_kind, find_containing, NodeKind, SyntaxNode, SyntaxTree};
use tracing::debug;

/// Where to cut the client script and what to return from the entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    /// Line of the parse-call statement (1-indexed); dropped along with everything after it
    pub cutoff_line: usize,
    /// Last line of main's region (1-indexed); lines after it are kept
    pub restart_line: usize,
    /// Column of the parse-call statement's first token
    pub column_offset: usize,
    /// Receiver of the parse call, returned in place of the parse
    pub target_name: String,
    /// Name of the resolved main function
    pub entry_point: String,
}

/// Resolve the boundary for a parsed document of `line_count` lines
pub fn resolve_boundary(
    tree: &SyntaxTree,
    line_count: usize,
    config: &ExtractorConfig,
) -> Result<Boundary> {
    let statements: Vec<&SyntaxNode> = tree.statements().collect();

    let candidates: Vec<(&SyntaxNode, usize)> =
        find_by_kind(statements.iter().copied(), NodeKind::FunctionDef)
            .into_iter()
            .filter(|func| {
                function_name(func)
                    .is_some_and(|name| name.contains(config.entry_marker.as_str()))
            })
            .filter_map(|func| module_level_index(&statements, func).map(|idx| (func, idx)))
            .collect();

    if candidates.is_empty() {
        return Err(ExtractError::pattern_not_found(format!(
            "no module-level function named with '{}'",
            config.entry_marker
        )));
    }

    // helpers like `get_domain` also contain the marker; the entry point is
    // the first candidate that actually calls the parser
    let (main, index, statement, target_name) = candidates
        .iter()
        .find_map(|&(func, idx)| {
            parse_call_statement(func, &config.parse_call)
                .map(|(stmt, target)| (func, idx, stmt, target))
        })
        .ok_or_else(|| {
            let names: Vec<&str> = candidates
                .iter()
                .filter_map(|(func, _)| function_name(func))
                .collect();
            ExtractError::pattern_not_found(format!(
                "no '<name> = <parser>.{}()' assignment in {}",
                config.parse_call,
                names.join(", ")
            ))
        })?;

    // function_name is Some for every candidate
    let entry_point = function_name(main).unwrap_or_default().to_string();

    let restart_line = match statements.get(index + 1) {
        Some(next) => next.position().line - 1,
        None => line_count,
    };

    let boundary = Boundary {
        cutoff_line: statement.position().line,
        restart_line,
        column_offset: statement.position().column,
        target_name: target_name.to_string(),
        entry_point,
    };

    debug!(
        "Resolved boundary: cutoff={} restart={} col={} target={} entry={}",
        boundary.cutoff_line,
        boundary.restart_line,
        boundary.column_offset,
        boundary.target_name,
        boundary.entry_point
    );
    Ok(boundary)
}

fn function_name(func: &SyntaxNode) -> Option<&str> {
    func.token_by_field("name").map(|t| t.text.as_str())
}

/// First statement of `func`'s body assigning from `<receiver>.<parse_call>()`
fn parse_call_statement<'a>(
    func: &'a SyntaxNode,
    parse_call: &str,
) -> Option<(&'a SyntaxNode, &'a str)> {
    let body = func.node_by_field("body")?;
    find_containing(body.child_nodes(), parse_call)
        .into_iter()
        .find_map(|stmt| parse_call_receiver(stmt, parse_call).map(|name| (stmt, name)))
}

/// Index of the module-level statement that is `func` or decorates it
fn module_level_index(statements: &[&SyntaxNode], func: &SyntaxNode) -> Option<usize> {
    statements.iter().position(|stmt| {
        std::ptr::eq(*stmt, func)
            || (stmt.kind() == NodeKind::Decorated
                && stmt
                    .node_by_field("definition")
                    .is_some_and(|def| std::ptr::eq(def, func)))
    })
}

/// For `<target> = <receiver>.<parse_call>(...)`, the receiver's name
fn parse_call_receiver<'a>(statement: &'a SyntaxNode, parse_call: &str) -> Option<&'a str> {
    if statement.kind() != NodeKind::Expr {
        return None;
    }
    let assignment = statement
        .child_nodes()
        .find(|n| n.kind() == NodeKind::Assign)?;
    let call = assignment
        .node_by_field("right")
        .filter(|n| n.kind() == NodeKind::Call)?;
    let function = call
        .node_by_field("function")
        .filter(|n| n.kind() == NodeKind::Attribute)?;

    if function.token_by_field("attribute")?.text != parse_call {
        return None;
    }
    function
        .token_by_field("object")
        .filter(|t| t.kind == "identifier")
        .map(|t| t.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_python;

    fn resolve(source: &str) -> Result<Boundary> {
        let tree = parse_python(source).unwrap();
        let line_count = source.split_inclusive('\n').count();
        resolve_boundary(&tree, line_count, &ExtractorConfig::default())
    }

    const DEMO: &str = "\
import argutil
def main():
    p = argutil.Builder(desc=\"demo\")
    p.add_argument('--x')
    args = p.parse_args()
    print(args.x)
if __name__ == '__main__':
    main()
";

    #[test]
    fn test_demo_script() {
        let boundary = resolve(DEMO).unwrap();
        assert_eq!(
            boundary,
            Boundary {
                cutoff_line: 5,
                restart_line: 6,
                column_offset: 4,
                target_name: "p".to_string(),
                entry_point: "main".to_string(),
            }
        );
    }

    #[test]
    fn test_main_is_last_statement() {
        let source = "\
import argparse

def main():
    parser = argparse.ArgumentParser()
    args = parser.parse_args()
    run(args)

    done()
";
        let boundary = resolve(source).unwrap();
        assert_eq!(boundary.cutoff_line, 5);
        assert_eq!(boundary.restart_line, 8);
        assert_eq!(boundary.target_name, "parser");
    }

    #[test]
    fn test_decorated_main_and_decorated_follower() {
        let source = "\
from gooey import Gooey
import argparse

@Gooey
def main():
    parser = argparse.ArgumentParser()
    args = parser.parse_args()
    work()

@cache
def helper():
    pass
";
        let boundary = resolve(source).unwrap();
        assert_eq!(boundary.cutoff_line, 7);
        // the follower's decorator belongs to the follower
        assert_eq!(boundary.restart_line, 9);
    }

    #[test]
    fn test_comment_after_main_is_not_a_statement() {
        let source = "\
def main():
    p = make()
    a = p.parse_args()
    go(a)
# trailing note
x = 1
";
        let boundary = resolve(source).unwrap();
        assert_eq!(boundary.restart_line, 5);
    }

    #[test]
    fn test_entry_marker_is_substring_match() {
        let source = "\
def cli_main():
    p = build()
    ns = p.parse_args()
";
        let boundary = resolve(source).unwrap();
        assert_eq!(boundary.entry_point, "cli_main");
        assert_eq!(boundary.restart_line, 3);
    }

    #[test]
    fn test_helper_containing_marker_is_skipped() {
        let source = "\
import argparse

def get_domain():
    return 'example.org'

def main():
    p = argparse.ArgumentParser()
    args = p.parse_args()
    print(args)

def remaining():
    pass
";
        let boundary = resolve(source).unwrap();
        assert_eq!(boundary.entry_point, "main");
        assert_eq!(boundary.cutoff_line, 8);
        assert_eq!(boundary.restart_line, 10);
        assert_eq!(boundary.target_name, "p");
    }

    #[test]
    fn test_no_candidate_with_parse_call_names_them_all() {
        let err = resolve("def main():\n    pass\n\ndef maintain():\n    pass\n").unwrap_err();
        match err {
            ExtractError::PatternNotFound(message) => {
                assert!(message.contains("main, maintain"), "{message}");
            }
            other => panic!("expected PatternNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_main_is_ignored() {
        let source = "\
class App:
    def main(self):
        a = self.p.parse_args()

def main():
    p = build()
    a = p.parse_args()
";
        let boundary = resolve(source).unwrap();
        assert_eq!(boundary.cutoff_line, 7);
        assert_eq!(boundary.entry_point, "main");
    }

    #[test]
    fn test_first_parse_call_wins() {
        let source = "\
def main():
    first = make()
    a = first.parse_args()
    second = make()
    b = second.parse_args()
";
        let boundary = resolve(source).unwrap();
        assert_eq!(boundary.cutoff_line, 3);
        assert_eq!(boundary.target_name, "first");
    }

    #[test]
    fn test_non_assignment_mentions_are_skipped() {
        let source = "\
def main():
    p = make()
    log('parse_args')
    opts = p.parse_args()
";
        let boundary = resolve(source).unwrap();
        assert_eq!(boundary.cutoff_line, 4);
    }

    #[test]
    fn test_missing_main_is_pattern_not_found() {
        let err = resolve("def run():\n    a = p.parse_args()\n").unwrap_err();
        assert!(matches!(err, ExtractError::PatternNotFound(_)));
    }

    #[test]
    fn test_missing_parse_call_is_pattern_not_found() {
        let err = resolve("def main():\n    p = make()\n    p.parse_args()\n").unwrap_err();
        assert!(matches!(err, ExtractError::PatternNotFound(_)));
    }

    #[test]
    fn test_complex_receiver_is_not_a_target() {
        let err = resolve("def main():\n    a = self.p.parse_args()\n").unwrap_err();
        assert!(matches!(err, ExtractError::PatternNotFound(_)));
    }
}
