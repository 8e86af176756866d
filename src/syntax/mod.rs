//! Python syntax model
//!
//! tree-sitter gives us a concrete syntax tree full of punctuation and
//! keyword tokens. The rest of the crate works on a smaller owned model:
//! a closed set of node kinds, named children only, and leaf tokens that
//! carry their source text. Positions follow Python's `ast` convention
//! (1-indexed lines, 0-indexed byte columns) so boundaries line up with
//! what the client's own interpreter would report.
//!
//! - walker.rs: depth-first pre-order traversal
//! - finder.rs: kind and token queries built on the walker

pub mod finder;
pub mod walker;

use crate::error::{ExtractError, Result};
use tree_sitter::{Node, Parser, Point, TreeCursor};

pub use finder::{find_by_kind, find_containing};
pub use walker::{walk, Visit, Walk};

/// Node kinds the extraction pipeline cares about
///
/// Everything else keeps its tree-sitter kind name in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    Import,
    ImportFrom,
    FunctionDef,
    ClassDef,
    Decorated,
    Decorator,
    Block,
    Expr,
    Assign,
    AugAssign,
    Call,
    Attribute,
    Arguments,
    Keyword,
    Return,
    If,
    Error,
    Other(&'static str),
}

impl NodeKind {
    pub fn from_ts_kind(kind: &'static str) -> Self {
        match kind {
            "module" => NodeKind::Module,
            "import_statement" => NodeKind::Import,
            "import_from_statement" => NodeKind::ImportFrom,
            "function_definition" => NodeKind::FunctionDef,
            "class_definition" => NodeKind::ClassDef,
            "decorated_definition" => NodeKind::Decorated,
            "decorator" => NodeKind::Decorator,
            "block" => NodeKind::Block,
            "expression_statement" => NodeKind::Expr,
            "assignment" => NodeKind::Assign,
            "augmented_assignment" => NodeKind::AugAssign,
            "call" => NodeKind::Call,
            "attribute" => NodeKind::Attribute,
            "argument_list" => NodeKind::Arguments,
            "keyword_argument" => NodeKind::Keyword,
            "return_statement" => NodeKind::Return,
            "if_statement" => NodeKind::If,
            "ERROR" => NodeKind::Error,
            other => NodeKind::Other(other),
        }
    }

    /// The tree-sitter-python kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Module => "module",
            NodeKind::Import => "import_statement",
            NodeKind::ImportFrom => "import_from_statement",
            NodeKind::FunctionDef => "function_definition",
            NodeKind::ClassDef => "class_definition",
            NodeKind::Decorated => "decorated_definition",
            NodeKind::Decorator => "decorator",
            NodeKind::Block => "block",
            NodeKind::Expr => "expression_statement",
            NodeKind::Assign => "assignment",
            NodeKind::AugAssign => "augmented_assignment",
            NodeKind::Call => "call",
            NodeKind::Attribute => "attribute",
            NodeKind::Arguments => "argument_list",
            NodeKind::Keyword => "keyword_argument",
            NodeKind::Return => "return_statement",
            NodeKind::If => "if_statement",
            NodeKind::Error => "ERROR",
            NodeKind::Other(kind) => kind,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source position: 1-indexed line, 0-indexed byte column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Position {
            line: point.row + 1,
            column: point.column,
        }
    }
}

/// A leaf value: identifier, attribute name, literal content, comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: &'static str,
    pub text: String,
    pub position: Position,
    pub field: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(SyntaxNode),
    Leaf(Token),
}

impl Child {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Child::Node(node) => node.field,
            Child::Leaf(token) => token.field,
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            Child::Node(node) => Some(node),
            Child::Leaf(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Child::Leaf(token) => Some(token),
            Child::Node(_) => None,
        }
    }
}

/// An interior node of the syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    kind: NodeKind,
    position: Position,
    end: Position,
    start_byte: usize,
    end_byte: usize,
    field: Option<&'static str>,
    children: Vec<Child>,
}

impl SyntaxNode {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Position of the node's first token
    pub fn position(&self) -> Position {
        self.position
    }

    /// Position just past the node's last token
    pub fn end(&self) -> Position {
        self.end
    }

    /// This node's text within the document it was parsed from
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start_byte..self.end_byte).unwrap_or_default()
    }

    /// Field name this node occupies in its parent, if any
    pub fn field(&self) -> Option<&'static str> {
        self.field
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Interior children only, in order
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(Child::as_node)
    }

    pub fn child_by_field(&self, name: &str) -> Option<&Child> {
        self.children.iter().find(|c| c.field() == Some(name))
    }

    pub fn node_by_field(&self, name: &str) -> Option<&SyntaxNode> {
        self.child_by_field(name).and_then(Child::as_node)
    }

    pub fn token_by_field(&self, name: &str) -> Option<&Token> {
        self.child_by_field(name).and_then(Child::as_token)
    }
}

/// Owned syntax tree for one Python document
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Module-level statements in document order (comments excluded)
    pub fn statements(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.root.child_nodes()
    }
}

/// Parse Python source into a `SyntaxTree`
///
/// tree-sitter always produces a tree; any ERROR or MISSING node is reported
/// as a `ParseFailure` at the first offending position. The grammar's scanner
/// tolerates stray indentation, so statement columns are checked afterwards.
pub fn parse_python(source: &str) -> Result<SyntaxTree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| ExtractError::ParseFailure {
            line: 0,
            column: 0,
            message: format!("failed to load python grammar: {e}"),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ExtractError::ParseFailure {
            line: 0,
            column: 0,
            message: "parser returned no tree".to_string(),
        })?;

    let root = tree.root_node();
    if let Some(bad) = first_error(root) {
        let position = Position::from(bad.start_position());
        let message = if bad.is_missing() {
            format!("missing {}", bad.kind())
        } else {
            "invalid syntax".to_string()
        };
        return Err(ExtractError::ParseFailure {
            line: position.line,
            column: position.column,
            message,
        });
    }

    let mut cursor = root.walk();
    let root = build_node(&mut cursor, source.as_bytes());
    check_indentation(&root, source)?;
    Ok(SyntaxTree { root })
}

/// Every statement that starts its own line must line up with its siblings
///
/// Module-level statements sit at column 0. Statements sharing a line
/// (`a = 1; b = 2`, `if x: pass`) are exempt.
fn check_indentation(root: &SyntaxNode, source: &str) -> Result<()> {
    let lines: Vec<&str> = source.lines().collect();
    let blocks = find_by_kind([root], NodeKind::Block);

    let misaligned = std::iter::once((root, Some(0)))
        .chain(blocks.into_iter().map(|block| (block, None)))
        .find_map(|(parent, expected)| misaligned_statement(parent, expected, &lines));

    match misaligned {
        None => Ok(()),
        Some((stmt, expected)) => {
            let Position { line, column } = stmt.position();
            let message = if column > expected {
                "unexpected indent"
            } else {
                "unindent does not match any outer indentation level"
            };
            Err(ExtractError::ParseFailure {
                line,
                column,
                message: message.to_string(),
            })
        }
    }
}

/// First child statement of `parent` off the column set by the first one
/// (or by `expected`), with the column it should have started at
fn misaligned_statement<'a>(
    parent: &'a SyntaxNode,
    mut expected: Option<usize>,
    lines: &[&str],
) -> Option<(&'a SyntaxNode, usize)> {
    let mut previous_end = None;
    for stmt in parent.child_nodes() {
        let Position { line, column } = stmt.position();
        let shares_line = previous_end == Some(line);
        previous_end = Some(stmt.end().line);

        let starts_line = lines
            .get(line - 1)
            .is_some_and(|text| indent_width(text) == column);
        if shares_line || !starts_line {
            continue;
        }
        match expected {
            None => expected = Some(column),
            Some(want) if want != column => return Some((stmt, want)),
            Some(_) => {}
        }
    }
    None
}

fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t', '\x0c']).len()
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

/// Convert the node under `cursor`, keeping named children only
fn build_node(cursor: &mut TreeCursor, source: &[u8]) -> SyntaxNode {
    let node = cursor.node();
    let field = cursor.field_name();
    let mut children = Vec::new();

    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            if child.is_named() {
                if child.child_count() == 0 {
                    children.push(Child::Leaf(Token {
                        kind: child.kind(),
                        text: child.utf8_text(source).unwrap_or_default().to_string(),
                        position: child.start_position().into(),
                        field: cursor.field_name(),
                    }));
                } else {
                    children.push(Child::Node(build_node(cursor, source)));
                }
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    SyntaxNode {
        kind: NodeKind::from_ts_kind(node.kind()),
        position: node.start_position().into(),
        end: node.end_position().into(),
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        field,
        children,
    }
}
