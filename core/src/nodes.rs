//! The node-shape contract the analysis engine consumes.
//!
//! The walker never touches a concrete parse tree; it works over this closed
//! statement/expression alphabet. Any parser backend that can produce these
//! shapes (see `parse` for the tree-sitter adapter) can drive the engine.

use serde::{Deserialize, Serialize};

/// 1-based line and 0-based column, matching Python's AST convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Where a formal parameter sits in the signature grammar.
///
/// `Return` tags the synthetic slot appended for the return annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
    Return,
}

/// Expression shapes the engine actually inspects.
///
/// Annotations, decorators and return values are only ever matched
/// textually, so everything beyond names, attribute accesses and call
/// wrappers collapses to `Other`. Subscripts land in `Other` on purpose:
/// a parameterized use of the dynamic marker is not a dynamic annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Name(String),
    Attribute { object: String, attr: String },
    Call(Box<Expr>),
    NoneLiteral,
    Other,
}

impl Expr {
    /// The trailing identifier of a name or dotted reference, looking
    /// through call wrapping: `Any`, `typing.Any` and `deco()` all resolve
    /// to their final name segment.
    pub fn trailing_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            Expr::Attribute { attr, .. } => Some(attr),
            Expr::Call(inner) => inner.trailing_name(),
            Expr::NoneLiteral | Expr::Other => None,
        }
    }
}

/// One formal parameter as the parser delivered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterNode {
    pub name: String,
    pub position: Position,
    pub kind: ParameterKind,
    pub annotation: Option<Expr>,
    /// Trailing per-parameter `# type:` comment from this parameter's line.
    pub type_comment: Option<String>,
}

/// A function or coroutine definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNode {
    pub name: String,
    /// Position of the `def` keyword, not of any decorator above it.
    pub position: Position,
    /// Declaration-ordered, kind-tagged parameter list.
    pub parameters: Vec<ParameterNode>,
    pub returns: Option<Expr>,
    /// Signature-level `# type: (...) -> ...` comment, prefix stripped.
    pub type_comment: Option<String>,
    pub decorators: Vec<Expr>,
    pub body: Vec<Stmt>,
}

/// A class definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    pub name: String,
    pub position: Position,
    pub body: Vec<Stmt>,
}

/// Closed statement alphabet consumed by the walkers.
///
/// `Other` keeps the nested statements of compound constructs (`if`,
/// `while`, `try`, ...) so the return-path walk can see through them
/// without the contract having to enumerate every statement kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    FunctionDef(FunctionNode),
    ClassDef(ClassNode),
    Return {
        position: Position,
        value: Option<Expr>,
    },
    Other {
        position: Position,
        children: Vec<Stmt>,
    },
}

impl Stmt {
    pub fn position(&self) -> Position {
        match self {
            Stmt::FunctionDef(node) => node.position,
            Stmt::ClassDef(node) => node.position,
            Stmt::Return { position, .. } => *position,
            Stmt::Other { position, .. } => *position,
        }
    }
}
