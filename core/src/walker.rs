//! Definition walking and metadata extraction.
//!
//! A single depth-first pass over the statement tree collects one
//! [`Function`] record per function-like definition, classifying each as a
//! top-level function, nested function, or class method from an explicit
//! stack of enclosing definitions. A second, scoped pass per function
//! inspects its return statements.

use std::collections::HashSet;

use crate::comments;
use crate::error::{Error, Result};
use crate::nodes::{Expr, FunctionNode, ParameterKind, ParameterNode, Position, Stmt};
use crate::source::SourceIndex;

/// Reserved name of the synthetic return slot.
pub const RETURN_SLOT: &str = "return";

/// Visibility category derived from leading/trailing underscores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameCategory {
    Public,
    Protected,
    Private,
    Special,
}

/// Built-in method decorator recognized on class methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodDecorator {
    Classmethod,
    Staticmethod,
    Property,
}

/// One formal parameter, or the synthetic return slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    pub position: Position,
    pub kind: ParameterKind,
    pub has_inline_annotation: bool,
    pub has_comment_annotation: bool,
    /// Annotated, but with the configured dynamic marker (`Any` by default).
    pub is_dynamically_typed: bool,
}

impl Argument {
    pub fn has_any_annotation(&self) -> bool {
        self.has_inline_annotation || self.has_comment_annotation
    }

    fn new(name: String, position: Position, kind: ParameterKind) -> Self {
        Self {
            name,
            position,
            kind,
            has_inline_annotation: false,
            has_comment_annotation: false,
            is_dynamically_typed: false,
        }
    }

    fn from_parameter(param: &ParameterNode, dynamic_marker: &str) -> Self {
        let mut arg = Self::new(param.name.clone(), param.position, param.kind);
        if let Some(annotation) = &param.annotation {
            arg.has_inline_annotation = true;
            if is_dynamic_annotation(annotation, dynamic_marker) {
                arg.is_dynamically_typed = true;
            }
        }
        if let Some(comment) = &param.type_comment {
            arg.has_comment_annotation = true;
            if comments::hint_is_dynamic(comment, dynamic_marker) {
                arg.is_dynamically_typed = true;
            }
        }
        arg
    }
}

/// Only a bare name or a dotted attribute whose final segment equals the
/// marker counts; subscripted forms are a documented non-match.
fn is_dynamic_annotation(expr: &Expr, dynamic_marker: &str) -> bool {
    expr.trailing_name() == Some(dynamic_marker)
}

/// One function, coroutine, or method definition with its metadata.
///
/// Methods are not distinguished from functions outside class-specific
/// checks; `args` always ends with the synthetic return slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub position: Position,
    pub name_category: NameCategory,
    pub is_class_method: bool,
    pub is_nested: bool,
    /// Only meaningful when `is_class_method` is set.
    pub method_decorator: Option<MethodDecorator>,
    pub decorators: Vec<Expr>,
    pub has_type_comment: bool,
    pub has_only_none_returns: bool,
    pub args: Vec<Argument>,
}

impl Function {
    pub fn is_fully_annotated(&self) -> bool {
        self.args.iter().all(Argument::has_any_annotation)
    }

    /// Dynamically typed here means completely lacking hints.
    pub fn is_dynamically_typed(&self) -> bool {
        !self.args.iter().any(Argument::has_any_annotation)
    }

    pub fn missing_annotations(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|arg| !arg.has_any_annotation())
    }

    pub fn annotated_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.args.iter().filter(|arg| arg.has_any_annotation())
    }

    /// Textual decorator match against a configured name set. Attribute
    /// decorators match on their final segment only; deeper resolution is
    /// out of scope.
    pub fn has_decorator(&self, names: &HashSet<String>) -> bool {
        self.decorators
            .iter()
            .any(|decorator| decorator_matches(decorator, names))
    }

    fn from_node(
        node: &FunctionNode,
        index: &SourceIndex,
        is_class_method: bool,
        is_nested: bool,
        dynamic_marker: &str,
    ) -> Result<Self> {
        let mut args: Vec<Argument> = node
            .parameters
            .iter()
            .map(|param| Argument::from_parameter(param, dynamic_marker))
            .collect();

        let colon = locate_def_colon(node, index)?;
        let mut return_arg = Argument::new(RETURN_SLOT.to_owned(), colon, ParameterKind::Return);
        if let Some(returns) = &node.returns {
            return_arg.has_inline_annotation = true;
            if is_dynamic_annotation(returns, dynamic_marker) {
                return_arg.is_dynamically_typed = true;
            }
        }
        args.push(return_arg);

        let mut function = Function {
            name: node.name.clone(),
            position: node.position,
            name_category: categorize_name(&node.name),
            is_class_method,
            is_nested,
            method_decorator: if is_class_method {
                method_decorator_kind(&node.decorators)
            } else {
                None
            },
            decorators: node.decorators.clone(),
            has_type_comment: node.type_comment.is_some(),
            has_only_none_returns: !has_non_none_return(&node.body),
            args,
        };

        if let Some(comment) = &node.type_comment {
            comments::reconcile(&mut function, comment, dynamic_marker);
        }

        Ok(function)
    }
}

/// Priority order: special beats private beats protected.
fn categorize_name(name: &str) -> NameCategory {
    if name.starts_with("__") && name.ends_with("__") {
        NameCategory::Special
    } else if name.starts_with("__") {
        NameCategory::Private
    } else if name.starts_with('_') {
        NameCategory::Protected
    } else {
        NameCategory::Public
    }
}

/// Scan the decorator list for the built-in method decorators. Properties
/// also surface as `.setter`/`.getter`/`.deleter` attribute accesses;
/// call-wrapped decorators are not method decorators and are ignored.
fn method_decorator_kind(decorators: &[Expr]) -> Option<MethodDecorator> {
    for decorator in decorators {
        match decorator {
            Expr::Name(id) => match id.as_str() {
                "classmethod" => return Some(MethodDecorator::Classmethod),
                "staticmethod" => return Some(MethodDecorator::Staticmethod),
                "property" => return Some(MethodDecorator::Property),
                _ => {}
            },
            Expr::Attribute { attr, .. }
                if matches!(attr.as_str(), "setter" | "getter" | "deleter") =>
            {
                return Some(MethodDecorator::Property)
            }
            _ => {}
        }
    }
    None
}

fn decorator_matches(decorator: &Expr, names: &HashSet<String>) -> bool {
    match decorator {
        Expr::Name(id) => names.contains(id),
        Expr::Attribute { attr, .. } => names.contains(attr),
        Expr::Call(inner) => decorator_matches(inner, names),
        Expr::NoneLiteral | Expr::Other => false,
    }
}

/// Locate the colon closing the parameter list.
///
/// Single-line definitions scan between the `def` keyword and the first
/// body statement. Multi-line definitions start one line above the first
/// body statement and rewind until a colon-bearing line turns up, which
/// absorbs the placement differences between parser generations for
/// multi-line docstrings. The rightmost colon on the line wins so that
/// annotations containing colons do not mislead the scan.
fn locate_def_colon(node: &FunctionNode, index: &SourceIndex) -> Result<Position> {
    let first = node
        .body
        .first()
        .ok_or_else(|| Error::EmptyBody(node.name.clone()))?
        .position();

    if node.position.line == first.line {
        let line = index.line(node.position.line)?;
        let window = line
            .get(node.position.column..first.column)
            .ok_or_else(|| Error::ColonNotFound(node.name.clone()))?;
        let column = window
            .rfind(':')
            .map(|offset| node.position.column + offset)
            .ok_or_else(|| Error::ColonNotFound(node.name.clone()))?;
        return Ok(Position {
            line: node.position.line,
            column,
        });
    }

    let mut line_no = first.line - 1;
    loop {
        let line = index.line(line_no)?;
        if let Some(column) = line.rfind(':') {
            return Ok(Position {
                line: line_no,
                column,
            });
        }
        if line_no <= node.position.line {
            return Err(Error::ColonNotFound(node.name.clone()));
        }
        line_no -= 1;
    }
}

/// Scoped return-path check: true when some return in the function's own
/// statement tree carries a value other than a literal `None`. Nested
/// definitions keep their returns to themselves.
fn has_non_none_return(stmts: &[Stmt]) -> bool {
    stmts.iter().any(|stmt| match stmt {
        Stmt::Return { value, .. } => {
            !matches!(value, None | Some(Expr::NoneLiteral))
        }
        Stmt::FunctionDef(_) | Stmt::ClassDef(_) => false,
        Stmt::Other { children, .. } => has_non_none_return(children),
    })
}

/// Nearest enclosing definition kind on the context stack.
#[derive(Debug, Clone, Copy)]
enum Context {
    Class,
    Function,
}

/// Single-pass walker producing `Function` records in pre-order.
pub struct FunctionVisitor<'a> {
    index: &'a SourceIndex,
    dynamic_marker: &'a str,
    functions: Vec<Function>,
    context: Vec<Context>,
}

impl<'a> FunctionVisitor<'a> {
    pub fn new(index: &'a SourceIndex, dynamic_marker: &'a str) -> Self {
        Self {
            index,
            dynamic_marker,
            functions: Vec::new(),
            context: Vec::new(),
        }
    }

    pub fn walk(&mut self, stmts: &[Stmt]) -> Result<()> {
        self.visit_all(stmts)
    }

    pub fn into_functions(self) -> Vec<Function> {
        self.functions
    }

    fn visit_all(&mut self, stmts: &[Stmt]) -> Result<()> {
        for stmt in stmts {
            self.visit(stmt)?;
        }
        Ok(())
    }

    fn visit(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::FunctionDef(node) => {
                let (is_class_method, is_nested) = match self.context.last() {
                    Some(Context::Class) => (true, false),
                    Some(Context::Function) => (false, true),
                    None => (false, false),
                };
                let function = Function::from_node(
                    node,
                    self.index,
                    is_class_method,
                    is_nested,
                    self.dynamic_marker,
                )?;
                self.functions.push(function);

                self.context.push(Context::Function);
                let nested = self.visit_all(&node.body);
                self.context.pop();
                nested
            }
            Stmt::ClassDef(node) => {
                self.context.push(Context::Class);
                let nested = self.visit_all(&node.body);
                self.context.pop();
                nested
            }
            // Compound statements do not change the definition context.
            Stmt::Other { children, .. } => self.visit_all(children),
            Stmt::Return { .. } => Ok(()),
        }
    }
}
