//! Adapter from the tree-sitter Python grammar to the node-shape contract.
//!
//! The engine itself only sees `nodes::Stmt`; this module owns every
//! grammar-specific detail: parameter-kind recovery from `/` and `*`
//! separators, decorated definitions, and the recovery of legacy `# type:`
//! comments from the raw source lines (tree-sitter keeps comments in the
//! tree as extras, but line scanning matches the historical tokenizer
//! behavior the comment syntax was designed around).

use once_cell::sync::Lazy;
use regex::Regex;
use tree_sitter::{Node, Parser};

use crate::error::{Error, Result};
use crate::nodes::{ClassNode, Expr, FunctionNode, ParameterKind, ParameterNode, Position, Stmt};
use crate::source::SourceIndex;

static TYPE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\s*type:\s*(.+?)\s*$").expect("static regex"));

/// Parse a Python module into the node contract.
///
/// The index must be built from the same source text; it is used to recover
/// type comments by line.
pub fn parse_module(source: &str, index: &SourceIndex) -> Result<Vec<Stmt>> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|_| Error::Parse)?;
    let tree = parser.parse(source, None).ok_or(Error::Parse)?;

    let ctx = Ctx {
        src: source.as_bytes(),
        index,
    };
    Ok(collect_stmts(tree.root_node(), &ctx))
}

struct Ctx<'a> {
    src: &'a [u8],
    index: &'a SourceIndex,
}

fn node_text(node: Node, src: &[u8]) -> String {
    node.utf8_text(src).unwrap_or_default().to_owned()
}

fn node_position(node: Node) -> Position {
    let point = node.start_position();
    Position {
        line: point.row + 1,
        column: point.column,
    }
}

fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement")
        || matches!(
            kind,
            "function_definition" | "decorated_definition" | "class_definition"
        )
}

/// Pull the statements out of `node`, flattening through blocks and clauses
/// so compound statements surface their nested bodies.
fn collect_stmts(node: Node, ctx: &Ctx) -> Vec<Stmt> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if is_statement_kind(child.kind()) {
            out.push(convert_stmt(child, ctx));
        } else {
            out.extend(collect_stmts(child, ctx));
        }
    }
    out
}

fn convert_stmt(node: Node, ctx: &Ctx) -> Stmt {
    match node.kind() {
        "function_definition" => Stmt::FunctionDef(convert_function(node, Vec::new(), ctx)),
        "class_definition" => Stmt::ClassDef(convert_class(node, ctx)),
        "decorated_definition" => convert_decorated(node, ctx),
        "return_statement" => Stmt::Return {
            position: node_position(node),
            value: node.named_child(0).map(|value| convert_expr(value, ctx.src)),
        },
        _ => Stmt::Other {
            position: node_position(node),
            children: collect_stmts(node, ctx),
        },
    }
}

fn convert_decorated(node: Node, ctx: &Ctx) -> Stmt {
    let mut decorators = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "decorator" {
            if let Some(expr) = child.named_child(0) {
                decorators.push(convert_expr(expr, ctx.src));
            }
        }
    }
    match node.child_by_field_name("definition") {
        Some(def) if def.kind() == "class_definition" => Stmt::ClassDef(convert_class(def, ctx)),
        Some(def) if def.kind() == "function_definition" => {
            Stmt::FunctionDef(convert_function(def, decorators, ctx))
        }
        _ => Stmt::Other {
            position: node_position(node),
            children: collect_stmts(node, ctx),
        },
    }
}

fn convert_class(node: Node, ctx: &Ctx) -> ClassNode {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, ctx.src))
        .unwrap_or_default();
    let body = node
        .child_by_field_name("body")
        .map(|body| collect_stmts(body, ctx))
        .unwrap_or_default();
    ClassNode {
        name,
        position: node_position(node),
        body,
    }
}

fn convert_function(node: Node, decorators: Vec<Expr>, ctx: &Ctx) -> FunctionNode {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, ctx.src))
        .unwrap_or_default();
    let position = node_position(node);
    let mut parameters = node
        .child_by_field_name("parameters")
        .map(|params| convert_parameters(params, ctx))
        .unwrap_or_default();
    let returns = node
        .child_by_field_name("return_type")
        .map(|ret| convert_expr(ret, ctx.src));
    let body = node
        .child_by_field_name("body")
        .map(|body| collect_stmts(body, ctx))
        .unwrap_or_default();

    let type_comment = signature_type_comment(position, body.first().map(Stmt::position), ctx);
    attach_parameter_comments(&mut parameters, ctx);

    FunctionNode {
        name,
        position,
        parameters,
        returns,
        type_comment,
        decorators,
        body,
    }
}

fn convert_parameters(params: Node, ctx: &Ctx) -> Vec<ParameterNode> {
    let mut out: Vec<ParameterNode> = Vec::new();
    let mut keyword_only = false;
    let mut cursor = params.walk();
    for child in params.named_children(&mut cursor) {
        match child.kind() {
            "identifier" => out.push(plain_parameter(child, None, keyword_only, ctx)),
            "default_parameter" | "typed_default_parameter" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                if name.kind() != "identifier" {
                    continue;
                }
                let annotation = child.child_by_field_name("type");
                out.push(plain_parameter(name, annotation, keyword_only, ctx));
            }
            "typed_parameter" => {
                let annotation = child.child_by_field_name("type");
                let Some(inner) = child.named_child(0) else {
                    continue;
                };
                match inner.kind() {
                    "identifier" => out.push(plain_parameter(inner, annotation, keyword_only, ctx)),
                    "list_splat_pattern" => {
                        out.push(splat_parameter(
                            inner,
                            annotation,
                            ParameterKind::VarPositional,
                            ctx,
                        ));
                        keyword_only = true;
                    }
                    "dictionary_splat_pattern" => out.push(splat_parameter(
                        inner,
                        annotation,
                        ParameterKind::VarKeyword,
                        ctx,
                    )),
                    _ => {}
                }
            }
            "list_splat_pattern" => {
                out.push(splat_parameter(
                    child,
                    None,
                    ParameterKind::VarPositional,
                    ctx,
                ));
                keyword_only = true;
            }
            "dictionary_splat_pattern" => {
                out.push(splat_parameter(child, None, ParameterKind::VarKeyword, ctx))
            }
            "positional_separator" => {
                // Everything declared before a `/` is positional-only.
                for param in out.iter_mut() {
                    if param.kind == ParameterKind::PositionalOrKeyword {
                        param.kind = ParameterKind::PositionalOnly;
                    }
                }
            }
            "keyword_separator" => keyword_only = true,
            _ => {}
        }
    }
    out
}

fn plain_parameter(
    name: Node,
    annotation: Option<Node>,
    keyword_only: bool,
    ctx: &Ctx,
) -> ParameterNode {
    let kind = if keyword_only {
        ParameterKind::KeywordOnly
    } else {
        ParameterKind::PositionalOrKeyword
    };
    ParameterNode {
        name: node_text(name, ctx.src),
        position: node_position(name),
        kind,
        annotation: annotation.map(|a| convert_expr(a, ctx.src)),
        type_comment: None,
    }
}

fn splat_parameter(
    pattern: Node,
    annotation: Option<Node>,
    kind: ParameterKind,
    ctx: &Ctx,
) -> ParameterNode {
    // The pattern wraps the bare name; positions follow the name, as the
    // reference AST does, not the star tokens.
    let name_node = pattern.named_child(0).unwrap_or(pattern);
    ParameterNode {
        name: node_text(name_node, ctx.src),
        position: node_position(name_node),
        kind,
        annotation: annotation.map(|a| convert_expr(a, ctx.src)),
        type_comment: None,
    }
}

fn convert_expr(node: Node, src: &[u8]) -> Expr {
    match node.kind() {
        "identifier" => Expr::Name(node_text(node, src)),
        "attribute" => {
            let object = node
                .child_by_field_name("object")
                .map(|obj| node_text(obj, src))
                .unwrap_or_default();
            let attr = node
                .child_by_field_name("attribute")
                .map(|attr| node_text(attr, src))
                .unwrap_or_default();
            Expr::Attribute { object, attr }
        }
        "call" => {
            let func = node
                .child_by_field_name("function")
                .map(|func| convert_expr(func, src))
                .unwrap_or(Expr::Other);
            Expr::Call(Box::new(func))
        }
        "none" => Expr::NoneLiteral,
        // Annotations and return types arrive wrapped in a `type` node.
        "type" => node
            .named_child(0)
            .map(|inner| convert_expr(inner, src))
            .unwrap_or(Expr::Other),
        "parenthesized_expression" => node
            .named_child(0)
            .map(|inner| convert_expr(inner, src))
            .unwrap_or(Expr::Other),
        _ => Expr::Other,
    }
}

/// A signature-level type comment carries an arrow; `# type: ignore` and
/// per-parameter hints never do.
fn comment_candidate(line: &str) -> Option<&str> {
    let captures = TYPE_COMMENT_RE.captures(line)?;
    let text = captures.get(1)?.as_str();
    if text.starts_with("ignore") {
        return None;
    }
    Some(text)
}

fn signature_type_comment(
    def_position: Position,
    first_stmt: Option<Position>,
    ctx: &Ctx,
) -> Option<String> {
    let first_line = first_stmt.map(|p| p.line).unwrap_or(def_position.line);
    // Scan the signature lines and any comment-only lines above the first
    // body statement; on a single-line def only the def line itself applies.
    let last_line = if first_line > def_position.line {
        first_line - 1
    } else {
        def_position.line
    };
    for line_no in def_position.line..=last_line {
        let Ok(line) = ctx.index.line(line_no) else {
            break;
        };
        if let Some(text) = comment_candidate(line) {
            if text.contains("->") {
                return Some(text.to_owned());
            }
        }
    }
    None
}

fn attach_parameter_comments(parameters: &mut [ParameterNode], ctx: &Ctx) {
    // One type-commented parameter per line, hint attached to the last
    // parameter declared on that line.
    for i in 0..parameters.len() {
        let line_no = parameters[i].position.line;
        let last_on_line = parameters
            .iter()
            .rposition(|p| p.position.line == line_no)
            .unwrap_or(i);
        if last_on_line != i {
            continue;
        }
        let Ok(line) = ctx.index.line(line_no) else {
            continue;
        };
        if let Some(text) = comment_candidate(line) {
            if !text.contains("->") {
                parameters[i].type_comment = Some(text.to_owned());
            }
        }
    }
}
