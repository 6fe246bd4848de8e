//! Legacy signature comment parsing and reconciliation.
//!
//! Before inline annotations, signatures were annotated with a comment of
//! the form `# type: (int, str) -> bool`. This module parses that
//! mini-language from the comment text (prefix already stripped by the
//! adapter) and aligns the listed types positionally against a function's
//! extracted arguments.

use crate::walker::{Function, MethodDecorator};

/// One slot in a signature comment's argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// `...` skips a position without marking it annotated.
    Placeholder,
    Hint(String),
}

/// A parsed `(t1, t2, ...) -> ret` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeComment {
    pub arg_hints: Vec<TypeHint>,
    pub return_hint: String,
}

/// Parse the comment text. Returns `None` when the text does not follow the
/// signature grammar; callers degrade gracefully in that case because the
/// legacy syntax predates strict validation.
pub fn parse_type_comment(text: &str) -> Option<TypeComment> {
    let (lhs, rhs) = split_arrow(text)?;
    let return_hint = rhs.trim();
    if return_hint.is_empty() {
        return None;
    }
    let inner = lhs.trim().strip_prefix('(')?.strip_suffix(')')?;

    let mut arg_hints = Vec::new();
    for piece in split_top_level(inner) {
        let piece = piece.trim();
        if piece.is_empty() {
            continue;
        }
        if piece == "..." {
            arg_hints.push(TypeHint::Placeholder);
        } else {
            // Star prefixes on vararg/kwarg hints carry no type information.
            arg_hints.push(TypeHint::Hint(piece.trim_start_matches('*').trim().to_owned()));
        }
    }

    Some(TypeComment {
        arg_hints,
        return_hint: return_hint.to_owned(),
    })
}

/// Split at the first `->` outside any bracket pair. The left side is the
/// parenthesized argument list, so an arrow inside a `Callable[...]` hint
/// never sits at depth zero before it.
fn split_arrow(text: &str) -> Option<(&str, &str)> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'-' if depth == 0 && bytes.get(i + 1) == Some(&b'>') => {
                return Some((&text[..i], &text[i + 2..]));
            }
            _ => {}
        }
    }
    None
}

/// Split on commas at bracket depth zero.
fn split_top_level(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for i in 0..bytes.len() {
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// True when a comment hint names the dynamic marker, either bare or as the
/// final segment of a dotted path. Subscripted hints never match.
pub fn hint_is_dynamic(hint: &str, dynamic_marker: &str) -> bool {
    let hint = hint.trim();
    hint == dynamic_marker
        || hint
            .strip_suffix(dynamic_marker)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Align a signature comment against the function's arguments, flipping the
/// comment-annotation flags on matched positions.
///
/// Comments conventionally omit the implicit first parameter of methods, so
/// a placeholder is prepended when the hint list is shorter than the formal
/// parameter list on a non-staticmethod class method. Arity disagreement in
/// the other direction truncates silently; partial information still beats
/// none. The comment grammar cannot omit a return type, so the return slot
/// is always marked.
pub fn reconcile(function: &mut Function, comment: &str, dynamic_marker: &str) {
    let Some(mut parsed) = parse_type_comment(comment) else {
        return;
    };

    // `args` ends with the return slot, so this is the formal-parameter count.
    let formal_count = function.args.len().saturating_sub(1);
    if function.is_class_method
        && function.method_decorator != Some(MethodDecorator::Staticmethod)
        && parsed.arg_hints.len() < formal_count
    {
        parsed.arg_hints.insert(0, TypeHint::Placeholder);
    }

    for (arg, hint) in function.args[..formal_count]
        .iter_mut()
        .zip(parsed.arg_hints.iter())
    {
        match hint {
            TypeHint::Placeholder => {}
            TypeHint::Hint(text) => {
                arg.has_comment_annotation = true;
                if hint_is_dynamic(text, dynamic_marker) {
                    arg.is_dynamically_typed = true;
                }
            }
        }
    }

    if let Some(return_arg) = function.args.last_mut() {
        return_arg.has_comment_annotation = true;
        if hint_is_dynamic(&parsed.return_hint, dynamic_marker) {
            return_arg.is_dynamically_typed = true;
        }
    }
}
