//! Pure classification of a missing annotation into a diagnostic code.
//!
//! Two priority-ordered decision tables, one for the return slot and one
//! for formal parameters. The tables are total: every combination of
//! method kind, decorator kind, argument position and parameter kind
//! resolves to exactly one code.

use crate::codes::Code;
use crate::nodes::ParameterKind;
use crate::walker::{Argument, Function, MethodDecorator, NameCategory};

/// Map one unannotated argument to its diagnostic code.
///
/// Must only be called for arguments without any annotation; annotated
/// arguments are never diagnosable.
pub fn classify(function: &Function, argument: &Argument, is_first_arg: bool) -> Code {
    if argument.kind == ParameterKind::Return {
        classify_return(function)
    } else {
        classify_argument(function, argument, is_first_arg)
    }
}

fn classify_return(function: &Function) -> Code {
    // Decorated class methods outrank the name-derived categories.
    if function.is_class_method {
        match function.method_decorator {
            Some(MethodDecorator::Classmethod) => return Code::UntypedReturnClassmethod,
            Some(MethodDecorator::Staticmethod) => return Code::UntypedReturnStaticmethod,
            Some(MethodDecorator::Property) => return Code::UntypedReturnProperty,
            None => {}
        }
    }

    match function.name_category {
        NameCategory::Special => Code::UntypedReturnSpecial,
        NameCategory::Private => Code::UntypedReturnPrivate,
        NameCategory::Protected => Code::UntypedReturnProtected,
        NameCategory::Public => Code::UntypedReturnPublic,
    }
}

fn classify_argument(function: &Function, argument: &Argument, is_first_arg: bool) -> Code {
    // The first argument of a non-staticmethod class method is the implicit
    // instance or class reference.
    if function.is_class_method && is_first_arg {
        match function.method_decorator {
            Some(MethodDecorator::Classmethod) => return Code::UntypedCls,
            Some(MethodDecorator::Property) => return Code::UntypedPropertySelf,
            Some(MethodDecorator::Staticmethod) => {}
            None => return Code::UntypedSelf,
        }
    }

    match argument.kind {
        ParameterKind::VarKeyword => Code::UntypedKwarg,
        ParameterKind::VarPositional => Code::UntypedVararg,
        // Positional-only, positional-or-keyword and keyword-only collapse
        // to the one argument code.
        _ => Code::UntypedArgument,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::Position;

    fn function(
        is_class_method: bool,
        method_decorator: Option<MethodDecorator>,
        name_category: NameCategory,
    ) -> Function {
        Function {
            name: "subject".into(),
            position: Position { line: 1, column: 0 },
            name_category,
            is_class_method,
            is_nested: false,
            method_decorator,
            decorators: Vec::new(),
            has_type_comment: false,
            has_only_none_returns: true,
            args: Vec::new(),
        }
    }

    fn argument(kind: ParameterKind) -> Argument {
        Argument {
            name: "arg".into(),
            position: Position { line: 1, column: 8 },
            kind,
            has_inline_annotation: false,
            has_comment_annotation: false,
            is_dynamically_typed: false,
        }
    }

    const DECORATORS: &[Option<MethodDecorator>] = &[
        None,
        Some(MethodDecorator::Classmethod),
        Some(MethodDecorator::Staticmethod),
        Some(MethodDecorator::Property),
    ];

    const CATEGORIES: &[NameCategory] = &[
        NameCategory::Public,
        NameCategory::Protected,
        NameCategory::Private,
        NameCategory::Special,
    ];

    const KINDS: &[ParameterKind] = &[
        ParameterKind::PositionalOnly,
        ParameterKind::PositionalOrKeyword,
        ParameterKind::VarPositional,
        ParameterKind::KeywordOnly,
        ParameterKind::VarKeyword,
        ParameterKind::Return,
    ];

    #[test]
    fn classification_is_total_over_the_input_domain() {
        for &is_class_method in &[false, true] {
            for &decorator in DECORATORS {
                for &category in CATEGORIES {
                    for &kind in KINDS {
                        for &is_first in &[false, true] {
                            let func = function(is_class_method, decorator, category);
                            let arg = argument(kind);
                            // Every combination must resolve to one code.
                            let _ = classify(&func, &arg, is_first);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn return_table_prefers_decorators_over_name_categories() {
        let cases = [
            (
                Some(MethodDecorator::Classmethod),
                Code::UntypedReturnClassmethod,
            ),
            (
                Some(MethodDecorator::Staticmethod),
                Code::UntypedReturnStaticmethod,
            ),
            (Some(MethodDecorator::Property), Code::UntypedReturnProperty),
        ];
        for (decorator, expected) in cases {
            let func = function(true, decorator, NameCategory::Special);
            assert_eq!(
                classify(&func, &argument(ParameterKind::Return), false),
                expected
            );
        }
    }

    #[test]
    fn return_table_falls_back_to_name_categories() {
        let cases = [
            (NameCategory::Public, Code::UntypedReturnPublic),
            (NameCategory::Protected, Code::UntypedReturnProtected),
            (NameCategory::Private, Code::UntypedReturnPrivate),
            (NameCategory::Special, Code::UntypedReturnSpecial),
        ];
        for (category, expected) in cases {
            let func = function(false, None, category);
            assert_eq!(
                classify(&func, &argument(ParameterKind::Return), false),
                expected
            );
            // An undecorated method also resolves by name.
            let method = function(true, None, category);
            assert_eq!(
                classify(&method, &argument(ParameterKind::Return), false),
                expected
            );
        }
    }

    #[test]
    fn first_argument_of_methods_maps_to_the_implicit_slot() {
        let plain = function(true, None, NameCategory::Public);
        assert_eq!(
            classify(&plain, &argument(ParameterKind::PositionalOrKeyword), true),
            Code::UntypedSelf
        );
        let cm = function(true, Some(MethodDecorator::Classmethod), NameCategory::Public);
        assert_eq!(
            classify(&cm, &argument(ParameterKind::PositionalOrKeyword), true),
            Code::UntypedCls
        );
        let prop = function(true, Some(MethodDecorator::Property), NameCategory::Public);
        assert_eq!(
            classify(&prop, &argument(ParameterKind::PositionalOrKeyword), true),
            Code::UntypedPropertySelf
        );
        // Staticmethods have no implicit first argument.
        let sm = function(true, Some(MethodDecorator::Staticmethod), NameCategory::Public);
        assert_eq!(
            classify(&sm, &argument(ParameterKind::PositionalOrKeyword), true),
            Code::UntypedArgument
        );
    }

    #[test]
    fn parameter_kinds_collapse_to_three_argument_codes() {
        let func = function(false, None, NameCategory::Public);
        assert_eq!(
            classify(&func, &argument(ParameterKind::PositionalOnly), false),
            Code::UntypedArgument
        );
        assert_eq!(
            classify(&func, &argument(ParameterKind::KeywordOnly), false),
            Code::UntypedArgument
        );
        assert_eq!(
            classify(&func, &argument(ParameterKind::VarPositional), false),
            Code::UntypedVararg
        );
        assert_eq!(
            classify(&func, &argument(ParameterKind::VarKeyword), false),
            Code::UntypedKwarg
        );
    }

    #[test]
    fn non_first_method_arguments_are_ordinary_arguments() {
        let func = function(true, None, NameCategory::Public);
        assert_eq!(
            classify(&func, &argument(ParameterKind::PositionalOrKeyword), false),
            Code::UntypedArgument
        );
    }
}
