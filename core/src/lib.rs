//! Core analysis engine for linting missing type annotations in Python
//! function signatures. Walks every function-like definition in a parsed
//! module and reports unannotated parameters and return values against a
//! fixed catalog of diagnostic codes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub mod classify;
pub mod codes;
pub mod comments;
pub mod error;
pub mod nodes;
pub mod parse;
pub mod source;
pub mod walker;

pub use codes::Code;
pub use error::{Error, Result};
pub use nodes::{ParameterKind, Position, Stmt};
pub use source::SourceIndex;
pub use walker::{Argument, Function, FunctionVisitor, MethodDecorator, NameCategory};

use nodes::ParameterKind as Kind;

/// Checker behavior switches. All default to the strictest useful setting;
/// the opinionated dynamic-typing warning is opt-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Skip return diagnostics for functions whose returns are all bare or
    /// literal `None` (including functions with no return at all).
    pub suppress_none_returning: bool,
    /// Skip diagnostics for parameters named in `dummy_arg_names`.
    pub suppress_dummy_args: bool,
    /// Skip functions that carry no annotations at all.
    pub allow_untyped_defs: bool,
    /// Skip nested functions that carry no annotations at all.
    pub allow_untyped_nested: bool,
    /// Allow `__init__` to omit its return annotation when at least one
    /// argument is annotated.
    pub mypy_init_return: bool,
    /// Exempt `*args`/`**kwargs` from the dynamic-typing warning.
    pub allow_star_arg_any: bool,
    /// Emit ANN401 for arguments annotated with the dynamic marker.
    pub warn_dynamic_typing: bool,
    /// Emit ANN301 when inline annotations and type comments are mixed.
    pub warn_mixed_styles: bool,
    /// Parameter names treated as intentionally unannotated.
    pub dummy_arg_names: Vec<String>,
    /// The "any type" escape-hatch identifier matched textually.
    pub dynamic_marker: String,
    /// Decorators marking dispatch stubs whose signatures stay unchecked.
    pub dispatch_decorators: Vec<String>,
    /// Decorators marking typing overloads.
    pub overload_decorators: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            suppress_none_returning: false,
            suppress_dummy_args: false,
            allow_untyped_defs: false,
            allow_untyped_nested: false,
            mypy_init_return: false,
            allow_star_arg_any: false,
            warn_dynamic_typing: false,
            warn_mixed_styles: true,
            dummy_arg_names: vec!["_".into()],
            dynamic_marker: "Any".into(),
            dispatch_decorators: vec!["singledispatch".into(), "singledispatchmethod".into()],
            overload_decorators: vec!["overload".into()],
        }
    }
}

/// One finding, positioned with a 1-based line and 0-based column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: Code,
    /// The argument or function name the message refers to.
    pub subject: String,
    pub position: Position,
    pub message: String,
}

impl Diagnostic {
    fn for_argument(code: Code, argument: &Argument) -> Self {
        Self {
            code,
            subject: argument.name.clone(),
            position: argument.position,
            message: code.message(&argument.name),
        }
    }

    fn for_function(code: Code, function: &Function) -> Self {
        Self {
            code,
            subject: function.name.clone(),
            position: function.position,
            message: code.message(&function.name),
        }
    }

    /// Return-slot diagnostics name the function but point at the colon
    /// closing its parameter list.
    fn for_return(code: Code, function: &Function, position: Position) -> Self {
        Self {
            code,
            subject: function.name.clone(),
            position,
            message: code.message(&function.name),
        }
    }
}

/// Compiled checker, built once from a config and reused across files.
/// Holds no per-file state; files can be checked independently and in
/// parallel by the caller.
pub struct Checker {
    config: Config,
    dispatch_decorators: HashSet<String>,
    overload_decorators: HashSet<String>,
    dummy_args: HashSet<String>,
}

impl Checker {
    pub fn new(config: Config) -> Self {
        let dispatch_decorators = config.dispatch_decorators.iter().cloned().collect();
        let overload_decorators = config.overload_decorators.iter().cloned().collect();
        let dummy_args = config.dummy_arg_names.iter().cloned().collect();
        Self {
            config,
            dispatch_decorators,
            overload_decorators,
            dummy_args,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse and check one source file.
    pub fn check_source(&self, source: &str) -> Result<Vec<Diagnostic>> {
        let index = SourceIndex::new(source);
        let module = parse::parse_module(source, &index)?;
        self.check_module(&module, &index)
    }

    /// Check an already-parsed module against its source lines.
    ///
    /// Diagnostics come out in a deterministic order: definitions in
    /// pre-order, arguments in declaration order, the return slot last.
    pub fn check_module(&self, module: &[Stmt], index: &SourceIndex) -> Result<Vec<Diagnostic>> {
        let mut visitor = FunctionVisitor::new(index, &self.config.dynamic_marker);
        visitor.walk(module)?;
        let functions = visitor.into_functions();

        let mut diagnostics = Vec::new();
        // The definition closing a chain of overload-decorated definitions
        // of the same name is exempt from annotation checks.
        let mut last_overload_name: Option<&str> = None;

        for function in &functions {
            if function.is_dynamically_typed() {
                if self.config.allow_untyped_defs {
                    continue;
                }
                if function.is_nested && self.config.allow_untyped_nested {
                    continue;
                }
            }

            if function.has_decorator(&self.dispatch_decorators) {
                continue;
            }

            let annotated: Vec<&Argument> = function.annotated_arguments().collect();

            if self.config.warn_mixed_styles {
                let mut saw_comment = function.has_type_comment;
                let mut saw_inline = false;
                for arg in &annotated {
                    saw_comment |= arg.has_comment_annotation;
                    saw_inline |= arg.has_inline_annotation;
                    if saw_comment && saw_inline {
                        diagnostics
                            .push(Diagnostic::for_function(Code::MixedAnnotationStyles, function));
                        break;
                    }
                }
            }

            if self.config.warn_dynamic_typing {
                for &arg in &annotated {
                    if !arg.is_dynamically_typed {
                        continue;
                    }
                    if self.config.allow_star_arg_any
                        && matches!(arg.kind, Kind::VarPositional | Kind::VarKeyword)
                    {
                        continue;
                    }
                    diagnostics.push(Diagnostic::for_argument(Code::DynamicTyping, arg));
                }
            }

            if last_overload_name == Some(function.name.as_str()) {
                continue;
            }
            if function.has_decorator(&self.overload_decorators) {
                last_overload_name = Some(function.name.as_str());
            }

            for arg in function.missing_annotations() {
                if arg.kind == Kind::Return {
                    if self.config.suppress_none_returning && function.has_only_none_returns {
                        continue;
                    }
                    // Mirrors mypy: an __init__ with at least one annotated
                    // argument may leave its return implicit.
                    if self.config.mypy_init_return
                        && function.is_class_method
                        && function.name == "__init__"
                        && !annotated.is_empty()
                    {
                        continue;
                    }
                }

                if self.config.suppress_dummy_args && self.dummy_args.contains(&arg.name) {
                    continue;
                }

                let is_first_arg = function
                    .args
                    .first()
                    .is_some_and(|first| std::ptr::eq(first, arg));
                let code = classify::classify(function, arg, is_first_arg);
                diagnostics.push(if arg.kind == Kind::Return {
                    Diagnostic::for_return(code, function, arg.position)
                } else {
                    Diagnostic::for_argument(code, arg)
                });
            }
        }

        Ok(diagnostics)
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_the_documented_defaults() {
        let config = Config::default();
        assert!(!config.suppress_none_returning);
        assert!(!config.warn_dynamic_typing);
        assert!(config.warn_mixed_styles);
        assert_eq!(config.dummy_arg_names, vec!["_".to_owned()]);
        assert_eq!(config.dynamic_marker, "Any");
        assert_eq!(
            config.dispatch_decorators,
            vec!["singledispatch".to_owned(), "singledispatchmethod".to_owned()]
        );
        assert_eq!(config.overload_decorators, vec!["overload".to_owned()]);
    }

    #[test]
    fn config_deserializes_with_partial_overrides() {
        let config: Config =
            serde_yaml_like("{\"suppress_none_returning\": true, \"dummy_arg_names\": [\"_\", \"unused\"]}");
        assert!(config.suppress_none_returning);
        assert_eq!(config.dummy_arg_names.len(), 2);
        assert_eq!(config.dynamic_marker, "Any");
    }

    fn serde_yaml_like(text: &str) -> Config {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn diagnostics_serialize_with_string_codes() {
        let diagnostic = Diagnostic {
            code: Code::UntypedArgument,
            subject: "a".into(),
            position: Position { line: 1, column: 8 },
            message: Code::UntypedArgument.message("a"),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["code"], "ANN001");
        assert_eq!(json["position"]["line"], 1);
    }
}
