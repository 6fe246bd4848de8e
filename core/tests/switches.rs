use hintguard_core::{Checker, Code, Config, Diagnostic};

fn check(source: &str) -> Vec<Diagnostic> {
    check_with(Config::default(), source)
}

fn check_with(config: Config, source: &str) -> Vec<Diagnostic> {
    Checker::new(config).check_source(source).unwrap()
}

fn codes(diagnostics: &[Diagnostic]) -> Vec<Code> {
    diagnostics.iter().map(|d| d.code).collect()
}

fn assert_codes(diagnostics: &[Diagnostic], expected: &[Code]) {
    assert_eq!(
        codes(diagnostics),
        expected,
        "diagnostics: {diagnostics:#?}"
    );
}

#[test]
fn allow_untyped_defs_skips_fully_bare_functions() {
    let mut config = Config::default();
    config.allow_untyped_defs = true;
    let report = check_with(config, "def untyped(a, b):\n    return a\n");
    assert_codes(&report, &[]);
}

#[test]
fn allow_untyped_defs_still_checks_partially_annotated_functions() {
    let mut config = Config::default();
    config.allow_untyped_defs = true;
    let report = check_with(config, "def partial(a: int, b):\n    return a\n");
    assert_codes(&report, &[Code::UntypedArgument, Code::UntypedReturnPublic]);
}

#[test]
fn allow_untyped_nested_only_exempts_nested_functions() {
    let source = "def outer(a):\n    def inner(x):\n        return x\n    return a\n";
    let mut config = Config::default();
    config.allow_untyped_nested = true;
    let report = check_with(config, source);
    // The bare outer function is still diagnosed.
    assert_codes(&report, &[Code::UntypedArgument, Code::UntypedReturnPublic]);
    assert_eq!(report[1].subject, "outer");
}

#[test]
fn suppress_none_returning_covers_bare_and_literal_none_returns() {
    let source = "def log(msg: str):\n    if msg:\n        return\n    return None\n";
    assert_codes(&check(source), &[Code::UntypedReturnPublic]);

    let mut config = Config::default();
    config.suppress_none_returning = true;
    assert_codes(&check_with(config, source), &[]);
}

#[test]
fn suppress_none_returning_keeps_value_returning_functions() {
    let mut config = Config::default();
    config.suppress_none_returning = true;
    let report = check_with(config, "def get(x: int):\n    return x\n");
    assert_codes(&report, &[Code::UntypedReturnPublic]);
}

#[test]
fn none_return_scoping_ignores_nested_definitions() {
    let source = "def outer(x: int):\n    def inner() -> int:\n        return 5\n    return\n";
    let mut config = Config::default();
    config.suppress_none_returning = true;
    // inner's value return belongs to inner, not outer.
    assert_codes(&check_with(config, source), &[]);
}

#[test]
fn parenthesized_none_still_counts_as_none() {
    let source = "def f(x: int):\n    return (None)\n";
    let mut config = Config::default();
    config.suppress_none_returning = true;
    assert_codes(&check_with(config, source), &[]);
}

#[test]
fn mypy_init_return_requires_an_annotated_argument() {
    let annotated = "class C:\n    def __init__(self, x: int):\n        self.x = x\n";
    let bare = "class C:\n    def __init__(self):\n        pass\n";

    assert_codes(
        &check(annotated),
        &[Code::UntypedSelf, Code::UntypedReturnSpecial],
    );

    let mut config = Config::default();
    config.mypy_init_return = true;
    assert_codes(&check_with(config.clone(), annotated), &[Code::UntypedSelf]);
    // Without any annotated argument the return stays diagnosable.
    assert_codes(
        &check_with(config, bare),
        &[Code::UntypedSelf, Code::UntypedReturnSpecial],
    );
}

#[test]
fn dummy_arguments_can_be_suppressed() {
    let source = "def handle(_, value: int) -> None:\n    pass\n";
    assert_codes(&check(source), &[Code::UntypedArgument]);

    let mut config = Config::default();
    config.suppress_dummy_args = true;
    assert_codes(&check_with(config, source), &[]);
}

#[test]
fn dummy_argument_names_are_configurable() {
    let source = "def handle(unused) -> None:\n    pass\n";
    let mut config = Config::default();
    config.suppress_dummy_args = true;
    config.dummy_arg_names = vec!["unused".into()];
    assert_codes(&check_with(config, source), &[]);
}

#[test]
fn signature_comments_annotate_arguments_positionally() {
    let source = "def legacy(a, b):\n    # type: (int, str) -> bool\n    return True\n";
    assert_codes(&check(source), &[]);
}

#[test]
fn trailing_signature_comments_are_recognized() {
    let source = "def legacy(a, b):  # type: (int, str) -> bool\n    return True\n";
    assert_codes(&check(source), &[]);
}

#[test]
fn short_signature_comments_leave_trailing_arguments_bare() {
    let source = "def legacy(a, b):\n    # type: (int) -> bool\n    return True\n";
    let report = check(source);
    assert_codes(&report, &[Code::UntypedArgument]);
    assert_eq!(report[0].subject, "b");
}

#[test]
fn method_signature_comments_skip_the_implicit_self() {
    let source =
        "class C:\n    def method(self, x):\n        # type: (int) -> None\n        return None\n";
    let report = check(source);
    // The single hint aligns with x; self stays unannotated.
    assert_codes(&report, &[Code::UntypedSelf]);
}

#[test]
fn empty_method_signature_comment_still_reports_self() {
    let source = "class C:\n    def ping(self):\n        # type: () -> None\n        return None\n";
    assert_codes(&check(source), &[Code::UntypedSelf]);
}

#[test]
fn ellipsis_hints_do_not_annotate_their_position() {
    let source = "def f(a, b):\n    # type: (..., int) -> None\n    return None\n";
    let report = check(source);
    assert_codes(&report, &[Code::UntypedArgument]);
    assert_eq!(report[0].subject, "a");
}

#[test]
fn mixing_inline_annotations_and_comments_is_reported_once() {
    let source = "def mix(a: int, b):\n    # type: (int, str) -> None\n    return None\n";
    let report = check(source);
    assert_codes(&report, &[Code::MixedAnnotationStyles]);
    assert_eq!(report[0].subject, "mix");
}

#[test]
fn mixed_style_reporting_can_be_disabled() {
    let source = "def mix(a: int, b):\n    # type: (int, str) -> None\n    return None\n";
    let mut config = Config::default();
    config.warn_mixed_styles = false;
    assert_codes(&check_with(config, source), &[]);
}

#[test]
fn type_ignore_comments_are_not_signature_comments() {
    let source = "def f(a, b):  # type: ignore\n    return a\n";
    let report = check(source);
    assert_codes(
        &report,
        &[
            Code::UntypedArgument,
            Code::UntypedArgument,
            Code::UntypedReturnPublic,
        ],
    );
}

#[test]
fn dynamic_comment_hints_trigger_the_dynamic_warning() {
    let source = "def f(a):\n    # type: (Any) -> None\n    return None\n";
    let mut config = Config::default();
    config.warn_dynamic_typing = true;
    let report = check_with(config, source);
    assert_codes(&report, &[Code::DynamicTyping]);
    assert_eq!(report[0].subject, "a");
}

#[test]
fn dynamic_marker_is_configurable() {
    let source = "def f(a: JsonValue) -> None:\n    pass\n";
    let mut config = Config::default();
    config.warn_dynamic_typing = true;
    config.dynamic_marker = "JsonValue".into();
    let report = check_with(config, source);
    assert_codes(&report, &[Code::DynamicTyping]);
}

#[test]
fn dispatch_decorators_are_configurable() {
    let source = "@route\ndef handler(request):\n    pass\n";
    let mut config = Config::default();
    config.dispatch_decorators = vec!["route".into()];
    assert_codes(&check_with(config, source), &[]);
}

#[test]
fn dotted_overload_decorators_match_on_their_final_segment() {
    let source = "@typing.overload\ndef f(x: int) -> int: ...\n\ndef f(x):\n    return x\n";
    assert_codes(&check(source), &[]);
}
