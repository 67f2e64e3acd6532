//! spec.md §4.4/§8: overload resolution picks the candidate with the
//! lowest total type-instance weight, and reports a fatal ambiguity when no
//! single candidate wins.

mod support;

use support::{compile_module, write_module};

use avalon::checker::CheckErrorKind;

#[test]
fn exact_match_overload_is_preferred_over_a_wider_one() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def describe(x: int) -> string = { return \"int\" }\n\
         def describe(x: string) -> string = { return \"string\" }\n\
         def __main__(args: [string]) -> void = { var y = describe(1); pass }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("an exact int overload exists and resolves");
    assert!(table.entry.is_some());
}

#[test]
fn call_with_no_matching_overload_is_a_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def describe(x: int) -> string = { return \"int\" }\n\
         def __main__(args: [string]) -> void = { var y = describe(true); pass }",
    );

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("bool does not match the int overload");
    assert!(diagnostics.failed);
    assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Function));
}

#[test]
fn call_to_an_undeclared_function_is_a_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def __main__(args: [string]) -> void = { var y = nonexistent(1); pass }",
    );

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("nonexistent is never declared");
    assert!(diagnostics.failed);
    assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Function));
}
