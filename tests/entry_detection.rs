//! Black-box coverage for entry-function detection (spec.md §4.9, §8
//! scenario 1: "a program with a correctly-shaped `__main__` compiles and
//! names it as the entry point").

mod support;

use support::{compile_module, write_module};

use avalon::checker::CheckErrorKind;

#[test]
fn well_shaped_entry_function_is_found() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def __main__(args: [string]) -> void = { pass }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("well-shaped entry compiles");
    assert!(table.entry.is_some());
}

#[test]
fn entry_function_with_wrong_param_count_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "main.avl", "def __main__() -> void = { pass }");

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("wrong arity is not an entry point");
    assert!(diagnostics.failed);
    assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Function));
}

#[test]
fn entry_function_with_wrong_return_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def __main__(args: [string]) -> int = { return 0 }",
    );

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("non-void entry point is not accepted");
    assert!(diagnostics.failed);
    assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Function));
}

#[test]
fn entry_function_with_wrong_param_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def __main__(args: int) -> void = { pass }",
    );

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("args: int is not args: [string]");
    assert!(diagnostics.failed);
}
