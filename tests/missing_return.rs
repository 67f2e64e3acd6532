//! spec.md §4.7/§8 scenario: a non-`void` function whose body does not
//! terminate on every path is a fatal error; one that does is accepted.

mod support;

use support::{compile_module, write_module};

use avalon::checker::CheckErrorKind;

#[test]
fn non_void_function_falling_off_the_end_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def answer() -> int = { var x = 42; pass }\n\
         def __main__(args: [string]) -> void = { pass }",
    );

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("answer never returns");
    assert!(diagnostics.failed);
    assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Statement));
}

#[test]
fn non_void_function_with_if_missing_an_else_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def answer(flag: bool) -> int = {\n\
             if flag {\n\
                 return 1;\n\
             }\n\
         }\n\
         def __main__(args: [string]) -> void = { pass }",
    );

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("the false branch falls through");
    assert!(diagnostics.failed);
}

#[test]
fn non_void_function_with_if_else_both_returning_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def answer(flag: bool) -> int = {\n\
             if flag {\n\
                 return 1;\n\
             } else {\n\
                 return 0;\n\
             }\n\
         }\n\
         def __main__(args: [string]) -> void = { var x = answer(true); pass }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("both branches return");
    assert!(table.entry.is_some());
}

#[test]
fn void_function_without_a_return_statement_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def greet() -> void = { pass }\n\
         def __main__(args: [string]) -> void = { greet(); pass }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("void functions need not return");
    assert!(table.entry.is_some());
}
