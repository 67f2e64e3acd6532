//! spec.md §4.7/§8 scenario: a statement following an unconditional
//! `return` is unreachable. This is a warning, not a fatal error — checking
//! continues and the program still compiles.

mod support;

use support::{compile_module, write_module};

#[test]
fn statement_after_return_is_a_warning_not_a_fatal_error() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def answer() -> int = {\n\
             return 1;\n\
             var x = 2;\n\
         }\n\
         def __main__(args: [string]) -> void = { var y = answer(); pass }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("unreachable code is only a warning");
    assert!(table.entry.is_some());
}

#[test]
fn while_loop_with_unconditional_break_still_falls_through() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def answer() -> int = {\n\
             while true {\n\
                 break;\n\
             }\n\
             return 0;\n\
         }\n\
         def __main__(args: [string]) -> void = { var y = answer(); pass }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("a while loop does not itself terminate the function");
    assert!(table.entry.is_some());
}

#[test]
fn code_after_a_terminating_while_true_without_break_is_unreachable() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def answer() -> int = {\n\
             return 1;\n\
             return 2;\n\
         }\n\
         def __main__(args: [string]) -> void = { var y = answer(); pass }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("the second return is unreachable but not fatal");
    assert!(table.entry.is_some());
}
