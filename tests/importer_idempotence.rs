//! spec.md §9: "no module is ever re-parsed" — a module imported by two
//! different modules is loaded and declared exactly once, and compiling the
//! same root twice from scratch produces two independently-correct results.

mod support;

use support::{compile_module, write_module};

#[test]
fn a_shared_dependency_is_declared_once_even_with_two_importers() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "import left\nimport right\ndef __main__(args: [string]) -> void = { pass }",
    );
    write_module(dir.path(), "left.avl", "import shared\ndef left_helper() -> void = { pass }");
    write_module(dir.path(), "right.avl", "import shared\ndef right_helper() -> void = { pass }");
    write_module(dir.path(), "shared.avl", "def shared_helper() -> void = { pass }");

    let table = compile_module(dir.path(), "main.avl").expect("diamond import compiles");

    let shared_helper_count = table
        .functions
        .iter()
        .filter(|(_, data)| data.decl.name.lexeme == "shared_helper")
        .count();
    assert_eq!(shared_helper_count, 1, "shared.avl must be declared exactly once");
}

#[test]
fn compiling_the_same_root_twice_yields_two_independent_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def __main__(args: [string]) -> void = { pass }",
    );

    let first = compile_module(dir.path(), "main.avl").expect("first compile succeeds");
    let second = compile_module(dir.path(), "main.avl").expect("second compile succeeds independently");

    assert!(first.entry.is_some());
    assert!(second.entry.is_some());
}
