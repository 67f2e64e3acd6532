//! spec.md §8 scenario: a cyclic import graph is a fatal, whole-compile
//! error rather than a partial result; an acyclic diamond of imports still
//! compiles cleanly.

mod support;

use support::{compile_module, write_module};

use avalon::checker::CheckErrorKind;

#[test]
fn two_module_cycle_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "import helper\ndef __main__(args: [string]) -> void = { pass }",
    );
    write_module(dir.path(), "helper.avl", "import main\ndef helper() -> void = { pass }");

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("direct cycle is fatal");
    assert!(diagnostics.failed);
    assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Import));
}

#[test]
fn three_module_cycle_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "import a\ndef __main__(args: [string]) -> void = { pass }",
    );
    write_module(dir.path(), "a.avl", "import b\ndef a_helper() -> void = { pass }");
    write_module(dir.path(), "b.avl", "import main\ndef b_helper() -> void = { pass }");

    let diagnostics = compile_module(dir.path(), "main.avl").expect_err("transitive cycle is fatal");
    assert!(diagnostics.failed);
    assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Import));
}

#[test]
fn diamond_import_without_a_cycle_compiles() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "import left\nimport right\ndef __main__(args: [string]) -> void = { pass }",
    );
    write_module(dir.path(), "left.avl", "import shared\ndef left_helper() -> void = { pass }");
    write_module(dir.path(), "right.avl", "import shared\ndef right_helper() -> void = { pass }");
    write_module(dir.path(), "shared.avl", "def shared_helper() -> void = { pass }");

    let table = compile_module(dir.path(), "main.avl").expect("a diamond of imports has no cycle");
    assert!(table.entry.is_some());
}
