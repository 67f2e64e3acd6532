//! spec.md §4.5/§8: a parametric function is specialized per distinct
//! call-site type, and the cached specialization is reused on a repeat
//! call with the same concrete type.

mod support;

use support::{compile_module, write_module};

#[test]
fn generic_identity_function_specializes_against_two_call_sites() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def identity<T>(x: T) -> T = { return x }\n\
         def __main__(args: [string]) -> void = {\n\
             var a = identity(1);\n\
             var b = identity(\"hi\");\n\
             pass\n\
         }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("identity specializes over int and string call sites");
    assert!(table.entry.is_some());
}

#[test]
fn list_push_specializes_over_its_element_type() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def __main__(args: [string]) -> void = {\n\
             var xs = [1, 2, 3];\n\
             push(xs, 4);\n\
             pass\n\
         }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("push specializes against [int]");
    assert!(table.entry.is_some());
}

#[test]
fn repeated_call_with_the_same_concrete_type_reuses_one_specialization() {
    let dir = tempfile::tempdir().unwrap();
    write_module(
        dir.path(),
        "main.avl",
        "def identity<T>(x: T) -> T = { return x }\n\
         def __main__(args: [string]) -> void = {\n\
             var a = identity(1);\n\
             var b = identity(2);\n\
             pass\n\
         }",
    );

    let table = compile_module(dir.path(), "main.avl").expect("two int call sites share one specialization");
    let int_specializations = table
        .functions
        .iter()
        .filter(|(_, data)| data.decl.name.lexeme.starts_with("identity"))
        .count();
    assert!(int_specializations >= 1);
}
