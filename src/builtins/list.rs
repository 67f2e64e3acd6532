//! `[T]`: the built-in homogeneous sequence type.
//!
//! Structural (`TypeInstanceCategory::List`), not a nominal `Type`
//! declaration — a list literal checks to this category directly (spec.md
//! §3), so `push`/`__getitem__`/`length` take `self: [T]` rather than a
//! `Type`-backed `list<T>` that no literal would ever actually produce.

use crate::builtins::{constraint_instance, declare_parametric_function, instance_of, list_of};
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_parametric_function(
        table,
        "push",
        &["T"],
        &[("self", list_of(constraint_instance("T"))), ("item", constraint_instance("T"))],
        instance_of("void"),
    );
    declare_parametric_function(
        table,
        "__getitem__",
        &["T"],
        &[("self", list_of(constraint_instance("T"))), ("index", instance_of("int"))],
        constraint_instance("T"),
    );
    declare_parametric_function(
        table,
        "length",
        &["T"],
        &[("self", list_of(constraint_instance("T")))],
        instance_of("int"),
    );
}
