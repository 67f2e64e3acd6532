//! The `string` type: concatenation, comparison, and indexing.

use crate::builtins::{declare_binary, declare_function, declare_primitive, declare_unary, instance_of};
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_primitive(table, "string");

    declare_binary(table, "__add__", "string", "string");
    for op in ["__eq__", "__ne__", "__lt__", "__gt__", "__le__", "__ge__"] {
        declare_binary(table, op, "string", "bool");
    }
    declare_unary(table, "__hash__", "string", "int");

    declare_function(
        table,
        "__getitem__",
        &[("self", instance_of("string")), ("index", instance_of("int"))],
        instance_of("string"),
    );
    declare_function(table, "length", &[("self", instance_of("string"))], instance_of("int"));
}
