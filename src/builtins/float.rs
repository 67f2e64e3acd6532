//! The `float` type: double-precision arithmetic and comparisons.

use crate::builtins::{declare_binary, declare_function, declare_primitive, declare_unary, instance_of};
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_primitive(table, "float");

    for op in ["__add__", "__sub__", "__mul__", "__div__", "__pow__"] {
        declare_binary(table, op, "float", "float");
    }
    for op in ["__eq__", "__ne__", "__lt__", "__gt__", "__le__", "__ge__"] {
        declare_binary(table, op, "float", "bool");
    }
    declare_unary(table, "__neg__", "float", "float");
    declare_unary(table, "__hash__", "float", "int");

    declare_unary(table, "__cast__", "float", "int");
    declare_function(table, "__cast__", &[("self", instance_of("float"))], instance_of("string"));
}
