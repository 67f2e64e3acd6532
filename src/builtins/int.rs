//! The `int` type: arbitrary-width signed integers in the source language,
//! arithmetic, comparisons, and bitwise operators.

use crate::builtins::{declare_binary, declare_function, declare_primitive, declare_unary, instance_of};
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_primitive(table, "int");

    for op in ["__add__", "__sub__", "__mul__", "__div__", "__mod__", "__pow__"] {
        declare_binary(table, op, "int", "int");
    }
    for op in ["__band__", "__bor__", "__bxor__"] {
        declare_binary(table, op, "int", "int");
    }
    for op in ["__eq__", "__ne__", "__lt__", "__gt__", "__le__", "__ge__"] {
        declare_binary(table, op, "int", "bool");
    }
    declare_unary(table, "__neg__", "int", "int");
    declare_unary(table, "__bnot__", "int", "int");
    declare_unary(table, "__hash__", "int", "int");

    declare_unary(table, "__cast__", "int", "float");
    declare_function(table, "__cast__", &[("self", instance_of("int"))], instance_of("string"));
}
