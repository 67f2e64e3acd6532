//! The `bool` type and its boolean/comparison operators.

use crate::builtins::{declare_binary, declare_primitive, declare_unary};
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_primitive(table, "bool");
    declare_binary(table, "__eq__", "bool", "bool");
    declare_binary(table, "__ne__", "bool", "bool");
    declare_unary(table, "__not__", "bool", "bool");
    declare_unary(table, "__hash__", "bool", "int");
}
