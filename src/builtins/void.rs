//! The `void` unit type, returned by functions and procedures with no
//! meaningful result.

use crate::builtins::declare_primitive;
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_primitive(table, "void");
}
