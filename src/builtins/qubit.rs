//! `qubit` and `bit`: the quantum-primitive types named in spec.md §5.
//!
//! The semantic front-end only needs their existence and the handful of
//! operators user code may write against them; actual quantum execution is
//! the evaluator's concern and lives past the boundary in `evaluator.rs`.

use crate::builtins::{declare_binary, declare_quantum_primitive, declare_unary};
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_quantum_primitive(table, "qubit");
    declare_quantum_primitive(table, "bit");

    declare_unary(table, "__cast__", "qubit", "bit");
    declare_binary(table, "__eq__", "bit", "bool");
    declare_binary(table, "__ne__", "bit", "bool");
}
