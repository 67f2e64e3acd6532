//! `io`: the handful of free functions user programs use to talk to the
//! outside world (`print`, `read`), kept as ordinary builtin functions in
//! the global namespace rather than a separate `Type`.

use crate::builtins::{declare_function, instance_of};
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_function(table, "print", &[("value", instance_of("string"))], instance_of("void"));
    declare_function(table, "println", &[("value", instance_of("string"))], instance_of("void"));
    declare_function(table, "read", &[], instance_of("string"));
}
