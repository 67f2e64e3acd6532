//! `{K: V}`: the built-in associative container type.
//!
//! Structural (`TypeInstanceCategory::Map`), not a nominal `Type`
//! declaration — see `list.rs`'s header comment for why.

use crate::builtins::{constraint_instance, declare_parametric_function, instance_of, map_of};
use crate::symbol::GlobalTable;

pub fn register(table: &mut GlobalTable) {
    declare_parametric_function(
        table,
        "__setitem__",
        &["K", "V"],
        &[
            ("self", map_of(constraint_instance("K"), constraint_instance("V"))),
            ("key", constraint_instance("K")),
            ("value", constraint_instance("V")),
        ],
        instance_of("void"),
    );
    declare_parametric_function(
        table,
        "__getitem__",
        &["K", "V"],
        &[
            ("self", map_of(constraint_instance("K"), constraint_instance("V"))),
            ("key", constraint_instance("K")),
        ],
        constraint_instance("V"),
    );
    declare_parametric_function(
        table,
        "contains",
        &["K", "V"],
        &[
            ("self", map_of(constraint_instance("K"), constraint_instance("V"))),
            ("key", constraint_instance("K")),
        ],
        instance_of("bool"),
    );
}
