//! `Option<T>`: `Some(T)` and `None`, the only built-in sum type.
//!
//! Unlike `list`/`map`, `option` is nominal: a real `Type` with `some`/`none`
//! constructors (spec.md §3 "Constructor"). A constructor call's checked
//! type is always the bare, unparameterized `option` (`checker::block`'s
//! `ConstructorCall` case does not track constructor argument types at the
//! type-instance level — spec.md §9 Open Questions notes type specialization
//! is "consumed only by a later stage" and the core need not carry it), so
//! `option` is declared with no formal constraints and `is_some`'s `self`
//! matches it exactly. `unwrap` keeps its own `T` constraint to describe the
//! unwrapped payload's type at the signature level, but since no call site
//! actually carries a concrete `T` to bind, resolving it requires an
//! explicit return-type hint the checker does not yet thread through calls —
//! a known limitation of the shallow constructor typing above, not a
//! separate bug.

use crate::ast::Constructor;
use crate::builtins::{add_constructor, constraint_instance, declare_function, declare_parametric_function, declare_primitive, instance_of};
use crate::symbol::GlobalTable;
use crate::token::{Position, TokenKind, Token};

pub fn register(table: &mut GlobalTable) {
    let option = declare_primitive(table, "option");

    add_constructor(
        table,
        option,
        Constructor::Default {
            name: Token::new(TokenKind::Ident, "some", Position::synthesized()),
            params: vec![constraint_instance("T")],
        },
    );
    add_constructor(
        table,
        option,
        Constructor::Default {
            name: Token::new(TokenKind::Ident, "none", Position::synthesized()),
            params: vec![],
        },
    );

    declare_function(table, "is_some", &[("self", instance_of("option"))], instance_of("bool"));
    declare_parametric_function(
        table,
        "unwrap",
        &["T"],
        &[("self", instance_of("option"))],
        constraint_instance("T"),
    );
}
