//! The built-in registry: primitive types and their operator functions.
//!
//! Built once per process and cloned into every fresh `GlobalTable` (spec.md
//! §9: "the registry is built once and cloned per global table" — our
//! version re-declares into a fresh arena per table rather than literally
//! `Clone`-ing, since the arenas hold `Cell`/`RefCell` validation state that
//! must start empty for each checking session; the effect is the same: no
//! module ever re-parses the standard library).

pub mod bool;
pub mod float;
pub mod int;
pub mod io;
pub mod list;
pub mod map;
pub mod option;
pub mod qubit;
pub mod string;
pub mod tuple;
pub mod void;

use std::cell::Cell;

use crate::ast::{Constraint, Constructor, FunctionDecl, Param, TypeDecl, TypeInstance};
use crate::ast::statement::Block;
use crate::ids::{FunctionId, ScopeId, TypeId};
use crate::symbol::arena::{FunctionData, TypeData};
use crate::symbol::scope::GLOBAL_NAMESPACE;
use crate::symbol::GlobalTable;
use crate::token::{Position, Token, TokenKind};

pub const BUILTIN_NAMESPACE: &str = "avalon";

fn type_ident(name: &str) -> Token {
    Token::new(TokenKind::TypeIdent, name, Position::synthesized())
}

fn ident(name: &str) -> Token {
    Token::new(TokenKind::Ident, name, Position::synthesized())
}

pub fn instance_of(name: &str) -> TypeInstance {
    TypeInstance::user(type_ident(name), vec![], false)
}

/// A reference to a constraint (type-parameter) name, e.g. the `T` in
/// `List<T>`'s constructor signatures.
pub fn constraint_instance(name: &str) -> TypeInstance {
    let instance = TypeInstance::user(type_ident(name), vec![], false);
    instance.is_parametric.set(true);
    instance
}

/// A `[T]` list instance, matching the structural category a list literal
/// checks to (spec.md §3: "`Tuple/List/Map/Reference` categories are
/// structural"). `list`/`map` have no nominal `Type` of their own — unlike
/// `option`, they are sugar the type-instance checker recognizes by
/// category alone, so a `self: [T]` parameter lines up with the `[T]`
/// literal's own checked type without a scope lookup.
pub fn list_of(element: TypeInstance) -> TypeInstance {
    TypeInstance::structural(crate::ast::TypeInstanceCategory::List, type_ident("list"), vec![element])
}

/// A `{K: V}` map instance; see `list_of`.
pub fn map_of(key: TypeInstance, value: TypeInstance) -> TypeInstance {
    TypeInstance::structural(crate::ast::TypeInstanceCategory::Map, type_ident("map"), vec![key, value])
}

/// Declares a nullary (no constructors exposed to user code) primitive type
/// and returns its arena key, registered in the root scope's builtin
/// namespace.
pub fn declare_primitive(table: &mut GlobalTable, name: &str) -> TypeId {
    declare_primitive_kind(table, name, false)
}

/// Declares a quantum-primitive type (`qubit`, `bit`): forbidden as a plain
/// function parameter type (spec.md §4.6).
pub fn declare_quantum_primitive(table: &mut GlobalTable, name: &str) -> TypeId {
    declare_primitive_kind(table, name, true)
}

fn declare_primitive_kind(table: &mut GlobalTable, name: &str, quantum: bool) -> TypeId {
    let decl = TypeDecl {
        name: type_ident(name),
        constraints: vec![],
        constructors: vec![],
        is_public: true,
        quantum,
        position: Position::synthesized(),
        used: Cell::new(true),
    };
    let id = table.types.insert(TypeData::new(decl, BUILTIN_NAMESPACE));
    let scope = table.scopes.get_mut(table.root_scope).expect("root scope");
    scope.add_type(BUILTIN_NAMESPACE, name, 0, id);
    table.builtin_names.push(name.to_owned());
    id
}

/// Declares a parametric container type (`List<T>`, `Map<K, V>`, `Option<T>`)
/// with the given number of type parameters.
pub fn declare_parametric(table: &mut GlobalTable, name: &str, constraints: &[&str]) -> TypeId {
    let decl = TypeDecl {
        name: type_ident(name),
        constraints: constraints
            .iter()
            .map(|c| Constraint { name: type_ident(c) })
            .collect(),
        constructors: vec![],
        is_public: true,
        quantum: false,
        position: Position::synthesized(),
        used: Cell::new(true),
    };
    let id = table.types.insert(TypeData::new(decl, BUILTIN_NAMESPACE));
    let scope = table.scopes.get_mut(table.root_scope).expect("root scope");
    scope.add_type(BUILTIN_NAMESPACE, name, constraints.len(), id);
    table.builtin_names.push(name.to_owned());
    id
}

pub fn add_constructor(table: &mut GlobalTable, owner: TypeId, ctor: Constructor) {
    let key = ctor.key();
    if let Some(data) = table.types.get_mut(owner) {
        data.decl.constructors.push(ctor);
    }
    let scope = table.scopes.get_mut(table.root_scope).expect("root scope");
    scope.add_constructor(BUILTIN_NAMESPACE, &key.0, key.1, owner);
}

/// Declares a function with the given name, parameter types, and return
/// type, registering it as an overload candidate in the root scope.
pub fn declare_function(
    table: &mut GlobalTable,
    name: &str,
    params: &[(&str, TypeInstance)],
    return_type: TypeInstance,
) -> FunctionId {
    let decl = FunctionDecl {
        name: ident(name),
        constraints: vec![],
        params: params
            .iter()
            .map(|(pname, ty)| Param {
                name: ident(pname),
                ty: ty.clone(),
                is_mutable: false,
            })
            .collect(),
        return_type,
        body: Block::new(vec![]),
        is_public: true,
        position: Position::synthesized(),
        used: Cell::new(true),
        terminates: Cell::new(true),
    };
    let arity = decl.params.len();
    let id = table.functions.insert(FunctionData::new(decl, BUILTIN_NAMESPACE));
    let scope = table.scopes.get_mut(table.root_scope).expect("root scope");
    scope.add_function(BUILTIN_NAMESPACE, name, arity, id);
    id
}

/// Declares a binary operator function `__op__(self: T, other: T) -> R`.
pub fn declare_binary(
    table: &mut GlobalTable,
    op_fn_name: &str,
    operand: &str,
    result: &str,
) -> FunctionId {
    declare_function(
        table,
        op_fn_name,
        &[("self", instance_of(operand)), ("other", instance_of(operand))],
        instance_of(result),
    )
}

/// Declares a unary operator function `__op__(self: T) -> R`.
pub fn declare_unary(table: &mut GlobalTable, op_fn_name: &str, operand: &str, result: &str) -> FunctionId {
    declare_function(table, op_fn_name, &[("self", instance_of(operand))], instance_of(result))
}

/// Declares a function generic over one or more constraints (e.g. `List<T>`'s
/// `push(self: List<T>, item: T) -> void`).
pub fn declare_parametric_function(
    table: &mut GlobalTable,
    name: &str,
    constraint_names: &[&str],
    params: &[(&str, TypeInstance)],
    return_type: TypeInstance,
) -> FunctionId {
    let decl = FunctionDecl {
        name: ident(name),
        constraints: constraint_names
            .iter()
            .map(|c| Constraint { name: type_ident(c) })
            .collect(),
        params: params
            .iter()
            .map(|(pname, ty)| Param {
                name: ident(pname),
                ty: ty.clone(),
                is_mutable: false,
            })
            .collect(),
        return_type,
        body: Block::new(vec![]),
        is_public: true,
        position: Position::synthesized(),
        used: Cell::new(true),
        terminates: Cell::new(true),
    };
    let arity = decl.params.len();
    let id = table.functions.insert(FunctionData::new(decl, BUILTIN_NAMESPACE));
    let scope = table.scopes.get_mut(table.root_scope).expect("root scope");
    scope.add_function(BUILTIN_NAMESPACE, name, arity, id);
    id
}

/// Registers every built-in type and function into `table`'s root scope.
/// Called once per fresh `GlobalTable` by the driver, before any user module
/// is checked.
pub fn register_all(table: &mut GlobalTable) {
    void::register(table);
    bool::register(table);
    int::register(table);
    float::register(table);
    string::register(table);
    qubit::register(table);
    option::register(table);
    list::register(table);
    map::register(table);
    tuple::register(table);
    io::register(table);
}

/// Unused until a user module actually imports it; present so the importer's
/// cwd/source-dir/`AVALON_HOME` search order has a canonical scope id to
/// fall back on for fully-qualified builtin lookups.
#[allow(dead_code)]
pub fn root_scope_of(table: &GlobalTable) -> ScopeId {
    table.root_scope
}
