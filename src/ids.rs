//! Arena key types shared by the AST and symbol-table layers.
//!
//! Per spec.md §9 ("Design Notes"), the shared-pointer graphs of the original
//! implementation (scopes, types, functions) are represented here as `slotmap`
//! keys rather than `Rc<RefCell<_>>` graphs: a scope's parent becomes a plain
//! `Option<ScopeId>`, and a type instance's resolved target becomes a cached
//! `Option<TypeId>`, both `Copy`.

use slotmap::new_key_type;

new_key_type! {
    /// Key into a `symbol::arena::TypeArena`.
    pub struct TypeId;

    /// Key into a `symbol::arena::FunctionArena`.
    pub struct FunctionId;

    /// Key into a `symbol::arena::ScopeArena`.
    pub struct ScopeId;
}
