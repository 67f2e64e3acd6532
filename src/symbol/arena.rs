//! Arenas backing the symbol tables: owned slot storage for types, functions,
//! and scopes, addressed by the `Copy` keys in `crate::ids`.
//!
//! Per spec.md §9 Design Notes, these replace the original implementation's
//! `shared_ptr`/`weak_ptr` graphs. A scope's parent is a plain `Option<ScopeId>`;
//! a type's or function's generic-to-specialized mapping is a `HashMap` of
//! mangled names to sibling arena keys, rather than a tree of owning pointers.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use slotmap::SlotMap;

use crate::ast::{FunctionDecl, TypeDecl};
use crate::ids::{FunctionId, ScopeId, TypeId};
use crate::symbol::scope::Scope;

/// Tri-state validation flag used to short-circuit recursive type checks and
/// to detect self-referential validation (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    Unknown,
    Validating,
    Valid,
    Invalid,
}

#[derive(Debug)]
pub struct TypeData {
    pub decl: TypeDecl,
    pub namespace: String,
    pub validation: Cell<ValidationState>,
    /// Mangled constraint-substitution key -> the specialized `TypeData`'s key,
    /// populated by the generator the first time a given instantiation is seen.
    pub specializations: RefCell<HashMap<String, TypeId>>,
}

impl TypeData {
    pub fn new(decl: TypeDecl, namespace: impl Into<String>) -> Self {
        Self {
            decl,
            namespace: namespace.into(),
            validation: Cell::new(ValidationState::Unknown),
            specializations: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_parametric(&self) -> bool {
        self.decl.is_parametric()
    }
}

#[derive(Debug)]
pub struct FunctionData {
    pub decl: FunctionDecl,
    pub namespace: String,
    pub specializations: RefCell<HashMap<String, FunctionId>>,
}

impl FunctionData {
    pub fn new(decl: FunctionDecl, namespace: impl Into<String>) -> Self {
        Self {
            decl,
            namespace: namespace.into(),
            specializations: RefCell::new(HashMap::new()),
        }
    }

    pub fn is_parametric(&self) -> bool {
        self.decl.is_parametric()
    }
}

#[derive(Debug, Default)]
pub struct TypeArena(SlotMap<TypeId, TypeData>);

impl TypeArena {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    pub fn insert(&mut self, data: TypeData) -> TypeId {
        self.0.insert(data)
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeData> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeData> {
        self.0.get_mut(id)
    }
}

#[derive(Debug, Default)]
pub struct FunctionArena(SlotMap<FunctionId, FunctionData>);

impl FunctionArena {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    pub fn insert(&mut self, data: FunctionData) -> FunctionId {
        self.0.insert(data)
    }

    pub fn get(&self, id: FunctionId) -> Option<&FunctionData> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: FunctionId) -> Option<&mut FunctionData> {
        self.0.get_mut(id)
    }

    /// Every declared function, generic or concrete, by key (spec.md §4.8:
    /// the cleaner walks all of them to find unused locals).
    pub fn iter(&self) -> impl Iterator<Item = (FunctionId, &FunctionData)> {
        self.0.iter()
    }
}

#[derive(Debug, Default)]
pub struct ScopeArena(SlotMap<ScopeId, Scope>);

impl ScopeArena {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    pub fn insert(&mut self, scope: Scope) -> ScopeId {
        self.0.insert(scope)
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.0.get(id)
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.0.get_mut(id)
    }
}
