//! The whole-program symbol table: the arenas plus the handful of
//! program-wide facts the checker and driver need (builtin roster, entry
//! point). Grounded in `original_source/src/representer/symtable/gtable.hpp`.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::ast::Module;
use crate::ids::{FunctionId, ScopeId};
use crate::symbol::arena::{FunctionArena, ScopeArena, TypeArena};
use crate::symbol::scope::Scope;
use crate::token::Fqn;

/// All state the semantic pipeline accumulates across every imported module.
pub struct GlobalTable {
    pub types: TypeArena,
    pub functions: FunctionArena,
    pub scopes: ScopeArena,
    /// The scope holding every builtin declaration (`spec.md` §9: "the
    /// builtin registry is built once and cloned into each global table").
    pub root_scope: ScopeId,
    /// Names of the programs the builtin registry ships (matches
    /// `gtable`'s list of builtin program names, kept for diagnostics that
    /// want to say "defined in the standard library").
    pub builtin_names: Vec<String>,
    /// The function the driver identified as the program's entry point
    /// (spec.md §4.8/§4.9), set by the cleaner.
    pub entry: Option<FunctionId>,
    /// Each loaded module's own scope (a direct child of `root_scope`),
    /// keyed by the module's FQN name. Populated by the importer as it
    /// declares each module's top-level types/functions, then consulted
    /// again to copy public declarations across import edges (spec.md
    /// §4.1).
    pub module_scopes: HashMap<String, ScopeId>,
    /// Specializations the generator has created but whose bodies have not
    /// been type-checked yet (spec.md §4.5: the generator only substitutes
    /// types; body checking of a specialization happens once, the first time
    /// a call site produces it). The driver drains this after checking every
    /// module's own functions, which may in turn enqueue further
    /// specializations from calls inside a freshly-checked specialized body.
    pub pending_specializations: RefCell<Vec<FunctionId>>,
}

impl GlobalTable {
    pub fn new() -> Self {
        let mut scopes = ScopeArena::new();
        let root_scope = scopes.insert(Scope::root());
        Self {
            types: TypeArena::new(),
            functions: FunctionArena::new(),
            scopes,
            root_scope,
            builtin_names: Vec::new(),
            entry: None,
            module_scopes: HashMap::new(),
            pending_specializations: RefCell::new(Vec::new()),
        }
    }

    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.insert(Scope::child(parent))
    }
}

impl Default for GlobalTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The set of modules the importer has loaded, keyed by their logical FQN
/// name, together with the resolution order they must be checked in.
pub struct Program {
    pub modules: HashMap<String, Module>,
    /// Topologically sorted so that a module's dependencies precede it
    /// (spec.md §4.1).
    pub order: Vec<String>,
    pub root: Fqn,
}

impl Program {
    pub fn new(root: Fqn) -> Self {
        Self {
            modules: HashMap::new(),
            order: Vec::new(),
            root,
        }
    }

    pub fn insert(&mut self, module: Module) {
        let name = module.fqn.name.clone();
        self.modules.insert(name.clone(), module);
        self.order.push(name);
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    /// Modules in dependency order, dependencies first.
    pub fn modules_in_order(&self) -> impl Iterator<Item = &Module> {
        self.order.iter().filter_map(move |name| self.modules.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_table_starts_with_a_root_scope() {
        let table = GlobalTable::new();
        assert!(table.scopes.get(table.root_scope).is_some());
    }

    #[test]
    fn program_preserves_insertion_order() {
        let mut program = Program::new(Fqn::new("main", "main.avl".into()));
        program.insert(Module::new(Fqn::new("a", "a.avl".into()), vec![]));
        program.insert(Module::new(Fqn::new("b", "b.avl".into()), vec![]));
        assert_eq!(program.order, vec!["a".to_owned(), "b".to_owned()]);
    }
}
