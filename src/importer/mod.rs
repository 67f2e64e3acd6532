//! The importer (spec.md §4.1): resolves `import` declarations transitively,
//! detects dependency cycles, orders modules so every dependency precedes
//! its importers, and copies each imported module's public declarations
//! into the scope of whichever module imported it.
//!
//! Grounded in `original_source/src/importer/importer.hpp`'s three-phase
//! shape (`generate_deps` / `sort_deps` / `run_imports`) and the teacher's
//! `loader::load_module`/`load_modules` DFS, generalized from the teacher's
//! content-hash module naming to FQN-based naming (spec.md §3, §6).

pub mod error;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::ast::{Constructor, Declaration, FunctionDecl, Module, TypeDecl};
use crate::checker::error::{CheckError, CheckErrorKind};
use crate::checker::type_instance;
use crate::ids::TypeId;
use crate::importer::error::VisitState;
use crate::symbol::arena::{FunctionData, TypeData};
use crate::symbol::scope::GLOBAL_NAMESPACE;
use crate::symbol::{GlobalTable, Program};
use crate::token::{Fqn, Position};

/// A single search directory, tried in the order spec.md §6 gives: current
/// working directory, the root source file's directory, then `AVALON_HOME`.
pub struct SearchPath {
    pub dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(root_file: &Path, avalon_home: Option<PathBuf>) -> Self {
        let mut dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        if let Some(parent) = root_file.parent() {
            dirs.push(parent.to_path_buf());
        }
        if let Some(home) = avalon_home {
            dirs.push(home);
        }
        Self { dirs }
    }

    /// Resolves a dotted logical module name to the first matching file
    /// across every search directory, in order.
    fn resolve(&self, logical_name: &str) -> Option<PathBuf> {
        let relative = Fqn::name_to_relative_path(logical_name);
        for dir in &self.dirs {
            let candidate = dir.join(&relative);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

/// Parses the root module and every transitive dependency it names, in
/// dependency order (post-order DFS: a module's imports are fully resolved
/// before the module itself is appended). `parse_fn` is the parser
/// boundary (spec.md §1: lexing/parsing are external collaborators); it is
/// injected so the importer itself stays free of grammar concerns.
pub fn load(
    root_path: &Path,
    search: &SearchPath,
    parse_fn: impl Fn(&str, &Path) -> Result<Module, CheckError>,
) -> Result<Program, CheckError> {
    let root_source = std::fs::read_to_string(root_path).map_err(|e| {
        CheckError::fatal(
            CheckErrorKind::Import,
            Position::new(root_path.to_string_lossy().to_string(), 0, 0),
            format!("could not read root file `{}`: {}", root_path.display(), e),
        )
    })?;
    let root_module = parse_fn(&root_source, root_path)?;
    let root_fqn = root_module.fqn.name.clone();

    let mut program = Program::new(root_module.fqn.clone());
    let mut state: HashMap<String, VisitState> = HashMap::new();
    let mut paths: HashMap<String, PathBuf> = HashMap::new();
    paths.insert(root_fqn.clone(), root_path.to_path_buf());

    visit(&root_module, &mut program, &mut state, &mut paths, search, &parse_fn)?;
    program.insert(root_module);

    Ok(program)
}

fn visit(
    module: &Module,
    program: &mut Program,
    state: &mut HashMap<String, VisitState>,
    paths: &mut HashMap<String, PathBuf>,
    search: &SearchPath,
    parse_fn: &impl Fn(&str, &Path) -> Result<Module, CheckError>,
) -> Result<(), CheckError> {
    state.insert(module.fqn.name.clone(), VisitState::Visiting);
    debug!("resolving imports of `{}`", module.fqn.name);

    for import in module.imports() {
        let dep_name = &import.path.lexeme;
        trace!("`{}` imports `{}`", module.fqn.name, dep_name);

        match state.get(dep_name) {
            Some(VisitState::Visited) => continue,
            Some(VisitState::Visiting) => {
                return Err(CheckError::fatal(
                    CheckErrorKind::Import,
                    import.position.clone(),
                    format!(
                        "cyclic dependency detected between `{}` and `{}`",
                        module.fqn.name, dep_name
                    ),
                ));
            }
            Some(VisitState::NotVisited) | None => {}
        }

        let dep_path = search.resolve(dep_name).ok_or_else(|| {
            CheckError::fatal(
                CheckErrorKind::Import,
                import.position.clone(),
                format!("could not find a module named `{}` in any search directory", dep_name),
            )
        })?;

        let dep_source = std::fs::read_to_string(&dep_path).map_err(|e| {
            CheckError::fatal(
                CheckErrorKind::Import,
                import.position.clone(),
                format!("could not read `{}`: {}", dep_path.display(), e),
            )
        })?;
        let dep_module = parse_fn(&dep_source, &dep_path)?;
        paths.insert(dep_name.clone(), dep_path);

        visit(&dep_module, program, state, paths, search, parse_fn)?;
        program.insert(dep_module);
        state.insert(dep_name.clone(), VisitState::Visited);
    }

    state.insert(module.fqn.name.clone(), VisitState::Visited);
    Ok(())
}

/// Declares every module in `program`'s dependency order into `table`,
/// copying each module's directly-imported dependencies' public
/// declarations into its own scope under the dependency's FQN as namespace
/// (spec.md §4.1 step 3). Builtins are imported into every module
/// automatically since they already live in `table.root_scope`, which is
/// every module scope's parent.
pub fn build_global_table(table: &mut GlobalTable, program: &Program) -> Result<(), CheckError> {
    for module in program.modules_in_order() {
        let scope = table.new_scope(table.root_scope);
        declare_module(table, scope, module)?;
        table.module_scopes.insert(module.fqn.name.clone(), scope);
    }

    for module in program.modules_in_order() {
        let importer_scope = *table
            .module_scopes
            .get(&module.fqn.name)
            .expect("module was just declared");

        for import in module.imports() {
            let dep_scope = *table.module_scopes.get(&import.path.lexeme).ok_or_else(|| {
                CheckError::fatal(
                    CheckErrorKind::Import,
                    import.position.clone(),
                    format!("unknown fqn `{}`", import.path.lexeme),
                )
            })?;
            copy_public_declarations(table, dep_scope, importer_scope, &import.path.lexeme)?;
        }
    }

    Ok(())
}

/// Inserts `module`'s own types and functions into `table`'s arenas,
/// registering each under `scope` in the global namespace.
fn declare_module(table: &mut GlobalTable, scope: crate::ids::ScopeId, module: &Module) -> Result<(), CheckError> {
    for declaration in &module.declarations {
        match declaration {
            Declaration::Type(decl) => declare_type(table, scope, decl)?,
            Declaration::Function(decl) => declare_function(table, scope, decl)?,
            Declaration::Import(_) => {}
        }
    }
    Ok(())
}

fn declare_type(table: &mut GlobalTable, scope: crate::ids::ScopeId, decl: &TypeDecl) -> Result<(), CheckError> {
    let arity = decl.arity();
    let scope_data = table.scopes.get(scope).expect("scope exists");
    if scope_data.type_exists(GLOBAL_NAMESPACE, &decl.name.lexeme, arity) {
        return Err(CheckError::fatal(
            CheckErrorKind::Type,
            decl.position.clone(),
            format!("type `{}` of arity {} is already declared in this module", decl.name.lexeme, arity),
        ));
    }

    let constructors = decl.constructors.clone();
    let id = table.types.insert(TypeData::new(decl.clone(), GLOBAL_NAMESPACE));
    let scope_data = table.scopes.get_mut(scope).expect("scope exists");
    scope_data.add_type(GLOBAL_NAMESPACE, &decl.name.lexeme, arity, id);
    for ctor in &constructors {
        register_constructor(scope_data, id, ctor);
    }
    Ok(())
}

fn register_constructor(scope_data: &mut crate::symbol::Scope, owner: TypeId, ctor: &Constructor) {
    let (name, arity) = ctor.key();
    scope_data.add_constructor(GLOBAL_NAMESPACE, &name, arity, owner);
}

fn declare_function(table: &mut GlobalTable, scope: crate::ids::ScopeId, decl: &FunctionDecl) -> Result<(), CheckError> {
    let arity = decl.arity();
    let id = table.functions.insert(FunctionData::new(decl.clone(), GLOBAL_NAMESPACE));
    let scope_data = table.scopes.get_mut(scope).expect("scope exists");
    scope_data.add_function(GLOBAL_NAMESPACE, &decl.name.lexeme, arity, id);
    Ok(())
}

/// Copies the public types/constructors/functions `from_scope` declares
/// directly (not transitively re-exported; a module only sees what its
/// direct imports themselves declared) into `into_scope`, under `namespace`
/// (the originating module's FQN name). Overload collisions — same name,
/// arity, and signature already present under that namespace — are a fatal
/// *symbol collision*; distinct overloads simply coexist (spec.md §4.1).
fn copy_public_declarations(
    table: &mut GlobalTable,
    from_scope: crate::ids::ScopeId,
    into_scope: crate::ids::ScopeId,
    namespace: &str,
) -> Result<(), CheckError> {
    let type_ids: Vec<TypeId> = {
        let from = table.scopes.get(from_scope).expect("scope exists");
        from.declared_type_ids(GLOBAL_NAMESPACE)
    };
    for type_id in type_ids {
        let (is_public, name, arity) = {
            let data = table.types.get(type_id).expect("type exists");
            (data.decl.is_public, data.decl.name.lexeme.clone(), data.decl.arity())
        };
        if !is_public {
            continue;
        }
        let scope_data = table.scopes.get_mut(into_scope).expect("scope exists");
        scope_data.add_type(namespace, &name, arity, type_id);
    }

    let function_ids: Vec<crate::ids::FunctionId> = {
        let from = table.scopes.get(from_scope).expect("scope exists");
        from.declared_function_ids(GLOBAL_NAMESPACE)
    };
    for function_id in function_ids {
        let (is_public, name, arity, params) = {
            let data = table.functions.get(function_id).expect("function exists");
            (
                data.decl.is_public,
                data.decl.name.lexeme.clone(),
                data.decl.arity(),
                data.decl.params.clone(),
            )
        };
        if !is_public {
            continue;
        }

        let collides = {
            let scope_data = table.scopes.get(into_scope).expect("scope exists");
            scope_data
                .get_functions(namespace, &name, arity)
                .iter()
                .filter_map(|id| table.functions.get(*id))
                .any(|existing| {
                    existing
                        .decl
                        .params
                        .iter()
                        .zip(&params)
                        .all(|(a, b)| type_instance::strong_compare(&a.ty, &b.ty))
                })
        };
        if collides {
            let position = table.functions.get(function_id).expect("function exists").decl.position.clone();
            return Err(CheckError::fatal(
                CheckErrorKind::Import,
                position,
                format!("`{}` imports a `{}/{}` that collides with one already visible under `{}`", namespace, name, arity, namespace),
            ));
        }

        let scope_data = table.scopes.get_mut(into_scope).expect("scope exists");
        scope_data.add_function(namespace, &name, arity, function_id);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::declaration::ImportDecl;
    use crate::token::{Token, TokenKind};

    fn fqn(name: &str) -> Fqn {
        Fqn::new(name, PathBuf::from(format!("{}.avl", name.replace('.', "/"))))
    }

    fn import_of(dep: &str) -> Declaration {
        Declaration::Import(ImportDecl {
            path: Token::new(TokenKind::Ident, dep, Position::synthesized()),
            position: Position::synthesized(),
        })
    }

    /// Two modules importing each other, laid out as real files so
    /// `SearchPath::resolve` exercises the same path it does in production;
    /// only the parsing step is faked.
    #[test]
    fn cyclic_import_is_detected() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.avl"), "").unwrap();
        std::fs::write(dir.path().join("b.avl"), "").unwrap();

        let a = Module::new(fqn("a"), vec![import_of("b")]);
        let b = Module::new(fqn("b"), vec![import_of("a")]);
        let modules: HashMap<String, Module> = [("a".to_owned(), a.clone()), ("b".to_owned(), b)].into_iter().collect();

        let search = SearchPath { dirs: vec![dir.path().to_path_buf()] };
        let parse_fn = move |_: &str, path: &Path| -> Result<Module, CheckError> {
            let name = path.file_stem().unwrap().to_string_lossy().to_string();
            Ok(modules.get(&name).expect("test module exists").clone())
        };

        let mut program = Program::new(fqn("a"));
        let mut state: HashMap<String, VisitState> = HashMap::new();
        let mut paths: HashMap<String, PathBuf> = HashMap::new();
        paths.insert("a".to_owned(), dir.path().join("a.avl"));

        let err = visit(&a, &mut program, &mut state, &mut paths, &search, &parse_fn).unwrap_err();
        assert_eq!(err.kind, CheckErrorKind::Import);
    }

    #[test]
    fn acyclic_chain_orders_dependencies_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.avl"), "").unwrap();
        std::fs::write(dir.path().join("b.avl"), "").unwrap();

        let a = Module::new(fqn("a"), vec![import_of("b")]);
        let b = Module::new(fqn("b"), vec![]);
        let modules: HashMap<String, Module> = [("a".to_owned(), a.clone()), ("b".to_owned(), b)].into_iter().collect();

        let search = SearchPath { dirs: vec![dir.path().to_path_buf()] };
        let parse_fn = move |_: &str, path: &Path| -> Result<Module, CheckError> {
            let name = path.file_stem().unwrap().to_string_lossy().to_string();
            Ok(modules.get(&name).expect("test module exists").clone())
        };

        let mut program = Program::new(fqn("a"));
        let mut state: HashMap<String, VisitState> = HashMap::new();
        let mut paths: HashMap<String, PathBuf> = HashMap::new();
        paths.insert("a".to_owned(), dir.path().join("a.avl"));

        visit(&a, &mut program, &mut state, &mut paths, &search, &parse_fn).expect("acyclic graph resolves");
        program.insert(a);

        assert_eq!(program.order, vec!["b".to_owned(), "a".to_owned()]);
    }

    #[test]
    fn build_global_table_copies_public_function_under_dependency_namespace() {
        use crate::ast::{Block, FunctionDecl};
        use std::cell::Cell;

        let mut table = GlobalTable::new();
        crate::builtins::register_all(&mut table);

        let public_fn = FunctionDecl {
            name: Token::new(TokenKind::Ident, "helper", Position::synthesized()),
            constraints: vec![],
            params: vec![],
            return_type: crate::builtins::instance_of("void"),
            body: Block::new(vec![]),
            is_public: true,
            position: Position::synthesized(),
            used: Cell::new(false),
            terminates: Cell::new(false),
        };
        let dep = Module::new(fqn("util"), vec![Declaration::Function(public_fn)]);
        let root = Module::new(fqn("main"), vec![import_of("util")]);

        let mut program = Program::new(fqn("main"));
        program.insert(dep);
        program.insert(root);

        build_global_table(&mut table, &program).expect("import succeeds");

        let main_scope = *table.module_scopes.get("main").unwrap();
        let scope_data = table.scopes.get(main_scope).unwrap();
        assert!(scope_data.function_exists("util", "helper", 0));
    }
}
