//! Wires the pipeline together (spec.md §4.9 "Driver"): resolve imports,
//! build the symbol table, check every module, drain specializations the
//! generator queued up along the way, locate the entry function, and run
//! the cleaner. Mirrors the teacher's own `build`/`run` split in spirit —
//! this crate stops at producing a checked `GlobalTable`; running it is
//! `evaluator`'s job, out of scope here.

use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::checker::{self, CheckError, Diagnostics};
use crate::cleaner;
use crate::importer::{self, SearchPath};
use crate::symbol::GlobalTable;
use crate::token::Fqn;
use crate::{builtins, parser};

/// Compiles the program rooted at `root_path`, consulting `avalon_home` as
/// an extra module search directory (spec.md §6 "Environment"). On success,
/// returns the checked `GlobalTable`, whose `entry` names the validated
/// `__main__` specialization. On any fatal error, returns the diagnostics
/// accumulated up to the stage that failed; later stages are not run
/// (spec.md §7 "Propagation").
pub fn compile(root_path: &Path, avalon_home: Option<PathBuf>) -> Result<GlobalTable, Diagnostics> {
    let search = SearchPath::new(root_path, avalon_home);
    let dirs = search.dirs.clone();

    info!("compiling `{}`", root_path.display());

    let program = importer::load(root_path, &search, move |source, path| parse_with_name(source, path, &dirs))
        .map_err(diagnostics_of_one)?;

    let mut table = GlobalTable::new();
    builtins::register_all(&mut table);
    debug!("registered {} builtin declarations", table.builtin_names.len());

    importer::build_global_table(&mut table, &program).map_err(diagnostics_of_one)?;

    let mut warnings = Vec::new();
    for module in program.modules_in_order() {
        let scope = *table
            .module_scopes
            .get(&module.fqn.name)
            .expect("build_global_table declared every module's scope");
        match checker::check_module(&mut table, scope, module) {
            Ok(mut module_warnings) => warnings.append(&mut module_warnings),
            Err(err) => return Err(diagnostics_with_warnings(warnings, err)),
        }
    }

    match checker::check_pending_specializations(&mut table) {
        Ok(mut specialization_warnings) => warnings.append(&mut specialization_warnings),
        Err(err) => return Err(diagnostics_with_warnings(warnings, err)),
    }

    let root_scope = *table
        .module_scopes
        .get(&program.root.name)
        .expect("root module was declared");
    let entry = match checker::find_entry_function(&table, root_scope, crate::symbol::scope::GLOBAL_NAMESPACE) {
        Ok(id) => id,
        Err(err) => return Err(diagnostics_with_warnings(warnings, err)),
    };

    let mut cleaner_warnings = cleaner::clean(&mut table, entry);
    warnings.append(&mut cleaner_warnings);

    if !warnings.is_empty() {
        for warning in &warnings {
            info!("{}", warning);
        }
    }

    Ok(table)
}

/// Derives a module's dotted logical name from the path it was loaded from,
/// preferring the name implied by whichever search directory contains it
/// (so it matches how other modules spell it in their `import` statements)
/// and falling back to the bare file stem for files outside every search
/// directory (namely the root file itself, most of the time).
fn parse_with_name(source: &str, path: &Path, dirs: &[PathBuf]) -> Result<crate::ast::Module, CheckError> {
    let name = dirs
        .iter()
        .find_map(|dir| Fqn::relative_path_to_name(dir, path))
        .unwrap_or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default());

    parser::parse(source, Fqn::new(name, path.to_path_buf()))
}

fn diagnostics_of_one(err: CheckError) -> Diagnostics {
    diagnostics_with_warnings(Vec::new(), err)
}

fn diagnostics_with_warnings(warnings: Vec<CheckError>, fatal: CheckError) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();
    for warning in warnings {
        diagnostics.push(warning);
    }
    diagnostics.push(fatal);
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::CheckErrorKind;
    use std::io::Write;

    fn write_module(dir: &Path, relative: &str, source: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut file = std::fs::File::create(path).unwrap();
        file.write_all(source.as_bytes()).unwrap();
    }

    #[test]
    fn compiles_a_trivial_entry_program() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "main.avl", "def __main__(args: [string]) -> void = { pass }");

        let table = compile(&dir.path().join("main.avl"), None).expect("trivial program compiles");
        assert!(table.entry.is_some());
    }

    #[test]
    fn missing_entry_function_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "main.avl", "def helper() -> void = { pass }");

        let diagnostics = compile(&dir.path().join("main.avl"), None).expect_err("no entry function exists");
        assert!(diagnostics.failed);
        assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Function));
    }

    #[test]
    fn cyclic_import_fails_the_whole_compile() {
        let dir = tempfile::tempdir().unwrap();
        write_module(dir.path(), "main.avl", "import b\ndef __main__(args: [string]) -> void = { pass }");
        write_module(dir.path(), "b.avl", "import main\ndef helper() -> void = { pass }");

        let diagnostics = compile(&dir.path().join("main.avl"), None).expect_err("cyclic import is fatal");
        assert!(diagnostics.failed);
        assert!(diagnostics.errors.iter().any(|e| e.kind == CheckErrorKind::Import));
    }
}
