//! The top-level container for a single parsed source file.

use crate::ast::declaration::Declaration;
use crate::token::Fqn;

/// Everything the parser produces for one `.avl` file, before importing
/// stitches it into a `Program`.
#[derive(Debug, Clone)]
pub struct Module {
    pub fqn: Fqn,
    pub declarations: Vec<Declaration>,
}

impl Module {
    pub fn new(fqn: Fqn, declarations: Vec<Declaration>) -> Self {
        Self { fqn, declarations }
    }

    pub fn imports(&self) -> impl Iterator<Item = &crate::ast::declaration::ImportDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Import(import) => Some(import),
            _ => None,
        })
    }
}
