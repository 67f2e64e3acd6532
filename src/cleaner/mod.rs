//! The cleaner (spec.md §4.8): a post-check walk over every checked
//! function body (ordinary declarations and the generator's
//! specializations alike — a parametric function's own unspecialized body
//! is never checked, so there is nothing to walk on it), flagging unused
//! local variables, and recording the program's entry point on the global
//! table.
//!
//! Grounded in `original_source/src/checker/checker.cpp`'s final
//! `check_unused` pass. That pass also has an unused-*type* check
//! commented out; spec.md §9 Open Questions says to preserve that
//! omission, so this module only ever visits function bodies, never
//! `TypeData`.
//!
//! Statement declarations at module scope are a taxonomy entry in spec.md
//! §7, but our `Declaration` enum (spec.md §3 "Program") has no variant for
//! a bare statement outside a function body — the shape of the AST rules
//! the error out at the type level, so there is nothing left to check here.

use crate::ast::{Block, Statement};
use crate::checker::error::{CheckError, CheckErrorKind};
use crate::ids::FunctionId;
use crate::symbol::GlobalTable;

/// Walks every function declared in `table` (generics excluded, since they
/// are never body-checked) warning on unused locals, then stores `entry` as
/// the program's entry point. Returns the accumulated warnings; none of them
/// are fatal.
pub fn clean(table: &mut GlobalTable, entry: FunctionId) -> Vec<CheckError> {
    table.entry = Some(entry);

    let mut warnings = Vec::new();
    let ids: Vec<FunctionId> = table
        .functions
        .iter()
        .filter(|(_, data)| !data.is_parametric())
        .map(|(id, _)| id)
        .collect();

    for id in ids {
        let data = table.functions.get(id).expect("function exists");
        walk_block(&data.decl.body, &mut warnings);
    }

    warnings
}

fn walk_block(block: &Block, warnings: &mut Vec<CheckError>) {
    for statement in &block.statements {
        walk_statement(statement, warnings);
    }
}

fn walk_statement(statement: &Statement, warnings: &mut Vec<CheckError>) {
    match statement {
        Statement::VariableDecl(decl) => {
            if !decl.used.get() {
                warnings.push(CheckError::warning(
                    CheckErrorKind::Variable,
                    decl.position.clone(),
                    format!("local variable `{}` is declared but never used", decl.name.lexeme),
                ));
            }
        }
        Statement::If(stmt) => {
            walk_block(&stmt.then_block, warnings);
            for (_, block) in &stmt.elifs {
                walk_block(block, warnings);
            }
            if let Some(else_block) = &stmt.else_block {
                walk_block(else_block, warnings);
            }
        }
        Statement::While(stmt) => walk_block(&stmt.body, warnings),
        Statement::Foreach(stmt) => walk_block(&stmt.body, warnings),
        Statement::Pass(_) | Statement::Break(_) | Statement::Continue(_) | Statement::Return(_, _) | Statement::Expression(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::statement::VariableDecl;
    use crate::ast::{Expression, Literal, Param};
    use crate::builtins;
    use crate::symbol::arena::FunctionData;
    use crate::token::{Position, Token, TokenKind};
    use std::cell::Cell;

    fn ident(name: &str) -> Token {
        Token::new(TokenKind::Ident, name, Position::synthesized())
    }

    #[test]
    fn unused_local_produces_a_warning() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);

        let body = crate::ast::Block::new(vec![Statement::VariableDecl(VariableDecl::new(
            ident("x"),
            None,
            false,
            Some(Expression::Literal {
                value: Literal::Int("1".into()),
                position: Position::synthesized(),
            }),
            Position::synthesized(),
        ))]);
        let decl = crate::ast::FunctionDecl {
            name: ident("f"),
            constraints: vec![],
            params: Vec::<Param>::new(),
            return_type: builtins::instance_of("void"),
            body,
            is_public: false,
            position: Position::synthesized(),
            used: Cell::new(false),
            terminates: Cell::new(false),
        };
        let entry = table.functions.insert(FunctionData::new(decl, "avalon"));

        let warnings = clean(&mut table, entry);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, CheckErrorKind::Variable);
        assert!(!warnings[0].fatal);
        assert_eq!(table.entry, Some(entry));
    }

    #[test]
    fn used_local_produces_no_warning() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);

        let used = std::rc::Rc::new(Cell::new(true));
        let mut decl_stmt = VariableDecl::new(
            ident("x"),
            None,
            false,
            Some(Expression::Literal {
                value: Literal::Int("1".into()),
                position: Position::synthesized(),
            }),
            Position::synthesized(),
        );
        decl_stmt.used = used;
        let body = crate::ast::Block::new(vec![Statement::VariableDecl(decl_stmt)]);
        let decl = crate::ast::FunctionDecl {
            name: ident("f"),
            constraints: vec![],
            params: Vec::<Param>::new(),
            return_type: builtins::instance_of("void"),
            body,
            is_public: false,
            position: Position::synthesized(),
            used: Cell::new(false),
            terminates: Cell::new(false),
        };
        let entry = table.functions.insert(FunctionData::new(decl, "avalon"));

        let warnings = clean(&mut table, entry);
        assert!(warnings.is_empty());
    }
}
