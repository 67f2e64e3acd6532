//! Termination and reachability analysis (spec.md §4.7): walks a checked
//! function body once more, stamping `reachable`/`terminates`/`passes` on
//! every statement and rejecting a non-`void` function whose body is not
//! guaranteed to return.
//!
//! Grounded in `original_source/src/checker/decl/function/termination_checker.cpp`'s
//! `analyze_declaration`/`analyze_statement`/`analyze_while`/`analyze_if`
//! shape; our `Block`/`Statement` carry the three flags as `Cell<bool>`
//! fields rather than virtual `decl` methods, so "set on the declaration" in
//! the original becomes a direct `Cell::set` here.

use crate::ast::statement::{IfStmt, WhileStmt};
use crate::ast::{Block, FunctionDecl, Statement};
use crate::builtins::instance_of;
use crate::checker::error::{CheckError, CheckErrorKind};
use crate::checker::type_instance::strong_compare;

/// One declaration's flags, computed against the previous declaration's
/// flags in the same block (spec.md §4.7 rules).
struct Flags {
    reachable: bool,
    terminates: bool,
    passes: bool,
}

impl Flags {
    fn first() -> Self {
        Self {
            reachable: true,
            terminates: false,
            passes: true,
        }
    }

    fn following(prev: &Flags) -> Self {
        Self {
            reachable: prev.reachable && !prev.terminates && prev.passes,
            terminates: false,
            passes: true,
        }
    }
}

/// `block_terminates(b) = ∃ d ∈ b : d.terminates` (spec.md §4.7). Any
/// statement entered with `reachable = false` (spec.md §8 scenario 6: "after
/// `return 1`, a subsequent `var x = 2` is flagged unreachable") is pushed
/// onto `warnings` as a non-fatal diagnostic; checking still continues past
/// it, matching "checking continues, cleaner emits the warning".
fn analyze_block(block: &Block, warnings: &mut Vec<CheckError>) -> bool {
    let mut prev: Option<Flags> = None;
    let mut terminates = false;

    for statement in &block.statements {
        let mut flags = match &prev {
            None => Flags::first(),
            Some(prev) => Flags::following(prev),
        };
        if !flags.reachable {
            warnings.push(CheckError::warning(
                CheckErrorKind::Statement,
                statement.position().clone(),
                "statement is unreachable",
            ));
        }

        analyze_statement(statement, &mut flags, warnings);
        if flags.terminates {
            terminates = true;
        }
        prev = Some(flags);
    }

    block.terminates.set(terminates);
    block.passes.set(prev.map(|f| f.passes).unwrap_or(true));
    terminates
}

fn analyze_statement(statement: &Statement, flags: &mut Flags, warnings: &mut Vec<CheckError>) {
    match statement {
        Statement::VariableDecl(_) | Statement::Expression(_) => {
            flags.terminates = false;
            flags.passes = true;
        }
        Statement::Pass(_) => {
            flags.reachable = true;
            flags.terminates = false;
            flags.passes = true;
        }
        Statement::Break(_) | Statement::Continue(_) => {
            flags.terminates = false;
            flags.passes = false;
        }
        Statement::Return(_, _) => {
            flags.terminates = flags.reachable;
            flags.passes = false;
        }
        Statement::While(stmt) => analyze_while(stmt, flags, warnings),
        Statement::Foreach(stmt) => {
            analyze_block(&stmt.body, warnings);
            flags.terminates = false;
            flags.passes = true;
        }
        Statement::If(stmt) => analyze_if(stmt, flags, warnings),
    }
}

fn analyze_while(stmt: &WhileStmt, flags: &mut Flags, warnings: &mut Vec<CheckError>) {
    flags.terminates = analyze_block(&stmt.body, warnings);
    flags.passes = true;
}

fn analyze_if(stmt: &IfStmt, flags: &mut Flags, warnings: &mut Vec<CheckError>) {
    // `terminates = ⋀ over { then, every elif, else } of block_terminates(branch)`;
    // absent else makes the conjunction false no matter what the branches do.
    let mut terminates = analyze_block(&stmt.then_block, warnings);
    for (_, block) in &stmt.elifs {
        terminates = analyze_block(block, warnings) && terminates;
    }
    terminates = match &stmt.else_block {
        Some(else_block) => analyze_block(else_block, warnings) && terminates,
        None => false,
    };
    flags.terminates = terminates;
    flags.passes = true;
}

/// Verifies that `decl`'s body terminates on every reachable path unless its
/// return type is `void` (spec.md §4.7, "A function is required to
/// terminate unless its return type is void"). Stamps reachability flags on
/// every statement of the body as a side effect, and returns any
/// unreachable-statement warnings collected along the way.
pub fn check_termination(decl: &FunctionDecl) -> Result<Vec<CheckError>, CheckError> {
    let mut warnings = Vec::new();
    let terminates = analyze_block(&decl.body, &mut warnings);
    decl.terminates.set(terminates);

    if !terminates && !strong_compare(&decl.return_type, &instance_of("void")) {
        return Err(CheckError::fatal(
            CheckErrorKind::Statement,
            decl.position.clone(),
            format!(
                "function `{}` does not return on every path and its return type is not `void`",
                decl.name.lexeme
            ),
        ));
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Literal;
    use crate::ast::statement::VariableDecl;
    use crate::ast::{Expression, Param};
    use crate::token::{Position, Token, TokenKind};
    use std::cell::Cell;

    fn ident(name: &str) -> Token {
        Token::new(TokenKind::Ident, name, Position::synthesized())
    }

    fn void_fn(body: Block) -> FunctionDecl {
        FunctionDecl {
            name: ident("f"),
            constraints: vec![],
            params: Vec::<Param>::new(),
            return_type: instance_of("void"),
            body,
            is_public: false,
            position: Position::synthesized(),
            used: Cell::new(false),
            terminates: Cell::new(false),
        }
    }

    fn int_fn(body: Block) -> FunctionDecl {
        let mut decl = void_fn(body);
        decl.return_type = instance_of("int");
        decl
    }

    #[test]
    fn empty_void_function_terminates_trivially() {
        let decl = void_fn(Block::new(vec![]));
        assert!(check_termination(&decl).is_ok());
    }

    #[test]
    fn non_void_function_without_return_is_missing_return() {
        let body = Block::new(vec![Statement::VariableDecl(VariableDecl::new(
            ident("x"),
            None,
            false,
            Some(Expression::Literal {
                value: Literal::Int("1".into()),
                position: Position::synthesized(),
            }),
            Position::synthesized(),
        ))]);
        let decl = int_fn(body);
        let err = check_termination(&decl).unwrap_err();
        assert_eq!(err.kind, CheckErrorKind::Statement);
    }

    #[test]
    fn if_without_else_does_not_terminate() {
        let then_block = Block::new(vec![Statement::Return(
            Some(Expression::Literal {
                value: Literal::Int("1".into()),
                position: Position::synthesized(),
            }),
            Position::synthesized(),
        )]);
        let body = Block::new(vec![Statement::If(IfStmt {
            condition: Expression::Literal {
                value: Literal::Bool(true),
                position: Position::synthesized(),
            },
            then_block,
            elifs: vec![],
            else_block: None,
        })]);
        let decl = int_fn(body);
        assert!(check_termination(&decl).is_err());
    }

    #[test]
    fn if_with_terminating_else_terminates() {
        let ret = |n: &str| {
            Statement::Return(
                Some(Expression::Literal {
                    value: Literal::Int(n.to_owned()),
                    position: Position::synthesized(),
                }),
                Position::synthesized(),
            )
        };
        let body = Block::new(vec![Statement::If(IfStmt {
            condition: Expression::Literal {
                value: Literal::Bool(true),
                position: Position::synthesized(),
            },
            then_block: Block::new(vec![ret("1")]),
            elifs: vec![],
            else_block: Some(Block::new(vec![ret("2")])),
        })]);
        let decl = int_fn(body);
        assert!(check_termination(&decl).is_ok());
    }

    #[test]
    fn statement_after_return_produces_an_unreachable_warning() {
        let body = Block::new(vec![
            Statement::Return(
                Some(Expression::Literal { value: Literal::Int("1".into()), position: Position::synthesized() }),
                Position::synthesized(),
            ),
            Statement::VariableDecl(VariableDecl::new(
                ident("x"),
                None,
                false,
                Some(Expression::Literal { value: Literal::Int("2".into()), position: Position::synthesized() }),
                Position::synthesized(),
            )),
        ]);
        let decl = int_fn(body);
        let warnings = check_termination(&decl).expect("terminates via the leading return");
        assert_eq!(warnings.len(), 1);
        assert!(!warnings[0].fatal);
        assert_eq!(warnings[0].kind, CheckErrorKind::Statement);
    }

    #[test]
    fn unreachable_declaration_after_return_is_flagged() {
        let body = Block::new(vec![
            Statement::Return(
                Some(Expression::Literal {
                    value: Literal::Int("1".into()),
                    position: Position::synthesized(),
                }),
                Position::synthesized(),
            ),
            Statement::VariableDecl(VariableDecl::new(
                ident("x"),
                None,
                false,
                Some(Expression::Literal {
                    value: Literal::Int("2".into()),
                    position: Position::synthesized(),
                }),
                Position::synthesized(),
            )),
        ]);
        let mut prev = Flags::first();
        let mut warnings = Vec::new();
        analyze_statement(&body.statements[0], &mut prev, &mut warnings);
        assert!(prev.terminates);
        let next = Flags::following(&prev);
        assert!(!next.reachable);
    }
}
