//! The function specializer ("generator"): given a parametric function
//! declaration and the concrete type instances a call site supplied for its
//! constraints, produces a fully concrete clone of the declaration with
//! every `TypeInstance` rewritten, caching it in the owning `FunctionData`
//! so a second call with the same concrete types reuses the specialization.
//!
//! Grounded in `original_source/src/checker/decl/function/function_generator.hpp`:
//! the same `build_instance`-then-walk-every-expression-kind shape, generalized
//! from in-place mutation of shared AST nodes to producing an owned clone,
//! since our `FunctionDecl`s live by value in the arena rather than behind a
//! `shared_ptr` multiple call sites could alias.

use std::collections::HashMap;

use crate::ast::expression::{AccessKind, Expression, MatchArm, Pattern};
use crate::ast::statement::{Block, IfStmt, Statement, WhileStmt};
use crate::ast::{FunctionDecl, Param, TypeInstance};
use crate::checker::error::{CheckError, CheckErrorKind};
use crate::ids::FunctionId;
use crate::symbol::GlobalTable;
use crate::token::Position;

/// Builds the mangled cache key for a given constraint substitution, in
/// declared-constraint order so that two calls supplying the substitution in
/// a different textual order still collide.
fn mangle(name: &str, constraint_order: &[String], substitution: &HashMap<String, TypeInstance>) -> String {
    let mut key = String::from(name);
    for constraint_name in constraint_order {
        key.push('|');
        if let Some(instance) = substitution.get(constraint_name) {
            key.push_str(&mangle_instance(instance));
        }
    }
    key
}

fn mangle_instance(instance: &TypeInstance) -> String {
    if instance.params.is_empty() {
        instance.name().to_owned()
    } else {
        let params: Vec<String> = instance.params.iter().map(mangle_instance).collect();
        format!("{}<{}>", instance.name(), params.join(","))
    }
}

/// Walks `param_instances`/`return_instance` against the declaration's own
/// parameter/return type instances, recording which concrete type instance
/// each constraint name maps to. Mirrors `build_instance`: the first type
/// instance seen for a given constraint wins, and a later, conflicting one is
/// a fatal error.
fn build_substitution(
    decl: &FunctionDecl,
    param_instances: &[TypeInstance],
    return_instance: Option<&TypeInstance>,
) -> Result<HashMap<String, TypeInstance>, CheckError> {
    let mut substitution: HashMap<String, TypeInstance> = HashMap::new();

    for (formal, actual) in decl.params.iter().zip(param_instances) {
        bind(&formal.ty, actual, &mut substitution)?;
    }
    if let Some(actual) = return_instance {
        bind(&decl.return_type, actual, &mut substitution)?;
    }

    Ok(substitution)
}

fn bind(
    formal: &TypeInstance,
    actual: &TypeInstance,
    substitution: &mut HashMap<String, TypeInstance>,
) -> Result<(), CheckError> {
    if formal.is_parametric() && formal.params.is_empty() {
        match substitution.get(formal.name()) {
            Some(existing) if !crate::checker::type_instance::strong_compare(existing, actual) => {
                return Err(CheckError::fatal(
                    CheckErrorKind::Function,
                    actual.position(),
                    format!(
                        "constraint `{}` was already bound to a different type instance",
                        formal.name()
                    ),
                ));
            }
            _ => {
                substitution.insert(formal.name().to_owned(), actual.clone());
            }
        }
        return Ok(());
    }

    for (f, a) in formal.params.iter().zip(&actual.params) {
        bind(f, a, substitution)?;
    }
    Ok(())
}

fn substitute(instance: &TypeInstance, substitution: &HashMap<String, TypeInstance>) -> TypeInstance {
    if instance.is_parametric() && instance.params.is_empty() {
        if let Some(concrete) = substitution.get(instance.name()) {
            return concrete.clone();
        }
    }
    TypeInstance {
        token: instance.token.clone(),
        category: instance.category,
        params: instance.params.iter().map(|p| substitute(p, substitution)).collect(),
        is_reference: instance.is_reference,
        is_parametric: std::cell::Cell::new(false),
        resolved: std::cell::Cell::new(instance.resolved.get()),
    }
}

fn generate_expression(expr: &Expression, substitution: &HashMap<String, TypeInstance>) -> Expression {
    match expr {
        Expression::Literal { value, position } => Expression::Literal {
            value: value.clone(),
            position: position.clone(),
        },
        Expression::Identifier(token) => Expression::Identifier(token.clone()),
        Expression::Tuple { elements, position } => Expression::Tuple {
            elements: elements.iter().map(|e| generate_expression(e, substitution)).collect(),
            position: position.clone(),
        },
        Expression::List { elements, position } => Expression::List {
            elements: elements.iter().map(|e| generate_expression(e, substitution)).collect(),
            position: position.clone(),
        },
        Expression::Map { entries, position } => Expression::Map {
            entries: entries
                .iter()
                .map(|(k, v)| (generate_expression(k, substitution), generate_expression(v, substitution)))
                .collect(),
            position: position.clone(),
        },
        Expression::Call {
            callee,
            args,
            type_args,
            position,
            bound,
        } => Expression::Call {
            callee: callee.clone(),
            args: args.iter().map(|a| generate_expression(a, substitution)).collect(),
            type_args: type_args.iter().map(|t| substitute(t, substitution)).collect(),
            position: position.clone(),
            bound: std::cell::Cell::new(bound.get()),
        },
        Expression::ConstructorCall { name, args, position } => Expression::ConstructorCall {
            name: name.clone(),
            args: args.iter().map(|a| generate_expression(a, substitution)).collect(),
            position: position.clone(),
        },
        Expression::RecordInit { name, fields, position } => Expression::RecordInit {
            name: name.clone(),
            fields: fields
                .iter()
                .map(|(f, e)| (f.clone(), generate_expression(e, substitution)))
                .collect(),
            position: position.clone(),
        },
        Expression::Access { base, kind, position } => Expression::Access {
            base: Box::new(generate_expression(base, substitution)),
            kind: match kind {
                AccessKind::Dot(t) => AccessKind::Dot(t.clone()),
                AccessKind::Namespace(t) => AccessKind::Namespace(t.clone()),
                AccessKind::Subscript(inner) => AccessKind::Subscript(Box::new(generate_expression(inner, substitution))),
            },
            position: position.clone(),
        },
        Expression::Binary {
            op,
            left,
            right,
            position,
            bound,
        } => Expression::Binary {
            op: *op,
            left: Box::new(generate_expression(left, substitution)),
            right: Box::new(generate_expression(right, substitution)),
            position: position.clone(),
            bound: std::cell::Cell::new(bound.get()),
        },
        Expression::Logical { op, left, right, position } => Expression::Logical {
            op: *op,
            left: Box::new(generate_expression(left, substitution)),
            right: Box::new(generate_expression(right, substitution)),
            position: position.clone(),
        },
        Expression::Unary {
            op,
            operand,
            position,
            bound,
        } => Expression::Unary {
            op: *op,
            operand: Box::new(generate_expression(operand, substitution)),
            position: position.clone(),
            bound: std::cell::Cell::new(bound.get()),
        },
        Expression::Cast {
            target,
            operand,
            position,
            bound,
        } => Expression::Cast {
            target: substitute(target, substitution),
            operand: Box::new(generate_expression(operand, substitution)),
            position: position.clone(),
            bound: std::cell::Cell::new(bound.get()),
        },
        Expression::Match { scrutinee, arms, position } => Expression::Match {
            scrutinee: Box::new(generate_expression(scrutinee, substitution)),
            arms: arms.iter().map(|arm| generate_match_arm(arm, substitution)).collect(),
            position: position.clone(),
        },
        Expression::Grouped { inner, position } => Expression::Grouped {
            inner: Box::new(generate_expression(inner, substitution)),
            position: position.clone(),
        },
        Expression::Conditional {
            condition,
            then_branch,
            else_branch,
            position,
        } => Expression::Conditional {
            condition: Box::new(generate_expression(condition, substitution)),
            then_branch: Box::new(generate_expression(then_branch, substitution)),
            else_branch: Box::new(generate_expression(else_branch, substitution)),
            position: position.clone(),
        },
        Expression::Assignment { target, value, position } => Expression::Assignment {
            target: Box::new(generate_expression(target, substitution)),
            value: Box::new(generate_expression(value, substitution)),
            position: position.clone(),
        },
    }
}

fn generate_match_arm(arm: &MatchArm, substitution: &HashMap<String, TypeInstance>) -> MatchArm {
    MatchArm {
        pattern: generate_pattern(&arm.pattern),
        guard: arm.guard.as_ref().map(|g| generate_expression(g, substitution)),
        body: generate_expression(&arm.body, substitution),
    }
}

fn generate_pattern(pattern: &Pattern) -> Pattern {
    match pattern {
        Pattern::Wildcard(t) => Pattern::Wildcard(t.clone()),
        Pattern::Literal(l) => Pattern::Literal(l.clone()),
        Pattern::Binding(t) => Pattern::Binding(t.clone()),
        Pattern::Constructor { name, params } => Pattern::Constructor {
            name: name.clone(),
            params: params.iter().map(generate_pattern).collect(),
        },
        Pattern::Tuple(elems) => Pattern::Tuple(elems.iter().map(generate_pattern).collect()),
    }
}

fn generate_statement(stmt: &Statement, substitution: &HashMap<String, TypeInstance>) -> Statement {
    match stmt {
        Statement::VariableDecl(decl) => Statement::VariableDecl(crate::ast::VariableDecl {
            name: decl.name.clone(),
            declared_type: decl.declared_type.as_ref().map(|t| substitute(t, substitution)),
            is_mutable: decl.is_mutable,
            init: decl.init.as_ref().map(|e| generate_expression(e, substitution)),
            position: decl.position.clone(),
            used: std::rc::Rc::new(std::cell::Cell::new(false)),
        }),
        Statement::Pass(p) => Statement::Pass(p.clone()),
        Statement::Break(p) => Statement::Break(p.clone()),
        Statement::Continue(p) => Statement::Continue(p.clone()),
        Statement::Return(expr, p) => Statement::Return(expr.as_ref().map(|e| generate_expression(e, substitution)), p.clone()),
        Statement::If(stmt) => Statement::If(IfStmt {
            condition: generate_expression(&stmt.condition, substitution),
            then_block: generate_block(&stmt.then_block, substitution),
            elifs: stmt
                .elifs
                .iter()
                .map(|(cond, block)| (generate_expression(cond, substitution), generate_block(block, substitution)))
                .collect(),
            else_block: stmt.else_block.as_ref().map(|b| generate_block(b, substitution)),
        }),
        Statement::While(stmt) => Statement::While(WhileStmt {
            condition: generate_expression(&stmt.condition, substitution),
            body: generate_block(&stmt.body, substitution),
        }),
        Statement::Foreach(stmt) => Statement::Foreach(crate::ast::ForeachStmt {
            binding: stmt.binding.clone(),
            iterable: generate_expression(&stmt.iterable, substitution),
            body: generate_block(&stmt.body, substitution),
        }),
        Statement::Expression(expr) => Statement::Expression(generate_expression(expr, substitution)),
    }
}

fn generate_block(block: &Block, substitution: &HashMap<String, TypeInstance>) -> Block {
    Block::new(block.statements.iter().map(|s| generate_statement(s, substitution)).collect())
}

/// Produces (and caches) the specialization of `generic` for the given
/// concrete parameter/return type instances, inserting the new declaration
/// into `table.functions` and recording it under the mangled key in the
/// generic declaration's `specializations` map.
pub fn specialize(
    table: &mut GlobalTable,
    generic: FunctionId,
    param_instances: &[TypeInstance],
    return_instance: Option<&TypeInstance>,
    call_position: &Position,
) -> Result<FunctionId, CheckError> {
    let data = table.functions.get(generic).expect("generic function exists");
    if !data.decl.is_parametric() {
        return Ok(generic);
    }

    let substitution = build_substitution(&data.decl, param_instances, return_instance)?;
    let constraint_order: Vec<String> = data.decl.constraints.iter().map(|c| c.name.lexeme.clone()).collect();

    for constraint in &constraint_order {
        if !substitution.contains_key(constraint) {
            return Err(CheckError::fatal(
                CheckErrorKind::Function,
                call_position.clone(),
                format!("could not infer a concrete type for constraint `{}`", constraint),
            ));
        }
    }

    let key = mangle(&data.decl.name.lexeme, &constraint_order, &substitution);
    if let Some(existing) = data.specializations.borrow().get(&key) {
        return Ok(*existing);
    }

    let specialized = FunctionDecl {
        name: data.decl.name.clone(),
        constraints: vec![],
        params: data
            .decl
            .params
            .iter()
            .map(|p| Param {
                name: p.name.clone(),
                ty: substitute(&p.ty, &substitution),
                is_mutable: p.is_mutable,
            })
            .collect(),
        return_type: substitute(&data.decl.return_type, &substitution),
        body: generate_block(&data.decl.body, &substitution),
        is_public: data.decl.is_public,
        position: data.decl.position.clone(),
        used: std::cell::Cell::new(true),
        terminates: std::cell::Cell::new(data.decl.terminates.get()),
    };
    let namespace = data.namespace.clone();

    let new_id = table
        .functions
        .insert(crate::symbol::arena::FunctionData::new(specialized, namespace));

    let data = table.functions.get(generic).expect("generic function still exists");
    data.specializations.borrow_mut().insert(key, new_id);
    table.pending_specializations.borrow_mut().push(new_id);

    Ok(new_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mangle_is_stable_for_same_substitution_order() {
        let mut sub = HashMap::new();
        sub.insert(
            "T".to_owned(),
            TypeInstance::user(
                crate::token::Token::new(crate::token::TokenKind::TypeIdent, "int", Position::synthesized()),
                vec![],
                false,
            ),
        );
        let key1 = mangle("identity", &["T".to_owned()], &sub);
        let key2 = mangle("identity", &["T".to_owned()], &sub);
        assert_eq!(key1, key2);
    }
}
