//! The type-instance checker: validates a `TypeInstance` against a scope
//! (resolving its head `Type` and marking it parametric when its head names
//! a constraint), and the structural/nominal comparisons used everywhere
//! else in the checker.
//!
//! Grounded in `original_source/src/checker/decl/function/header_checker.cpp`'s
//! use of `type_instance_checker::complex_check` plus `type_instance_strong_compare`
//! / `type_instance_weak_compare` (declared on
//! `original_source/src/representer/ast/decl/function.hpp`).

use crate::ast::{Constraint, TypeInstance, TypeInstanceCategory};
use crate::checker::error::{CheckError, CheckErrorKind};
use crate::symbol::scope::GLOBAL_NAMESPACE;
use crate::symbol::GlobalTable;

/// Validates `instance` against `scope`, marking it parametric if its head
/// names one of `constraints` rather than a declared `Type`. Returns
/// `(is_valid, is_parametric)`, mirroring the original's
/// `std::pair<bool, bool>` return shape.
pub fn complex_check(
    table: &mut GlobalTable,
    scope: crate::ids::ScopeId,
    namespace: &str,
    instance: &TypeInstance,
    constraints: &[Constraint],
) -> Result<(bool, bool), CheckError> {
    if instance.is_star() {
        return Ok((true, false));
    }

    if constraints.iter().any(|c| c.name.lexeme == instance.name()) {
        instance.is_parametric.set(true);
        for param in &instance.params {
            complex_check(table, scope, namespace, param, constraints)?;
        }
        return Ok((true, true));
    }

    match instance.category {
        TypeInstanceCategory::Tuple | TypeInstanceCategory::List | TypeInstanceCategory::Map => {
            let mut parametric = false;
            for param in &instance.params {
                let (valid, is_param) = complex_check(table, scope, namespace, param, constraints)?;
                if !valid {
                    return Ok((false, false));
                }
                parametric = parametric || is_param;
            }
            instance.is_parametric.set(parametric);
            Ok((true, parametric))
        }
        TypeInstanceCategory::Reference => {
            complex_check(table, scope, namespace, &instance.params[0], constraints)
        }
        TypeInstanceCategory::User => {
            let scope_data = table
                .scopes
                .get(scope)
                .expect("scope must exist for the duration of checking");
            let found = scope_data
                .get_type(namespace, instance.name(), instance.arity())
                .or_else(|| scope_data.get_type(GLOBAL_NAMESPACE, instance.name(), instance.arity()))
                .or_else(|| scope_data.get_type("avalon", instance.name(), instance.arity()));

            let Some(type_id) = found else {
                return Err(CheckError::fatal(
                    CheckErrorKind::Type,
                    instance.position(),
                    format!(
                        "type `{}` of arity {} was not found in this scope",
                        instance.name(),
                        instance.arity()
                    ),
                ));
            };

            let mut parametric = false;
            for param in &instance.params {
                let (valid, is_param) = complex_check(table, scope, namespace, param, constraints)?;
                if !valid {
                    return Ok((false, false));
                }
                parametric = parametric || is_param;
            }

            instance.resolved.set(Some(type_id));
            instance.is_parametric.set(parametric);
            Ok((true, parametric))
        }
        TypeInstanceCategory::Star => Ok((true, false)),
    }
}

/// Strong comparison: two instances are equal only if they are both ground
/// (non-parametric, non-`Star`) and structurally identical, including the
/// nominal head for `User` instances. Used once a call site's arguments are
/// fully resolved.
pub fn strong_compare(a: &TypeInstance, b: &TypeInstance) -> bool {
    if a.is_star() || b.is_star() {
        return false;
    }
    if a.category != b.category {
        return false;
    }
    if a.is_reference != b.is_reference {
        return false;
    }
    match a.category {
        TypeInstanceCategory::User => {
            a.name() == b.name() && a.params.len() == b.params.len() && a
                .params
                .iter()
                .zip(&b.params)
                .all(|(x, y)| strong_compare(x, y))
        }
        _ => {
            a.params.len() == b.params.len()
                && a.params.iter().zip(&b.params).all(|(x, y)| strong_compare(x, y))
        }
    }
}

/// Weak comparison: like `strong_compare`, but a `Star` instance on either
/// side matches anything, and a parametric instance matches its own
/// constraint's eventual ground substitution. Used during overload weighing,
/// where the call site may still carry unresolved constraint types.
pub fn weak_compare(a: &TypeInstance, b: &TypeInstance) -> bool {
    if a.is_star() || b.is_star() {
        return true;
    }
    if a.is_parametric() || b.is_parametric() {
        return true;
    }
    if a.category != b.category {
        return false;
    }
    match a.category {
        TypeInstanceCategory::User => {
            a.name() == b.name()
                && a.params.len() == b.params.len()
                && a.params.iter().zip(&b.params).all(|(x, y)| weak_compare(x, y))
        }
        _ => a.params.len() == b.params.len() && a.params.iter().zip(&b.params).all(|(x, y)| weak_compare(x, y)),
    }
}

/// A numeric closeness score used by the function resolver to rank
/// candidate overloads: `0` is an exact (strong) match, higher numbers are
/// looser matches, and `usize::MAX` means "does not match at all". The
/// resolver picks the minimum sum, so this is a distance, not the raw
/// spec.md §4.3 "closeness" score — spec.md ranks exact highest, a
/// parametric formal one tier lower, and `Star` lowest of all (it carries
/// no information); inverted to a distance that preserves that same
/// ordering, a parametric formal must score strictly better (lower) than a
/// `Star`, since at least its shape is known.
pub fn type_instance_weight(expected: &TypeInstance, actual: &TypeInstance) -> usize {
    if strong_compare(expected, actual) {
        return 0;
    }
    if expected.is_parametric() {
        return 1;
    }
    if expected.is_star() || actual.is_star() {
        return 2;
    }
    if expected.category == actual.category && expected.arity() == actual.arity() {
        let mut weight = 3;
        for (e, a) in expected.params.iter().zip(&actual.params) {
            let sub = type_instance_weight(e, a);
            if sub == usize::MAX {
                return usize::MAX;
            }
            weight += sub;
        }
        return weight;
    }
    usize::MAX
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::token::{Position, Token, TokenKind};

    fn int_instance() -> TypeInstance {
        TypeInstance::user(
            Token::new(TokenKind::TypeIdent, "int", Position::synthesized()),
            vec![],
            false,
        )
    }

    fn float_instance() -> TypeInstance {
        TypeInstance::user(
            Token::new(TokenKind::TypeIdent, "float", Position::synthesized()),
            vec![],
            false,
        )
    }

    #[test]
    fn strong_compare_matches_identical_ground_instances() {
        assert!(strong_compare(&int_instance(), &int_instance()));
        assert!(!strong_compare(&int_instance(), &float_instance()));
    }

    #[test]
    fn star_never_strong_matches() {
        assert!(!strong_compare(&TypeInstance::star(), &int_instance()));
        assert!(weak_compare(&TypeInstance::star(), &int_instance()));
    }

    #[test]
    fn complex_check_resolves_builtin_type() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);
        let root = table.root_scope;
        let instance = int_instance();
        let (valid, parametric) =
            complex_check(&mut table, root, "avalon", &instance, &[]).expect("int resolves");
        assert!(valid);
        assert!(!parametric);
        assert!(instance.resolved_type().is_some());
    }

    #[test]
    fn complex_check_marks_constraint_as_parametric() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);
        let root = table.root_scope;
        let t_token = Token::new(TokenKind::TypeIdent, "T", Position::synthesized());
        let constraints = vec![Constraint { name: t_token.clone() }];
        let instance = TypeInstance::user(t_token, vec![], false);
        let (valid, parametric) =
            complex_check(&mut table, root, "avalon", &instance, &constraints).expect("T resolves as parametric");
        assert!(valid);
        assert!(parametric);
    }

    #[test]
    fn weight_prefers_exact_match() {
        assert_eq!(type_instance_weight(&int_instance(), &int_instance()), 0);
        assert_eq!(type_instance_weight(&int_instance(), &float_instance()), usize::MAX);
    }
}
