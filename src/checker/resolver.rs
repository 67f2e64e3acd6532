//! The function resolver: given a call site's name, argument count, and
//! (possibly still-parametric) argument types, finds the best-matching
//! overload among the candidates a scope holds for that `(name, arity)`.
//!
//! Grounded in the candidate-gathering and validation shape of
//! `original_source/src/checker/decl/function/header_checker.cpp`, adapted
//! from "validate one known function's header" to "rank every overload
//! candidate and pick the best", which is how spec.md §4.4 describes
//! resolution working for a call site rather than a declaration site.

use crate::ast::TypeInstance;
use crate::checker::error::{CheckError, CheckErrorKind};
use crate::checker::type_instance::{type_instance_weight, weak_compare};
use crate::ids::{FunctionId, ScopeId};
use crate::symbol::GlobalTable;
use crate::token::Position;

/// The outcome of resolving one call site: the chosen overload and the
/// per-parameter weights that were used to pick it, kept around for
/// diagnostics when resolution is ambiguous.
pub struct Resolution {
    pub function: FunctionId,
    pub total_weight: usize,
}

/// Resolves `name(args...)` against every overload `scope` (and its
/// ancestors) expose for `(name, args.len())`, returning the lowest-weight
/// match.
///
/// Whenever `return_hint` is supplied and is not `Star`, every weight-winner
/// whose declared return type does not `weak_compare` against it is dropped
/// — spec.md §4.4 step 5 applies this filter to the winner set
/// unconditionally, not only when the weight pass left more than one
/// winner tied (spec.md §8 scenario 3: `foo(1, 2) -> float` must fail even
/// though `foo(int, int) -> int` is the unique weight-winner, because its
/// return type contradicts the supplied hint). More than one candidate
/// shares the lowest weight whenever every candidate is zero-arity, since
/// an empty parameter list sums to weight zero regardless of which
/// function it belongs to (spec.md §4.4 steps 5-6); `return_hint` is how
/// those ties, and any return-type contradiction among single winners, are
/// resolved. Ties that `return_hint` cannot break, or that remain after
/// filtering, are a fatal ambiguity.
pub fn resolve(
    table: &GlobalTable,
    scope: ScopeId,
    namespace: &str,
    name: &str,
    args: &[TypeInstance],
    return_hint: Option<&TypeInstance>,
    position: &Position,
) -> Result<Resolution, CheckError> {
    let candidates = gather_candidates(table, scope, namespace, name, args.len());
    if candidates.is_empty() {
        return Err(CheckError::fatal(
            CheckErrorKind::Function,
            position.clone(),
            format!("no function named `{}` taking {} argument(s) was found in this scope", name, args.len()),
        ));
    }

    let mut weighed: Vec<(FunctionId, usize)> = Vec::new();
    for candidate in candidates {
        let data = table.functions.get(candidate).expect("candidate came from this arena");
        let mut total = 0usize;
        let mut matches = true;
        for (param, arg) in data.decl.params.iter().zip(args) {
            let w = type_instance_weight(&param.ty, arg);
            if w == usize::MAX {
                matches = false;
                break;
            }
            total += w;
        }
        if matches {
            weighed.push((candidate, total));
        }
    }

    let Some(&min_weight) = weighed.iter().map(|(_, w)| w).min() else {
        return Err(CheckError::fatal(
            CheckErrorKind::Function,
            position.clone(),
            format!("no overload of `{}` accepts the given argument types", name),
        ));
    };
    let mut tied: Vec<FunctionId> = weighed.iter().filter(|(_, w)| *w == min_weight).map(|(f, _)| *f).collect();

    if let Some(hint) = return_hint.filter(|h| !h.is_star()) {
        tied.retain(|candidate| {
            let decl_return = &table.functions.get(*candidate).expect("candidate exists").decl.return_type;
            weak_compare(decl_return, hint)
        });
    }

    match tied.len() {
        1 => Ok(Resolution {
            function: tied[0],
            total_weight: min_weight,
        }),
        0 => Err(CheckError::fatal(
            CheckErrorKind::Function,
            position.clone(),
            format!("no overload of `{}` has a return type matching the expected one", name),
        )),
        _ => Err(CheckError::fatal(
            CheckErrorKind::Function,
            position.clone(),
            format!("call to `{}` is ambiguous among equally good overloads", name),
        )),
    }
}

/// Walks the scope chain collecting every overload for `(name, arity)`,
/// nearest scope first, searching both the caller's own namespace and the
/// global namespace (mirrors the header checker's `"*"`-namespace fallback).
fn gather_candidates(table: &GlobalTable, scope: ScopeId, namespace: &str, name: &str, arity: usize) -> Vec<FunctionId> {
    let mut found = Vec::new();
    let mut current = Some(scope);
    while let Some(id) = current {
        let Some(data) = table.scopes.get(id) else { break };
        found.extend(data.get_functions(namespace, name, arity).iter().copied());
        if namespace != crate::symbol::scope::GLOBAL_NAMESPACE {
            found.extend(
                data.get_functions(crate::symbol::scope::GLOBAL_NAMESPACE, name, arity)
                    .iter()
                    .copied(),
            );
        }
        found.extend(data.get_functions("avalon", name, arity).iter().copied());
        current = data.parent;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins;
    use crate::token::{Position as Pos, Token, TokenKind};

    fn int_instance() -> TypeInstance {
        TypeInstance::user(Token::new(TokenKind::TypeIdent, "int", Pos::synthesized()), vec![], false)
    }

    #[test]
    fn resolves_exact_builtin_overload() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);
        let root = table.root_scope;
        let args = vec![int_instance(), int_instance()];
        let resolved = resolve(&table, root, "avalon", "__add__", &args, None, &Pos::synthesized()).expect("resolves");
        assert_eq!(resolved.total_weight, 0);
    }

    #[test]
    fn missing_function_is_fatal() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);
        let root = table.root_scope;
        let err = resolve(&table, root, "avalon", "nope", &[], None, &Pos::synthesized()).unwrap_err();
        assert_eq!(err.kind, CheckErrorKind::Function);
    }

    fn declare_zero_arity(table: &mut GlobalTable, name: &str, return_type: TypeInstance) -> FunctionId {
        use crate::ast::{Block, FunctionDecl};
        use crate::symbol::arena::FunctionData;
        use std::cell::Cell;

        let decl = FunctionDecl {
            name: Token::new(TokenKind::Ident, name, Pos::synthesized()),
            constraints: vec![],
            params: vec![],
            return_type,
            body: Block::new(vec![]),
            is_public: true,
            position: Pos::synthesized(),
            used: Cell::new(false),
            terminates: Cell::new(false),
        };
        let id = table.functions.insert(FunctionData::new(decl, "avalon"));
        let scope = table.scopes.get_mut(table.root_scope).expect("root scope");
        scope.add_function("avalon", name, 0, id);
        id
    }

    /// Two zero-arity overloads of the same name tie at weight zero;
    /// without a return-type hint the call is ambiguous, but a hint that
    /// matches exactly one declared return type picks it out.
    #[test]
    fn zero_arity_ties_are_broken_by_return_hint() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);
        let root = table.root_scope;
        let as_int = declare_zero_arity(&mut table, "zero", int_instance());
        let _as_bool = declare_zero_arity(
            &mut table,
            "zero",
            TypeInstance::user(Token::new(TokenKind::TypeIdent, "bool", Pos::synthesized()), vec![], false),
        );

        let err = resolve(&table, root, "avalon", "zero", &[], None, &Pos::synthesized()).unwrap_err();
        assert_eq!(err.kind, CheckErrorKind::Function);

        let resolved = resolve(&table, root, "avalon", "zero", &[], Some(&int_instance()), &Pos::synthesized())
            .expect("return hint disambiguates");
        assert_eq!(resolved.function, as_int);
    }

    /// spec.md §8 scenario 3: a return-type hint that contradicts the sole
    /// weight-winner's declared return must still fail resolution, not
    /// silently return the winner — the return-type filter applies to the
    /// winner set unconditionally, not only when more than one candidate
    /// survives the weight pass.
    #[test]
    fn return_hint_rejects_the_sole_weight_winner_when_it_mismatches() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);
        let root = table.root_scope;
        let args = vec![int_instance(), int_instance()];
        let float_hint = TypeInstance::user(Token::new(TokenKind::TypeIdent, "float", Pos::synthesized()), vec![], false);

        let err = resolve(&table, root, "avalon", "__add__", &args, Some(&float_hint), &Pos::synthesized()).unwrap_err();
        assert_eq!(err.kind, CheckErrorKind::Function);
    }
}
