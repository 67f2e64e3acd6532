//! The function header checker: validates a function's parameter and return
//! type instances against its enclosing scope and enforces the extra rules
//! spec.md §4.6 lists for headers specifically (public functions cannot leak
//! private types, quantum types cannot be plain parameters, a handful of
//! built-in categories must be passed immutably).
//!
//! Grounded in `original_source/src/checker/decl/function/header_checker.cpp`'s
//! `check_header`: the per-parameter loop there becomes `check_params` here,
//! and the "is this a private-type leak" check walks our `TypeData::decl.is_public`
//! flag instead of dereferencing a `shared_ptr<type>`.

use crate::ast::{FunctionDecl, TypeInstance, TypeInstanceCategory};
use crate::builtins::instance_of;
use crate::checker::error::{CheckError, CheckErrorKind};
use crate::checker::type_instance::{complex_check, strong_compare};
use crate::ids::ScopeId;
use crate::symbol::GlobalTable;

/// Validates `decl`'s parameters and return type instance against `scope`,
/// in `namespace`. Does not touch the body; `checker::block` handles that
/// separately once the header is known sound.
pub fn check_header(
    table: &mut GlobalTable,
    scope: ScopeId,
    namespace: &str,
    decl: &FunctionDecl,
) -> Result<(), CheckError> {
    for param in &decl.params {
        check_param(table, scope, namespace, decl, &param.ty, param.is_mutable)?;
    }
    check_return(table, scope, namespace, decl)?;
    Ok(())
}

fn check_param(
    table: &mut GlobalTable,
    scope: ScopeId,
    namespace: &str,
    decl: &FunctionDecl,
    ty: &TypeInstance,
    is_mutable: bool,
) -> Result<(), CheckError> {
    let (_, is_parametric) = complex_check(table, scope, namespace, ty, &decl.constraints)?;

    if !is_parametric {
        if let Some(type_id) = ty.resolved_type() {
            let type_data = table.types.get(type_id).expect("resolved type exists");
            if decl.is_public && !type_data.decl.is_public {
                return Err(CheckError::fatal(
                    CheckErrorKind::Type,
                    decl.position.clone(),
                    format!(
                        "function `{}` is public but parameter `{}` depends on the private type `{}`; \
                         all parameters of a public function must be public as well",
                        decl.name.lexeme,
                        ty.name(),
                        type_data.decl.name.lexeme
                    ),
                ));
            }
            if type_data.decl.quantum {
                return Err(CheckError::fatal(
                    CheckErrorKind::Type,
                    ty.position(),
                    "quantum types cannot be used as plain function parameters",
                ));
            }
        }
    }

    if is_mutable && forbids_mutable_binding(ty) {
        return Err(CheckError::fatal(
            CheckErrorKind::Variable,
            ty.position(),
            format!("a function parameter of type `{}` cannot be declared mutable", ty.name()),
        ));
    }

    Ok(())
}

fn check_return(
    table: &mut GlobalTable,
    scope: ScopeId,
    namespace: &str,
    decl: &FunctionDecl,
) -> Result<(), CheckError> {
    let (_, is_parametric) = complex_check(table, scope, namespace, &decl.return_type, &decl.constraints)?;

    if !is_parametric {
        if let Some(type_id) = decl.return_type.resolved_type() {
            let type_data = table.types.get(type_id).expect("resolved type exists");
            if decl.is_public && !type_data.decl.is_public {
                return Err(CheckError::fatal(
                    CheckErrorKind::Type,
                    decl.position.clone(),
                    format!(
                        "function `{}` is public but its return type depends on the private type `{}`; \
                         the return type must be public or the function must be private",
                        decl.name.lexeme, type_data.decl.name.lexeme
                    ),
                ));
            }
        }
    }
    Ok(())
}

/// Strings, tuples, lists, and maps must always be immutable parameters
/// (spec.md §4.6). Everything else may be declared mutable.
fn forbids_mutable_binding(ty: &TypeInstance) -> bool {
    match ty.category {
        TypeInstanceCategory::Tuple | TypeInstanceCategory::List | TypeInstanceCategory::Map => true,
        TypeInstanceCategory::User => strong_compare(ty, &instance_of("string")),
        TypeInstanceCategory::Reference | TypeInstanceCategory::Star => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Param;
    use crate::builtins;
    use crate::token::{Position, Token, TokenKind};

    fn decl(is_public: bool, params: Vec<Param>, return_type: TypeInstance) -> FunctionDecl {
        FunctionDecl {
            name: Token::new(TokenKind::Ident, "f", Position::synthesized()),
            constraints: vec![],
            params,
            return_type,
            body: crate::ast::Block::new(vec![]),
            is_public,
            position: Position::synthesized(),
            used: std::cell::Cell::new(false),
            terminates: std::cell::Cell::new(false),
        }
    }

    #[test]
    fn mutable_string_parameter_is_rejected() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);
        let scope = table.root_scope;
        let param = Param {
            name: Token::new(TokenKind::Ident, "s", Position::synthesized()),
            ty: instance_of("string"),
            is_mutable: true,
        };
        let f = decl(false, vec![param], instance_of("void"));
        let err = check_header(&mut table, scope, "avalon", &f).unwrap_err();
        assert_eq!(err.kind, CheckErrorKind::Variable);
    }

    #[test]
    fn immutable_int_parameter_is_accepted() {
        let mut table = GlobalTable::new();
        builtins::register_all(&mut table);
        let scope = table.root_scope;
        let param = Param {
            name: Token::new(TokenKind::Ident, "n", Position::synthesized()),
            ty: instance_of("int"),
            is_mutable: true,
        };
        let f = decl(false, vec![param], instance_of("void"));
        assert!(check_header(&mut table, scope, "avalon", &f).is_ok());
    }
}
