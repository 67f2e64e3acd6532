//! The type-instance AST node (spec.md §3 "Type Instance").

use std::cell::Cell;

use crate::ids::TypeId;
use crate::token::{Position, Token};

/// Structural category of a type instance. `Tuple`/`List`/`Map`/`Reference` are
/// structural (equality ignores declared `Type` identity); `User` is nominal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeInstanceCategory {
    User,
    Tuple,
    List,
    Map,
    Reference,
    /// The wildcard used to defer inference (spec.md §3 "a `Star` instance...").
    Star,
}

/// A (possibly parametric) reference to a `Type`, together with actual parameter
/// instances. Not `Copy`: it owns its parameter vector recursively.
#[derive(Debug, Clone)]
pub struct TypeInstance {
    /// The token this instance was written with, kept for diagnostics.
    pub token: Token,
    pub category: TypeInstanceCategory,
    pub params: Vec<TypeInstance>,
    pub is_reference: bool,
    /// True iff this instance's head (or a descendant's) is a constraint token in
    /// the enclosing function/type; set by the type-instance checker (§4.3).
    pub is_parametric: Cell<bool>,
    /// Cached resolution of the `User`-category head `Type`; filled in by
    /// `complex_check` the first time this instance is validated against a scope.
    pub resolved: Cell<Option<TypeId>>,
}

impl TypeInstance {
    pub fn new(
        token: Token,
        category: TypeInstanceCategory,
        params: Vec<TypeInstance>,
        is_reference: bool,
    ) -> Self {
        Self {
            token,
            category,
            params,
            is_reference,
            is_parametric: Cell::new(false),
            resolved: Cell::new(None),
        }
    }

    pub fn user(token: Token, params: Vec<TypeInstance>, is_reference: bool) -> Self {
        Self::new(token, TypeInstanceCategory::User, params, is_reference)
    }

    pub fn structural(
        category: TypeInstanceCategory,
        token: Token,
        params: Vec<TypeInstance>,
    ) -> Self {
        Self::new(token, category, params, false)
    }

    /// The wildcard instance used when a position defers inference (e.g. an
    /// unspecified return-type argument to the function resolver).
    pub fn star() -> Self {
        Self::new(Token::star(), TypeInstanceCategory::Star, vec![], false)
    }

    pub fn is_star(&self) -> bool {
        self.category == TypeInstanceCategory::Star
    }

    pub fn is_parametric(&self) -> bool {
        self.is_parametric.get()
    }

    pub fn name(&self) -> &str {
        &self.token.lexeme
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn position(&self) -> Position {
        self.token.position.clone()
    }

    pub fn resolved_type(&self) -> Option<TypeId> {
        self.resolved.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn ident(name: &str) -> Token {
        Token::new(TokenKind::TypeIdent, name, Position::synthesized())
    }

    #[test]
    fn star_instance_is_star() {
        assert!(TypeInstance::star().is_star());
    }

    #[test]
    fn user_instance_defaults_non_parametric() {
        let ti = TypeInstance::user(ident("int"), vec![], false);
        assert!(!ti.is_parametric());
        assert_eq!(ti.name(), "int");
        assert_eq!(ti.arity(), 0);
    }
}
