//! Tuples are structural (`TypeInstanceCategory::Tuple`), not a nominal
//! `Type` declaration, so there is nothing to register here beyond keeping
//! the module present for symmetry with the other built-in kinds: the
//! type-instance checker recognizes tuple instances by category directly.
//! Subscript access (`t[0]`) is special-cased in `checker::block` rather
//! than routed through a registered `__getitem__` overload, since a tuple's
//! slots may each carry a different type and a single overload cannot name
//! a result type for all of them; the index must be a literal constant.
//! Dot-based field access has no reachable surface syntax for tuples
//! (`grammar.pest`'s `dot_access` takes an `ident`, which cannot lex a
//! digit-led token).

use crate::symbol::GlobalTable;

pub fn register(_table: &mut GlobalTable) {}
