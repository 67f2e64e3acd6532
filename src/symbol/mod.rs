//! The symbol/scope model: arenas, scopes, and the whole-program table.

pub mod arena;
pub mod program;
pub mod scope;

pub use arena::{FunctionData, TypeData, ValidationState};
pub use program::{GlobalTable, Program};
pub use scope::{Scope, Variable, GLOBAL_NAMESPACE};
