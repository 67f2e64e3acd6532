//! The Avalon abstract syntax tree: tokens, type instances, constructors,
//! expressions, statements, declarations, and the per-file module container.

pub mod block;
pub mod constructor;
pub mod declaration;
pub mod expression;
pub mod statement;
pub mod type_instance;

pub use block::Module;
pub use constructor::{Constructor, RecordField};
pub use declaration::{Constraint, Declaration, FunctionDecl, ImportDecl, Param, TypeDecl};
pub use expression::{AccessKind, Expression, FunctionalOp, Literal, LogicalOp, MatchArm, Pattern, UnaryOp};
pub use statement::{Block, ForeachStmt, IfStmt, Statement, VariableDecl, WhileStmt};
pub use type_instance::{TypeInstance, TypeInstanceCategory};
