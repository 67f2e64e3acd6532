//! The boundary to the evaluator that consumes a checked program (spec.md
//! §1 "Out of scope": interpretation/execution is an external collaborator).
//! This crate's job ends at producing a `GlobalTable` whose `entry` names the
//! `__main__` specialization to run; actually running it is not implemented
//! here.

use crate::ids::FunctionId;
use crate::symbol::GlobalTable;

/// Anything capable of running a checked program's entry function. The
/// `avalon` binary wires a concrete implementation of this trait up to
/// `driver::compile`'s output; this crate ships none itself.
pub trait Evaluate {
    type Output;
    type Error;

    fn run(&mut self, table: &GlobalTable, entry: FunctionId, args: &[String]) -> Result<Self::Output, Self::Error>;
}
