//! The importer's cycle-detection state machine.
//!
//! Mirrors `original_source/src/importer/importer.hpp`'s `VISIT_STATES`
//! enum: a module being visited that is re-entered while still `Visiting`
//! is a cyclic import.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    NotVisited,
    Visiting,
    Visited,
}
