//! The checker's error taxonomy (spec.md §7).

use std::fmt;

use crate::token::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckErrorKind {
    /// Kept for completeness of the taxonomy table even though lexing is
    /// handled by the `parser` module, which sits outside this crate's core.
    Lex,
    Parse,
    Import,
    Type,
    Function,
    Statement,
    Variable,
}

impl fmt::Display for CheckErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckErrorKind::Lex => "lex",
            CheckErrorKind::Parse => "parse",
            CheckErrorKind::Import => "import",
            CheckErrorKind::Type => "type",
            CheckErrorKind::Function => "function",
            CheckErrorKind::Statement => "statement",
            CheckErrorKind::Variable => "variable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct CheckError {
    pub kind: CheckErrorKind,
    pub position: Position,
    pub message: String,
    pub fatal: bool,
}

impl CheckError {
    pub fn fatal(kind: CheckErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
            fatal: true,
        }
    }

    pub fn warning(kind: CheckErrorKind, position: Position, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
            fatal: false,
        }
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.position, self.kind, self.message)
    }
}

impl std::error::Error for CheckError {}

/// Accumulates diagnostics across the whole pipeline (spec.md §7). Warnings
/// never set `failed`; any fatal error does.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub errors: Vec<CheckError>,
    pub failed: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: CheckError) {
        if error.fatal {
            self.failed = true;
        }
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.failed = self.failed || other.failed;
        self.errors.extend(other.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in &self.errors {
            writeln!(f, "{}", err)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_does_not_mark_failed() {
        let mut diag = Diagnostics::new();
        diag.push(CheckError::warning(CheckErrorKind::Variable, Position::synthesized(), "unused x"));
        assert!(!diag.failed);
        assert_eq!(diag.errors.len(), 1);
    }

    #[test]
    fn fatal_error_marks_failed() {
        let mut diag = Diagnostics::new();
        diag.push(CheckError::fatal(CheckErrorKind::Type, Position::synthesized(), "mismatch"));
        assert!(diag.failed);
    }
}
