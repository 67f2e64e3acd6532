//! Source positions, tokens, and fully qualified module names.
//!
//! Mirrors spec.md §3 "Fully Qualified Name (FQN)" and "Token".

use std::fmt::Display;
use std::path::{Path, PathBuf};

/// File extension a logical module name maps to on disk (spec.md §6).
pub const MODULE_EXTENSION: &str = "avl";

/// A location within a source file: the file path as given to the driver, line, column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Position attached to synthesized nodes that do not originate from source text
    /// (built-in declarations, generator-rewritten type instances).
    pub fn synthesized() -> Self {
        Self {
            file: "<builtin>".into(),
            line: 0,
            column: 0,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    TypeIdent,
    Int,
    Float,
    Str,
    Bit,
    Qubit,
    Keyword,
    Symbol,
    /// The distinguished "star" kind marking synthesized nodes (spec.md §3 "Token").
    Star,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// The synthesized wildcard token used for nodes that do not come from source text.
    pub fn star() -> Self {
        Self {
            kind: TokenKind::Star,
            lexeme: "*".into(),
            position: Position::synthesized(),
        }
    }

    pub fn is_star(&self) -> bool {
        self.kind == TokenKind::Star
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lexeme)
    }
}

/// A fully qualified module name: a logical dotted name plus its filesystem path.
///
/// A builtin FQN (`path = None`) has no filesystem backing (spec.md §3).
#[derive(Debug, Clone, Eq)]
pub struct Fqn {
    pub name: String,
    pub path: Option<PathBuf>,
}

impl Fqn {
    pub fn new(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            path: Some(path),
        }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.path.is_none()
    }

    /// Converts a dotted logical name (`foo.bar.baz`) to a relative filesystem path
    /// (`foo/bar/baz.avl`).
    pub fn name_to_relative_path(name: &str) -> PathBuf {
        let mut path = PathBuf::new();
        for part in name.split('.') {
            path.push(part);
        }
        path.set_extension(MODULE_EXTENSION);
        path
    }

    /// Converts a filesystem path, resolved from `base`, back to its dotted logical name.
    /// The inverse of `name_to_relative_path`.
    pub fn relative_path_to_name(base: &Path, full: &Path) -> Option<String> {
        let relative = full.strip_prefix(base).ok()?;
        let mut without_ext = relative.to_path_buf();
        without_ext.set_extension("");
        let parts: Vec<String> = without_ext
            .components()
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("."))
        }
    }
}

impl PartialEq for Fqn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl std::hash::Hash for Fqn {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl Display for Fqn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fqn_has_no_path() {
        let fqn = Fqn::builtin("int");
        assert!(fqn.is_builtin());
    }

    #[test]
    fn fqn_equality_is_name_only() {
        let a = Fqn::new("foo.bar", PathBuf::from("/a/foo/bar.avl"));
        let b = Fqn::new("foo.bar", PathBuf::from("/b/foo/bar.avl"));
        assert_eq!(a, b);
    }

    #[test]
    fn name_to_path_round_trip() {
        let path = Fqn::name_to_relative_path("foo.bar.baz");
        assert_eq!(path, PathBuf::from("foo/bar/baz.avl"));

        let name = Fqn::relative_path_to_name(Path::new("/root"), Path::new("/root/foo/bar/baz.avl"));
        assert_eq!(name, Some("foo.bar.baz".to_owned()));
    }

    #[test]
    fn star_token_is_recognized() {
        assert!(Token::star().is_star());
        assert!(!Token::new(TokenKind::Ident, "x", Position::synthesized()).is_star());
    }
}
