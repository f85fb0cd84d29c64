//! Error types for parsing and annotating a single file.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One syntax problem, 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// The source is not valid Go. Holds at least one [`SyntaxError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub path: PathBuf,
    pub errors: Vec<SyntaxError>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.split_first() {
            None => write!(f, "{}: no errors", self.path.display()),
            Some((first, [])) => write!(f, "{}:{}", self.path.display(), first),
            Some((first, rest)) => write!(
                f,
                "{}:{} (and {} more errors)",
                self.path.display(),
                first,
                rest.len()
            ),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The tree has a shape the parser should never produce for valid Go,
    /// e.g. a `type ()` block with no specs.
    #[error("{path}: malformed tree: {message}")]
    TreeShape { path: String, message: String },

    #[error("invalid template: {0}")]
    Template(String),

    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax(line: usize, column: usize) -> SyntaxError {
        SyntaxError {
            line,
            column,
            message: "syntax error".into(),
        }
    }

    #[test]
    fn single_error_display() {
        let err = ParseError {
            path: PathBuf::from("a.go"),
            errors: vec![syntax(3, 7)],
        };
        assert_eq!(err.to_string(), "a.go:3:7: syntax error");
    }

    #[test]
    fn multiple_errors_display() {
        let err = ParseError {
            path: PathBuf::from("a.go"),
            errors: vec![syntax(3, 7), syntax(4, 1), syntax(9, 2)],
        };
        assert_eq!(
            err.to_string(),
            "a.go:3:7: syntax error (and 2 more errors)"
        );
    }
}
