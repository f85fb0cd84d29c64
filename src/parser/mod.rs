//! Parser module - Go source text to [`SourceFile`].

pub mod go;

use crate::error::Error;
use crate::model::SourceFile;
use std::path::Path;

/// Parser switches.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Collect comments and attach doc comments to declarations.
    pub comments: bool,
    /// Report every syntax error instead of only the first one.
    pub all_errors: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            comments: true,
            all_errors: true,
        }
    }
}

/// Parse one Go source file.
pub fn parse_file(path: &Path, source: &str, options: ParseOptions) -> Result<SourceFile, Error> {
    go::parse(path, source, options)
}

/// Returns true for `*.go` paths.
pub fn is_go_source(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("go")
}
