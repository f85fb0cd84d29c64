//! Comment templates and placeholder rendering.
//!
//! A template is a format string with one `%s` slot for the declaration
//! name. The base variant starts with [`COMMENT_BASE`]; children of a
//! parenthesized `const` / `var` block use the indented variant, which swaps
//! the base prefix for [`COMMENT_INDENTED_BASE`].

use crate::error::Error;
use crate::model::FuncDecl;

/// The slot replaced by the declaration name.
pub const NAME_SLOT: &str = "%s";

/// Prefix of a top-level comment.
pub const COMMENT_BASE: &str = "// %s ";

/// Prefix of a comment on an entry inside a `( ... )` block.
pub const COMMENT_INDENTED_BASE: &str = "\t// %s ";

/// Template text used when none (or only whitespace) is given.
pub const DEFAULT_TEMPLATE: &str = "...";

/// A comment format string with exactly one name slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentTemplate {
    format: String,
}

impl CommentTemplate {
    /// Build the base template from user text, e.g. `"..."` gives
    /// `"// %s ..."`.
    pub fn new(text: &str) -> Result<Self, Error> {
        if text.contains(NAME_SLOT) {
            return Err(Error::Template(format!(
                "{:?} must not contain {}; the name is inserted automatically",
                text, NAME_SLOT
            )));
        }
        let text = if text.trim().is_empty() {
            DEFAULT_TEMPLATE
        } else {
            text
        };
        Ok(CommentTemplate {
            format: format!("{}{}", COMMENT_BASE, text),
        })
    }

    /// The indented variant: the base prefix swapped for the indented one.
    pub fn indented(&self) -> Self {
        CommentTemplate {
            format: self.format.replacen(COMMENT_BASE, COMMENT_INDENTED_BASE, 1),
        }
    }

    /// Substitute `name` into the slot.
    pub fn fill(&self, name: &str) -> String {
        self.format.replacen(NAME_SLOT, name, 1)
    }
}

impl Default for CommentTemplate {
    fn default() -> Self {
        CommentTemplate {
            format: format!("{}{}", COMMENT_BASE, DEFAULT_TEMPLATE),
        }
    }
}

/// Render the one-line comment of a type or value declaration.
pub fn render_name(name: &str, template: &CommentTemplate) -> String {
    template.fill(name)
}

/// Render a function comment: the filled template, one `@name: type` line
/// per parameter name, then a `returns:` section when the signature has a
/// result list.
///
/// Unnamed results are numbered `#1`, `#2`, ... counting unnamed results
/// only; named results render as `@name: type`.
pub fn render_func(func: &FuncDecl, template: &CommentTemplate) -> String {
    let mut lines = vec![template.fill(&func.name)];

    for param in &func.params {
        for name in &param.names {
            lines.push(format!("// @{}: {}", name, param.type_text));
        }
    }

    if let Some(results) = &func.results {
        lines.push("// returns:".to_string());
        let mut index = 0;
        for result in results {
            if result.names.is_empty() {
                index += 1;
                lines.push(format!("// #{}: {}", index, result.type_text));
            } else {
                for name in &result.names {
                    lines.push(format!("// @{}: {}", name, result.type_text));
                }
            }
        }
    }

    lines.join("\n")
}
