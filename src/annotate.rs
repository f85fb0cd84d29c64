//! Placeholder doc comment synthesis.
//!
//! One pass over the top-level declarations, in file order:
//!
//! 1. **Guard**: skip nodes whose doc comment is real prose
//! 2. **Render**: fill the template for the node's shape
//! 3. **Attach**: replace the node's doc and its registry entry
//!
//! The file's comment list is rebuilt from the registry at the end.

use crate::cmap::CommentMap;
use crate::error::Error;
use crate::model::*;
use crate::parser::{self, ParseOptions};
use crate::template::{self, CommentTemplate};
use log::debug;
use std::path::Path;

/// True when `doc` is missing or just repeats `name`.
pub fn is_placeholder_or_absent(doc: Option<&CommentGroup>, name: &str) -> bool {
    match doc {
        None => true,
        Some(doc) => doc.text().trim() == name,
    }
}

/// Attach `text` as the doc comment of `node`, anchored one byte before the
/// node so it reads as leading documentation.
pub fn attach(node: &mut dyn Documented, text: String, cmap: &mut CommentMap) {
    debug_assert!(node.pos().is_valid());
    if let Some(old) = cmap.get(node.id()) {
        debug!("replacing {} comment group(s) at {:?}", old.len(), node.pos());
    }
    let anchor = node.pos().before();
    let doc = CommentGroup::new(vec![Comment::synthesized(anchor, text)]);
    cmap.set(node.id(), vec![doc.clone()]);
    node.set_doc(doc);
}

/// Guard, render, and attach for one node. Returns true if a comment was added.
fn document(
    node: &mut dyn Documented,
    what: &str,
    name: &str,
    render: impl FnOnce() -> String,
    cmap: &mut CommentMap,
) -> bool {
    if !is_placeholder_or_absent(node.doc(), name) {
        return false;
    }
    debug!("documenting {} {}", what, name);
    attach(node, render(), cmap);
    true
}

fn first_name<'a>(path: &Path, names: &'a [String], what: &str) -> Result<&'a str, Error> {
    names
        .first()
        .map(String::as_str)
        .ok_or_else(|| Error::TreeShape {
            path: path.display().to_string(),
            message: format!("{} declaration without a name", what),
        })
}

/// Add placeholder comments to every undocumented top-level declaration of
/// `file`. Returns the number of comments added.
pub fn build_comments(file: &mut SourceFile, template: &CommentTemplate) -> Result<usize, Error> {
    let mut cmap = CommentMap::new(file, &file.comments);
    let indented = template.indented();
    let mut added = 0;

    for decl in &mut file.decls {
        match decl {
            Decl::Func(fd) => {
                let text = template::render_func(fd, template);
                let name = fd.name.clone();
                if document(fd, "func", &name, || text, &mut cmap) {
                    added += 1;
                }
            }
            Decl::Type(td) => {
                let name = first_name(&file.path, &td.names, "type")?.to_string();
                let render = || template::render_name(&name, template);
                if document(td, "type", &name, render, &mut cmap) {
                    added += 1;
                }
            }
            Decl::Value(vd) => {
                let what = vd.kind.keyword();
                let name = first_name(&file.path, &vd.names, what)?.to_string();
                let render = || template::render_name(&name, template);
                if document(vd, what, &name, render, &mut cmap) {
                    added += 1;
                }
            }
            Decl::Group(group) => {
                let what = group.kind.keyword();
                for spec in &mut group.specs {
                    let name = first_name(&file.path, &spec.names, what)?.to_string();
                    let render = || template::render_name(&name, &indented);
                    if document(spec, what, &name, render, &mut cmap) {
                        added += 1;
                    }
                }
            }
            Decl::Other(_) => continue,
        }
    }

    file.comments = cmap.filter(file).comments();
    Ok(added)
}

/// Parse `source` and add placeholder comments. The result still needs a
/// writer (see [`crate::printer`]) to become source text again.
pub fn process_file(path: &Path, source: &str, template: &CommentTemplate) -> Result<SourceFile, Error> {
    let mut file = parser::parse_file(path, source, ParseOptions::default())?;
    debug!(
        "{}: package {}, {} declaration(s)",
        path.display(),
        file.package,
        file.decls.len()
    );
    let added = build_comments(&mut file, template)?;
    debug!("{}: added {} comment(s)", path.display(), added);
    Ok(file)
}
