//! Writer: turn an annotated [`SourceFile`] back into Go source text.
//!
//! Nothing is reformatted. The original text is copied through, with two
//! kinds of edits:
//! - parsed comments that are gone from the final comment list are removed,
//!   taking their whole line when nothing else is on it
//! - synthesized comments are inserted above the line of the node they
//!   document, or on a new line right before the node when code precedes
//!   it on its line

use crate::model::{Comment, CommentGroup, SourceFile};
use std::collections::HashSet;

#[derive(Debug, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

fn removal(source: &str, start: usize, end: usize) -> Edit {
    let from = line_start(source, start);
    let to = source[end..].find('\n').map_or(source.len(), |i| end + i + 1);
    if source[from..start].trim().is_empty() && source[end..to].trim().is_empty() {
        Edit {
            start: from,
            end: to,
            text: String::new(),
        }
    } else {
        Edit {
            start,
            end,
            text: String::new(),
        }
    }
}

/// `at` is the offset of the documented node.
fn insertion(source: &str, at: usize, text: &str) -> Edit {
    let from = line_start(source, at);
    if source[from..at].trim().is_empty() {
        Edit {
            start: from,
            end: from,
            text: format!("{}\n", text),
        }
    } else {
        Edit {
            start: at,
            end: at,
            text: format!("\n{}\n", text),
        }
    }
}

fn comments(groups: &[CommentGroup]) -> impl Iterator<Item = &Comment> {
    groups.iter().flat_map(|g| g.list.iter())
}

/// Render `file` as source text.
pub fn print(file: &SourceFile) -> String {
    let source = file.source.as_str();
    let kept: HashSet<_> = comments(&file.comments)
        .filter(|c| !c.synthesized)
        .map(|c| c.pos)
        .collect();

    let mut edits = Vec::new();
    for comment in comments(&file.parsed_comments) {
        if kept.contains(&comment.pos) {
            continue;
        }
        if let Some(start) = comment.pos.offset() {
            edits.push(removal(source, start, start + comment.text.len()));
        }
    }
    for comment in comments(&file.comments).filter(|c| c.synthesized) {
        // The anchor sits one byte before the node
        if let Some(anchor) = comment.pos.offset() {
            edits.push(insertion(source, anchor + 1, &comment.text));
        }
    }
    edits.sort_by_key(|e| (e.start, e.end));

    let mut out = String::with_capacity(source.len() + edits.iter().map(|e| e.text.len()).sum::<usize>());
    let mut cursor = 0;
    for edit in edits {
        if edit.start < cursor {
            continue;
        }
        out.push_str(&source[cursor..edit.start]);
        out.push_str(&edit.text);
        cursor = edit.end;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::process_file;
    use crate::template::CommentTemplate;
    use std::path::Path;

    fn run(source: &str) -> String {
        let file = process_file(Path::new("t.go"), source, &CommentTemplate::default()).unwrap();
        print(&file)
    }

    #[test]
    fn removal_takes_whole_line() {
        let src = "a\n// x\nb\n";
        assert_eq!(
            removal(src, 2, 6),
            Edit {
                start: 2,
                end: 7,
                text: String::new()
            }
        );
    }

    #[test]
    fn removal_keeps_code_on_line() {
        let src = "a := 1 // x\n";
        assert_eq!(removal(src, 7, 11).start, 7);
    }

    #[test]
    fn insertion_mid_line() {
        let src = "const ( A = 1 )";
        let edit = insertion(src, 8, "// A ...");
        assert_eq!(edit.start, 8);
        assert_eq!(edit.text, "\n// A ...\n");
    }

    #[test]
    fn documents_function() {
        let src = "package p\n\nfunc Add(a, b int) int {\n\treturn a + b\n}\n";
        assert_eq!(
            run(src),
            "package p\n\n// Add ...\n// @a: int\n// @b: int\n// returns:\n// #1: int\nfunc Add(a, b int) int {\n\treturn a + b\n}\n"
        );
    }

    #[test]
    fn replaces_placeholder() {
        let src = "package p\n\n// Run\nfunc Run() {}\n";
        assert_eq!(run(src), "package p\n\n// Run ...\nfunc Run() {}\n");
    }

    #[test]
    fn documents_group_children() {
        let src = "package p\n\nconst (\n\tA = 1\n\t// B is two.\n\tB = 2\n)\n";
        assert_eq!(
            run(src),
            "package p\n\nconst (\n\t// A ...\n\tA = 1\n\t// B is two.\n\tB = 2\n)\n"
        );
    }

    #[test]
    fn documented_file_is_unchanged() {
        let src = "package p\n\nimport \"fmt\"\n\n// Greet prints a greeting.\nfunc Greet() {\n\t// say it\n\tfmt.Println(\"hi\") // inline\n}\n\n// Answer is 42.\nconst Answer = 42\n";
        assert_eq!(run(src), src);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let src = "package p\n\n// T\ntype T struct{}\n\nfunc (t T) Get(key string) (string, bool) {\n\treturn \"\", false\n}\n\nvar (\n\tx = 1\n\t// y\n\ty = 2\n)\n";
        let once = run(src);
        let twice = run(&once);
        assert_eq!(once, twice);
        assert_eq!(run(&twice), twice);
        assert!(once.contains("// T ...\ntype T struct{}"));
        assert!(once.contains("\t// y ...\n\ty = 2"));
        assert!(once.contains("// returns:\n// #1: string\n// #2: bool\nfunc (t T) Get"));
    }
}
