//! Go parser backed by tree-sitter-go.
//!
//! Lowers the concrete syntax tree into the declaration model:
//! - `function_declaration` / `method_declaration` → [`FuncDecl`]
//! - `type_declaration` → [`TypeDecl`]
//! - `const_declaration` / `var_declaration` → [`ValueDecl`], or
//!   [`ValueGroup`] when the specs are wrapped in `( ... )`
//! - `import_declaration` → [`OtherDecl`]
//!
//! Comments are grouped the way the Go toolchain groups them, and a group
//! becomes a node's doc comment when it ends on the line right above it.

use super::ParseOptions;
use crate::error::{Error, ParseError, SyntaxError};
use crate::model::*;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Parse Go source text into a [`SourceFile`].
pub fn parse(path: &Path, source: &str, options: ParseOptions) -> Result<SourceFile, Error> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into())?;

    let tree = parser.parse(source, None).ok_or_else(|| ParseError {
        path: path.to_path_buf(),
        errors: vec![SyntaxError {
            line: 1,
            column: 1,
            message: "parser produced no tree".into(),
        }],
    })?;
    let root = tree.root_node();

    let mut errors = Vec::new();
    collect_syntax_errors(root, source, &mut errors);

    let groups = if options.comments {
        let mut nodes = Vec::new();
        collect_comments(root, &mut nodes);
        group_comments(source, &nodes)
    } else {
        Vec::new()
    };

    let mut lowering = Lowering {
        source,
        groups: &groups,
        next_id: 1,
    };
    let mut package: Option<String> = None;
    let mut decls = Vec::new();

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        let kind = node.kind();
        if kind == "comment" || node.is_error() || node.is_missing() {
            continue;
        }
        if kind == "package_clause" {
            package = node
                .named_child(0)
                .map(|n| lowering.text(n).to_string());
            continue;
        }
        if package.is_none() {
            errors.push(syntax_error(
                node,
                format!("expected 'package', found {}", describe(node, source)),
            ));
            continue;
        }
        match kind {
            "function_declaration" | "method_declaration" => {
                decls.push(Decl::Func(lowering.func_decl(node)));
            }
            "type_declaration" => decls.push(Decl::Type(lowering.type_decl(node))),
            "const_declaration" => decls.push(lowering.value_decl(node, ValueKind::Const)),
            "var_declaration" => decls.push(lowering.value_decl(node, ValueKind::Var)),
            "import_declaration" => decls.push(Decl::Other(OtherDecl {
                id: lowering.next_id(),
                pos: pos_of(node),
                doc: lowering.doc_for(node),
            })),
            _ => errors.push(syntax_error(
                node,
                "non-declaration statement outside function body".into(),
            )),
        }
    }

    if package.is_none() && errors.is_empty() {
        errors.push(SyntaxError {
            line: 1,
            column: 1,
            message: "expected 'package' clause".into(),
        });
    }

    if !errors.is_empty() {
        errors.sort_by_key(|e| (e.line, e.column));
        errors.dedup();
        if !options.all_errors {
            errors.truncate(1);
        }
        return Err(ParseError {
            path: path.to_path_buf(),
            errors,
        }
        .into());
    }

    let comments: Vec<CommentGroup> = groups.into_iter().map(|g| g.group).collect();
    Ok(SourceFile {
        path: path.to_path_buf(),
        source: source.to_string(),
        package: package.unwrap_or_default(),
        decls,
        parsed_comments: comments.clone(),
        comments,
    })
}

// -- Syntax errors ------------------------------------------------------------

fn collect_syntax_errors(node: Node, source: &str, errors: &mut Vec<SyntaxError>) {
    if node.is_error() {
        errors.push(syntax_error(
            node,
            format!("syntax error: unexpected {}", describe(node, source)),
        ));
        return;
    }
    if node.is_missing() {
        errors.push(syntax_error(
            node,
            format!("syntax error: missing {}", node.kind()),
        ));
        return;
    }
    if !node.has_error() {
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_syntax_errors(child, source, errors);
    }
}

fn syntax_error(node: Node, message: String) -> SyntaxError {
    let point = node.start_position();
    SyntaxError {
        line: point.row + 1,
        column: point.column + 1,
        message,
    }
}

/// Short quoted excerpt of a node for error messages.
fn describe(node: Node, source: &str) -> String {
    let text = source[node.byte_range()].lines().next().unwrap_or("").trim();
    if text.is_empty() {
        return node.kind().to_string();
    }
    let excerpt: String = text.chars().take(24).collect();
    format!("'{}'", excerpt)
}

// -- Comments -----------------------------------------------------------------

/// A comment group plus the byte span and placement used for doc lookup.
struct SpannedGroup {
    group: CommentGroup,
    start: usize,
    end: usize,
    /// First comment starts its own line (no code before it on the line).
    leading: bool,
}

fn collect_comments<'t>(node: Node<'t>, out: &mut Vec<Node<'t>>) {
    if node.kind() == "comment" {
        out.push(node);
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_comments(child, out);
    }
}

fn starts_own_line(source: &str, offset: usize) -> bool {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..offset].trim().is_empty()
}

/// Group adjacent comments. A leading group keeps taking comments on the
/// following line; a trailing group only takes comments on its own line.
fn group_comments(source: &str, nodes: &[Node]) -> Vec<SpannedGroup> {
    let mut groups: Vec<SpannedGroup> = Vec::new();
    for node in nodes {
        let (start, end) = (node.start_byte(), node.end_byte());
        let comment = Comment::new(Pos::from_offset(start), &source[start..end]);

        if let Some(current) = groups.last_mut() {
            let gap = &source[current.end..start];
            let max_newlines = if current.leading { 1 } else { 0 };
            if gap.trim().is_empty() && gap.matches('\n').count() <= max_newlines {
                current.group.list.push(comment);
                current.end = end;
                continue;
            }
        }

        groups.push(SpannedGroup {
            group: CommentGroup::new(vec![comment]),
            start,
            end,
            leading: starts_own_line(source, start),
        });
    }
    groups
}

// -- Lowering -----------------------------------------------------------------

fn pos_of(node: Node) -> Pos {
    Pos::from_offset(node.start_byte())
}

struct Lowering<'a> {
    source: &'a str,
    groups: &'a [SpannedGroup],
    next_id: u32,
}

impl<'a> Lowering<'a> {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn text(&self, node: Node) -> &'a str {
        &self.source[node.byte_range()]
    }

    fn field_text(&self, node: Node, field: &str) -> String {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
            .unwrap_or_default()
    }

    fn names(&self, node: Node) -> Vec<String> {
        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| self.text(n).to_string())
            .collect();
        names
    }

    /// The comment group ending on the line directly above `node`, if it
    /// starts its own line.
    fn doc_for(&self, node: Node) -> Option<CommentGroup> {
        let start = node.start_byte();
        let idx = self.groups.partition_point(|g| g.end <= start);
        let candidate = self.groups[..idx].last()?;
        if !candidate.leading || candidate.start >= start {
            return None;
        }
        let gap = &self.source[candidate.end..start];
        if gap.trim().is_empty() && gap.matches('\n').count() == 1 {
            Some(candidate.group.clone())
        } else {
            None
        }
    }

    fn func_decl(&mut self, node: Node) -> FuncDecl {
        let params = node
            .child_by_field_name("parameters")
            .map(|p| self.fields(p))
            .unwrap_or_default();
        let results = node.child_by_field_name("result").map(|r| {
            if r.kind() == "parameter_list" {
                self.fields(r)
            } else {
                vec![Field {
                    names: Vec::new(),
                    type_text: self.text(r).to_string(),
                }]
            }
        });
        FuncDecl {
            id: self.next_id(),
            name: self.field_text(node, "name"),
            pos: pos_of(node),
            doc: self.doc_for(node),
            params,
            results,
        }
    }

    fn fields(&self, list: Node) -> Vec<Field> {
        let mut cursor = list.walk();
        let fields = list
            .named_children(&mut cursor)
            .filter_map(|param| {
                let variadic = match param.kind() {
                    "parameter_declaration" => false,
                    "variadic_parameter_declaration" => true,
                    _ => return None,
                };
                let type_text = self.field_text(param, "type");
                Some(Field {
                    names: self.names(param),
                    type_text: if variadic {
                        format!("...{}", type_text)
                    } else {
                        type_text
                    },
                })
            })
            .collect();
        fields
    }

    fn type_decl(&mut self, node: Node) -> TypeDecl {
        let mut cursor = node.walk();
        let names = node
            .named_children(&mut cursor)
            .filter(|c| matches!(c.kind(), "type_spec" | "type_alias"))
            .map(|spec| self.field_text(spec, "name"))
            .collect();
        TypeDecl {
            id: self.next_id(),
            names,
            pos: pos_of(node),
            doc: self.doc_for(node),
        }
    }

    fn value_decl(&mut self, node: Node, kind: ValueKind) -> Decl {
        let spec_kind = match kind {
            ValueKind::Const => "const_spec",
            ValueKind::Var => "var_spec",
        };
        let mut specs = Vec::new();
        let mut grouped = false;
        collect_specs(node, spec_kind, &mut specs, &mut grouped);

        let id = self.next_id();
        if !grouped {
            return Decl::Value(ValueDecl {
                id,
                kind,
                names: specs.first().map(|s| self.names(*s)).unwrap_or_default(),
                pos: pos_of(node),
                doc: self.doc_for(node),
            });
        }

        let doc = self.doc_for(node);
        let specs = specs
            .into_iter()
            .map(|spec| ValueSpec {
                id: self.next_id(),
                names: self.names(spec),
                pos: pos_of(spec),
                doc: self.doc_for(spec),
            })
            .collect();
        Decl::Group(ValueGroup {
            id,
            kind,
            pos: pos_of(node),
            doc,
            specs,
        })
    }
}

/// Collect value specs, looking through `var_spec_list` wrappers, and note
/// whether a `(` token wraps them.
fn collect_specs<'t>(node: Node<'t>, spec_kind: &str, specs: &mut Vec<Node<'t>>, grouped: &mut bool) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "(" => *grouped = true,
            k if k == spec_kind => specs.push(child),
            "var_spec_list" => collect_specs(child, spec_kind, specs, grouped),
            _ => {}
        }
    }
}
