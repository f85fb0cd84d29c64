//! Data model for one parsed Go source file.
//!
//! Declarations own their doc comments. The file-wide comment list is kept
//! sorted by position and is rebuilt from the [`CommentMap`](crate::cmap::CommentMap)
//! after declarations are annotated.

use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

/// Tool directives are not documentation: `//go:generate`, `//line f.go:1`, ...
static RE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^//(?:line |extern |export |[a-z0-9]+:[a-z0-9])").unwrap()
});

/// Byte position in a single file, 1-based. `Pos::NONE` means "no position".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(usize);

impl Pos {
    pub const NONE: Pos = Pos(0);

    pub fn from_offset(offset: usize) -> Self {
        Pos(offset + 1)
    }

    /// Zero-based byte offset, or `None` for `Pos::NONE`.
    pub fn offset(self) -> Option<usize> {
        self.0.checked_sub(1)
    }

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// The position one byte before `self`.
    pub fn before(self) -> Pos {
        Pos(self.0.saturating_sub(1))
    }
}

/// Identity of a documentable node. `NodeId::FILE` is the file itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const FILE: NodeId = NodeId(0);
}

/// A single `//` or `/* */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub pos: Pos,
    /// Verbatim comment text including markers. May span several lines
    /// when synthesized.
    pub text: String,
    /// True when the comment did not come from the parsed source.
    pub synthesized: bool,
}

impl Comment {
    pub fn new(pos: Pos, text: impl Into<String>) -> Self {
        Comment {
            pos,
            text: text.into(),
            synthesized: false,
        }
    }

    pub fn synthesized(pos: Pos, text: impl Into<String>) -> Self {
        Comment {
            pos,
            text: text.into(),
            synthesized: true,
        }
    }
}

/// A run of adjacent comments with no blank line or code between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
}

impl CommentGroup {
    pub fn new(list: Vec<Comment>) -> Self {
        CommentGroup { list }
    }

    pub fn pos(&self) -> Pos {
        self.list.first().map(|c| c.pos).unwrap_or(Pos::NONE)
    }

    /// Comment text without markers, directives, or surrounding blank lines.
    pub fn text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for comment in &self.list {
            let raw = comment.text.trim_start();
            if let Some(body) = raw.strip_prefix("/*") {
                let body = body.strip_suffix("*/").unwrap_or(body);
                lines.extend(body.lines().map(|l| l.trim_end().to_string()));
                continue;
            }
            // Synthesized comments hold several `//` lines in one text
            for line in raw.lines() {
                let line = line.trim_start();
                if RE_DIRECTIVE.is_match(line) {
                    continue;
                }
                let body = line.strip_prefix("//").unwrap_or(line);
                let body = body.strip_prefix(' ').unwrap_or(body);
                lines.push(body.trim_end().to_string());
            }
        }

        while lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return String::new();
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

/// One function or method parameter / result group: `a, b int` or `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<String>,
    pub type_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Const,
    Var,
}

impl ValueKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ValueKind::Const => "const",
            ValueKind::Var => "var",
        }
    }
}

/// `func Name(params) results` or a method.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    pub id: NodeId,
    pub name: String,
    pub pos: Pos,
    pub doc: Option<CommentGroup>,
    pub params: Vec<Field>,
    /// `None` when the signature has no result list at all.
    pub results: Option<Vec<Field>>,
}

/// `type Name ...`. A parenthesized type block keeps every spec name; only
/// the first one is documented.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub id: NodeId,
    pub names: Vec<String>,
    pub pos: Pos,
    pub doc: Option<CommentGroup>,
}

/// An ungrouped `const A = 1` or `var a, b int`.
#[derive(Debug, Clone)]
pub struct ValueDecl {
    pub id: NodeId,
    pub kind: ValueKind,
    pub names: Vec<String>,
    pub pos: Pos,
    pub doc: Option<CommentGroup>,
}

/// One entry inside a parenthesized `const ( ... )` / `var ( ... )` block.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub id: NodeId,
    pub names: Vec<String>,
    pub pos: Pos,
    pub doc: Option<CommentGroup>,
}

/// A parenthesized `const` / `var` block.
#[derive(Debug, Clone)]
pub struct ValueGroup {
    pub id: NodeId,
    pub kind: ValueKind,
    pub pos: Pos,
    pub doc: Option<CommentGroup>,
    pub specs: Vec<ValueSpec>,
}

/// Imports and anything else that is never documented.
#[derive(Debug, Clone)]
pub struct OtherDecl {
    pub id: NodeId,
    pub pos: Pos,
    pub doc: Option<CommentGroup>,
}

/// Top-level declaration.
#[derive(Debug, Clone)]
pub enum Decl {
    Func(FuncDecl),
    Type(TypeDecl),
    Value(ValueDecl),
    Group(ValueGroup),
    Other(OtherDecl),
}

/// A node that can carry a doc comment.
pub trait Documented {
    fn id(&self) -> NodeId;
    fn pos(&self) -> Pos;
    fn doc(&self) -> Option<&CommentGroup>;
    fn set_doc(&mut self, doc: CommentGroup);
}

macro_rules! impl_documented {
    ($($ty:ty),*) => {
        $(impl Documented for $ty {
            fn id(&self) -> NodeId {
                self.id
            }
            fn pos(&self) -> Pos {
                self.pos
            }
            fn doc(&self) -> Option<&CommentGroup> {
                self.doc.as_ref()
            }
            fn set_doc(&mut self, doc: CommentGroup) {
                self.doc = Some(doc);
            }
        })*
    };
}

impl_documented!(FuncDecl, TypeDecl, ValueDecl, ValueSpec, ValueGroup, OtherDecl);

impl Decl {
    /// Every documentable node in this declaration, the declaration first.
    pub fn nodes(&self) -> Vec<&dyn Documented> {
        match self {
            Decl::Func(d) => vec![d as &dyn Documented],
            Decl::Type(d) => vec![d as &dyn Documented],
            Decl::Value(d) => vec![d as &dyn Documented],
            Decl::Group(g) => {
                let mut nodes: Vec<&dyn Documented> = vec![g as &dyn Documented];
                nodes.extend(g.specs.iter().map(|s| s as &dyn Documented));
                nodes
            }
            Decl::Other(d) => vec![d as &dyn Documented],
        }
    }
}

/// One parsed Go source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Original source text; positions index into it.
    pub source: String,
    pub package: String,
    pub decls: Vec<Decl>,
    /// Canonical comment list, sorted by position.
    pub comments: Vec<CommentGroup>,
    /// Comment groups as they appeared in the source, before any rewrite.
    pub parsed_comments: Vec<CommentGroup>,
}

impl SourceFile {
    /// Ids of every node still reachable from the file.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = vec![NodeId::FILE];
        for decl in &self.decls {
            ids.extend(decl.nodes().iter().map(|n| n.id()));
        }
        ids
    }
}
