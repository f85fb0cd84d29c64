//! Comment registry: which comment groups belong to which node.
//!
//! Keys are [`NodeId`]s, so the registry never borrows the tree. A doc
//! comment is associated with the node it documents; every other group
//! (floating comments, comments inside bodies, trailing comments) belongs
//! to [`NodeId::FILE`]. Flattening yields the canonical comment list,
//! sorted by position.

use crate::model::{CommentGroup, NodeId, Pos, SourceFile};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Default, Clone)]
pub struct CommentMap {
    map: BTreeMap<NodeId, Vec<CommentGroup>>,
}

impl CommentMap {
    /// Associate each group of `comments` with a node of `file`.
    pub fn new(file: &SourceFile, comments: &[CommentGroup]) -> Self {
        let mut doc_owner: HashMap<Pos, NodeId> = HashMap::new();
        for decl in &file.decls {
            for node in decl.nodes() {
                if let Some(doc) = node.doc() {
                    doc_owner.insert(doc.pos(), node.id());
                }
            }
        }

        let mut cmap = CommentMap::default();
        for group in comments {
            let owner = doc_owner
                .get(&group.pos())
                .copied()
                .unwrap_or(NodeId::FILE);
            cmap.map.entry(owner).or_default().push(group.clone());
        }
        cmap
    }

    pub fn get(&self, id: NodeId) -> Option<&[CommentGroup]> {
        self.map.get(&id).map(Vec::as_slice)
    }

    /// Replace every group associated with `id`.
    pub fn set(&mut self, id: NodeId, groups: Vec<CommentGroup>) {
        self.map.insert(id, groups);
    }

    /// Keep only the entries of nodes still reachable from `file`.
    pub fn filter(&self, file: &SourceFile) -> CommentMap {
        let live: HashSet<NodeId> = file.node_ids().into_iter().collect();
        CommentMap {
            map: self
                .map
                .iter()
                .filter(|(id, _)| live.contains(id))
                .map(|(id, groups)| (*id, groups.clone()))
                .collect(),
        }
    }

    /// All groups, sorted by position.
    pub fn comments(&self) -> Vec<CommentGroup> {
        let mut all: Vec<CommentGroup> = self.map.values().flatten().cloned().collect();
        all.sort_by_key(|g| g.pos());
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{self, ParseOptions};
    use crate::model::{Comment, Decl};
    use std::path::Path;

    fn parse(source: &str) -> SourceFile {
        parser::parse_file(Path::new("t.go"), source, ParseOptions::default()).unwrap()
    }

    #[test]
    fn empty_file_builds_empty_map() {
        let file = parse("package p\n");
        let cmap = CommentMap::new(&file, &file.comments);
        assert!(cmap.comments().is_empty());
    }

    #[test]
    fn doc_groups_belong_to_their_node() {
        let file = parse("package p\n\n// hello\n\n// Run runs.\nfunc Run() {}\n");
        let cmap = CommentMap::new(&file, &file.comments);
        let Decl::Func(fd) = &file.decls[0] else {
            panic!("expected func");
        };
        assert_eq!(cmap.get(fd.id).unwrap().len(), 1);
        assert_eq!(cmap.get(NodeId::FILE).unwrap().len(), 1);
        assert_eq!(cmap.comments().len(), 2);
    }

    #[test]
    fn set_replaces_and_flatten_sorts() {
        let file = parse("package p\n\n// A\nvar A = 1\n\n// tail\n");
        let mut cmap = CommentMap::new(&file, &file.comments);
        let Decl::Value(vd) = &file.decls[0] else {
            panic!("expected value");
        };
        let replacement = CommentGroup::new(vec![Comment::synthesized(
            vd.pos.before(),
            "// A ...",
        )]);
        cmap.set(vd.id, vec![replacement]);

        let flat = cmap.comments();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].list[0].text, "// A ...");
        assert_eq!(flat[1].list[0].text, "// tail");
        assert!(flat.windows(2).all(|w| w[0].pos() <= w[1].pos()));
    }

    #[test]
    fn filter_drops_dead_nodes() {
        let file = parse("package p\n\n// F does f.\nfunc F() {}\n");
        let mut cmap = CommentMap::new(&file, &file.comments);
        cmap.set(NodeId(999), vec![CommentGroup::new(vec![Comment::new(
            Pos::from_offset(1),
            "// orphan",
        )])]);
        let filtered = cmap.filter(&file);
        assert_eq!(filtered.comments().len(), 1);
        assert!(filtered.get(NodeId(999)).is_none());
    }
}
