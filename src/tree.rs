use std::{
    collections::BTreeMap,
    path::{Component, Path},
};

use lexiclean::Lexiclean;
use tracing::debug;

use crate::entry::ArchiveEntry;

/// Handle of a node inside a [`PathTree`]
#[derive(Debug, Eq, PartialEq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct NodeId(usize);

/// The type of a tree node
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum NodeKind {
    /// A directory
    Directory,
    /// A file backed by an archive entry
    File,
}

#[derive(Debug, Clone)]
enum NodeContent {
    /// A directory maps segment names to children and tracks the total size
    /// of every file below it
    Directory {
        children: BTreeMap<String, NodeId>,
        size:     u64,
    },
    /// A file wraps its archive entry
    File(ArchiveEntry),
}

#[derive(Debug, Clone)]
struct Node {
    name:    String,
    parent:  Option<NodeId>,
    content: NodeContent,
}

impl Node {
    fn size(&self) -> u64 {
        match &self.content {
            NodeContent::Directory { size, .. } => *size,
            NodeContent::File(entry) => entry.size,
        }
    }
}

/// Directory tree built from the payload archive entries.
///
/// Nodes live in an arena and refer to their parent by id. A node replaced by
/// a colliding insertion keeps its slot but is no longer reachable from the
/// root.
#[derive(Debug, Clone)]
pub struct PathTree {
    nodes: Vec<Node>,
}

const ROOT: NodeId = NodeId(0);

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PathTree {
    /// Create a tree holding only the root directory
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name:    String::new(),
                parent:  None,
                content: NodeContent::Directory {
                    children: BTreeMap::new(),
                    size:     0,
                },
            }],
        }
    }

    /// Build a tree from entries in archive order
    pub fn build<I: IntoIterator<Item = ArchiveEntry>>(entries: I) -> Self {
        let mut tree = Self::new();
        for entry in entries {
            tree.insert(entry);
        }
        tree
    }

    /// The root directory
    pub fn root(&self) -> NodeId {
        ROOT
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn push(&mut self, name: &str, parent: NodeId, content: NodeContent) -> NodeId {
        self.nodes.push(Node {
            name: name.to_string(),
            parent: Some(parent),
            content,
        });
        NodeId(self.nodes.len() - 1)
    }

    fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        match &self.node(dir).content {
            NodeContent::Directory { children, .. } => children.get(name).copied(),
            NodeContent::File(_) => None,
        }
    }

    fn link(&mut self, dir: NodeId, name: &str, child: NodeId) {
        if let NodeContent::Directory { children, .. } = &mut self.nodes[dir.0].content {
            children.insert(name.to_string(), child);
        }
    }

    /// Apply a signed size change to every directory on `path`
    fn adjust(&mut self, path: &[NodeId], add: u64, remove: u64) {
        for id in path {
            if let NodeContent::Directory { size, .. } = &mut self.nodes[id.0].content {
                *size = *size + add - remove;
            }
        }
    }

    /// Insert an archive entry as a file node.
    ///
    /// Intermediate segments become directories, replacing a file already
    /// filed under that name. The final segment replaces whatever node was
    /// there. Every directory on the way has its size grown by the entry size,
    /// minus the size of anything replaced. Entries whose path has no segments
    /// are skipped.
    pub fn insert(&mut self, entry: ArchiveEntry) {
        let segments: Vec<String> = entry.segments().iter().map(|s| s.to_string()).collect();
        let (last, dirs) = match segments.split_last() {
            Some(split) => split,
            None => {
                debug!(path = %entry.path, "skipping archive entry without a path");
                return;
            }
        };

        let mut path = vec![ROOT];
        let mut cur = ROOT;
        for seg in dirs {
            cur = match self.child(cur, seg) {
                Some(id) => {
                    if let NodeContent::File(old) = &self.node(id).content {
                        debug!(path = %old.path, "file shadowed by a directory");
                        let lost = old.size;
                        self.adjust(&path, 0, lost);
                        let dir = self.push(seg, cur, NodeContent::Directory {
                            children: BTreeMap::new(),
                            size:     0,
                        });
                        self.link(cur, seg, dir);
                        dir
                    } else {
                        id
                    }
                }
                None => {
                    let dir = self.push(seg, cur, NodeContent::Directory {
                        children: BTreeMap::new(),
                        size:     0,
                    });
                    self.link(cur, seg, dir);
                    dir
                }
            };
            path.push(cur);
        }

        if let Some(old) = self.child(cur, last) {
            let lost = self.node(old).size();
            self.adjust(&path, 0, lost);
        }
        let size = entry.size;
        let file = self.push(last, cur, NodeContent::File(entry));
        self.link(cur, last, file);
        self.adjust(&path, size, 0);
    }

    /// The segment name of a node, empty for the root
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    /// The parent directory of a node, `None` for the root
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The absolute path of a node, "" for the root
    pub fn full_path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n);
            if node.parent.is_some() {
                names.push(node.name.as_str());
            }
            cur = node.parent;
        }
        names.iter().rev().fold(String::new(), |mut acc, name| {
            acc.push('/');
            acc.push_str(name);
            acc
        })
    }

    /// The size of a file, or the sum of all file sizes below a directory
    pub fn size(&self, id: NodeId) -> u64 {
        self.node(id).size()
    }

    /// The type of a node
    pub fn kind(&self, id: NodeId) -> NodeKind {
        match self.node(id).content {
            NodeContent::Directory { .. } => NodeKind::Directory,
            NodeContent::File(_) => NodeKind::File,
        }
    }

    /// The archive entry backing a file node
    pub fn entry(&self, id: NodeId) -> Option<&ArchiveEntry> {
        match &self.node(id).content {
            NodeContent::File(entry) => Some(entry),
            NodeContent::Directory { .. } => None,
        }
    }

    /// The children of a directory in name order, empty for files
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.node(id).content {
            NodeContent::Directory { children, .. } => children.values().copied().collect(),
            NodeContent::File(_) => Vec::new(),
        }
    }

    /// Check if a node has anything to expand
    pub fn has_children(&self, id: NodeId) -> bool {
        match &self.node(id).content {
            NodeContent::Directory { children, .. } => !children.is_empty(),
            NodeContent::File(_) => false,
        }
    }

    /// Get a node by name within a directory
    pub fn lookup(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.child(parent, name)
    }

    /// Get the node at a path.
    ///
    /// Relative paths are taken from the root and the path is cleaned
    /// lexically first, so "a/b", "./a/b" and "/a/../a/b" agree.
    pub fn select<P: AsRef<Path>>(&self, path: P) -> Option<NodeId> {
        let path = Path::new("/").join(path.as_ref()).lexiclean();
        let mut ino = ROOT;
        for ent in path.components() {
            match ent {
                Component::RootDir | Component::CurDir => {}
                Component::Normal(name) => ino = self.lookup(ino, name.to_str()?)?,
                _ => return None,
            }
        }
        Some(ino)
    }

    /// Number of file nodes reachable from the root
    pub fn file_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            match &self.node(id).content {
                NodeContent::Directory { children, .. } => stack.extend(children.values()),
                NodeContent::File(_) => count += 1,
            }
        }
        count
    }
}
