use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::{
    meta::MetaIndex,
    tree::{NodeId, PathTree},
};

/// Column headings of a payload row
pub const COLUMNS: [&str; 7] = ["Name", "Size", "User", "Group", "Mode", "Link", "Timestamp"];

const S_IFMT: u16 = 0xF000;
const S_IFLNK: u16 = 0xA000;
const S_IFDIR: u16 = 0x4000;
const S_IFREG: u16 = 0x8000;

/// File type marker derived from a raw mode
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum FileType {
    /// A regular file
    Regular,
    /// A directory
    Directory,
    /// A symlink
    Symlink,
}

impl FileType {
    /// Classify a raw POSIX mode by its file type bits
    pub fn from_mode(mode: u16) -> Option<FileType> {
        match mode & S_IFMT {
            S_IFLNK => Some(FileType::Symlink),
            S_IFDIR => Some(FileType::Directory),
            S_IFREG => Some(FileType::Regular),
            _ => None,
        }
    }

    /// Single character marker, as `ls -l` prints it
    pub fn marker(self) -> char {
        match self {
            FileType::Regular => '-',
            FileType::Directory => 'd',
            FileType::Symlink => 'l',
        }
    }
}

/// Render the permission, setuid, setgid and sticky bits as 4 octal digits
pub fn format_mode(mode: Option<u16>) -> String {
    match mode {
        Some(mode) => format!("{:04o}", mode & 0o7777),
        None => String::new(),
    }
}

/// Render a byte count with "," between thousands
pub fn format_size(size: u64) -> String {
    let digits = size.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a timestamp in UTC
pub fn format_time(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Everything displayed for one tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Segment name
    pub name:      String,
    /// File size or directory total
    pub size:      u64,
    /// Owning user, empty if unknown
    pub owner:     String,
    /// Owning group, empty if unknown
    pub group:     String,
    /// Formatted mode, empty if unknown
    pub mode:      String,
    /// Symlink target, empty if none
    pub link:      String,
    /// Header timestamp, else the archive timestamp
    pub mtime:     Option<SystemTime>,
    /// File type from the mode
    pub file_type: Option<FileType>,
    /// No metadata is known for the path
    pub dimmed:    bool,
}

impl Row {
    /// The cells of the row, in [`COLUMNS`] order
    pub fn columns(&self) -> [String; 7] {
        [
            self.name.clone(),
            format_size(self.size),
            self.owner.clone(),
            self.group.clone(),
            self.mode.clone(),
            self.link.clone(),
            self.mtime.map(format_time).unwrap_or_default(),
        ]
    }
}

/// Lazily expandable view over a payload tree and its metadata
#[derive(Debug, Clone, Copy)]
pub struct TreeView<'a> {
    tree:  &'a PathTree,
    index: &'a MetaIndex,
}

impl<'a> TreeView<'a> {
    /// Create a view
    pub fn new(tree: &'a PathTree, index: &'a MetaIndex) -> Self {
        Self { tree, index }
    }

    /// The tree being shown
    pub fn tree(&self) -> &'a PathTree {
        self.tree
    }

    /// Top level nodes
    pub fn elements(&self) -> Vec<NodeId> {
        self.tree.children(self.tree.root())
    }

    /// Immediate children of a node
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.children(id)
    }

    /// Check if a node can be expanded
    pub fn has_children(&self, id: NodeId) -> bool {
        self.tree.has_children(id)
    }

    /// Nodes below `nodes` in display order, each with its depth.
    ///
    /// `max_depth` counts levels, so `Some(1)` yields only `nodes` and
    /// `Some(0)` yields nothing.
    pub fn walk(&self, nodes: Vec<NodeId>, max_depth: Option<usize>) -> Vec<(usize, NodeId)> {
        let mut out = Vec::new();
        self.walk_level(nodes, 0, max_depth, &mut out);
        out
    }

    fn walk_level(
        &self,
        nodes: Vec<NodeId>,
        depth: usize,
        max_depth: Option<usize>,
        out: &mut Vec<(usize, NodeId)>,
    ) {
        if max_depth.map_or(false, |m| depth >= m) {
            return;
        }
        for id in nodes {
            out.push((depth, id));
            if self.has_children(id) {
                self.walk_level(self.children(id), depth + 1, max_depth, out);
            }
        }
    }

    /// Build the display row of a node
    pub fn row(&self, id: NodeId) -> Row {
        let meta = self.index.get(&self.tree.full_path(id));
        let archived = self.tree.entry(id).and_then(|e| e.mtime);

        let mut row = Row {
            name:      self.tree.name(id).to_string(),
            size:      self.tree.size(id),
            owner:     String::new(),
            group:     String::new(),
            mode:      String::new(),
            link:      String::new(),
            mtime:     archived,
            file_type: None,
            dimmed:    meta.is_none(),
        };

        if let Some(meta) = meta {
            row.owner = meta.owner.clone().unwrap_or_default();
            row.group = meta.group.clone().unwrap_or_default();
            row.mode = format_mode(meta.mode);
            row.link = meta.link_target.clone().unwrap_or_default();
            row.mtime = meta.mtime.or(archived);
            row.file_type = meta.mode.and_then(FileType::from_mode);
        }

        row
    }
}
