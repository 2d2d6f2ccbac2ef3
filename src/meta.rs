use std::{collections::HashMap, time::SystemTime};

use tracing::debug;

use crate::{
    entry::epoch_seconds,
    header::{tag, Header},
};

/// Ownership and permission data of one packaged file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRecord {
    /// Owning user name
    pub owner:       Option<String>,
    /// Owning group name
    pub group:       Option<String>,
    /// Raw POSIX mode, file type bits included
    pub mode:        Option<u16>,
    /// Symlink target
    pub link_target: Option<String>,
    /// Modification time from the header
    pub mtime:       Option<SystemTime>,
}

/// The parallel per-file arrays of a package header.
///
/// `basenames` and `dir_indexes` are addressed by file index, `dir_indexes`
/// points into `dirnames`. The optional columns may be shorter than the file
/// count, missing items read as absent.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FileColumns<'a> {
    pub basenames:   &'a [String],
    pub dirnames:    &'a [String],
    pub dir_indexes: &'a [i32],
    pub users:       Option<&'a [String]>,
    pub groups:      Option<&'a [String]>,
    pub modes:       Option<&'a [u16]>,
    pub links:       Option<&'a [String]>,
    pub mtimes:      Option<&'a [i32]>,
}

impl<'a> FileColumns<'a> {
    /// Pull the columns out of a header.
    ///
    /// Returns `None` when any of the three path columns is missing or holds
    /// the wrong value type.
    pub fn from_header(header: &'a Header) -> Option<Self> {
        Some(Self {
            basenames:   header.strings(tag::BASENAMES)?,
            dirnames:    header.strings(tag::DIRNAMES)?,
            dir_indexes: header.i32s(tag::DIRINDEXES)?,
            users:       header.strings(tag::FILEUSERNAME),
            groups:      header.strings(tag::FILEGROUPNAME),
            modes:       header.u16s(tag::FILEMODES),
            links:       header.strings(tag::FILELINKTOS),
            mtimes:      header.i32s(tag::FILEMTIMES),
        })
    }
}

fn column<T: Clone>(values: Option<&[T]>, i: usize) -> Option<T> {
    values?.get(i).cloned()
}

/// Join a directory name and a base name with exactly one separator
pub fn join_path(dirname: &str, basename: &str) -> String {
    if dirname.ends_with('/') {
        format!("{}{}", dirname, basename)
    } else {
        format!("{}/{}", dirname, basename)
    }
}

/// Maps absolute file paths to their attribute records
#[derive(Debug, Clone, Default)]
pub struct MetaIndex {
    records: HashMap<String, AttributeRecord>,
}

impl MetaIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from the file columns
    pub fn build(columns: &FileColumns) -> Self {
        let mut records = HashMap::with_capacity(columns.basenames.len());

        for (i, (basename, dir_index)) in columns
            .basenames
            .iter()
            .zip(columns.dir_indexes)
            .enumerate()
        {
            let dirname = match usize::try_from(*dir_index)
                .ok()
                .and_then(|d| columns.dirnames.get(d))
            {
                Some(d) => d,
                None => {
                    debug!(file = i, dir_index, "directory index out of range");
                    continue;
                }
            };

            records.insert(
                join_path(dirname, basename),
                AttributeRecord {
                    owner:       column(columns.users, i),
                    group:       column(columns.groups, i),
                    mode:        column(columns.modes, i),
                    link_target: column(columns.links, i),
                    mtime:       column(columns.mtimes, i).map(|t| epoch_seconds(t as i64)),
                },
            );
        }

        Self { records }
    }

    /// Build the index from a package header, empty if the header lacks the
    /// path columns
    pub fn from_header(header: &Header) -> Self {
        match FileColumns::from_header(header) {
            Some(columns) => Self::build(&columns),
            None => {
                debug!("header has no usable file path columns, no file metadata");
                Self::new()
            }
        }
    }

    /// Look up the record of an absolute path
    pub fn get(&self, path: &str) -> Option<&AttributeRecord> {
        self.records.get(path)
    }

    /// Number of indexed paths
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
