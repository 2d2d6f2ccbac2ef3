#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]

//! Browsing model for decoded RPM packages: lead, headers, dependencies and
//! the payload file tree.

pub use deps::{dependencies, flags, Dependency, DependencyKind};
pub use entry::{epoch_seconds, ArchiveEntry};
pub use error::PackageError;
pub use header::{sigtag, tag, to_hex, Header, HeaderKind, HeaderRow, HeaderValue};
pub use meta::{join_path, AttributeRecord, FileColumns, MetaIndex};
pub use package::{Lead, LoadedPackage, Package};
pub use tree::{NodeId, NodeKind, PathTree};
pub use view::{format_mode, format_size, format_time, FileType, Row, TreeView, COLUMNS};

/// Dependency lists stored in the header
mod deps;
/// Payload archive entries
mod entry;
/// Error codes
mod error;
/// Header values and the tag dictionaries
mod header;
/// Per-path file metadata from the header's file columns
mod meta;
/// The package description. Classes and methods.
mod package;
/// The payload directory tree
mod tree;
/// Row rendering for the payload tree
mod view;

const FORMAT_VERSION: u32 = 0;
