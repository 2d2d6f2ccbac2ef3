use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// One file record from the package payload archive
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Slash separated path, usually relative to "."
    pub path:  String,
    /// Size of the file in bytes
    pub size:  u64,
    /// Modification time recorded by the archive
    pub mtime: Option<SystemTime>,
}

impl ArchiveEntry {
    /// Create an entry
    pub fn new<S: Into<String>>(path: S, size: u64, mtime: Option<SystemTime>) -> Self {
        Self {
            path: path.into(),
            size,
            mtime,
        }
    }

    /// The path segments the entry is filed under.
    ///
    /// One leading "./" is stripped, then the rest is split on "/". Empty and
    /// "." segments are dropped and ".." removes the segment before it, so the
    /// result agrees with a lexically cleaned path. An entry naming "." or ""
    /// has no segments.
    pub fn segments(&self) -> Vec<&str> {
        let path = self.path.strip_prefix("./").unwrap_or(&self.path);
        let mut segments = Vec::new();
        for seg in path.split('/') {
            match seg {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => segments.push(seg),
            }
        }
        segments
    }
}

/// Convert epoch seconds into a point in time, before or after the epoch
pub fn epoch_seconds(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    }
}
