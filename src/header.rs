use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tag numbers of the main package header used by this crate
#[allow(missing_docs)]
pub mod tag {
    pub const NAME: u32 = 1000;
    pub const VERSION: u32 = 1001;
    pub const RELEASE: u32 = 1002;
    pub const SUMMARY: u32 = 1004;
    pub const DESCRIPTION: u32 = 1005;
    pub const BUILDTIME: u32 = 1006;
    pub const BUILDHOST: u32 = 1007;
    pub const SIZE: u32 = 1009;
    pub const VENDOR: u32 = 1011;
    pub const LICENSE: u32 = 1014;
    pub const PACKAGER: u32 = 1015;
    pub const GROUP: u32 = 1016;
    pub const URL: u32 = 1020;
    pub const OS: u32 = 1021;
    pub const ARCH: u32 = 1022;
    pub const FILESIZES: u32 = 1028;
    pub const FILEMODES: u32 = 1030;
    pub const FILERDEVS: u32 = 1033;
    pub const FILEMTIMES: u32 = 1034;
    pub const FILEDIGESTS: u32 = 1035;
    pub const FILELINKTOS: u32 = 1036;
    pub const FILEFLAGS: u32 = 1037;
    pub const FILEUSERNAME: u32 = 1039;
    pub const FILEGROUPNAME: u32 = 1040;
    pub const SOURCERPM: u32 = 1044;
    pub const PROVIDENAME: u32 = 1047;
    pub const REQUIREFLAGS: u32 = 1048;
    pub const REQUIRENAME: u32 = 1049;
    pub const REQUIREVERSION: u32 = 1050;
    pub const CONFLICTFLAGS: u32 = 1053;
    pub const CONFLICTNAME: u32 = 1054;
    pub const CONFLICTVERSION: u32 = 1055;
    pub const RPMVERSION: u32 = 1064;
    pub const OBSOLETENAME: u32 = 1090;
    pub const PROVIDEFLAGS: u32 = 1112;
    pub const PROVIDEVERSION: u32 = 1113;
    pub const OBSOLETEFLAGS: u32 = 1114;
    pub const OBSOLETEVERSION: u32 = 1115;
    pub const DIRINDEXES: u32 = 1116;
    pub const BASENAMES: u32 = 1117;
    pub const DIRNAMES: u32 = 1118;
    pub const PAYLOADFORMAT: u32 = 1124;
    pub const PAYLOADCOMPRESSOR: u32 = 1125;
    pub const PAYLOADFLAGS: u32 = 1126;
    pub const LONGFILESIZES: u32 = 5008;
}

/// Tag numbers of the signature header
#[allow(missing_docs)]
pub mod sigtag {
    pub const DSA: u32 = 267;
    pub const RSA: u32 = 268;
    pub const SHA1: u32 = 269;
    pub const SHA256: u32 = 273;
    pub const SIZE: u32 = 1000;
    pub const PGP: u32 = 1002;
    pub const MD5: u32 = 1004;
    pub const GPG: u32 = 1005;
    pub const PAYLOADSIZE: u32 = 1007;
}

const TAG_NAMES: &[(u32, &str)] = &[
    (tag::NAME, "NAME"),
    (tag::VERSION, "VERSION"),
    (tag::RELEASE, "RELEASE"),
    (tag::SUMMARY, "SUMMARY"),
    (tag::DESCRIPTION, "DESCRIPTION"),
    (tag::BUILDTIME, "BUILDTIME"),
    (tag::BUILDHOST, "BUILDHOST"),
    (tag::SIZE, "SIZE"),
    (tag::VENDOR, "VENDOR"),
    (tag::LICENSE, "LICENSE"),
    (tag::PACKAGER, "PACKAGER"),
    (tag::GROUP, "GROUP"),
    (tag::URL, "URL"),
    (tag::OS, "OS"),
    (tag::ARCH, "ARCH"),
    (tag::FILESIZES, "FILESIZES"),
    (tag::FILEMODES, "FILEMODES"),
    (tag::FILERDEVS, "FILERDEVS"),
    (tag::FILEMTIMES, "FILEMTIMES"),
    (tag::FILEDIGESTS, "FILEDIGESTS"),
    (tag::FILELINKTOS, "FILELINKTOS"),
    (tag::FILEFLAGS, "FILEFLAGS"),
    (tag::FILEUSERNAME, "FILEUSERNAME"),
    (tag::FILEGROUPNAME, "FILEGROUPNAME"),
    (tag::SOURCERPM, "SOURCERPM"),
    (tag::PROVIDENAME, "PROVIDENAME"),
    (tag::REQUIREFLAGS, "REQUIREFLAGS"),
    (tag::REQUIRENAME, "REQUIRENAME"),
    (tag::REQUIREVERSION, "REQUIREVERSION"),
    (tag::CONFLICTFLAGS, "CONFLICTFLAGS"),
    (tag::CONFLICTNAME, "CONFLICTNAME"),
    (tag::CONFLICTVERSION, "CONFLICTVERSION"),
    (tag::RPMVERSION, "RPMVERSION"),
    (tag::OBSOLETENAME, "OBSOLETENAME"),
    (tag::PROVIDEFLAGS, "PROVIDEFLAGS"),
    (tag::PROVIDEVERSION, "PROVIDEVERSION"),
    (tag::OBSOLETEFLAGS, "OBSOLETEFLAGS"),
    (tag::OBSOLETEVERSION, "OBSOLETEVERSION"),
    (tag::DIRINDEXES, "DIRINDEXES"),
    (tag::BASENAMES, "BASENAMES"),
    (tag::DIRNAMES, "DIRNAMES"),
    (tag::PAYLOADFORMAT, "PAYLOADFORMAT"),
    (tag::PAYLOADCOMPRESSOR, "PAYLOADCOMPRESSOR"),
    (tag::PAYLOADFLAGS, "PAYLOADFLAGS"),
    (tag::LONGFILESIZES, "LONGFILESIZES"),
];

const SIGTAG_NAMES: &[(u32, &str)] = &[
    (sigtag::DSA, "DSA"),
    (sigtag::RSA, "RSA"),
    (sigtag::SHA1, "SHA1"),
    (sigtag::SHA256, "SHA256"),
    (sigtag::SIZE, "SIZE"),
    (sigtag::PGP, "PGP"),
    (sigtag::MD5, "MD5"),
    (sigtag::GPG, "GPG"),
    (sigtag::PAYLOADSIZE, "PAYLOADSIZE"),
];

/// Which tag dictionary a header uses
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum HeaderKind {
    /// The main package header
    Package,
    /// The signature header
    Signature,
}

impl HeaderKind {
    /// The symbolic name of a tag, if it is a known one
    pub fn tag_name(self, tag: u32) -> Option<&'static str> {
        let names = match self {
            HeaderKind::Package => TAG_NAMES,
            HeaderKind::Signature => SIGTAG_NAMES,
        };
        names.iter().find(|(t, _)| *t == tag).map(|(_, n)| *n)
    }
}

/// A decoded header value
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// No value
    Null,
    /// Character array
    Char(Vec<u8>),
    /// 8 bit integer array
    Int8(Vec<u8>),
    /// 16 bit integer array
    Int16(Vec<u16>),
    /// 32 bit integer array
    Int32(Vec<i32>),
    /// 64 bit integer array
    Int64(Vec<i64>),
    /// A single string
    String(String),
    /// Opaque binary data
    Bin(Vec<u8>),
    /// An array of strings
    StringArray(Vec<String>),
    /// A localizable string array
    I18nString(Vec<String>),
}

const HEX_LIMIT: usize = 200;

impl HeaderValue {
    /// The on-disk RPM type code of the value
    pub fn type_code(&self) -> u32 {
        match self {
            HeaderValue::Null => 0,
            HeaderValue::Char(_) => 1,
            HeaderValue::Int8(_) => 2,
            HeaderValue::Int16(_) => 3,
            HeaderValue::Int32(_) => 4,
            HeaderValue::Int64(_) => 5,
            HeaderValue::String(_) => 6,
            HeaderValue::Bin(_) => 7,
            HeaderValue::StringArray(_) => 8,
            HeaderValue::I18nString(_) => 9,
        }
    }

    /// Number of items held; binary data counts bytes
    pub fn count(&self) -> usize {
        match self {
            HeaderValue::Null => 0,
            HeaderValue::String(_) => 1,
            HeaderValue::Char(v) | HeaderValue::Int8(v) | HeaderValue::Bin(v) => v.len(),
            HeaderValue::Int16(v) => v.len(),
            HeaderValue::Int32(v) => v.len(),
            HeaderValue::Int64(v) => v.len(),
            HeaderValue::StringArray(v) | HeaderValue::I18nString(v) => v.len(),
        }
    }

    /// The individual items of an array value, rendered as text.
    ///
    /// Returns `None` for scalar and binary values.
    pub fn items(&self) -> Option<Vec<String>> {
        fn all<T: ToString>(v: &[T]) -> Vec<String> {
            v.iter().map(ToString::to_string).collect()
        }
        Some(match self {
            HeaderValue::Char(v) | HeaderValue::Int8(v) => all(v.as_slice()),
            HeaderValue::Int16(v) => all(v.as_slice()),
            HeaderValue::Int32(v) => all(v.as_slice()),
            HeaderValue::Int64(v) => all(v.as_slice()),
            HeaderValue::StringArray(v) | HeaderValue::I18nString(v) => v.clone(),
            _ => return None,
        })
    }

    /// Render the value for a single table cell
    pub fn render(&self) -> String {
        match self {
            HeaderValue::Null => String::new(),
            HeaderValue::String(s) => s.clone(),
            HeaderValue::Bin(data) => {
                let suffix = if data.len() > HEX_LIMIT { "…" } else { "" };
                to_hex(data, HEX_LIMIT) + suffix
            }
            _ => self.items().unwrap_or_default().join(", "),
        }
    }

    /// Borrow the value as a string array
    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            HeaderValue::StringArray(v) | HeaderValue::I18nString(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the value as a 32 bit integer array
    pub fn as_i32s(&self) -> Option<&[i32]> {
        match self {
            HeaderValue::Int32(v) => Some(v),
            _ => None,
        }
    }

    /// Borrow the value as a 16 bit integer array
    pub fn as_u16s(&self) -> Option<&[u16]> {
        match self {
            HeaderValue::Int16(v) => Some(v),
            _ => None,
        }
    }
}

/// Lowercase hex of at most `limit` bytes
pub fn to_hex(data: &[u8], limit: usize) -> String {
    hex::encode(&data[..data.len().min(limit)])
}

/// A decoded package or signature header
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// Values keyed by tag number
    pub tags: BTreeMap<u32, HeaderValue>,
}

impl Header {
    /// Create an empty header
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the value of a tag
    pub fn get(&self, tag: u32) -> Option<&HeaderValue> {
        self.tags.get(&tag)
    }

    /// Set the value of a tag
    pub fn insert(&mut self, tag: u32, value: HeaderValue) {
        self.tags.insert(tag, value);
    }

    /// Get a string array tag; any other type reads as missing
    pub fn strings(&self, tag: u32) -> Option<&[String]> {
        self.get(tag)?.as_strings()
    }

    /// Get a single string tag
    pub fn string(&self, tag: u32) -> Option<&str> {
        match self.get(tag)? {
            HeaderValue::String(s) => Some(s),
            HeaderValue::StringArray(v) | HeaderValue::I18nString(v) => v.first().map(|s| s.as_str()),
            _ => None,
        }
    }

    /// Get a 32 bit integer array tag; any other type reads as missing
    pub fn i32s(&self, tag: u32) -> Option<&[i32]> {
        self.get(tag)?.as_i32s()
    }

    /// Get a 16 bit integer array tag; any other type reads as missing
    pub fn u16s(&self, tag: u32) -> Option<&[u16]> {
        self.get(tag)?.as_u16s()
    }

    /// Build the rows of a header table, ordered by tag number
    pub fn rows(&self, kind: HeaderKind) -> Vec<HeaderRow> {
        self.tags
            .iter()
            .enumerate()
            .map(|(index, (tag, value))| {
                let children = match value.items() {
                    Some(items) if items.len() > 1 => items,
                    _ => Vec::new(),
                };
                HeaderRow {
                    tag: *tag,
                    name: kind.tag_name(*tag).unwrap_or_default().to_string(),
                    type_code: value.type_code(),
                    count: value.count(),
                    index,
                    value: value.render(),
                    children,
                }
            })
            .collect()
    }
}

/// One line of a header table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    /// Tag number
    pub tag:       u32,
    /// Tag name, empty if unknown
    pub name:      String,
    /// RPM type code
    pub type_code: u32,
    /// Item count
    pub count:     usize,
    /// Position of the entry within the header
    pub index:     usize,
    /// The rendered value
    pub value:     String,
    /// Expandable items, only for arrays of more than one
    pub children:  Vec<String>,
}
