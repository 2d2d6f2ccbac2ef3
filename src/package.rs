use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    os::unix::fs::MetadataExt,
    path::Path,
};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::{
    deps::{dependencies, Dependency, DependencyKind},
    entry::{epoch_seconds, ArchiveEntry},
    error::PackageError,
    header::{tag, Header, HeaderValue},
    meta::MetaIndex,
    tree::PathTree,
    view::TreeView,
    FORMAT_VERSION,
};

const TYPE_NAMES: &[(u16, &str)] = &[(0, "BINARY"), (1, "SOURCE")];

const ARCH_NAMES: &[(u16, &str)] = &[
    (1, "INTEL"),
    (2, "ALPHA"),
    (3, "SPARC"),
    (4, "MIPS"),
    (5, "PPC"),
    (6, "M68K"),
    (7, "SGI"),
    (8, "RS6000"),
    (9, "IA64"),
    (11, "MIPS64"),
    (12, "ARM"),
    (13, "M68KMINT"),
    (14, "S390"),
    (15, "S390X"),
    (16, "PPC64"),
    (17, "SH"),
    (18, "XTENSA"),
    (19, "AARCH64"),
];

const OS_NAMES: &[(u16, &str)] = &[
    (1, "LINUX"),
    (2, "IRIX"),
    (3, "SOLARIS"),
    (4, "SUNOS"),
    (5, "AMIGAOS"),
    (6, "AIX"),
    (7, "HPUX10"),
    (8, "OSF1"),
    (9, "FREEBSD"),
    (10, "SCO"),
];

fn enum_format(names: &[(u16, &str)], value: u16) -> String {
    match names.iter().find(|(v, _)| *v == value) {
        Some((_, name)) => format!("{} (0x{:02X})", name, value),
        None => format!("0x{:02X}", value),
    }
}

/// The fixed identification block at the start of a package
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Lead {
    /// Package name, "name-version-release"
    pub name:              String,
    /// Lead format major version
    pub major:             u8,
    /// Lead format minor version
    pub minor:             u8,
    /// Binary (0) or source (1)
    pub kind:              u16,
    /// Architecture number
    pub arch:              u16,
    /// Operating system number
    pub os:                u16,
    /// Signature format version
    pub signature_version: u16,
}

impl Lead {
    /// Labelled fields for the lead overview
    pub fn overview(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Type", enum_format(TYPE_NAMES, self.kind)),
            ("Architecture", enum_format(ARCH_NAMES, self.arch)),
            ("O/S", enum_format(OS_NAMES, self.os)),
            ("Lead Version", format!("{}.{}", self.major, self.minor)),
            ("Signature Version", self.signature_version.to_string()),
        ]
    }
}

/// A decoded package: lead, headers and the payload archive listing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Package {
    version:       u32,
    /// The lead
    pub lead:      Lead,
    /// The signature header
    pub signature: Header,
    /// The main header
    pub header:    Header,
    /// Payload entries in archive order
    pub files:     Vec<ArchiveEntry>,
}

fn get_package_version(buf: &[u8]) -> Result<u32> {
    let contents: serde_yaml::Mapping = serde_yaml::from_slice(buf)?;
    let version = contents
        .get(&serde_yaml::Value::String("version".to_string()))
        .ok_or(PackageError::NoVersion)?;
    if let serde_yaml::Value::Number(ver) = version {
        Ok(ver.as_u64().ok_or(PackageError::VersionType)? as u32)
    } else {
        Err(PackageError::VersionType.into())
    }
}

impl Package {
    /// Create a package with empty headers and no payload
    pub fn new(lead: Lead) -> Self {
        Self {
            version: FORMAT_VERSION,
            lead,
            signature: Header::new(),
            header: Header::new(),
            files: Vec::new(),
        }
    }

    /// Load a package description
    pub fn load<R: Read>(mut input: R) -> Result<Package> {
        let mut buf = Vec::new();
        input.read_to_end(&mut buf)?;

        // Check the version first, the full deserialization fails if fields have changed.
        let ver = get_package_version(&buf)?;
        if ver != FORMAT_VERSION {
            return Err(PackageError::VersionMismatch {
                expected: FORMAT_VERSION,
                found:    ver,
            }
            .into());
        }

        let res: Package = serde_yaml::from_slice(&buf)?;
        debug!(name = %res.lead.name, files = res.files.len(), "loaded package description");
        Ok(res)
    }

    /// Write the package description out
    pub fn store<W: Write>(&self, mut output: W) -> Result<()> {
        output.write_all(&serde_yaml::to_vec(self)?)?;
        output.flush()?;
        Ok(())
    }

    /// Load a package description from a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Package> {
        Self::load(BufReader::new(File::open(path)?))
    }

    /// Write the package description to a file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.store(BufWriter::new(File::create(path)?))
    }

    /// Build the payload tree
    pub fn tree(&self) -> PathTree {
        PathTree::build(self.files.iter().cloned())
    }

    /// Build the per-path file metadata
    pub fn index(&self) -> MetaIndex {
        MetaIndex::from_header(&self.header)
    }

    /// Read one dependency list
    pub fn dependencies(&self, kind: DependencyKind) -> Vec<Dependency> {
        dependencies(&self.header, kind)
    }

    /// Describe a staged directory as a package.
    ///
    /// Every object below `root` becomes a payload entry named "./<relative
    /// path>" and gets a row in the header's file columns, owned by
    /// `owner:group`.
    pub fn from_dir<P: AsRef<Path>>(root: P, name: &str, owner: &str, group: &str) -> Result<Package> {
        let root = root.as_ref();
        let mut package = Package::new(Lead {
            name: name.to_string(),
            major: 3,
            minor: 0,
            os: 1,
            signature_version: 5,
            ..Default::default()
        });

        let mut dirs: BTreeMap<String, i32> = BTreeMap::new();
        let mut basenames = Vec::new();
        let mut dir_indexes = Vec::new();
        let mut modes = Vec::new();
        let mut mtimes = Vec::new();
        let mut links = Vec::new();
        let mut sizes = Vec::new();

        for ent in WalkDir::new(root)
            .min_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let ent = ent?;
            let meta = ent.path().symlink_metadata()?;
            let rel = ent
                .path()
                .strip_prefix(root)?
                .to_str()
                .ok_or(PackageError::StringConversion)?
                .to_string();

            let (dirname, basename) = match rel.rfind('/') {
                Some(i) => (format!("/{}/", &rel[..i]), rel[i + 1..].to_string()),
                None => ("/".to_string(), rel.clone()),
            };
            let next = dirs.len() as i32;
            let dir_index = *dirs.entry(dirname).or_insert(next);

            let link = if meta.file_type().is_symlink() {
                fs::read_link(ent.path())?
                    .to_str()
                    .ok_or(PackageError::StringConversion)?
                    .to_string()
            } else {
                String::new()
            };
            let size = if meta.is_file() {
                meta.len()
            } else {
                link.len() as u64
            };

            package.files.push(ArchiveEntry::new(
                format!("./{}", rel),
                size,
                Some(epoch_seconds(meta.mtime())),
            ));
            basenames.push(basename);
            dir_indexes.push(dir_index);
            modes.push(meta.mode() as u16);
            mtimes.push(i32::try_from(meta.mtime()).unwrap_or_else(|_| {
                debug!(path = %rel, mtime = meta.mtime(), "mtime out of range, clamped");
                if meta.mtime() < 0 {
                    i32::MIN
                } else {
                    i32::MAX
                }
            }));
            links.push(link);
            sizes.push(size);
        }

        let mut dirnames = vec![String::new(); dirs.len()];
        for (dir, idx) in dirs {
            dirnames[idx as usize] = dir;
        }
        let count = basenames.len();

        let header = &mut package.header;
        header.insert(tag::NAME, HeaderValue::String(name.to_string()));
        header.insert(tag::BASENAMES, HeaderValue::StringArray(basenames));
        header.insert(tag::DIRNAMES, HeaderValue::StringArray(dirnames));
        header.insert(tag::DIRINDEXES, HeaderValue::Int32(dir_indexes));
        header.insert(tag::FILEMODES, HeaderValue::Int16(modes));
        header.insert(tag::FILEMTIMES, HeaderValue::Int32(mtimes));
        header.insert(tag::FILELINKTOS, HeaderValue::StringArray(links));
        // Sizes go to the 64 bit tag once any of them outgrows 32 bits
        let short: Result<Vec<i32>, _> = sizes.iter().map(|s| i32::try_from(*s)).collect();
        match short {
            Ok(sizes) => header.insert(tag::FILESIZES, HeaderValue::Int32(sizes)),
            Err(_) => header.insert(
                tag::LONGFILESIZES,
                HeaderValue::Int64(
                    sizes
                        .iter()
                        .map(|s| i64::try_from(*s).unwrap_or(i64::MAX))
                        .collect(),
                ),
            ),
        }
        header.insert(tag::FILEUSERNAME, HeaderValue::StringArray(vec![owner.to_string(); count]));
        header.insert(tag::FILEGROUPNAME, HeaderValue::StringArray(vec![group.to_string(); count]));

        debug!(root = %root.display(), files = count, "scanned staged directory");
        Ok(package)
    }
}

/// A package with its payload tree and metadata built, ready for display
#[derive(Debug)]
pub struct LoadedPackage {
    /// The package description
    pub package: Package,
    /// The payload tree
    pub tree:    PathTree,
    /// File metadata by path
    pub index:   MetaIndex,
}

impl LoadedPackage {
    /// Build the tree and index of a package
    pub fn new(package: Package) -> Self {
        let tree = package.tree();
        let index = package.index();
        Self { package, tree, index }
    }

    /// Load a package description from a file and build its tree and index.
    ///
    /// Nothing is replaced on failure, so a caller can keep showing the
    /// previous package.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Package::open(path)?))
    }

    /// A view over the payload
    pub fn view(&self) -> TreeView<'_> {
        TreeView::new(&self.tree, &self.index)
    }
}
