use crate::header::{tag, Header};

/// Comparison and qualifier bits of a dependency
#[allow(missing_docs)]
pub mod flags {
    pub const LESS: u32 = 1 << 1;
    pub const GREATER: u32 = 1 << 2;
    pub const EQUAL: u32 = 1 << 3;
    pub const PREREQ: u32 = 1 << 6;
    pub const INTERP: u32 = 1 << 8;
    pub const SCRIPT_PRE: u32 = 1 << 9;
    pub const SCRIPT_POST: u32 = 1 << 10;
    pub const SCRIPT_PREUN: u32 = 1 << 11;
    pub const SCRIPT_POSTUN: u32 = 1 << 12;
    pub const RPMLIB: u32 = 1 << 24;
    pub const CONFIG: u32 = 1 << 28;
}

const FLAG_NAMES: &[(u32, &str)] = &[
    (flags::LESS, "LESS"),
    (flags::GREATER, "GREATER"),
    (flags::EQUAL, "EQUAL"),
    (flags::PREREQ, "PREREQ"),
    (flags::INTERP, "INTERP"),
    (flags::SCRIPT_PRE, "SCRIPT_PRE"),
    (flags::SCRIPT_POST, "SCRIPT_POST"),
    (flags::SCRIPT_PREUN, "SCRIPT_PREUN"),
    (flags::SCRIPT_POSTUN, "SCRIPT_POSTUN"),
    (flags::RPMLIB, "RPMLIB"),
    (flags::CONFIG, "CONFIG"),
];

/// A named requirement or capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Capability name
    pub name:    String,
    /// Version compared against, may be empty
    pub version: String,
    /// Raw flag bits
    pub flags:   u32,
}

impl Dependency {
    /// The comparison operator, e.g. ">="
    pub fn op(&self) -> String {
        [(flags::LESS, '<'), (flags::GREATER, '>'), (flags::EQUAL, '=')]
            .iter()
            .filter(|(bit, _)| self.flags & bit != 0)
            .map(|(_, c)| *c)
            .collect()
    }

    /// Names of the known flags that are set
    pub fn flag_names(&self) -> String {
        FLAG_NAMES
            .iter()
            .filter(|(bit, _)| self.flags & bit != 0)
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The kinds of dependency lists a package carries
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum DependencyKind {
    /// Things the package needs
    Requirements,
    /// Things the package offers
    Provides,
    /// Things the package cannot be installed with
    Conflicts,
    /// Things the package replaces
    Obsoletes,
}

impl DependencyKind {
    /// All kinds in display order
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::Requirements,
        DependencyKind::Provides,
        DependencyKind::Conflicts,
        DependencyKind::Obsoletes,
    ];

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            DependencyKind::Requirements => "Requirements",
            DependencyKind::Provides => "Provides",
            DependencyKind::Conflicts => "Conflicts",
            DependencyKind::Obsoletes => "Obsoletes",
        }
    }

    fn tags(self) -> (u32, u32, u32) {
        match self {
            DependencyKind::Requirements => (tag::REQUIRENAME, tag::REQUIREVERSION, tag::REQUIREFLAGS),
            DependencyKind::Provides => (tag::PROVIDENAME, tag::PROVIDEVERSION, tag::PROVIDEFLAGS),
            DependencyKind::Conflicts => (tag::CONFLICTNAME, tag::CONFLICTVERSION, tag::CONFLICTFLAGS),
            DependencyKind::Obsoletes => (tag::OBSOLETENAME, tag::OBSOLETEVERSION, tag::OBSOLETEFLAGS),
        }
    }
}

/// Read one dependency list from a header.
///
/// Missing versions read as empty and missing flags as zero.
pub fn dependencies(header: &Header, kind: DependencyKind) -> Vec<Dependency> {
    let (name_tag, version_tag, flags_tag) = kind.tags();
    let names = header.strings(name_tag).unwrap_or_default();
    let versions = header.strings(version_tag).unwrap_or_default();
    let flag_bits = header.i32s(flags_tag).unwrap_or_default();

    names
        .iter()
        .enumerate()
        .map(|(i, name)| Dependency {
            name:    name.clone(),
            version: versions.get(i).cloned().unwrap_or_default(),
            flags:   flag_bits.get(i).map(|f| *f as u32).unwrap_or(0),
        })
        .collect()
}
