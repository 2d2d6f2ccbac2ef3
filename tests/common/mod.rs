#![allow(dead_code)]

use std::{
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use rpmview::{tag, ArchiveEntry, Header, HeaderValue, Lead, Package};
use tempfile::TempDir;

pub struct Fixture {
    path:     PathBuf,
    _tempdir: TempDir,
}

impl Fixture {
    pub fn blank(fixture_filename: &str) -> Self {
        // The "real" path of the file is going to be under a temporary directory:
        let tempdir = tempfile::tempdir().unwrap();
        let mut path = PathBuf::from(&tempdir.path());
        path.push(fixture_filename);

        Fixture {
            _tempdir: tempdir,
            path,
        }
    }

    pub fn dir(&self) -> PathBuf {
        self._tempdir.path().to_owned()
    }
}

impl From<&Fixture> for PathBuf {
    fn from(f: &Fixture) -> Self {
        f.path.to_owned()
    }
}

/// Path of a checked in package description under `tests/data/`
pub fn data(name: &str) -> PathBuf {
    let root_dir = &env::var("CARGO_MANIFEST_DIR").expect("$CARGO_MANIFEST_DIR");
    let mut source = PathBuf::from(root_dir);
    source.push("tests/data");
    source.push(name);
    source
}

pub fn at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

pub fn entry(path: &str, size: u64) -> ArchiveEntry {
    ArchiveEntry::new(path, size, None)
}

pub fn strings(values: &[&str]) -> HeaderValue {
    HeaderValue::StringArray(values.iter().map(|s| s.to_string()).collect())
}

/// A small package: /etc/app.conf, /usr/bin/app and a /usr/bin/app-link symlink
pub fn sample_package() -> Package {
    let mut package = Package::new(Lead {
        name: "app-1.0-1".to_string(),
        major: 3,
        minor: 0,
        kind: 0,
        arch: 1,
        os: 1,
        signature_version: 5,
    });

    let mut header = Header::new();
    header.insert(tag::NAME, HeaderValue::String("app".to_string()));
    header.insert(tag::BASENAMES, strings(&["app.conf", "app", "app-link"]));
    header.insert(tag::DIRNAMES, strings(&["/etc/", "/usr/bin/"]));
    header.insert(tag::DIRINDEXES, HeaderValue::Int32(vec![0, 1, 1]));
    header.insert(tag::FILEUSERNAME, strings(&["root", "root", "root"]));
    header.insert(tag::FILEGROUPNAME, strings(&["root", "wheel", "root"]));
    header.insert(tag::FILEMODES, HeaderValue::Int16(vec![0o100644, 0o104755, 0o120777]));
    header.insert(tag::FILELINKTOS, strings(&["", "", "app"]));
    header.insert(tag::FILEMTIMES, HeaderValue::Int32(vec![1000, 2000, 3000]));
    package.header = header;

    package.files = vec![
        ArchiveEntry::new("./etc/app.conf", 120, Some(at(10))),
        ArchiveEntry::new("./usr/bin/app", 4096, Some(at(20))),
        ArchiveEntry::new("./usr/bin/app-link", 3, Some(at(30))),
        ArchiveEntry::new("./usr/share/doc/app/README", 512, Some(at(40))),
    ];
    package
}

pub fn write_file(dir: &PathBuf, rel: &str, contents: &[u8]) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}
