use pretty_assertions::assert_eq;
use rpmview::{epoch_seconds, join_path, tag, FileColumns, Header, HeaderValue, MetaIndex};

mod common;
use common::{at, strings};

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn dirname_with_trailing_slash() {
    let basenames = owned(&["f"]);
    let dirnames = owned(&["/etc/"]);
    let index = MetaIndex::build(&FileColumns {
        basenames:   &basenames,
        dirnames:    &dirnames,
        dir_indexes: &[0],
        ..Default::default()
    });
    assert_eq!(index.len(), 1);
    assert!(index.get("/etc/f").is_some());
    assert!(index.get("/etc//f").is_none());
}

#[test]
fn dirname_without_trailing_slash() {
    let basenames = owned(&["f"]);
    let dirnames = owned(&["/etc"]);
    let index = MetaIndex::build(&FileColumns {
        basenames:   &basenames,
        dirnames:    &dirnames,
        dir_indexes: &[0],
        ..Default::default()
    });
    assert!(index.get("/etc/f").is_some());
}

#[test]
fn join() {
    assert_eq!(join_path("/", "bin"), "/bin");
    assert_eq!(join_path("/usr", "bin"), "/usr/bin");
    assert_eq!(join_path("/usr/", "bin"), "/usr/bin");
}

#[test]
fn all_columns() {
    let basenames = owned(&["a", "b"]);
    let dirnames = owned(&["/x/", "/y/"]);
    let users = owned(&["alice", "bob"]);
    let groups = owned(&["staff", "wheel"]);
    let links = owned(&["", "a"]);
    let index = MetaIndex::build(&FileColumns {
        basenames:   &basenames,
        dirnames:    &dirnames,
        dir_indexes: &[1, 0],
        users:       Some(&users),
        groups:      Some(&groups),
        modes:       Some(&[0o100644, 0o120777]),
        links:       Some(&links),
        mtimes:      Some(&[100, 200]),
    });

    let a = index.get("/y/a").unwrap();
    assert_eq!(a.owner.as_deref(), Some("alice"));
    assert_eq!(a.group.as_deref(), Some("staff"));
    assert_eq!(a.mode, Some(0o100644));
    assert_eq!(a.link_target.as_deref(), Some(""));
    assert_eq!(a.mtime, Some(at(100)));

    let b = index.get("/x/b").unwrap();
    assert_eq!(b.owner.as_deref(), Some("bob"));
    assert_eq!(b.link_target.as_deref(), Some("a"));
    assert_eq!(b.mtime, Some(at(200)));
}

#[test]
fn short_optional_columns_read_as_absent() {
    let basenames = owned(&["a", "b", "c"]);
    let dirnames = owned(&["/"]);
    let users = owned(&["alice"]);
    let index = MetaIndex::build(&FileColumns {
        basenames:   &basenames,
        dirnames:    &dirnames,
        dir_indexes: &[0, 0, 0],
        users:       Some(&users),
        modes:       Some(&[0o100600, 0o100600]),
        ..Default::default()
    });
    assert_eq!(index.len(), 3);
    assert_eq!(index.get("/a").unwrap().owner.as_deref(), Some("alice"));
    assert_eq!(index.get("/b").unwrap().owner, None);
    assert_eq!(index.get("/b").unwrap().mode, Some(0o100600));
    let c = index.get("/c").unwrap();
    assert_eq!(c.mode, None);
    assert_eq!(c.group, None);
    assert_eq!(c.mtime, None);
}

#[test]
fn bad_dir_index_skips_record() {
    let basenames = owned(&["a", "b", "c"]);
    let dirnames = owned(&["/d/"]);
    let index = MetaIndex::build(&FileColumns {
        basenames:   &basenames,
        dirnames:    &dirnames,
        dir_indexes: &[0, 5, -1],
        ..Default::default()
    });
    assert_eq!(index.len(), 1);
    assert!(index.get("/d/a").is_some());
}

#[test]
fn negative_mtime() {
    let basenames = owned(&["old"]);
    let dirnames = owned(&["/"]);
    let index = MetaIndex::build(&FileColumns {
        basenames:   &basenames,
        dirnames:    &dirnames,
        dir_indexes: &[0],
        mtimes:      Some(&[-60]),
        ..Default::default()
    });
    assert_eq!(index.get("/old").unwrap().mtime, Some(epoch_seconds(-60)));
}

fn path_header() -> Header {
    let mut header = Header::new();
    header.insert(tag::BASENAMES, strings(&["f"]));
    header.insert(tag::DIRNAMES, strings(&["/etc/"]));
    header.insert(tag::DIRINDEXES, HeaderValue::Int32(vec![0]));
    header
}

#[test]
fn from_header() {
    let mut header = path_header();
    header.insert(tag::FILEMODES, HeaderValue::Int16(vec![0o100644]));
    let index = MetaIndex::from_header(&header);
    assert_eq!(index.get("/etc/f").unwrap().mode, Some(0o100644));
}

#[test]
fn missing_path_columns_give_empty_index() {
    for missing in [tag::BASENAMES, tag::DIRNAMES, tag::DIRINDEXES] {
        let mut header = path_header();
        header.tags.remove(&missing);
        assert!(MetaIndex::from_header(&header).is_empty());
    }
}

#[test]
fn wrong_column_types_give_empty_index() {
    let mut header = path_header();
    header.insert(tag::DIRNAMES, HeaderValue::String("/etc/".to_string()));
    assert!(MetaIndex::from_header(&header).is_empty());

    let mut header = path_header();
    header.insert(tag::DIRINDEXES, HeaderValue::Int16(vec![0]));
    assert!(MetaIndex::from_header(&header).is_empty());
}

#[test]
fn wrong_optional_type_reads_as_absent() {
    let mut header = path_header();
    header.insert(tag::FILEMODES, HeaderValue::Int32(vec![0o100644]));
    header.insert(tag::FILEUSERNAME, HeaderValue::String("root".to_string()));
    let index = MetaIndex::from_header(&header);
    let f = index.get("/etc/f").unwrap();
    assert_eq!(f.mode, None);
    assert_eq!(f.owner, None);
}
