use simfs::{FsError, Filesystem, Seed};

fn seeded() -> Filesystem {
    Seed::default_seed().build().unwrap()
}

fn count(fs: &Filesystem) -> usize {
    fs.check_consistency().unwrap()
}

#[test]
fn deleting_root_leaves_tree_unchanged() {
    let mut fs = seeded();
    let before = count(&fs);
    let root = fs.root();
    assert_eq!(
        fs.delete_subtree(root, true),
        Err(FsError::Protected("/".to_string()))
    );
    assert_eq!(count(&fs), before);
}

#[test]
fn deleting_cwd_or_its_ancestor_is_refused() {
    let mut fs = seeded();
    let hello = fs.lookup_existing("~/projects/hello").unwrap();
    fs.set_cwd(hello).unwrap();

    let projects = fs.lookup_existing("~/projects").unwrap();
    assert!(matches!(
        fs.delete_subtree(projects, true),
        Err(FsError::AncestorOfCwd(_))
    ));
    assert!(matches!(
        fs.delete_subtree(hello, true),
        Err(FsError::AncestorOfCwd(_))
    ));
}

#[test]
fn sibling_with_shared_prefix_is_not_an_ancestor() {
    let mut fs = seeded();
    let home = fs.home();
    let dir = fs.create_directory(home, "proj").unwrap();
    let other = fs.create_directory(home, "proj-old").unwrap();
    fs.set_cwd(other).unwrap();
    assert_eq!(fs.delete_subtree(dir, false), Ok(1));
}

#[test]
fn recursive_delete_removes_whole_subtree() {
    let mut fs = seeded();
    let before = count(&fs);
    let docs = fs.lookup_existing("~/Documents").unwrap();
    assert!(matches!(
        fs.delete_subtree(docs, false),
        Err(FsError::NotEmpty(_))
    ));
    assert_eq!(fs.delete_subtree(docs, true), Ok(3));
    assert_eq!(count(&fs), before - 3);
    assert!(matches!(fs.node(docs), Err(FsError::StaleNode(_))));
}

#[test]
fn copy_file_into_directory_and_onto_file() {
    let mut fs = seeded();
    let readme = fs.lookup_existing("~/Documents/readme.txt").unwrap();

    let into_tmp = fs.lookup("/tmp", None);
    let copy = fs.copy(readme, &into_tmp, false).unwrap();
    assert_eq!(fs.absolute_path(copy).unwrap(), "/tmp/readme.txt");
    assert_eq!(fs.content(copy), fs.content(readme));

    let onto_notes = fs.lookup("~/Documents/notes.md", None);
    let replaced = fs.copy(readme, &onto_notes, false).unwrap();
    assert_eq!(fs.absolute_path(replaced).unwrap(), "/home/user/Documents/notes.md");
    assert_eq!(fs.content(replaced), fs.content(readme));
    assert_eq!(fs.node(replaced).unwrap().extension(), Some("md"));

    assert!(matches!(
        fs.copy(readme, &into_tmp, false),
        Err(FsError::DuplicateName(_))
    ));
}

#[test]
fn copy_directory_rules() {
    let mut fs = seeded();
    let projects = fs.lookup_existing("~/projects").unwrap();

    let new_name = fs.lookup("/tmp/backup", None);
    assert!(matches!(
        fs.copy(projects, &new_name, false),
        Err(FsError::RecursiveRequired(_))
    ));

    let onto_file = fs.lookup("/etc/motd", None);
    assert!(matches!(
        fs.copy(projects, &onto_file, true),
        Err(FsError::DirectoryOntoFile(_))
    ));

    let backup = fs.copy(projects, &new_name, true).unwrap();
    assert!(fs.lookup("/tmp/backup/hello/main.rs", None).is_found());
    assert_ne!(Some(backup), fs.lookup("~/projects", None).target());
    count(&fs);
}

#[test]
fn many_sources_need_a_directory() {
    let mut fs = seeded();
    let readme = fs.lookup_existing("~/Documents/readme.txt").unwrap();
    let notes = fs.lookup_existing("~/Documents/notes.md").unwrap();

    let missing = fs.lookup("/tmp/nowhere", None);
    assert!(matches!(
        fs.copy_many(&[readme, notes], &missing, false),
        Err(FsError::MultipleSourcesInvalidDestination(_))
    ));

    let onto_file = fs.lookup("/etc/motd", None);
    assert!(matches!(
        fs.move_many(&[readme, notes], &onto_file),
        Err(FsError::MultipleSourcesInvalidDestination(_))
    ));

    let tmp = fs.lookup("/tmp", None);
    let moved = fs.move_many(&[readme, notes], &tmp).unwrap();
    assert_eq!(moved, vec![readme, notes]);
    assert_eq!(fs.absolute_path(notes).unwrap(), "/tmp/notes.md");
    assert_eq!(fs.children(fs.lookup_existing("~/Documents").unwrap()), Ok(vec![]));
}

#[test]
fn move_into_own_subtree_changes_nothing() {
    let mut fs = seeded();
    let before = count(&fs);
    let projects = fs.lookup_existing("~/projects").unwrap();

    let inside = fs.lookup("~/projects/hello", None);
    assert!(matches!(
        fs.move_node(projects, &inside),
        Err(FsError::SelfContainment(_))
    ));
    let deeper = fs.lookup("~/projects/hello/new", None);
    assert!(matches!(
        fs.move_node(projects, &deeper),
        Err(FsError::SelfContainment(_))
    ));
    assert_eq!(count(&fs), before);
    assert_eq!(fs.absolute_path(projects).unwrap(), "/home/user/projects");
}

#[test]
fn move_keeps_identity_and_renames() {
    let mut fs = seeded();
    let hello = fs.lookup_existing("~/projects/hello").unwrap();
    let dest = fs.lookup("/tmp/greeting", None);
    assert_eq!(fs.move_node(hello, &dest), Ok(hello));
    assert_eq!(fs.absolute_path(hello).unwrap(), "/tmp/greeting");
    assert!(fs.lookup("/tmp/greeting/main.rs", None).is_found());
    assert!(!fs.lookup("~/projects/hello", None).is_found());
}

#[test]
fn move_root_is_protected() {
    let mut fs = seeded();
    let root = fs.root();
    let dest = fs.lookup("/tmp", None);
    assert!(matches!(fs.move_node(root, &dest), Err(FsError::Protected(_))));
}
