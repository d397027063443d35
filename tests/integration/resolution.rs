use simfs::{FsError, Filesystem, NodeKind, Resolution, ResolveOptions, Seed};

fn seeded() -> Filesystem {
    Seed::default_seed().build().unwrap()
}

#[test]
fn root_resolves_without_parent() {
    let fs = seeded();
    assert_eq!(
        fs.lookup("/", None),
        Resolution::Found {
            target: fs.root(),
            parent: None,
            name: "/".to_string(),
        }
    );
}

#[test]
fn home_shorthand_and_empty_path_resolve_to_home() {
    let fs = seeded();
    assert_eq!(fs.lookup("~", None).target(), Some(fs.home()));
    assert_eq!(fs.lookup("", None).target(), Some(fs.home()));
    assert_eq!(
        fs.lookup("~/Documents", None).target(),
        fs.lookup("/home/user/Documents", None).target()
    );
}

#[test]
fn existing_chain_is_found_with_its_parent() {
    let fs = seeded();
    let user = fs.lookup_existing("/home/user").unwrap();
    match fs.lookup("/home/user/Documents", None) {
        Resolution::Found {
            target,
            parent,
            name,
        } => {
            assert_eq!(parent, Some(user));
            assert_eq!(name, "Documents");
            assert!(fs.node(target).unwrap().is_directory());
        }
        other => panic!("unexpected resolution {:?}", other),
    }
}

#[test]
fn missing_final_component_reports_its_parent() {
    let fs = seeded();
    let user = fs.lookup_existing("/home/user").unwrap();
    assert_eq!(
        fs.lookup("/home/user/fake_dir", None),
        Resolution::ParentFoundTargetMissing {
            parent: user,
            name: "fake_dir".to_string(),
        }
    );
}

#[test]
fn missing_intermediate_is_not_found() {
    let fs = seeded();
    let home = fs.lookup_existing("/home").unwrap();
    assert_eq!(
        fs.lookup("/home/fake_dir/user", None),
        Resolution::NotFound {
            parent: home,
            name: "fake_dir".to_string(),
        }
    );
}

#[test]
fn file_in_the_middle_is_not_a_directory() {
    let fs = seeded();
    let docs = fs.lookup_existing("~/Documents").unwrap();
    assert_eq!(
        fs.lookup("~/Documents/readme.txt/more", None),
        Resolution::NotADirectory {
            parent: docs,
            name: "readme.txt".to_string(),
        }
    );
}

#[test]
fn required_kind_mismatch() {
    let fs = seeded();
    let res = fs.lookup("~/Documents", Some(NodeKind::File));
    assert!(matches!(res, Resolution::TypeMismatch { .. }));
    assert_eq!(res.error(), Some(FsError::TypeMismatch("Documents".to_string())));
    assert!(fs.lookup("~/Documents/notes.md", Some(NodeKind::File)).is_found());
}

#[test]
fn create_intermediary_builds_everything_but_the_target() {
    let mut fs = Filesystem::empty();
    let res = fs.resolve("/a/b", ResolveOptions::new().create_intermediary());
    let a = fs.lookup_existing("/a").unwrap();
    assert_eq!(
        res,
        Resolution::ParentFoundTargetMissing {
            parent: a,
            name: "b".to_string(),
        }
    );
    assert!(!fs.lookup("/a/b", None).is_found());
    assert_eq!(fs.check_consistency(), Ok(2));
}

#[test]
fn dots_and_repeated_separators() {
    let mut fs = seeded();
    let docs = fs.lookup_existing("~/Documents").unwrap();
    fs.set_cwd(docs).unwrap();

    assert_eq!(fs.lookup(".", None).target(), Some(docs));
    assert_eq!(fs.lookup("..", None).target(), Some(fs.home()));
    assert_eq!(fs.lookup("./../Documents//.", None).target(), Some(docs));
    assert_eq!(fs.lookup("/../../..", None).target(), Some(fs.root()));
    assert_eq!(
        fs.lookup("///home///user//", None).target(),
        Some(fs.home())
    );
}

#[test]
fn relative_paths_follow_cwd() {
    let mut fs = seeded();
    let projects = fs.lookup_existing("~/projects").unwrap();
    fs.set_cwd(projects).unwrap();
    assert!(fs.lookup("hello/main.rs", Some(NodeKind::File)).is_found());
    assert_eq!(fs.current_path(), "/home/user/projects");
}
