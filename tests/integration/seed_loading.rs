use simfs::config::SimfsConfig;
use simfs::{ApiError, NodeKind, Seed, SeedEntry};
use std::fs;
use tempfile::TempDir;

#[test]
fn default_seed_builds_a_consistent_tree() {
    let fs = Seed::default_seed().build().unwrap();
    assert_eq!(fs.current_path(), "/home/user");
    assert!(fs.check_consistency().is_ok());
    for path in ["/bin", "/tmp", "/etc/hostname", "~/.bashrc", "~/Pictures"] {
        assert!(fs.lookup(path, None).is_found(), "{} missing", path);
    }
}

#[test]
fn toml_seed_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("seed.toml");
    fs::write(
        &path,
        r#"
home = "/users/ada"

[[entries]]
path = "~/notes/today.md"
content = "write the seed loader"

[[entries]]
path = "/srv/www"

[[entries]]
path = "/srv/empty.log"
kind = "file"
"#,
    )
    .unwrap();

    let seed = Seed::from_path(&path).unwrap();
    assert_eq!(seed.entries[0].kind(), NodeKind::File);
    assert_eq!(seed.entries[1].kind(), NodeKind::Directory);

    let tree = seed.build().unwrap();
    assert_eq!(tree.current_path(), "/users/ada");
    let today = tree.lookup_existing("~/notes/today.md").unwrap();
    assert_eq!(tree.content(today), Ok("write the seed loader"));
    let log = tree.lookup_existing("/srv/empty.log").unwrap();
    assert_eq!(tree.content(log), Ok(""));
}

#[test]
fn json_seed_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("seed.json");
    let seed = Seed {
        home: "/home/bob".to_string(),
        entries: vec![
            SeedEntry::directory("/opt"),
            SeedEntry::file("~/todo.txt", "milk"),
        ],
    };
    fs::write(&path, serde_json::to_string(&seed).unwrap()).unwrap();

    let loaded = Seed::from_path(&path).unwrap();
    assert_eq!(loaded, seed);
    let tree = loaded.build().unwrap();
    assert!(tree.lookup("/home/bob/todo.txt", Some(NodeKind::File)).is_found());
}

#[test]
fn conflicting_entries_are_rejected() {
    let seed = Seed {
        home: "/home/user".to_string(),
        entries: vec![
            SeedEntry::file("/etc/hosts", "127.0.0.1"),
            SeedEntry::directory("/etc/hosts"),
        ],
    };
    assert!(matches!(seed.build(), Err(ApiError::SeedError(_))));

    let through_file = Seed {
        home: "/home/user".to_string(),
        entries: vec![
            SeedEntry::file("/etc/hosts", ""),
            SeedEntry::file("/etc/hosts/inner", ""),
        ],
    };
    assert!(matches!(through_file.build(), Err(ApiError::SeedError(_))));
}

#[test]
fn repeated_directories_are_accepted() {
    let seed = Seed {
        home: "/home/user".to_string(),
        entries: vec![
            SeedEntry::directory("/var/log"),
            SeedEntry::directory("/var/log"),
            SeedEntry::directory("/var"),
        ],
    };
    let tree = seed.build().unwrap();
    assert_eq!(tree.check_consistency(), Ok(5));
}

#[test]
fn unreadable_seed_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "entries = 3").unwrap();
    assert!(matches!(Seed::from_path(&path), Err(ApiError::SeedError(_))));
    assert!(matches!(
        Seed::from_path(&temp_dir.path().join("absent.toml")),
        Err(ApiError::SeedError(_))
    ));
}

#[test]
fn config_points_at_seed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("seed.toml");
    fs::write(&path, "[[entries]]\npath = \"/data\"\n").unwrap();
    let config = SimfsConfig {
        seed: Some(path),
        home: Some("/root".to_string()),
        ..SimfsConfig::default()
    };
    let tree = config.load_seed().unwrap().build().unwrap();
    assert_eq!(tree.current_path(), "/root");
    assert!(tree.lookup("/data", Some(NodeKind::Directory)).is_found());
    assert!(!tree.lookup("/etc", None).is_found());
}
