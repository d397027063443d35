use simfs::tooling::shell::{Shell, STATUS_FAILURE, STATUS_NOT_FOUND};
use simfs::Seed;

fn session() -> Shell {
    Shell::new(Seed::default_seed().build().unwrap(), false)
}

fn run_all(shell: &mut Shell, lines: &[&str]) -> String {
    let mut stdout = String::new();
    for line in lines {
        let out = shell.execute(line);
        assert!(out.success(), "{} failed: {}", line, out.stderr);
        stdout.push_str(&out.stdout);
    }
    stdout
}

#[test]
fn organize_documents() {
    let mut sh = session();
    let out = run_all(
        &mut sh,
        &[
            "mkdir -p archive/2024",
            "cp Documents/readme.txt Documents/notes.md archive/2024",
            "mv Documents/notes.md Documents/todo.md",
            "write Documents/todo.md ship it",
            "cd archive/2024",
            "pwd",
            "ls",
            "cat ../../Documents/todo.md",
        ],
    );
    assert_eq!(out, "/home/user/archive/2024\nreadme.txt  notes.md\nship it\n");
    assert!(sh.execute("validate").success());
}

#[test]
fn errors_map_to_messages() {
    let mut sh = session();
    let cases = [
        ("cat nope.txt", "cat: no such file or directory: nope.txt\n"),
        ("cd Documents/readme.txt", "cd: not a directory: readme.txt\n"),
        ("rm Documents", "rm: directory not empty: Documents\n"),
        (
            "cp projects /tmp",
            "cp: projects is a directory (recursive flag required)\n",
        ),
        (
            "cp -r projects /etc/motd",
            "cp: cannot overwrite non-directory motd with a directory\n",
        ),
        (
            "mv Documents/readme.txt Documents/notes.md Pictures/x",
            "mv: target x is not a directory\n",
        ),
        ("mkdir Downloads", "mkdir: an entry named Downloads already exists\n"),
        ("rm -r /", "rm: / is protected and cannot be removed or moved\n"),
        ("touch /etc/motd/x", "touch: not a directory: motd\n"),
    ];
    for (line, expected) in cases {
        let out = sh.execute(line);
        assert_eq!(out.status, STATUS_FAILURE, "{}", line);
        assert_eq!(out.stderr, expected, "{}", line);
    }
    assert!(sh.execute("validate").success());
}

#[test]
fn partial_failures_keep_going() {
    let mut sh = session();
    let out = sh.execute("rm Downloads missing Pictures");
    assert_eq!(out.status, STATUS_FAILURE);
    assert_eq!(out.stderr, "rm: no such file or directory: missing\n");
    assert!(!sh.filesystem().lookup("~/Downloads", None).is_found());
    assert!(!sh.filesystem().lookup("~/Pictures", None).is_found());
}

#[test]
fn hidden_files_and_tree() {
    let mut sh = session();
    assert_eq!(sh.execute("ls").stdout, "Documents  Downloads  Pictures  projects\n");
    assert_eq!(
        sh.execute("ls -a").stdout,
        ".bashrc  Documents  Downloads  Pictures  projects\n"
    );
    assert_eq!(
        sh.execute("tree projects").stdout,
        "projects\n└── hello\n    └── main.rs\n\n1 directory, 1 file\n"
    );
}

#[test]
fn unknown_commands_are_127() {
    let mut sh = session();
    assert_eq!(sh.execute("sudo rm -r /").status, STATUS_NOT_FOUND);
}
