use proptest::prelude::*;
use simfs::{FsError, Filesystem, NodeId, Resolution, ResolveOptions, Seed};

#[derive(Debug, Clone)]
enum Op {
    Mkdir(String),
    Touch(String),
    Write(String, String),
    Delete(String, bool),
    Copy(String, String, bool),
    Move(String, String),
    Cd(String),
}

fn component() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => prop::sample::select(vec!["a", "b", "c.txt", ".d"]).prop_map(str::to_string),
        1 => Just("..".to_string()),
        1 => Just(".".to_string()),
    ]
}

fn path() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "/", "~/", "/tmp/"]),
        prop::collection::vec(component(), 1..4),
    )
        .prop_map(|(prefix, parts)| format!("{}{}", prefix, parts.join("/")))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        path().prop_map(Op::Mkdir),
        path().prop_map(Op::Touch),
        (path(), "[a-z]{0,8}").prop_map(|(p, text)| Op::Write(p, text)),
        (path(), any::<bool>()).prop_map(|(p, r)| Op::Delete(p, r)),
        (path(), path(), any::<bool>()).prop_map(|(s, d, r)| Op::Copy(s, d, r)),
        (path(), path()).prop_map(|(s, d)| Op::Move(s, d)),
        path().prop_map(Op::Cd),
    ]
}

/// Apply an operation; operations whose operands do not resolve are skipped.
fn apply(fs: &mut Filesystem, op: &Op) -> Result<(), FsError> {
    match op {
        Op::Mkdir(p) => {
            if let Resolution::ParentFoundTargetMissing { parent, name } =
                fs.resolve(p, ResolveOptions::new().create_intermediary())
            {
                fs.create_directory(parent, &name)?;
            }
        }
        Op::Touch(p) => {
            if let Resolution::ParentFoundTargetMissing { parent, name } = fs.lookup(p, None) {
                fs.create_file(parent, &name, "")?;
            }
        }
        Op::Write(p, text) => {
            if let Ok(id) = fs.lookup_existing(p) {
                fs.set_content(id, text.as_str())?;
            }
        }
        Op::Delete(p, recursive) => {
            if let Ok(id) = fs.lookup_existing(p) {
                fs.delete_subtree(id, *recursive)?;
            }
        }
        Op::Copy(s, d, recursive) => {
            if let Ok(id) = fs.lookup_existing(s) {
                let destination = fs.lookup(d, None);
                fs.copy(id, &destination, *recursive)?;
            }
        }
        Op::Move(s, d) => {
            if let Ok(id) = fs.lookup_existing(s) {
                let destination = fs.lookup(d, None);
                fs.move_node(id, &destination)?;
            }
        }
        Op::Cd(p) => {
            if let Ok(id) = fs.lookup_existing(p) {
                fs.set_cwd(id)?;
            }
        }
    }
    Ok(())
}

fn all_nodes(fs: &Filesystem) -> Vec<NodeId> {
    let mut nodes = Vec::new();
    let mut stack = vec![fs.root()];
    while let Some(id) = stack.pop() {
        nodes.push(id);
        if fs.node(id).unwrap().is_directory() {
            stack.extend(fs.children(id).unwrap());
        }
    }
    nodes
}

fn snapshot(fs: &Filesystem) -> (String, Vec<(String, Option<String>)>) {
    let entries = all_nodes(fs)
        .into_iter()
        .map(|id| {
            (
                fs.absolute_path(id).unwrap(),
                fs.content(id).ok().map(str::to_string),
            )
        })
        .collect();
    (fs.current_path(), entries)
}

proptest! {
    #[test]
    fn random_mutations_keep_tree_consistent(ops in prop::collection::vec(op(), 1..40)) {
        let mut fs = Seed::default_seed().build().unwrap();
        for op in &ops {
            let before = snapshot(&fs);
            let result = apply(&mut fs, op);
            prop_assert!(fs.check_consistency().is_ok(), "{:?}: {:?}", op, fs.check_consistency());
            if result.is_err() {
                prop_assert_eq!(&before, &snapshot(&fs), "failed {:?} mutated the tree", op);
            }
        }
    }

    #[test]
    fn absolute_paths_resolve_back_to_their_node(ops in prop::collection::vec(op(), 0..30)) {
        let mut fs = Seed::default_seed().build().unwrap();
        for op in &ops {
            let _ = apply(&mut fs, op);
        }
        for id in all_nodes(&fs) {
            let path = fs.absolute_path(id).unwrap();
            let resolution = fs.lookup(&path, None);
            prop_assert!(resolution.is_found(), "{} -> {:?}", path, resolution);
            prop_assert_eq!(resolution.target(), Some(id));
        }
    }

    #[test]
    fn resolving_twice_gives_the_same_answer(
        ops in prop::collection::vec(op(), 0..20),
        probe in path(),
    ) {
        let mut fs = Seed::default_seed().build().unwrap();
        for op in &ops {
            let _ = apply(&mut fs, op);
        }
        let first = fs.lookup(&probe, None);
        let second = fs.lookup(&probe, None);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &fs.resolve(&probe, ResolveOptions::new()));
    }
}
