//! Filesystem aggregate
//!
//! Owns the node arena together with the root, home and current working
//! directory handles. The resolver (`resolve.rs`) and the mutation layer
//! (`mutation.rs`) extend this type with their own `impl` blocks.

use crate::error::FsError;
use crate::path::{split_extension, split_path, validate_name};
use crate::tree::{Node, NodeArena};
use crate::types::{NodeId, NodeKind, SEPARATOR};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Home directory used by [`Filesystem::new`].
pub const DEFAULT_HOME: &str = "/home/user";

/// In-memory filesystem tree.
#[derive(Debug, Clone)]
pub struct Filesystem {
    arena: NodeArena,
    root: NodeId,
    home: NodeId,
    cwd: NodeId,
}

/// Serializable snapshot of a node, used by `stat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub path: String,
    pub name: String,
    pub full_name: String,
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub hidden: bool,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<usize>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Filesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem {
    /// Create a filesystem with an empty `/home/user` as home and cwd.
    pub fn new() -> Self {
        Self::from_components(&["home", "user"])
    }

    /// Create a filesystem holding only the root, which doubles as home.
    pub fn empty() -> Self {
        Self::from_components::<&str>(&[])
    }

    /// Create a filesystem whose home is the absolute path `home`.
    pub fn with_home(home: &str) -> Result<Self, FsError> {
        if !home.starts_with(SEPARATOR) {
            return Err(FsError::InvalidPath);
        }
        let components = split_path(home);
        for component in &components {
            validate_name(component)?;
        }
        Ok(Self::from_components(&components))
    }

    fn from_components<S: AsRef<str>>(components: &[S]) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::directory(SEPARATOR.to_string()));
        let mut home = root;
        for component in components {
            let dir = arena.insert(Node::directory(component.as_ref()));
            // Fresh directories under a fresh chain cannot collide.
            if arena.add_child(home, dir).is_ok() {
                home = dir;
            }
        }
        Self {
            arena,
            root,
            home,
            cwd: home,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn home(&self) -> NodeId {
        self.home
    }

    pub fn cwd(&self) -> NodeId {
        self.cwd
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub(crate) fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, FsError> {
        self.arena.get(id)
    }

    /// True if `id` is live and reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.arena
            .is_ancestor_or_self(self.root, id)
            .unwrap_or(false)
    }

    pub fn absolute_path(&self, id: NodeId) -> Result<String, FsError> {
        self.arena.absolute_path(id)
    }

    /// Absolute path of the current working directory.
    pub fn current_path(&self) -> String {
        self.arena
            .absolute_path(self.cwd)
            .unwrap_or_else(|_| SEPARATOR.to_string())
    }

    /// Make `id` the current working directory.
    pub fn set_cwd(&mut self, id: NodeId) -> Result<(), FsError> {
        let node = self.arena.get(id)?;
        if !node.is_directory() {
            return Err(FsError::NotADirectory(node.full_name()));
        }
        if !self.is_attached(id) {
            return Err(FsError::NotFound(node.full_name()));
        }
        self.cwd = id;
        Ok(())
    }

    /// Construct a node and attach it under `parent`.
    ///
    /// For files `name` is the full name; the extension is split off.
    pub fn create_node(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind,
        content: Option<&str>,
    ) -> Result<NodeId, FsError> {
        validate_name(name)?;
        if self.arena.has_child(parent, name)? {
            return Err(FsError::DuplicateName(name.to_string()));
        }
        let node = match kind {
            NodeKind::Directory => Node::directory(name),
            NodeKind::File => {
                let (base, ext) = split_extension(name);
                Node::file(
                    base,
                    ext.map(str::to_string),
                    content.unwrap_or_default().to_string(),
                )
            }
        };
        let id = self.arena.insert(node);
        if let Err(err) = self.arena.add_child(parent, id) {
            self.arena.discard(id)?;
            return Err(err);
        }
        debug!(parent = %parent, name, %kind, "created node");
        Ok(id)
    }

    pub fn create_directory(&mut self, parent: NodeId, name: &str) -> Result<NodeId, FsError> {
        self.create_node(parent, name, NodeKind::Directory, None)
    }

    pub fn create_file(
        &mut self,
        parent: NodeId,
        name: &str,
        content: &str,
    ) -> Result<NodeId, FsError> {
        self.create_node(parent, name, NodeKind::File, Some(content))
    }

    /// Rename a node in place. The root keeps its name.
    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<(), FsError> {
        if id == self.root {
            return Err(FsError::Protected(SEPARATOR.to_string()));
        }
        self.arena.rename(id, new_name)?;
        debug!(node = %id, new_name, "renamed node");
        Ok(())
    }

    pub fn content(&self, id: NodeId) -> Result<&str, FsError> {
        self.arena.content(id)
    }

    pub fn set_content(&mut self, id: NodeId, content: impl Into<String>) -> Result<(), FsError> {
        self.arena.set_content(id, content)
    }

    pub fn touch(&mut self, id: NodeId) -> Result<(), FsError> {
        self.arena.touch(id)
    }

    /// Children of `dir` in insertion order.
    pub fn children(&self, dir: NodeId) -> Result<Vec<NodeId>, FsError> {
        self.arena.children(dir)
    }

    pub fn node_info(&self, id: NodeId) -> Result<NodeInfo, FsError> {
        let node = self.arena.get(id)?;
        Ok(NodeInfo {
            path: self.arena.absolute_path(id)?,
            name: node.name().to_string(),
            full_name: node.full_name(),
            kind: node.kind(),
            extension: node.extension().map(str::to_string),
            hidden: node.is_hidden(),
            size: node.metadata().size,
            children: node.is_directory().then(|| node.child_count()),
            created: node.metadata().created,
            modified: node.metadata().modified,
        })
    }

    /// Walk the live tree and verify its structural invariants.
    ///
    /// Returns the number of reachable nodes.
    pub fn check_consistency(&self) -> Result<usize, String> {
        let root = self.arena.get(self.root).map_err(|e| e.to_string())?;
        if root.parent().is_some() {
            return Err("root has a parent".to_string());
        }
        if root.full_name() != SEPARATOR.to_string() {
            return Err(format!("root is named {:?}", root.full_name()));
        }

        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(format!("node {} is reachable twice", id));
            }
            let node = self.arena.get(id).map_err(|e| e.to_string())?;
            let Some(children) = node.children() else {
                continue;
            };
            for (key, &child) in children {
                let child_node = self
                    .arena
                    .get(child)
                    .map_err(|e| format!("{} listed under {:?}: {}", id, key, e))?;
                if child_node.parent() != Some(id) {
                    return Err(format!("{:?} does not point back to its directory", key));
                }
                if child_node.full_name() != *key {
                    return Err(format!(
                        "{:?} is stored under key {:?}",
                        child_node.full_name(),
                        key
                    ));
                }
                stack.push(child);
            }
        }

        for (label, id) in [("home", self.home), ("cwd", self.cwd)] {
            if !seen.contains(&id) {
                return Err(format!("{} is not part of the tree", label));
            }
            if !self.arena.get(id).map(Node::is_directory).unwrap_or(false) {
                return Err(format!("{} is not a directory", label));
            }
        }
        Ok(seen.len())
    }
}
