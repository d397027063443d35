//! Path Resolver
//!
//! Maps a path string to a node of the tree. Resolution never fails with an
//! error; it returns a [`Resolution`] describing exactly where the walk
//! stopped, and callers decide which outcomes they accept.

use crate::error::FsError;
use crate::filesystem::Filesystem;
use crate::path::{self, PathAnchor};
use crate::tree::Node;
use crate::types::{NodeId, NodeKind};

/// Options accepted by [`Filesystem::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Synthesize missing directories before the final component.
    pub create_intermediary: bool,
    /// Kind the final target must have.
    pub required_kind: Option<NodeKind>,
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_intermediary(mut self) -> Self {
        self.create_intermediary = true;
        self
    }

    pub fn require(mut self, kind: NodeKind) -> Self {
        self.required_kind = Some(kind);
        self
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target exists and satisfies the required kind.
    Found {
        target: NodeId,
        parent: Option<NodeId>,
        name: String,
    },
    /// Every component up to the last is a directory; the last does not exist.
    ParentFoundTargetMissing { parent: NodeId, name: String },
    /// The target exists but has the wrong kind.
    TypeMismatch {
        target: NodeId,
        parent: Option<NodeId>,
        name: String,
    },
    /// An intermediate component is a file.
    NotADirectory { parent: NodeId, name: String },
    /// An intermediate component is missing.
    NotFound { parent: NodeId, name: String },
    /// The path cannot be parsed.
    InvalidPath,
}

impl Resolution {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    /// Existing node the path points at, whatever its kind.
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Resolution::Found { target, .. } | Resolution::TypeMismatch { target, .. } => {
                Some(*target)
            }
            _ => None,
        }
    }

    /// Directory the walk ended in.
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Resolution::Found { parent, .. } | Resolution::TypeMismatch { parent, .. } => *parent,
            Resolution::ParentFoundTargetMissing { parent, .. }
            | Resolution::NotADirectory { parent, .. }
            | Resolution::NotFound { parent, .. } => Some(*parent),
            Resolution::InvalidPath => None,
        }
    }

    /// Component the outcome refers to.
    pub fn name(&self) -> Option<&str> {
        match self {
            Resolution::Found { name, .. }
            | Resolution::TypeMismatch { name, .. }
            | Resolution::ParentFoundTargetMissing { name, .. }
            | Resolution::NotADirectory { name, .. }
            | Resolution::NotFound { name, .. } => Some(name),
            Resolution::InvalidPath => None,
        }
    }

    /// Error a caller requiring an existing target should report, if any.
    pub fn error(&self) -> Option<FsError> {
        match self {
            Resolution::Found { .. } => None,
            Resolution::ParentFoundTargetMissing { name, .. }
            | Resolution::NotFound { name, .. } => Some(FsError::NotFound(name.clone())),
            Resolution::TypeMismatch { name, .. } => Some(FsError::TypeMismatch(name.clone())),
            Resolution::NotADirectory { name, .. } => Some(FsError::NotADirectory(name.clone())),
            Resolution::InvalidPath => Some(FsError::InvalidPath),
        }
    }

    /// Accept only `Found`; every other outcome becomes the matching error.
    pub fn into_existing(self) -> Result<NodeId, FsError> {
        match (self.target(), self.error()) {
            (Some(target), None) => Ok(target),
            (_, err) => Err(err.unwrap_or(FsError::InvalidPath)),
        }
    }
}

enum Step {
    Moved(NodeId),
    Stop(Resolution),
    Missing,
}

enum Prepared<'p> {
    Done(Resolution),
    Walk {
        start: NodeId,
        components: Vec<&'p str>,
    },
}

impl Filesystem {
    /// Resolve `path`, creating intermediate directories when asked to.
    pub fn resolve(&mut self, path: &str, options: ResolveOptions) -> Resolution {
        if !options.create_intermediary {
            return self.lookup(path, options.required_kind);
        }

        let (mut cursor, components) = match self.prepare(path, options.required_kind) {
            Prepared::Done(resolution) => return resolution,
            Prepared::Walk { start, components } => (start, components),
        };
        let Some((last, intermediate)) = components.split_last() else {
            return Resolution::InvalidPath;
        };
        if let Some(blocked) = self.blocked_intermediary(cursor, intermediate) {
            return blocked;
        }

        for component in intermediate {
            cursor = match self.step(cursor, component) {
                Step::Moved(next) => next,
                Step::Stop(resolution) => return resolution,
                Step::Missing => match self.create_directory(cursor, component) {
                    Ok(created) => {
                        tracing::debug!(parent = %cursor, name = %component, "created intermediary directory");
                        created
                    }
                    Err(_) => {
                        return Resolution::NotFound {
                            parent: cursor,
                            name: component.to_string(),
                        }
                    }
                },
            };
        }

        self.finish(cursor, last, options.required_kind)
    }

    /// Resolve `path` without touching the tree.
    pub fn lookup(&self, path: &str, required_kind: Option<NodeKind>) -> Resolution {
        let (mut cursor, components) = match self.prepare(path, required_kind) {
            Prepared::Done(resolution) => return resolution,
            Prepared::Walk { start, components } => (start, components),
        };
        let Some((last, intermediate)) = components.split_last() else {
            return Resolution::InvalidPath;
        };

        for component in intermediate {
            cursor = match self.step(cursor, component) {
                Step::Moved(next) => next,
                Step::Stop(resolution) => return resolution,
                Step::Missing => {
                    return Resolution::NotFound {
                        parent: cursor,
                        name: component.to_string(),
                    }
                }
            };
        }

        self.finish(cursor, last, required_kind)
    }

    /// Resolve a path that must name an existing node.
    pub fn lookup_existing(&self, path: &str) -> Result<NodeId, FsError> {
        self.lookup(path, None).into_existing()
    }

    fn prepare<'p>(&self, path: &'p str, required_kind: Option<NodeKind>) -> Prepared<'p> {
        if path.contains('\0') {
            return Prepared::Done(Resolution::InvalidPath);
        }

        let (anchor, rest) = path::anchor(path);
        let components = path::split_path(rest);
        let start = match anchor {
            PathAnchor::Root => self.root(),
            PathAnchor::Home => self.home(),
            PathAnchor::Cwd => self.cwd(),
        };

        if components.is_empty() {
            // "/" and "//" name the root; "~", "~/" and "" name home.
            let target = match anchor {
                PathAnchor::Root => self.root(),
                PathAnchor::Home | PathAnchor::Cwd => self.home(),
            };
            let parent = self.parent_of(target);
            let name = self.name_of(target);
            return Prepared::Done(self.existing(target, parent, name, required_kind));
        }

        Prepared::Walk { start, components }
    }

    /// Dry run of the intermediate components, treating missing directories
    /// as already created. Returns the outcome that would stop the real walk,
    /// so nothing is created for a path that cannot resolve.
    fn blocked_intermediary(&self, start: NodeId, intermediate: &[&str]) -> Option<Resolution> {
        // `cursor` is the deepest existing directory; `pending` counts the
        // directories that would be created below it.
        let mut cursor = start;
        let mut pending = 0usize;
        for &component in intermediate {
            if pending > 0 {
                match component {
                    "." => {}
                    ".." => pending -= 1,
                    name if path::validate_name(name).is_err() => {
                        return Some(Resolution::NotFound {
                            parent: cursor,
                            name: name.to_string(),
                        })
                    }
                    _ => pending += 1,
                }
                continue;
            }
            match self.step(cursor, component) {
                Step::Moved(next) => cursor = next,
                Step::Stop(resolution) => return Some(resolution),
                Step::Missing if path::validate_name(component).is_err() => {
                    return Some(Resolution::NotFound {
                        parent: cursor,
                        name: component.to_string(),
                    })
                }
                Step::Missing => pending = 1,
            }
        }
        None
    }

    fn step(&self, cursor: NodeId, component: &str) -> Step {
        match component {
            "." => Step::Moved(cursor),
            ".." => Step::Moved(self.parent_of(cursor).unwrap_or(cursor)),
            name => match self.child_of(cursor, name) {
                Some(child) if self.kind_of(child) == Some(NodeKind::Directory) => {
                    Step::Moved(child)
                }
                Some(_) => Step::Stop(Resolution::NotADirectory {
                    parent: cursor,
                    name: name.to_string(),
                }),
                None => Step::Missing,
            },
        }
    }

    fn finish(&self, cursor: NodeId, last: &str, required_kind: Option<NodeKind>) -> Resolution {
        match last {
            "." => {
                let parent = self.parent_of(cursor);
                self.existing(cursor, parent, self.name_of(cursor), required_kind)
            }
            ".." => {
                // Ascend exactly once; the root is its own parent.
                let target = self.parent_of(cursor).unwrap_or(cursor);
                let parent = self.parent_of(target);
                self.existing(target, parent, self.name_of(target), required_kind)
            }
            name => match self.child_of(cursor, name) {
                Some(target) => {
                    self.existing(target, Some(cursor), name.to_string(), required_kind)
                }
                None => Resolution::ParentFoundTargetMissing {
                    parent: cursor,
                    name: name.to_string(),
                },
            },
        }
    }

    fn existing(
        &self,
        target: NodeId,
        parent: Option<NodeId>,
        name: String,
        required_kind: Option<NodeKind>,
    ) -> Resolution {
        match required_kind {
            Some(kind) if self.kind_of(target) != Some(kind) => Resolution::TypeMismatch {
                target,
                parent,
                name,
            },
            _ => Resolution::Found {
                target,
                parent,
                name,
            },
        }
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.arena().get(id).ok().and_then(Node::parent)
    }

    fn child_of(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.arena().get_child(dir, name).ok().flatten()
    }

    fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
        self.arena().get(id).ok().map(Node::kind)
    }

    fn name_of(&self, id: NodeId) -> String {
        self.arena()
            .get(id)
            .map(Node::full_name)
            .unwrap_or_default()
    }
}
