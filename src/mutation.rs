//! Mutation Safety Layer
//!
//! Copy, move and delete over resolved nodes. Each operation validates the
//! whole request first (protected nodes, the current directory, self
//! containment, name collisions) and only then touches the tree, so a
//! rejected request leaves everything as it was.

use crate::error::FsError;
use crate::filesystem::Filesystem;
use crate::path::validate_name;
use crate::resolve::Resolution;
use crate::types::{NodeId, SEPARATOR};
use std::collections::HashSet;
use tracing::debug;

/// Where a source ends up once a request is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    /// Attach under `dir` as `name`.
    Insert { dir: NodeId, name: String },
    /// Replace the file `victim` inside `dir`, taking over its name.
    Overwrite {
        victim: NodeId,
        dir: NodeId,
        name: String,
    },
}

impl Placement {
    fn inserted_name(&self) -> &str {
        match self {
            Placement::Insert { name, .. } | Placement::Overwrite { name, .. } => name,
        }
    }
}

impl Filesystem {
    /// Remove a node and, with `recursive`, everything below it.
    ///
    /// Returns the number of nodes removed.
    pub fn delete_subtree(&mut self, node: NodeId, recursive: bool) -> Result<usize, FsError> {
        self.check_removable(node)?;
        if self.arena().is_ancestor_or_self(node, self.home())? {
            return Err(FsError::Protected(self.absolute_path(node)?));
        }
        let target = self.node(node)?;
        if target.child_count() > 0 && !recursive {
            return Err(FsError::NotEmpty(target.full_name()));
        }

        let path = self.absolute_path(node)?;
        let arena = self.arena_mut();
        arena.detach(node)?;
        let removed = arena.discard(node)?;
        debug!(path = %path, removed, "deleted subtree");
        Ok(removed)
    }

    /// Copy `source` to `destination`, returning the new node.
    pub fn copy(
        &mut self,
        source: NodeId,
        destination: &Resolution,
        recursive: bool,
    ) -> Result<NodeId, FsError> {
        self.check_copy_source(source, recursive)?;
        let placement = self.place(source, destination)?;
        self.commit_copy(source, placement)
    }

    /// Copy several sources into one existing directory.
    ///
    /// A single source behaves like [`copy`](Self::copy). All sources are
    /// validated before the first one is copied.
    pub fn copy_many(
        &mut self,
        sources: &[NodeId],
        destination: &Resolution,
        recursive: bool,
    ) -> Result<Vec<NodeId>, FsError> {
        if let [source] = sources {
            return self.copy(*source, destination, recursive).map(|id| vec![id]);
        }
        for &source in sources {
            self.check_copy_source(source, recursive)?;
        }
        self.check_multi_destination(destination)?;

        let mut plans = Vec::with_capacity(sources.len());
        let mut names = HashSet::new();
        for &source in sources {
            let placement = self.place(source, destination)?;
            if !names.insert(placement.inserted_name().to_string()) {
                return Err(FsError::DuplicateName(placement.inserted_name().to_string()));
            }
            plans.push((source, placement));
        }

        plans
            .into_iter()
            .map(|(source, placement)| self.commit_copy(source, placement))
            .collect()
    }

    /// Move `source` to `destination`, returning the moved node.
    ///
    /// The node keeps its identity; only its parent and possibly its name
    /// change.
    pub fn move_node(&mut self, source: NodeId, destination: &Resolution) -> Result<NodeId, FsError> {
        self.check_removable(source)?;
        self.check_not_inside(source, destination)?;
        let placement = self.place(source, destination)?;
        self.commit_move(source, placement)
    }

    /// Move several sources into one existing directory.
    pub fn move_many(
        &mut self,
        sources: &[NodeId],
        destination: &Resolution,
    ) -> Result<Vec<NodeId>, FsError> {
        if let [source] = sources {
            return self.move_node(*source, destination).map(|id| vec![id]);
        }
        self.check_multi_destination(destination)?;

        let mut plans = Vec::with_capacity(sources.len());
        let mut names = HashSet::new();
        for &source in sources {
            self.check_removable(source)?;
            self.check_not_inside(source, destination)?;
            let placement = self.place(source, destination)?;
            if !names.insert(placement.inserted_name().to_string()) {
                return Err(FsError::DuplicateName(placement.inserted_name().to_string()));
            }
            plans.push((source, placement));
        }

        plans
            .into_iter()
            .map(|(source, placement)| self.commit_move(source, placement))
            .collect()
    }

    // The root and the cwd chain must stay attached.
    fn check_removable(&self, node: NodeId) -> Result<(), FsError> {
        if node == self.root() {
            return Err(FsError::Protected(SEPARATOR.to_string()));
        }
        let arena = self.arena();
        if arena.is_ancestor_or_self(node, self.cwd())? {
            return Err(FsError::AncestorOfCwd(self.absolute_path(node)?));
        }
        Ok(())
    }

    fn check_copy_source(&self, source: NodeId, recursive: bool) -> Result<(), FsError> {
        let node = self.node(source)?;
        if node.is_directory() && !recursive {
            return Err(FsError::RecursiveRequired(node.full_name()));
        }
        Ok(())
    }

    fn check_not_inside(&self, source: NodeId, destination: &Resolution) -> Result<(), FsError> {
        let landing = match destination {
            Resolution::Found { target, .. } => Some(*target),
            Resolution::ParentFoundTargetMissing { parent, .. } => Some(*parent),
            _ => None,
        };
        if let Some(landing) = landing {
            if self.arena().is_ancestor_or_self(source, landing)? {
                return Err(FsError::SelfContainment(self.absolute_path(source)?));
            }
        }
        Ok(())
    }

    fn check_multi_destination(&self, destination: &Resolution) -> Result<(), FsError> {
        if let Resolution::Found { target, .. } = destination {
            if self.node(*target)?.is_directory() {
                return Ok(());
            }
        }
        Err(FsError::MultipleSourcesInvalidDestination(
            destination.name().unwrap_or_default().to_string(),
        ))
    }

    /// Decide where `source` lands without mutating anything.
    fn place(&self, source: NodeId, destination: &Resolution) -> Result<Placement, FsError> {
        let source_node = self.node(source)?;
        let source_name = source_node.full_name();

        match destination {
            Resolution::Found { target, .. } => {
                let target_node = self.node(*target)?;
                if target_node.is_directory() {
                    if self.arena().has_child(*target, &source_name)? {
                        return Err(FsError::DuplicateName(source_name));
                    }
                    return Ok(Placement::Insert {
                        dir: *target,
                        name: source_name,
                    });
                }
                if source_node.is_directory() {
                    return Err(FsError::DirectoryOntoFile(target_node.full_name()));
                }
                let dir = target_node
                    .parent()
                    .ok_or_else(|| FsError::NotFound(target_node.full_name()))?;
                Ok(Placement::Overwrite {
                    victim: *target,
                    dir,
                    name: target_node.full_name(),
                })
            }
            Resolution::ParentFoundTargetMissing { parent, name } => {
                validate_name(name)?;
                Ok(Placement::Insert {
                    dir: *parent,
                    name: name.clone(),
                })
            }
            other => Err(other.error().unwrap_or(FsError::InvalidPath)),
        }
    }

    fn commit_copy(&mut self, source: NodeId, placement: Placement) -> Result<NodeId, FsError> {
        if let Placement::Overwrite { victim, .. } = placement {
            if victim == source {
                return Ok(source);
            }
        }

        let arena = self.arena_mut();
        let (dir, name) = match placement {
            Placement::Insert { dir, name } => (dir, name),
            Placement::Overwrite { victim, dir, name } => {
                arena.detach(victim)?;
                arena.discard(victim)?;
                (dir, name)
            }
        };
        let copy = arena.clone_subtree(source, Some(&name), true)?;
        if let Err(err) = arena.add_child(dir, copy) {
            arena.discard(copy)?;
            return Err(err);
        }
        debug!(source = %source, copy = %copy, name = %name, "copied subtree");
        Ok(copy)
    }

    fn commit_move(&mut self, source: NodeId, placement: Placement) -> Result<NodeId, FsError> {
        let arena = self.arena_mut();
        let (dir, name) = match placement {
            Placement::Insert { dir, name } => (dir, name),
            Placement::Overwrite { victim, dir, name } => {
                arena.detach(victim)?;
                arena.discard(victim)?;
                (dir, name)
            }
        };
        arena.detach(source)?;
        arena.rename(source, &name)?;
        arena.add_child(dir, source)?;
        debug!(source = %source, name = %name, "moved subtree");
        Ok(source)
    }
}
