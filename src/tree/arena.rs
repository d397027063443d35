//! Node arena
//!
//! Every node, attached or detached, lives in one generational slab. Directories
//! own their children through the arena; a child's `parent` field is a plain
//! handle, so detaching and reattaching never juggles shared ownership.

use super::node::{Node, NodeBody};
use crate::error::FsError;
use crate::path::{join_absolute, split_extension, validate_name};
use crate::types::NodeId;
use slab::Slab;

#[derive(Debug, Clone)]
struct Slot {
    generation: u64,
    node: Node,
}

/// Storage and structural operations for the node tree.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    slots: Slab<Slot>,
    next_generation: u64,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a node; it starts detached.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        let generation = self.next_generation;
        self.next_generation += 1;
        let key = self.slots.insert(Slot { generation, node });
        NodeId { key, generation }
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }

    pub fn get(&self, id: NodeId) -> Result<&Node, FsError> {
        match self.slots.get(id.key) {
            Some(slot) if slot.generation == id.generation => Ok(&slot.node),
            _ => Err(FsError::StaleNode(id)),
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node, FsError> {
        match self.slots.get_mut(id.key) {
            Some(slot) if slot.generation == id.generation => Ok(&mut slot.node),
            _ => Err(FsError::StaleNode(id)),
        }
    }

    pub fn full_name(&self, id: NodeId) -> Result<String, FsError> {
        Ok(self.get(id)?.full_name())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, FsError> {
        Ok(self.get(id)?.parent)
    }

    fn directory(&self, id: NodeId) -> Result<&Node, FsError> {
        let node = self.get(id)?;
        if node.is_directory() {
            Ok(node)
        } else {
            Err(FsError::NotADirectory(node.full_name()))
        }
    }

    pub fn get_child(&self, dir: NodeId, full_name: &str) -> Result<Option<NodeId>, FsError> {
        let node = self.directory(dir)?;
        Ok(node
            .children()
            .and_then(|children| children.get(full_name).copied()))
    }

    pub fn has_child(&self, dir: NodeId, full_name: &str) -> Result<bool, FsError> {
        Ok(self.get_child(dir, full_name)?.is_some())
    }

    /// Children of a directory in insertion order.
    pub fn children(&self, dir: NodeId) -> Result<Vec<NodeId>, FsError> {
        let node = self.directory(dir)?;
        Ok(node
            .children()
            .map(|children| children.values().copied().collect())
            .unwrap_or_default())
    }

    /// True if `ancestor` is `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> Result<bool, FsError> {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return Ok(true);
            }
            cursor = self.get(id)?.parent;
        }
        Ok(false)
    }

    /// Attach a detached node under `dir`.
    pub fn add_child(&mut self, dir: NodeId, child: NodeId) -> Result<(), FsError> {
        let child_node = self.get(child)?;
        if child_node.parent.is_some() {
            return Err(FsError::AlreadyAttached(child));
        }
        let key = child_node.full_name();
        let dir_node = self.directory(dir)?;
        if dir_node
            .children()
            .is_some_and(|children| children.contains_key(&key))
        {
            return Err(FsError::DuplicateName(key));
        }
        if self.is_ancestor_or_self(child, dir)? {
            return Err(FsError::SelfContainment(key));
        }

        let dir_node = self.get_mut(dir)?;
        if let Some(children) = dir_node.children_mut() {
            children.insert(key, child);
        }
        dir_node.metadata.touch();
        self.get_mut(child)?.parent = Some(dir);
        Ok(())
    }

    /// Detach the child stored under `full_name`. The subtree stays in the
    /// arena until [`discard`](Self::discard) is called on it.
    pub fn remove_child(&mut self, dir: NodeId, full_name: &str) -> Result<Option<NodeId>, FsError> {
        self.directory(dir)?;
        let dir_node = self.get_mut(dir)?;
        let removed = dir_node
            .children_mut()
            .and_then(|children| children.shift_remove(full_name));
        let Some(child) = removed else {
            return Ok(None);
        };
        dir_node.metadata.touch();
        self.get_mut(child)?.parent = None;
        Ok(Some(child))
    }

    /// Detach a node from whatever directory holds it. No-op when detached.
    pub fn detach(&mut self, id: NodeId) -> Result<(), FsError> {
        let node = self.get(id)?;
        if let Some(parent) = node.parent {
            let key = node.full_name();
            self.remove_child(parent, &key)?;
        }
        Ok(())
    }

    /// Rename a node to a new full name, keeping its position among siblings.
    pub fn rename(&mut self, id: NodeId, new_full_name: &str) -> Result<(), FsError> {
        validate_name(new_full_name)?;
        let node = self.get(id)?;
        let old_key = node.full_name();
        if old_key == new_full_name {
            return Ok(());
        }

        if let Some(parent) = node.parent {
            if self.has_child(parent, new_full_name)? {
                return Err(FsError::DuplicateName(new_full_name.to_string()));
            }
            let parent_node = self.get_mut(parent)?;
            if let Some(children) = parent_node.children_mut() {
                if let Some((index, _, child)) = children.shift_remove_full(&old_key) {
                    children.shift_insert(index, new_full_name.to_string(), child);
                }
            }
            parent_node.metadata.touch();
        }

        let node = self.get_mut(id)?;
        apply_name(node, new_full_name);
        node.metadata.touch();
        Ok(())
    }

    pub fn content(&self, id: NodeId) -> Result<&str, FsError> {
        let node = self.get(id)?;
        node.content()
            .ok_or_else(|| FsError::NotAFile(node.full_name()))
    }

    pub fn set_content(&mut self, id: NodeId, new_content: impl Into<String>) -> Result<(), FsError> {
        let node = self.get_mut(id)?;
        if !node.is_file() {
            return Err(FsError::NotAFile(node.full_name()));
        }
        if let NodeBody::File { content, .. } = &mut node.body {
            *content = new_content.into();
            node.metadata.size = content.len() as u64;
        }
        node.metadata.touch();
        Ok(())
    }

    /// Bump the modification time of a node.
    pub fn touch(&mut self, id: NodeId) -> Result<(), FsError> {
        self.get_mut(id)?.metadata.touch();
        Ok(())
    }

    /// Copy a subtree into a new, parentless subtree.
    ///
    /// With `recursive = false` a directory is copied without its children.
    pub fn clone_subtree(
        &mut self,
        id: NodeId,
        new_name: Option<&str>,
        recursive: bool,
    ) -> Result<NodeId, FsError> {
        if let Some(name) = new_name {
            validate_name(name)?;
        }
        let source = self.get(id)?;
        let mut copy = match &source.body {
            NodeBody::Directory { .. } => Node::directory(source.name.clone()),
            NodeBody::File { extension, content } => {
                Node::file(source.name.clone(), extension.clone(), content.clone())
            }
        };
        if let Some(name) = new_name {
            apply_name(&mut copy, name);
        }
        let children = if recursive && source.is_directory() {
            self.children(id)?
        } else {
            Vec::new()
        };

        let copy_id = self.insert(copy);
        for child in children {
            let child_copy = self.clone_subtree(child, None, true)?;
            self.add_child(copy_id, child_copy)?;
        }
        Ok(copy_id)
    }

    /// Free a detached subtree. Returns the number of nodes released.
    pub fn discard(&mut self, id: NodeId) -> Result<usize, FsError> {
        if self.get(id)?.parent.is_some() {
            return Err(FsError::AlreadyAttached(id));
        }
        Ok(self.release(id))
    }

    // Post-order: children go before their directory.
    fn release(&mut self, id: NodeId) -> usize {
        let children = self.children(id).unwrap_or_default();
        let mut released = 0;
        for child in children {
            released += self.release(child);
        }
        if self.contains(id) {
            self.slots.remove(id.key);
            released += 1;
        }
        released
    }

    /// Absolute path of an attached node, built by walking parent links.
    ///
    /// The topmost ancestor is the root and contributes nothing but the
    /// leading separator.
    pub fn absolute_path(&self, id: NodeId) -> Result<String, FsError> {
        let mut names = Vec::new();
        let mut cursor = id;
        loop {
            let node = self.get(cursor)?;
            match node.parent {
                Some(parent) => {
                    names.push(node.full_name());
                    cursor = parent;
                }
                None => break,
            }
        }
        names.reverse();
        Ok(join_absolute(&names))
    }

    /// Number of nodes in a subtree, the node itself included.
    pub fn subtree_len(&self, id: NodeId) -> Result<usize, FsError> {
        let mut count = 1;
        if self.get(id)?.is_directory() {
            for child in self.children(id)? {
                count += self.subtree_len(child)?;
            }
        }
        Ok(count)
    }
}

fn apply_name(node: &mut Node, full_name: &str) {
    match &mut node.body {
        NodeBody::Directory { .. } => node.name = full_name.to_string(),
        NodeBody::File { extension, .. } => {
            let (name, ext) = split_extension(full_name);
            node.name = name.to_string();
            *extension = ext.map(str::to_string);
        }
    }
}
