//! Filesystem node types

use crate::path::join_extension;
use crate::types::{NodeId, NodeKind};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Timestamps and size of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeMetadata {
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Content length in bytes; always 0 for directories.
    pub size: u64,
}

impl NodeMetadata {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created: now,
            modified: now,
            size: 0,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone)]
pub enum NodeBody {
    /// Children keyed by full name, in insertion order.
    Directory { children: IndexMap<String, NodeId> },
    File {
        extension: Option<String>,
        content: String,
    },
}

/// A file or directory in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) body: NodeBody,
    pub(crate) parent: Option<NodeId>,
    pub(crate) metadata: NodeMetadata,
}

impl Node {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: NodeBody::Directory {
                children: IndexMap::new(),
            },
            parent: None,
            metadata: NodeMetadata::now(),
        }
    }

    pub fn file(name: impl Into<String>, extension: Option<String>, content: String) -> Self {
        let mut metadata = NodeMetadata::now();
        metadata.size = content.len() as u64;
        Self {
            name: name.into(),
            body: NodeBody::File { extension, content },
            parent: None,
            metadata,
        }
    }

    /// Base name without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { extension, .. } => extension.as_deref(),
            NodeBody::Directory { .. } => None,
        }
    }

    /// Lookup key of this node inside its parent.
    pub fn full_name(&self) -> String {
        join_extension(&self.name, self.extension())
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Directory { .. } => NodeKind::Directory,
            NodeBody::File { .. } => NodeKind::File,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.body, NodeBody::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.body, NodeBody::File { .. })
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { content, .. } => Some(content),
            NodeBody::Directory { .. } => None,
        }
    }

    pub(crate) fn children(&self) -> Option<&IndexMap<String, NodeId>> {
        match &self.body {
            NodeBody::Directory { children } => Some(children),
            NodeBody::File { .. } => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut IndexMap<String, NodeId>> {
        match &mut self.body {
            NodeBody::Directory { children } => Some(children),
            NodeBody::File { .. } => None,
        }
    }

    /// Number of direct children; 0 for files.
    pub fn child_count(&self) -> usize {
        self.children().map(|c| c.len()).unwrap_or(0)
    }
}
