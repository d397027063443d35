//! Core types for the simulated filesystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Path separator; also the full name of the root directory.
pub const SEPARATOR: char = '/';

/// Home shorthand token.
pub const HOME_TOKEN: &str = "~";

/// Handle to a node stored in a [`NodeArena`](crate::tree::NodeArena).
///
/// The generation stamp makes a handle to a discarded node fail lookups
/// instead of aliasing whatever node later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) key: usize,
    pub(crate) generation: u64,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.key, self.generation)
    }
}

/// Node kind tag, used for `required_kind` filters and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Directory => write!(f, "directory"),
            NodeKind::File => write!(f, "file"),
        }
    }
}
