//! Error types for the simulated filesystem.

use crate::types::NodeId;
use thiserror::Error;

/// Errors produced by the node tree, the resolver and the mutation layer.
///
/// Every variant is a value returned to the caller; none of them is logged or
/// printed by the core. The shell maps them to messages through `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("not a file: {0}")]
    NotAFile(String),

    #[error("invalid path")]
    InvalidPath,

    #[error("wrong node type: {0}")]
    TypeMismatch(String),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    #[error("an entry named {0} already exists")]
    DuplicateName(String),

    #[error("{0} is protected and cannot be removed or moved")]
    Protected(String),

    #[error("{0} is the current directory or one of its ancestors")]
    AncestorOfCwd(String),

    #[error("directory not empty: {0}")]
    NotEmpty(String),

    #[error("cannot overwrite non-directory {0} with a directory")]
    DirectoryOntoFile(String),

    #[error("{0} is a directory (recursive flag required)")]
    RecursiveRequired(String),

    #[error("target {0} is not a directory")]
    MultipleSourcesInvalidDestination(String),

    #[error("cannot move {0} into itself")]
    SelfContainment(String),

    #[error("node {0} no longer exists")]
    StaleNode(NodeId),

    #[error("node {0} is already attached to a directory")]
    AlreadyAttached(NodeId),
}

/// Errors from the layers around the core: configuration, seed loading,
/// logging setup and command execution.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Seed error: {0}")]
    SeedError(String),

    #[error("Filesystem error: {0}")]
    Fs(#[from] FsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
