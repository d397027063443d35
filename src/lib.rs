//! simfs: Simulated In-Memory Filesystem
//!
//! A hierarchical tree of directories and files addressed with shell-style
//! paths. The tree lives entirely in memory; the resolver maps path strings to
//! nodes and the mutation layer enforces the safety rules for delete, copy and
//! move before anything is committed.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod logging;
pub mod mutation;
pub mod path;
pub mod resolve;
pub mod seed;
pub mod tooling;
pub mod tree;
pub mod types;

pub use error::{ApiError, FsError};
pub use filesystem::{Filesystem, NodeInfo, DEFAULT_HOME};
pub use resolve::{Resolution, ResolveOptions};
pub use seed::{Seed, SeedEntry};
pub use types::{NodeId, NodeKind};
