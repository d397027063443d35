//! Seed dataset
//!
//! Declarative description of the tree a session starts from. Seeds are read
//! from TOML or JSON and replayed through the resolver, so a seed can never
//! produce a tree the core itself would refuse to build.

use crate::error::{ApiError, FsError};
use crate::filesystem::{Filesystem, DEFAULT_HOME};
use crate::resolve::{Resolution, ResolveOptions};
use crate::types::NodeKind;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Initial tree layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    /// Absolute path of the home directory; also the starting cwd.
    #[serde(default = "default_home")]
    pub home: String,

    #[serde(default)]
    pub entries: Vec<SeedEntry>,
}

/// One node to create. Missing parent directories are created on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEntry {
    pub path: String,

    /// Defaults to `file` when `content` is given, `directory` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

fn default_home() -> String {
    DEFAULT_HOME.to_string()
}

impl SeedEntry {
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: Some(NodeKind::Directory),
            content: None,
        }
    }

    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: Some(NodeKind::File),
            content: Some(content.into()),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match (self.kind, &self.content) {
            (Some(kind), _) => kind,
            (None, Some(_)) => NodeKind::File,
            (None, None) => NodeKind::Directory,
        }
    }
}

impl Seed {
    /// Built-in dataset used when no seed file is configured.
    pub fn default_seed() -> Self {
        Self {
            home: default_home(),
            entries: vec![
                SeedEntry::directory("/bin"),
                SeedEntry::directory("/tmp"),
                SeedEntry::file("/etc/hostname", "simfs\n"),
                SeedEntry::file("/etc/motd", "Welcome to simfs. Type `help` for commands.\n"),
                SeedEntry::file("/home/user/.bashrc", "export PS1='\\w $ '\n"),
                SeedEntry::file(
                    "/home/user/Documents/readme.txt",
                    "This filesystem lives in memory only.\n",
                ),
                SeedEntry::file("/home/user/Documents/notes.md", "# Notes\n"),
                SeedEntry::directory("/home/user/Downloads"),
                SeedEntry::directory("/home/user/Pictures"),
                SeedEntry::file(
                    "/home/user/projects/hello/main.rs",
                    "fn main() {\n    println!(\"hello\");\n}\n",
                ),
            ],
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ApiError> {
        toml::from_str(text).map_err(|e| ApiError::SeedError(format!("invalid TOML seed: {}", e)))
    }

    pub fn from_json_str(text: &str) -> Result<Self, ApiError> {
        serde_json::from_str(text)
            .map_err(|e| ApiError::SeedError(format!("invalid JSON seed: {}", e)))
    }

    /// Load a seed file; `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ApiError::SeedError(format!("failed to read seed {}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_toml_str(&text),
        }
    }

    /// Build a fresh filesystem from this seed. The cwd starts at home.
    pub fn build(&self) -> Result<Filesystem, ApiError> {
        let mut fs = Filesystem::with_home(&self.home).map_err(|e| {
            ApiError::SeedError(format!("invalid home {:?}: {}", self.home, e))
        })?;

        for entry in &self.entries {
            let kind = entry.kind();
            let resolution = fs.resolve(&entry.path, ResolveOptions::new().create_intermediary());
            match resolution {
                Resolution::ParentFoundTargetMissing { parent, name } => {
                    fs.create_node(parent, &name, kind, entry.content.as_deref())
                        .map_err(|e| seed_error(&entry.path, e))?;
                }
                Resolution::Found { target, .. }
                    if kind == NodeKind::Directory && fs.node(target)?.is_directory() => {}
                Resolution::Found { name, .. } => {
                    return Err(seed_error(&entry.path, FsError::DuplicateName(name)));
                }
                other => {
                    let err = other.error().unwrap_or(FsError::InvalidPath);
                    return Err(seed_error(&entry.path, err));
                }
            }
        }

        let nodes = fs
            .check_consistency()
            .map_err(|e| ApiError::SeedError(format!("seeded tree is inconsistent: {}", e)))?;
        info!(nodes, home = %self.home, "seed loaded");
        Ok(fs)
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self::default_seed()
    }
}

fn seed_error(path: &str, err: FsError) -> ApiError {
    ApiError::SeedError(format!("{}: {}", path, err))
}
