//! ConfigLoader: composes configuration sources with the `config` crate.

use super::SimfsConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path of the per-user config file (`<config dir>/simfs/config.toml`).
    pub fn user_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "simfs", "simfs")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the user file, `explicit` (if any) and the environment.
    pub fn load(explicit: Option<&Path>) -> Result<SimfsConfig, ApiError> {
        let mut builder = Config::builder();
        if let Some(user) = Self::user_config_path() {
            builder = builder.add_source(File::from(user).required(false));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }
        Self::finish(builder)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<SimfsConfig, ApiError> {
        let builder = Config::builder().add_source(File::from(path.to_path_buf()).required(true));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<SimfsConfig, ApiError> {
        let builder = builder.add_source(
            Environment::with_prefix("SIMFS")
                .separator("__")
                .try_parsing(true),
        );
        let config: SimfsConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
