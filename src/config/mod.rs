//! Configuration
//!
//! `SimfsConfig` is assembled by [`ConfigLoader`] from, lowest to highest
//! precedence: built-in defaults, the user config file, an explicit
//! `--config` file, and `SIMFS__*` environment variables.

mod loader;

pub use loader::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::seed::Seed;
use crate::types::SEPARATOR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimfsConfig {
    /// Overrides the seed's home directory.
    #[serde(default)]
    pub home: Option<String>,

    /// Seed file (TOML or JSON); the built-in seed is used when unset.
    #[serde(default)]
    pub seed: Option<PathBuf>,

    #[serde(default)]
    pub shell: ShellConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Interactive shell settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Prompt template; `{cwd}` is replaced by the current path.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Color directory names in listings.
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_prompt() -> String {
    "{cwd} $ ".to_string()
}

fn default_color() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            color: default_color(),
        }
    }
}

impl SimfsConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(home) = &self.home {
            if !home.starts_with(SEPARATOR) {
                return Err(ApiError::ConfigError(format!(
                    "home must be an absolute path, got {:?}",
                    home
                )));
            }
        }
        Ok(())
    }

    /// Seed selected by this configuration, with the home override applied.
    pub fn load_seed(&self) -> Result<Seed, ApiError> {
        let mut seed = match &self.seed {
            Some(path) => Seed::from_path(path)?,
            None => Seed::default_seed(),
        };
        if let Some(home) = &self.home {
            seed.home = home.clone();
        }
        Ok(seed)
    }
}
