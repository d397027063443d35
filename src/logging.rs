//! Logging
//!
//! The filesystem core only emits `tracing` events. This module installs the
//! subscriber that decides where they end up and how they are rendered.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "SIMFS_LOG";
const ENV_FORMAT: &str = "SIMFS_LOG_FORMAT";
const ENV_OUTPUT: &str = "SIMFS_LOG_OUTPUT";
const ENV_FILE: &str = "SIMFS_LOG_FILE";

/// Event rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ApiError::ConfigError(format!(
                "unknown log format {:?} (expected text or json)",
                other
            ))),
        }
    }
}

/// Where events are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogOutput {
    #[serde(rename = "stdout")]
    Stdout,
    #[default]
    #[serde(rename = "stderr")]
    Stderr,
    #[serde(rename = "file")]
    File,
    #[serde(rename = "file+stderr")]
    FileAndStderr,
}

impl LogOutput {
    fn uses_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::FileAndStderr)
    }
}

impl FromStr for LogOutput {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdout" => Ok(LogOutput::Stdout),
            "stderr" => Ok(LogOutput::Stderr),
            "file" => Ok(LogOutput::File),
            "file+stderr" => Ok(LogOutput::FileAndStderr),
            other => Err(ApiError::ConfigError(format!(
                "unknown log output {:?} (expected stdout, stderr, file or file+stderr)",
                other
            ))),
        }
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogOutput::Stdout => "stdout",
            LogOutput::Stderr => "stderr",
            LogOutput::File => "file",
            LogOutput::FileAndStderr => "file+stderr",
        })
    }
}

/// `[logging]` section of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Default filter level: trace, debug, info, warn, error or off.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file; falls back to the platform state directory.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// ANSI colors for text output on a terminal stream.
    #[serde(default = "default_enabled")]
    pub color: bool,

    /// Per-target levels, e.g. `simfs::mutation = "debug"`.
    #[serde(default)]
    pub targets: BTreeMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            level: default_level(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            file: None,
            color: default_enabled(),
            targets: BTreeMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Apply `SIMFS_LOG_FORMAT`, `SIMFS_LOG_OUTPUT` and `SIMFS_LOG_FILE`.
    /// Unparseable values are reported rather than ignored.
    pub fn with_env_overrides(mut self) -> Result<Self, ApiError> {
        if let Some(format) = non_empty_env(ENV_FORMAT) {
            self.format = format.parse()?;
        }
        if let Some(output) = non_empty_env(ENV_OUTPUT) {
            self.output = output.parse()?;
        }
        if let Some(file) = non_empty_env(ENV_FILE) {
            self.file = Some(PathBuf::from(file));
        }
        Ok(self)
    }

    /// Filter from `SIMFS_LOG` when set, else from `level` and `targets`.
    pub fn filter(&self) -> Result<EnvFilter, ApiError> {
        if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
            return Ok(filter);
        }
        let mut filter = EnvFilter::try_new(&self.level).map_err(|e| {
            ApiError::ConfigError(format!("invalid log level {:?}: {}", self.level, e))
        })?;
        for (target, level) in &self.targets {
            let directive = format!("{}={}", target, level).parse().map_err(|e| {
                ApiError::ConfigError(format!("invalid log directive for {}: {}", target, e))
            })?;
            filter = filter.add_directive(directive);
        }
        Ok(filter)
    }

    /// Path of the log file used by the file outputs.
    pub fn log_file_path(&self) -> Result<PathBuf, ApiError> {
        match &self.file {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => default_log_file_path(),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn default_log_file_path() -> Result<PathBuf, ApiError> {
    let dirs = directories::ProjectDirs::from("", "simfs", "simfs").ok_or_else(|| {
        ApiError::ConfigError("could not determine a directory for the log file".to_string())
    })?;
    let dir = dirs.state_dir().unwrap_or_else(|| dirs.cache_dir());
    Ok(dir.join("simfs.log"))
}

/// Install the global subscriber described by `config` plus environment
/// overrides. Fails if a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    let installed = if config.enabled {
        let config = config.clone().with_env_overrides()?;
        let filter = config.filter()?;
        let writer = open_writer(&config)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(writer);
        match config.format {
            LogFormat::Json => Registry::default()
                .with(filter)
                .with(layer.json())
                .try_init(),
            LogFormat::Text => {
                let ansi = config.color && !config.output.uses_file();
                Registry::default()
                    .with(filter)
                    .with(layer.with_ansi(ansi))
                    .try_init()
            }
        }
    } else {
        Registry::default().with(EnvFilter::new("off")).try_init()
    };
    installed.map_err(|e| ApiError::ConfigError(format!("failed to install logger: {}", e)))
}

fn open_writer(config: &LoggingConfig) -> Result<BoxMakeWriter, ApiError> {
    let file = if config.output.uses_file() {
        let path = config.log_file_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                ApiError::ConfigError(format!("cannot open log file {}: {}", path.display(), e))
            })?;
        Some(Arc::new(file))
    } else {
        None
    };

    Ok(match (config.output, file) {
        (LogOutput::Stdout, _) => BoxMakeWriter::new(std::io::stdout),
        (LogOutput::FileAndStderr, Some(file)) => BoxMakeWriter::new(file.and(std::io::stderr)),
        (LogOutput::File, Some(file)) => BoxMakeWriter::new(file),
        _ => BoxMakeWriter::new(std::io::stderr),
    })
}
