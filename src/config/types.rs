//! Configuration types.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub home: HomeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where items are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeConfig {
    /// Root of the home directory.
    #[serde(default = "default_home_root")]
    pub root: PathBuf,

    /// Subdirectory of `root` holding one directory per top-level item.
    #[serde(default = "default_jobs_dir")]
    pub jobs_dir: String,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            root: default_home_root(),
            jobs_dir: default_jobs_dir(),
        }
    }
}

fn default_home_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_jobs_dir() -> String {
    "jobs".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset: trace, debug, info, warn or error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a single file, without tier merging.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        // Empty or comment-only files parse as null
        let config: Option<Config> = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config.unwrap_or_default())
    }
}
