//! Configuration loader with tier-based merging.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file inside each tier directory.
pub const CONFIG_FILE: &str = "jobcore.yaml";

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    Defaults = 0,
    Project = 1,
    User = 2,
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories searched for each file tier.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover tier directories from the environment and defaults.
    pub fn discover() -> Self {
        let user_dir = std::env::var("JOBCORE_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".jobcore")));

        let project_dir = std::env::var("JOBCORE_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("jobcore")));

        Self {
            project_dir,
            user_dir,
        }
    }

    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }

    fn config_file(&self, tier: ConfigTier) -> Option<PathBuf> {
        let dir = match tier {
            ConfigTier::Project => self.project_dir.as_ref(),
            ConfigTier::User => self.user_dir.as_ref(),
            ConfigTier::Defaults | ConfigTier::Environment => None,
        }?;
        Some(dir.join(CONFIG_FILE))
    }
}

/// Loads and holds the merged configuration.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    pub paths: ConfigPaths,
    config: Config,
    /// Files that contributed, in merge order.
    sources: Vec<(ConfigTier, PathBuf)>,
}

impl ConfigLoader {
    /// Load configuration from all tiers.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load configuration with explicit tier directories.
    ///
    /// `JOBCORE_CONFIG_PATH`, when set, replaces the file tiers with that one
    /// file. Environment overrides apply either way.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        Self::load_with_env(paths, |key| std::env::var(key).ok())
    }

    fn load_with_env(paths: ConfigPaths, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(explicit) = env("JOBCORE_CONFIG_PATH") {
            let path = PathBuf::from(explicit);
            let mut config = Config::load(&path)?;
            Self::apply_env_overrides(&mut config, &env);
            return Ok(Self {
                paths,
                config,
                sources: vec![(ConfigTier::Environment, path)],
            });
        }

        let mut tiers: Vec<Value> = vec![serde_json::to_value(Config::default())?];
        let mut sources = Vec::new();
        for tier in [ConfigTier::Project, ConfigTier::User] {
            let Some(file) = paths.config_file(tier) else {
                continue;
            };
            if !file.is_file() {
                continue;
            }
            tiers.push(read_tier(&file)?);
            debug!("Merged {} config from {}", tier, file.display());
            sources.push((tier, file));
        }

        let merged = deep_merge_all(tiers);
        let mut config: Config =
            serde_json::from_value(merged).context("Merged configuration is invalid")?;
        Self::apply_env_overrides(&mut config, &env);

        Ok(Self {
            paths,
            config,
            sources,
        })
    }

    fn apply_env_overrides(config: &mut Config, env: &impl Fn(&str) -> Option<String>) {
        if let Some(root) = env("JOBCORE_HOME") {
            config.home.root = PathBuf::from(root);
        }
        if let Some(level) = env("JOBCORE_LOG_LEVEL") {
            config.logging.level = level;
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access for command-line overrides.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Config files that were merged, lowest tier first.
    pub fn sources(&self) -> &[(ConfigTier, PathBuf)] {
        &self.sources
    }

    pub fn project_dir(&self) -> Option<&Path> {
        self.paths.project_dir.as_deref()
    }

    pub fn user_dir(&self) -> Option<&Path> {
        self.paths.user_dir.as_deref()
    }
}

/// Read one tier file. Empty files contribute nothing.
fn read_tier(file: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let value: Option<Value> = serde_yaml::from_str(&content)
        .with_context(|| format!("Invalid YAML in {}", file.display()))?;
    Ok(value.unwrap_or(Value::Null))
}
