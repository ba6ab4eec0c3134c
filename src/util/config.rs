//! Configuration file support for Mooring.
//!
//! Mooring supports two configuration file locations:
//! - Global: `~/.mooring/config.toml` - User-wide defaults
//! - Project: `.mooring/config.toml` - Next to the input manifest
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the shared third-party directory searched for upward.
pub const DEFAULT_THIRD_PARTY_DIR: &str = "3rdparty";

/// How deep the package-config scan descends below a dependency root.
pub const DEFAULT_CONFIG_SCAN_DEPTH: usize = 5;

/// Mooring configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resolution settings
    pub resolve: ResolveConfig,

    /// Shared-library probing settings
    pub artifacts: ArtifactConfig,
}

/// Resolution-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Directory name searched for upward from the input (default `3rdparty`)
    pub third_party_dir: Option<String>,

    /// Maximum depth of the package-config scan (default 5)
    pub config_scan_depth: Option<usize>,
}

/// Artifact probing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Subdirectories probed for shared libraries, in order
    pub probe_dirs: Vec<String>,

    /// Shared-library file extensions (without the dot)
    pub extensions: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.resolve.third_party_dir.is_some() {
            self.resolve.third_party_dir = other.resolve.third_party_dir;
        }
        if other.resolve.config_scan_depth.is_some() {
            self.resolve.config_scan_depth = other.resolve.config_scan_depth;
        }
        if !other.artifacts.probe_dirs.is_empty() {
            self.artifacts.probe_dirs = other.artifacts.probe_dirs;
        }
        if !other.artifacts.extensions.is_empty() {
            self.artifacts.extensions = other.artifacts.extensions;
        }
    }

    /// The third-party directory name, with the default applied.
    pub fn third_party_dir(&self) -> &str {
        self.resolve
            .third_party_dir
            .as_deref()
            .unwrap_or(DEFAULT_THIRD_PARTY_DIR)
    }

    /// The package-config scan depth, with the default applied.
    pub fn config_scan_depth(&self) -> usize {
        self.resolve
            .config_scan_depth
            .unwrap_or(DEFAULT_CONFIG_SCAN_DEPTH)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.mooring/config.toml)
/// 2. Global config (~/.mooring/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the global mooring config directory (~/.mooring).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".mooring"))
}

/// Get the global config path (~/.mooring/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.mooring/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".mooring").join("config.toml")
}
