//! Global context for Mooring operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{self, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global configuration file (~/.mooring/config.toml), if a home exists
    global_config: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            global_config: config::global_config_path(),
            verbose: false,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a specific global config file instead of the one under the home directory.
    pub fn with_global_config(mut self, path: Option<PathBuf>) -> Self {
        self.global_config = path;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Load the configuration that applies to a project rooted at `root`.
    pub fn load_config(&self, root: &Path) -> Config {
        config::load_config(
            self.global_config.as_deref(),
            &config::project_config_path(root),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_cwd() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        assert!(ctx.color());
        assert!(!ctx.is_verbose());
    }

    #[test]
    fn test_load_project_config() {
        let tmp = TempDir::new().unwrap();
        let config_dir = tmp.path().join(".mooring");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[artifacts]\nprobe_dirs = [\"out/bin\"]\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_global_config(None);
        let config = ctx.load_config(tmp.path());
        assert_eq!(config.artifacts.probe_dirs, vec!["out/bin"]);
    }
}
