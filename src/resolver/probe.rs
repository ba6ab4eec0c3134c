//! Shared-library artifact probing.

use std::path::{Path, PathBuf};

use crate::util::config::ArtifactConfig;
use crate::util::fs::normalize_path;

/// Subdirectories probed for shared libraries, in order.
pub const DEFAULT_PROBE_DIRS: [&str; 3] = ["bin", "win64/vc14/bin", "lib"];

/// Shared-library extensions recognised on every host.
pub const DEFAULT_SHARED_EXTENSIONS: [&str; 3] = ["dll", "so", "dylib"];

/// Finds the directory holding a dependency's runtime libraries.
#[derive(Debug, Clone)]
pub struct ArtifactProber {
    probe_dirs: Vec<String>,
    extensions: Vec<String>,
}

impl Default for ArtifactProber {
    fn default() -> Self {
        ArtifactProber {
            probe_dirs: DEFAULT_PROBE_DIRS.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_SHARED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ArtifactProber {
    pub fn new(probe_dirs: Vec<String>, extensions: Vec<String>) -> Self {
        ArtifactProber {
            probe_dirs,
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Build a prober from config, keeping defaults for empty lists.
    pub fn from_config(config: &ArtifactConfig) -> Self {
        let defaults = ArtifactProber::default();
        let probe_dirs = if config.probe_dirs.is_empty() {
            defaults.probe_dirs
        } else {
            config.probe_dirs.clone()
        };
        let extensions = if config.extensions.is_empty() {
            defaults.extensions
        } else {
            config.extensions.clone()
        };
        ArtifactProber::new(probe_dirs, extensions)
    }

    /// Whether a file name carries a shared-library extension, including
    /// versioned forms such as `libz.so.1.3`.
    pub fn is_shared_library(&self, file_name: &str) -> bool {
        let name = file_name.to_ascii_lowercase();
        self.extensions.iter().any(|ext| {
            if name.ends_with(&format!(".{}", ext)) {
                return true;
            }
            name.split_once(&format!(".{}.", ext)).is_some_and(|(_, version)| {
                !version.is_empty() && version.chars().all(|c| c.is_ascii_digit() || c == '.')
            })
        })
    }

    /// First probe directory under `dir` holding at least one shared library.
    pub fn probe(&self, dir: &Path) -> Option<PathBuf> {
        for sub in &self.probe_dirs {
            let candidate = dir.join(sub);
            if candidate.is_dir() && self.contains_shared_library(&candidate) {
                tracing::debug!("artifacts for {} in {}", dir.display(), candidate.display());
                return Some(normalize_path(&candidate));
            }
        }
        None
    }

    fn contains_shared_library(&self, dir: &Path) -> bool {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return false;
        };
        entries.flatten().any(|entry| {
            entry.path().is_file() && self.is_shared_library(&entry.file_name().to_string_lossy())
        })
    }
}
