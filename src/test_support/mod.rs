//! Test utilities for Mooring unit tests.
//!
//! Everything here works against a real temporary directory: the resolver
//! and emitter inspect the filesystem directly, so fixtures build small
//! trees of manifests, build descriptors and library files.
//!
//! # Example
//!
//! ```rust,ignore
//! use mooring::test_support::TreeFixture;
//!
//! #[test]
//! fn test_example() {
//!     let fx = TreeFixture::new();
//!     fx.file("3rdparty/zlib/CMakeLists.txt");
//!     let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["zlib"] }"#);
//!     // Resolve `manifest` against `fx.path("3rdparty")`...
//! }
//! ```

pub mod fixtures;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::manifest::PROJECT_MANIFEST;
use crate::util::fs::normalize_path;

pub use fixtures::*;

/// A temporary directory tree addressed by relative paths.
///
/// All returned paths are canonical, so they compare equal to paths the
/// resolver produces.
pub struct TreeFixture {
    _tmp: TempDir,
    root: PathBuf,
}

impl TreeFixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let root = normalize_path(tmp.path());
        TreeFixture { _tmp: tmp, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `rel`, without creating anything.
    pub fn path(&self, rel: &str) -> PathBuf {
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }

    /// Create a directory (and its parents).
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        std::fs::create_dir_all(&path).expect("failed to create dir");
        path
    }

    /// Create an empty file (and its parent directories).
    pub fn file(&self, rel: &str) -> PathBuf {
        self.file_with(rel, "")
    }

    /// Create a file with contents.
    pub fn file_with(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }

    /// Write `rel/Project.json` and return its path.
    pub fn project(&self, rel: &str, manifest: &str) -> PathBuf {
        let rel = if rel.is_empty() {
            PROJECT_MANIFEST.to_string()
        } else {
            format!("{}/{}", rel, PROJECT_MANIFEST)
        };
        self.file_with(&rel, manifest)
    }
}

impl Default for TreeFixture {
    fn default() -> Self {
        TreeFixture::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_canonical() {
        let fx = TreeFixture::new();
        let dir = fx.dir("a/b");
        assert_eq!(dir, normalize_path(&dir));
        assert!(dir.is_dir());
    }

    #[test]
    fn test_project_writes_manifest() {
        let fx = TreeFixture::new();
        let manifest = fx.project("app", r#"{ "name": "app" }"#);
        assert_eq!(manifest, fx.path("app/Project.json"));
        assert!(std::fs::read_to_string(&manifest).unwrap().contains("\"app\""));
    }
}
