//! Source file collection for generated build files.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;

use crate::util::fs::{forward_slashes, glob_files, relative_path};

/// Extensions picked up from declared source directories.
pub const SOURCE_EXTENSIONS: [&str; 7] = ["cpp", "c", "cc", "cxx", "h", "hpp", "hh"];

/// Collect source files under each source directory, recursively.
///
/// Paths are relative to `project_dir`, `/`-separated, sorted and
/// de-duplicated. A source directory that does not exist is skipped with a
/// warning.
pub fn collect_sources(project_dir: &Path, source_dirs: &[String]) -> Result<Vec<String>> {
    let mut sources = BTreeSet::new();

    for dir in source_dirs {
        let abs = project_dir.join(dir);
        if !abs.is_dir() {
            tracing::warn!("source directory {} does not exist", abs.display());
            continue;
        }

        let patterns: Vec<String> = SOURCE_EXTENSIONS
            .iter()
            .map(|ext| format!("**/*.{}", ext))
            .collect();

        for file in glob_files(&abs, &patterns)? {
            sources.insert(forward_slashes(&relative_path(project_dir, &file)));
        }
    }

    Ok(sources.into_iter().collect())
}
