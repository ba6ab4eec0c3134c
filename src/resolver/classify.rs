//! Import classification of resolved dependency directories.
//!
//! Rules are tried in priority order and the first match wins:
//!
//! 1. `Project.json` directly inside the directory
//! 2. `Find<basename>.cmake` directly inside the directory
//! 3. A scored best match among `*Config.cmake` / `*-config.cmake` files found
//!    by a depth-bounded scan
//! 4. `CMakeLists.txt` directly inside the directory
//! 5. Both `include/` and `lib/` subdirectories
//!
//! Anything else is `Unknown`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::core::import::{ImportMethod, ImportSite};
use crate::core::manifest::PROJECT_MANIFEST;
use crate::util::config::DEFAULT_CONFIG_SCAN_DEPTH;
use crate::util::fs::base_name;

/// Build-descriptor marker for raw source trees.
pub const BUILD_DESCRIPTOR: &str = "CMakeLists.txt";

/// Package-config suffixes, longest first so `-config` is stripped whole.
const CONFIG_SUFFIXES: [&str; 2] = ["-config.cmake", "config.cmake"];

/// Files ending in `Config.cmake` that never describe a package.
const CONFIG_DENYLIST: [&str; 5] = [
    "ctestconfig.cmake",
    "cpackconfig.cmake",
    "cpacksourceconfig.cmake",
    "dartconfig.cmake",
    "cmakeconfig.cmake",
];

pub const SCORE_CLEANED_EXACT: u8 = 10;
pub const SCORE_RAW_EXACT: u8 = 9;
pub const SCORE_PARENT_EXACT: u8 = 8;
pub const SCORE_CLEANED_SUBSTRING: u8 = 7;
pub const SCORE_RAW_SUBSTRING: u8 = 5;

/// Trailing version, compiler and platform segments: `-1.2`, `_vc14`, `-win64`.
static TRAILING_TOKENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[-_](?:vc|gcc|clang|win|linux|mac)?[0-9][^-_]*)+$").expect("valid regex")
});

/// Strip trailing version/compiler/platform segments from a directory name.
///
/// `mylib-1.2-win64` becomes `mylib`; a name with no separator, or one that
/// would be stripped to nothing, is returned unchanged.
pub fn clean_package_name(name: &str) -> String {
    let cleaned = TRAILING_TOKENS.replace(name, "");
    if cleaned.is_empty() {
        name.to_string()
    } else {
        cleaned.into_owned()
    }
}

/// A name containing both a digit and a period, such as `7.9.3`.
pub fn looks_like_version(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_digit()) && name.contains('.')
}

/// Strip a package-config suffix, case-insensitively. Returns `None` for
/// files that are not package configs.
pub fn strip_config_suffix(file_name: &str) -> Option<&str> {
    let lower = file_name.to_ascii_lowercase();
    if CONFIG_DENYLIST.contains(&lower.as_str()) {
        return None;
    }
    CONFIG_SUFFIXES
        .iter()
        .find(|suffix| lower.ends_with(*suffix))
        .map(|suffix| &file_name[..file_name.len() - suffix.len()])
}

/// Names a config file is scored against, lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameHints {
    pub cleaned: String,
    pub raw: String,
    /// Parent directory name, only when `raw` looks like a bare version
    pub parent: Option<String>,
}

impl NameHints {
    pub fn for_dir(dir: &Path) -> Self {
        let raw = base_name(dir);
        let parent = if looks_like_version(&raw) {
            dir.parent().map(base_name).filter(|p| !p.is_empty())
        } else {
            None
        };

        NameHints {
            cleaned: clean_package_name(&raw).to_ascii_lowercase(),
            raw: raw.to_ascii_lowercase(),
            parent: parent.map(|p| p.to_ascii_lowercase()),
        }
    }

    /// Score a config file name; 0 means no name matched.
    pub fn score(&self, file_name: &str) -> u8 {
        let stem = strip_config_suffix(file_name)
            .unwrap_or(file_name)
            .to_ascii_lowercase();
        let file = file_name.to_ascii_lowercase();

        if !self.cleaned.is_empty() && stem == self.cleaned {
            SCORE_CLEANED_EXACT
        } else if !self.raw.is_empty() && stem == self.raw {
            SCORE_RAW_EXACT
        } else if self.parent.as_deref() == Some(stem.as_str()) {
            SCORE_PARENT_EXACT
        } else if !self.cleaned.is_empty() && file.contains(&self.cleaned) {
            SCORE_CLEANED_SUBSTRING
        } else if !self.raw.is_empty() && file.contains(&self.raw) {
            SCORE_RAW_SUBSTRING
        } else {
            0
        }
    }
}

/// The winning package-config file of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMatch {
    pub path: PathBuf,
    pub score: u8,
    pub package_name: String,
}

/// Decides the import strategy of a directory.
#[derive(Debug, Clone)]
pub struct Classifier {
    scan_depth: usize,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(DEFAULT_CONFIG_SCAN_DEPTH)
    }
}

impl Classifier {
    pub fn new(scan_depth: usize) -> Self {
        Classifier { scan_depth }
    }

    pub fn classify(&self, dir: &Path) -> ImportMethod {
        let name = base_name(dir);
        if name.is_empty() {
            return ImportMethod::Unknown;
        }

        let method = if dir.join(PROJECT_MANIFEST).is_file() {
            ImportMethod::Project(ImportSite::new(dir, name))
        } else if dir.join(format!("Find{}.cmake", name)).is_file() {
            ImportMethod::Module(ImportSite::new(dir, name))
        } else if let Some(found) = self.find_config(dir) {
            let location = found.path.parent().unwrap_or(dir).to_path_buf();
            ImportMethod::Config(ImportSite::new(location, found.package_name))
        } else if dir.join(BUILD_DESCRIPTOR).is_file() {
            ImportMethod::Source(ImportSite::new(dir, name))
        } else if dir.join("include").is_dir() && dir.join("lib").is_dir() {
            ImportMethod::Root(ImportSite::new(dir, clean_package_name(&name)))
        } else {
            ImportMethod::Unknown
        };

        tracing::debug!("{} classified as {}", dir.display(), method.kind());
        method
    }

    /// Package-config files below `dir`, sorted by path.
    ///
    /// Directories up to `scan_depth` levels below `dir` are scanned; nothing
    /// deeper is visited.
    pub fn config_candidates(&self, dir: &Path) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(self.scan_depth + 1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(strip_config_suffix)
                    .is_some()
            })
            .map(|entry| entry.into_path())
            .collect();

        found.sort();
        found
    }

    /// Best-scoring package-config file; ties go to the first by path.
    pub fn find_config(&self, dir: &Path) -> Option<ConfigMatch> {
        let hints = NameHints::for_dir(dir);
        let mut best: Option<ConfigMatch> = None;

        for path in self.config_candidates(dir) {
            let file_name = base_name(&path);
            let score = hints.score(&file_name);

            if best.as_ref().is_some_and(|b| b.score >= score) {
                continue;
            }

            let stem = strip_config_suffix(&file_name).unwrap_or_default();
            let package_name = if stem.is_empty() {
                base_name(dir)
            } else {
                stem.to_string()
            };

            tracing::debug!("config candidate {} scored {}", path.display(), score);
            best = Some(ConfigMatch {
                path,
                score,
                package_name,
            });
        }

        best
    }
}
