//! Path expansion for raw dependency references.
//!
//! Expands `${NAME}` / `%NAME%` placeholders, normalizes separators and
//! redundant segments, and fans a trailing `*` out into one reference per
//! immediate subdirectory of the parent.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::resolver::locate::Locator;
use crate::util::env::Env;
use crate::util::fs::{list_subdirs, normalize_lexically};

/// Segment marking a wildcard reference.
pub const WILDCARD: &str = "*";

/// Upper bound on expansion passes, for values that keep producing placeholders.
const MAX_EXPANSION_PASSES: usize = 16;

static BRACE_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("valid regex"));

static PERCENT_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([A-Za-z0-9_]+)%").expect("valid regex"));

/// A reference after expansion, ready for location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedReference {
    /// The reference as declared in the manifest
    pub raw: String,

    /// Normalized path; absolute for wildcard children
    pub path: PathBuf,
}

/// Replace placeholders with environment values (empty when unset) until the
/// string stops changing.
pub fn expand_placeholders(raw: &str, env: &dyn Env) -> String {
    let mut current = raw.to_string();

    for _ in 0..MAX_EXPANSION_PASSES {
        let braces = BRACE_VAR.replace_all(&current, |caps: &regex::Captures<'_>| {
            env.var(&caps[1]).unwrap_or_default()
        });
        let next = PERCENT_VAR
            .replace_all(&braces, |caps: &regex::Captures<'_>| {
                env.var(&caps[1]).unwrap_or_default()
            })
            .into_owned();

        if next == current {
            break;
        }
        current = next;
    }

    current
}

/// Normalize separators to `/` and drop redundant segments.
pub fn normalize_reference(reference: &str) -> PathBuf {
    normalize_lexically(Path::new(&reference.replace('\\', "/")))
}

/// Whether the last segment of a normalized reference is the wildcard marker.
pub fn is_wildcard(path: &Path) -> bool {
    matches!(path.components().next_back(), Some(Component::Normal(s)) if s == WILDCARD)
}

/// Expands raw references relative to a requesting project.
pub struct PathExpander<'a> {
    env: &'a dyn Env,
    locator: &'a Locator,
}

impl<'a> PathExpander<'a> {
    pub fn new(env: &'a dyn Env, locator: &'a Locator) -> Self {
        PathExpander { env, locator }
    }

    /// Expand one declared reference into zero or more references.
    ///
    /// A wildcard whose parent cannot be located, or that has no
    /// subdirectories, yields nothing and logs a warning.
    pub fn expand(&self, raw: &str, project_dir: &Path) -> Vec<ExpandedReference> {
        let expanded = expand_placeholders(raw, self.env);
        let path = normalize_reference(&expanded);

        if !is_wildcard(&path) {
            return vec![ExpandedReference {
                raw: raw.to_string(),
                path,
            }];
        }

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let parent_dir = match self.locator.locate(&parent, project_dir) {
            Ok(location) => location.path,
            Err(_) => {
                tracing::warn!(
                    "dependency `{}` not found: wildcard parent {} does not exist",
                    raw,
                    parent.display()
                );
                return Vec::new();
            }
        };

        let subdirs = match list_subdirs(&parent_dir) {
            Ok(dirs) => dirs,
            Err(e) => {
                tracing::warn!("dependency `{}` not found: {:#}", raw, e);
                return Vec::new();
            }
        };

        if subdirs.is_empty() {
            tracing::warn!(
                "dependency `{}` not found: {} has no subdirectories",
                raw,
                parent_dir.display()
            );
        }

        subdirs
            .into_iter()
            .map(|dir| ExpandedReference {
                raw: raw.to_string(),
                path: dir,
            })
            .collect()
    }
}
