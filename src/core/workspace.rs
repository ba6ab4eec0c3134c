//! Workspace - the input being generated and its process-wide settings.
//!
//! A Workspace pins down which manifest the run starts from (a solution or a
//! single project), the shared third-party root, and the merged configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::manifest::{PROJECT_MANIFEST, SOLUTION_MANIFEST};
use crate::util::diagnostic::suggestions;
use crate::util::fs::normalize_path;
use crate::util::{Config, GlobalContext};

/// The manifest a run starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A `Project.json`
    Project(PathBuf),
    /// A JSON file listing `projects`
    Solution(PathBuf),
}

impl Input {
    /// Path of the input manifest file.
    pub fn path(&self) -> &Path {
        match self {
            Input::Project(path) | Input::Solution(path) => path,
        }
    }

    /// Directory containing the input manifest.
    pub fn dir(&self) -> &Path {
        self.path().parent().unwrap_or(Path::new("."))
    }

    pub fn is_solution(&self) -> bool {
        matches!(self, Input::Solution(_))
    }
}

/// A resolved input plus the settings shared by every project in the run.
#[derive(Debug, Clone)]
pub struct Workspace {
    input: Input,

    /// Shared third-party directory, if one was found or configured
    third_party_root: Option<PathBuf>,

    config: Config,
}

impl Workspace {
    /// Discover the input and third-party root.
    ///
    /// `explicit` may be a manifest file or a directory holding `Project.json`.
    /// Without it, `Solution.json` then `Project.json` are looked up in the
    /// current directory.
    pub fn discover(explicit: Option<&Path>, ctx: &GlobalContext) -> Result<Self> {
        let input = find_input(explicit, ctx.cwd())?;
        let config = ctx.load_config(input.dir());
        let third_party_root = find_third_party_root(input.dir(), config.third_party_dir());

        match &third_party_root {
            Some(root) => tracing::debug!("using third-party root {}", root.display()),
            None => tracing::debug!(
                "no `{}` directory above {}",
                config.third_party_dir(),
                input.dir().display()
            ),
        }

        Ok(Workspace {
            input,
            third_party_root,
            config,
        })
    }

    /// Override the discovered third-party root.
    pub fn with_third_party_root(mut self, root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            self.third_party_root = Some(normalize_path(&root));
        }
        self
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn third_party_root(&self) -> Option<&Path> {
        self.third_party_root.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Determine the input manifest.
pub fn find_input(explicit: Option<&Path>, cwd: &Path) -> Result<Input> {
    let path = match explicit {
        Some(path) => {
            let path = cwd.join(path);
            if !path.exists() {
                bail!("input {} not found", path.display());
            }
            if path.is_dir() {
                path.join(PROJECT_MANIFEST)
            } else {
                path
            }
        }
        None => {
            let solution = cwd.join(SOLUTION_MANIFEST);
            let project = cwd.join(PROJECT_MANIFEST);
            if solution.is_file() {
                solution
            } else if project.is_file() {
                project
            } else {
                bail!(
                    "neither {} nor {} found in {}\n{}",
                    SOLUTION_MANIFEST,
                    PROJECT_MANIFEST,
                    cwd.display(),
                    suggestions::NO_INPUT
                );
            }
        }
    };

    if !path.is_file() {
        bail!("{} not found", path.display());
    }

    let path = normalize_path(&path);
    if is_solution_file(&path)? {
        Ok(Input::Solution(path))
    } else {
        Ok(Input::Project(path))
    }
}

/// A JSON manifest is a solution when it has a `projects` key.
fn is_solution_file(path: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value.get("projects").is_some())
}

/// Search upward from `start` for the first ancestor containing a directory
/// named `dir_name`, returning that directory.
pub fn find_third_party_root(start: &Path, dir_name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(dir_name))
        .find(|candidate| candidate.is_dir())
        .map(|found| normalize_path(&found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_input_prefers_solution() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(SOLUTION_MANIFEST),
            r#"{ "name": "suite", "projects": [] }"#,
        )
        .unwrap();
        std::fs::write(tmp.path().join(PROJECT_MANIFEST), r#"{ "name": "app" }"#).unwrap();

        let input = find_input(None, tmp.path()).unwrap();
        assert!(input.is_solution());
    }

    #[test]
    fn test_find_input_directory_means_project() {
        let tmp = TempDir::new().unwrap();
        let app = tmp.path().join("app");
        std::fs::create_dir(&app).unwrap();
        std::fs::write(app.join(PROJECT_MANIFEST), r#"{ "name": "app" }"#).unwrap();

        let input = find_input(Some(Path::new("app")), tmp.path()).unwrap();
        assert!(matches!(input, Input::Project(_)));
        assert!(input.path().ends_with("app/Project.json"));
    }

    #[test]
    fn test_find_input_detects_solution_by_content() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("all.json");
        std::fs::write(&path, r#"{ "name": "all", "projects": ["a"] }"#).unwrap();

        let input = find_input(Some(&path), tmp.path()).unwrap();
        assert!(input.is_solution());
    }

    #[test]
    fn test_find_input_missing() {
        let tmp = TempDir::new().unwrap();
        let err = find_input(None, tmp.path()).unwrap_err();
        assert!(err.to_string().contains("neither Solution.json nor Project.json"));
    }

    #[test]
    fn test_find_third_party_root_searches_upward() {
        let tmp = TempDir::new().unwrap();
        let third_party = tmp.path().join("3rdparty");
        let nested = tmp.path().join("apps/viewer");
        std::fs::create_dir_all(&third_party).unwrap();
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_third_party_root(&nested, "3rdparty").unwrap();
        assert_eq!(found, normalize_path(&third_party));
        assert!(find_third_party_root(&nested, "vendor").is_none());
    }
}
