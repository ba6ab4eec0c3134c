//! Project.json and Solution.json manifest parsing and validation.
//!
//! A `Project.json` describes one buildable unit: its name, the raw dependency
//! references it declares, where its sources and headers live, and whether it
//! compiles a library, an executable, or both. A `Solution.json` lists project
//! directories that are generated together.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// File name of a project manifest.
pub const PROJECT_MANIFEST: &str = "Project.json";

/// File name of a solution manifest.
pub const SOLUTION_MANIFEST: &str = "Solution.json";

/// Suffix appended to the project name for its library target.
pub const LIBRARY_TARGET_SUFFIX: &str = "Lib";

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read manifest {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest {} does not declare a name", path.display())]
    MissingName { path: PathBuf },

    #[error("executable enabled for `{name}` but no entry_file specified")]
    MissingEntryFile { name: String, path: PathBuf },
}

impl ManifestError {
    /// Path of the manifest the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            ManifestError::NotFound { path }
            | ManifestError::Io { path, .. }
            | ManifestError::Parse { path, .. }
            | ManifestError::MissingName { path }
            | ManifestError::MissingEntryFile { path, .. } => path,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string()).with_location(self.path());
        match self {
            ManifestError::NotFound { .. } => diag.with_suggestion(format!(
                "Create a {} in the project directory",
                PROJECT_MANIFEST
            )),
            ManifestError::Io { source, .. } => diag.with_context(source.to_string()),
            ManifestError::Parse { source, .. } => diag.with_context(source.to_string()),
            ManifestError::MissingName { .. } => {
                diag.with_suggestion("Add a non-empty \"name\" field")
            }
            ManifestError::MissingEntryFile { .. } => diag
                .with_suggestion("Add \"entry_file\" to the \"executable\" section")
                .with_suggestion("Or set \"compile\": false for the executable"),
        }
    }
}

/// Library compilation settings from the `library` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub compile: bool,

    /// Static (default) or shared library
    #[serde(default = "default_true", rename = "static")]
    pub static_lib: bool,

    /// Install prefix, relative to the project directory
    #[serde(default)]
    pub install_dir: Option<String>,

    /// Headers installed alongside the library
    #[serde(default)]
    pub export_headers: Vec<String>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        LibraryConfig {
            compile: false,
            static_lib: true,
            install_dir: None,
            export_headers: Vec::new(),
        }
    }
}

/// Executable compilation settings from the `executable` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableConfig {
    #[serde(default)]
    pub compile: bool,

    /// Source file holding `main`, relative to the project directory
    #[serde(default)]
    pub entry_file: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Raw manifest as deserialized from JSON.
#[derive(Debug, Deserialize)]
struct RawProjectManifest {
    #[serde(default)]
    name: Option<String>,

    #[serde(default = "default_version")]
    version: String,

    #[serde(default)]
    dependencies: Vec<String>,

    #[serde(default)]
    source_dirs: Vec<String>,

    #[serde(default)]
    include_dirs: Vec<String>,

    #[serde(default)]
    library: LibraryConfig,

    #[serde(default)]
    executable: ExecutableConfig,
}

/// A validated `Project.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectManifest {
    pub name: String,
    pub version: String,

    /// Raw dependency references, in declaration order
    pub dependencies: Vec<String>,

    pub source_dirs: Vec<String>,
    pub include_dirs: Vec<String>,
    pub library: LibraryConfig,
    pub executable: ExecutableConfig,

    /// Path of the manifest file itself
    pub manifest_path: PathBuf,
}

impl ProjectManifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = read_manifest(path)?;
        Self::parse(&content, path)
    }

    /// Parse and validate manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let raw: RawProjectManifest =
            serde_json::from_str(content).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(ManifestError::MissingName {
                    path: path.to_path_buf(),
                })
            }
        };

        if raw.executable.compile && raw.executable.entry_file.is_none() {
            return Err(ManifestError::MissingEntryFile {
                name,
                path: path.to_path_buf(),
            });
        }

        Ok(ProjectManifest {
            name,
            version: raw.version,
            dependencies: raw.dependencies,
            source_dirs: raw.source_dirs,
            include_dirs: raw.include_dirs,
            library: raw.library,
            executable: raw.executable,
            manifest_path: path.to_path_buf(),
        })
    }

    /// Directory containing the manifest.
    pub fn project_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(Path::new("."))
    }

    /// Name of the library target.
    pub fn library_target(&self) -> String {
        format!("{}{}", self.name, LIBRARY_TARGET_SUFFIX)
    }

    /// The target dependents link against: the library if one is compiled,
    /// otherwise the executable, otherwise nothing.
    pub fn primary_target(&self) -> Option<String> {
        if self.library.compile {
            Some(self.library_target())
        } else if self.executable.compile {
            Some(self.name.clone())
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSolutionManifest {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    projects: Vec<String>,
}

/// A validated `Solution.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionManifest {
    pub name: String,

    /// Project directories, relative to the solution file
    pub projects: Vec<String>,

    pub manifest_path: PathBuf,
}

impl SolutionManifest {
    /// Load a solution from a file path.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = read_manifest(path)?;
        Self::parse(&content, path)
    }

    /// Parse and validate solution content.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let raw: RawSolutionManifest =
            serde_json::from_str(content).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => {
                return Err(ManifestError::MissingName {
                    path: path.to_path_buf(),
                })
            }
        };

        Ok(SolutionManifest {
            name,
            projects: raw.projects,
            manifest_path: path.to_path_buf(),
        })
    }

    /// Directory containing the solution file.
    pub fn solution_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(Path::new("."))
    }

    /// Manifest paths of every listed project.
    pub fn project_manifests(&self) -> Vec<PathBuf> {
        self.projects
            .iter()
            .map(|dir| self.solution_dir().join(dir).join(PROJECT_MANIFEST))
            .collect()
    }
}

fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })
}
