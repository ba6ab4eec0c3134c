//! Fixtures for common project layouts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use crate::core::manifest::PROJECT_MANIFEST;

/// A project directory: its `Project.json` plus source files.
#[derive(Debug, Clone)]
pub struct ProjectFixture {
    pub name: String,
    pub dependencies: Vec<String>,
    pub source_dirs: Vec<String>,
    pub include_dirs: Vec<String>,
    /// `library` section, if any
    pub library: Option<Value>,
    /// `executable` section, if any
    pub executable: Option<Value>,
    /// Files relative to the project directory
    pub files: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    pub fn new(name: impl Into<String>) -> Self {
        ProjectFixture {
            name: name.into(),
            dependencies: Vec::new(),
            source_dirs: Vec::new(),
            include_dirs: Vec::new(),
            library: None,
            executable: None,
            files: BTreeMap::new(),
        }
    }

    /// A static library compiled from `src/`, with headers in `include/`.
    pub fn library(name: impl Into<String>) -> Self {
        let name = name.into();
        let guard = name.to_uppercase().replace('-', "_");
        ProjectFixture::new(name.clone())
            .with_library(json!({ "compile": true }))
            .with_source_dir("src")
            .with_include_dir("include")
            .with_file(
                format!("src/{}.cpp", name),
                format!("#include \"{name}.hpp\"\n\nint {name}_init() {{ return 0; }}\n"),
            )
            .with_file(
                format!("include/{}.hpp", name),
                format!("#ifndef {guard}_HPP\n#define {guard}_HPP\n\nint {name}_init();\n\n#endif\n"),
            )
    }

    /// An executable with its entry point at `src/main.cpp`.
    pub fn executable(name: impl Into<String>) -> Self {
        ProjectFixture::new(name)
            .with_executable(json!({ "compile": true, "entry_file": "src/main.cpp" }))
            .with_source_dir("src")
            .with_file("src/main.cpp", "int main() { return 0; }\n")
    }

    pub fn with_dependency(mut self, reference: impl Into<String>) -> Self {
        self.dependencies.push(reference.into());
        self
    }

    pub fn with_source_dir(mut self, dir: impl Into<String>) -> Self {
        self.source_dirs.push(dir.into());
        self
    }

    pub fn with_include_dir(mut self, dir: impl Into<String>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn with_library(mut self, section: Value) -> Self {
        self.library = Some(section);
        self
    }

    pub fn with_executable(mut self, section: Value) -> Self {
        self.executable = Some(section);
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// `Project.json` content.
    pub fn manifest(&self) -> String {
        let mut doc = json!({
            "name": self.name,
            "dependencies": self.dependencies,
            "source_dirs": self.source_dirs,
            "include_dirs": self.include_dirs,
        });
        if let Some(library) = &self.library {
            doc["library"] = library.clone();
        }
        if let Some(executable) = &self.executable {
            doc["executable"] = executable.clone();
        }
        serde_json::to_string_pretty(&doc).unwrap_or_default()
    }

    /// Write the project into `dir` and return the manifest path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let manifest_path = dir.join(PROJECT_MANIFEST);
        std::fs::write(&manifest_path, self.manifest())?;

        for (rel, content) in &self.files {
            let path = dir.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }

        Ok(manifest_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manifest::ProjectManifest;
    use tempfile::TempDir;

    #[test]
    fn test_library_fixture_parses() {
        let tmp = TempDir::new().unwrap();
        let path = ProjectFixture::library("core")
            .with_dependency("../zlib")
            .write_to(&tmp.path().join("core"))
            .unwrap();

        let manifest = ProjectManifest::load(&path).unwrap();
        assert_eq!(manifest.name, "core");
        assert_eq!(manifest.dependencies, vec!["../zlib"]);
        assert_eq!(manifest.primary_target().as_deref(), Some("coreLib"));
        assert!(tmp.path().join("core/src/core.cpp").is_file());
    }

    #[test]
    fn test_executable_fixture_parses() {
        let tmp = TempDir::new().unwrap();
        let path = ProjectFixture::executable("app")
            .write_to(&tmp.path().join("app"))
            .unwrap();

        let manifest = ProjectManifest::load(&path).unwrap();
        assert_eq!(manifest.executable.entry_file.as_deref(), Some("src/main.cpp"));
        assert_eq!(manifest.primary_target().as_deref(), Some("app"));
    }
}
