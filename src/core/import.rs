//! Import strategies and the per-dependency directives built from them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The strategy tag of an [`ImportMethod`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// Nested `Project.json`, built from its own manifest
    Project,
    /// `Find<Name>.cmake` find-module
    Module,
    /// `<Name>Config.cmake` package-config file
    Config,
    /// Raw source tree with a `CMakeLists.txt`
    Source,
    /// Conventional `include/` + `lib/` prefix
    Root,
    Unknown,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Project => "project",
            ImportKind::Module => "module",
            ImportKind::Config => "config",
            ImportKind::Source => "source",
            ImportKind::Root => "root",
            ImportKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the deciding marker was found and the package name derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportSite {
    /// Directory holding the marker; for `Config` this may be nested below
    /// the dependency directory.
    pub location: PathBuf,

    pub package_name: String,
}

impl ImportSite {
    pub fn new(location: impl Into<PathBuf>, package_name: impl Into<String>) -> Self {
        ImportSite {
            location: location.into(),
            package_name: package_name.into(),
        }
    }
}

/// How a resolved dependency directory is made available to a build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum ImportMethod {
    Project(ImportSite),
    Module(ImportSite),
    Config(ImportSite),
    Source(ImportSite),
    Root(ImportSite),
    Unknown,
}

impl ImportMethod {
    pub fn kind(&self) -> ImportKind {
        match self {
            ImportMethod::Project(_) => ImportKind::Project,
            ImportMethod::Module(_) => ImportKind::Module,
            ImportMethod::Config(_) => ImportKind::Config,
            ImportMethod::Source(_) => ImportKind::Source,
            ImportMethod::Root(_) => ImportKind::Root,
            ImportMethod::Unknown => ImportKind::Unknown,
        }
    }

    pub fn site(&self) -> Option<&ImportSite> {
        match self {
            ImportMethod::Project(site)
            | ImportMethod::Module(site)
            | ImportMethod::Config(site)
            | ImportMethod::Source(site)
            | ImportMethod::Root(site) => Some(site),
            ImportMethod::Unknown => None,
        }
    }

    pub fn package_name(&self) -> Option<&str> {
        self.site().map(|s| s.package_name.as_str())
    }

    pub fn location(&self) -> Option<&Path> {
        self.site().map(|s| s.location.as_path())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, ImportMethod::Unknown)
    }
}

/// One accepted dependency of a project, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDirective {
    /// The reference as written in the manifest
    pub reference: String,

    pub method: ImportMethod,

    /// Never empty
    pub package_name: String,

    /// Absolute dependency directory
    pub resolved_path: PathBuf,

    /// Target name dependents link against. For `Project` imports this is the
    /// nested project's primary target and may be absent.
    pub link_target: Option<String>,
}

impl ImportDirective {
    pub fn kind(&self) -> ImportKind {
        self.method.kind()
    }

    /// Marker location; differs from `resolved_path` only for `Config`.
    pub fn location(&self) -> &Path {
        self.method.location().unwrap_or(self.resolved_path.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_site() {
        let method = ImportMethod::Config(ImportSite::new("/deps/occt/lib/cmake", "OpenCASCADE"));
        assert_eq!(method.kind(), ImportKind::Config);
        assert_eq!(method.package_name(), Some("OpenCASCADE"));
        assert_eq!(method.location(), Some(Path::new("/deps/occt/lib/cmake")));
        assert!(ImportMethod::Unknown.site().is_none());
    }

    #[test]
    fn test_method_serializes_with_tag() {
        let method = ImportMethod::Module(ImportSite::new("/deps/zlib", "zlib"));
        let json = serde_json::to_value(&method).unwrap();
        assert_eq!(json["method"], "module");
        assert_eq!(json["package_name"], "zlib");

        let unknown = serde_json::to_value(ImportMethod::Unknown).unwrap();
        assert_eq!(unknown["method"], "unknown");
    }

    #[test]
    fn test_directive_location_falls_back_to_resolved_path() {
        let directive = ImportDirective {
            reference: "zlib".into(),
            method: ImportMethod::Source(ImportSite::new("/deps/zlib", "zlib")),
            package_name: "zlib".into(),
            resolved_path: "/deps/zlib".into(),
            link_target: Some("zlib".into()),
        };
        assert_eq!(directive.location(), Path::new("/deps/zlib"));
        assert_eq!(directive.kind().to_string(), "source");
    }
}
