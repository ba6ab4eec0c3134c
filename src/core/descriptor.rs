//! TargetDescriptor - the resolved output of one project manifest.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::import::ImportDirective;
use crate::core::manifest::ProjectManifest;
use crate::util::hash::Fingerprint;

/// A project's primary target plus its full transitive import and artifact
/// information. Immutable once the graph builder has cached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetDescriptor {
    pub name: String,
    pub version: String,

    /// Canonical path of the `Project.json` this descriptor was built from
    pub manifest_path: PathBuf,

    pub primary_target: Option<String>,

    /// Shared-library directories of this project's dependencies, transitively
    pub artifact_dirs: BTreeSet<PathBuf>,

    /// One directive per accepted dependency, in declaration order
    pub import_directives: Vec<ImportDirective>,

    #[serde(skip)]
    pub manifest: ProjectManifest,
}

impl TargetDescriptor {
    /// Start a descriptor for a freshly loaded manifest, with no imports yet.
    pub fn new(manifest: ProjectManifest, manifest_path: PathBuf) -> Self {
        TargetDescriptor {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            manifest_path,
            primary_target: manifest.primary_target(),
            artifact_dirs: BTreeSet::new(),
            import_directives: Vec::new(),
            manifest,
        }
    }

    /// Directory containing the manifest.
    pub fn project_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(Path::new("."))
    }

    /// Link targets of all directives, in declaration order.
    pub fn link_targets(&self) -> impl Iterator<Item = &str> {
        self.import_directives
            .iter()
            .filter_map(|d| d.link_target.as_deref())
    }

    /// Feed every resolved field into a fingerprint.
    pub fn fingerprint_into(&self, fp: &mut Fingerprint) {
        fp.update_str(&self.name)
            .update_str(&self.version)
            .update_str(&self.manifest_path.to_string_lossy())
            .update_opt(self.primary_target.as_deref());

        for dir in &self.artifact_dirs {
            fp.update_str(&dir.to_string_lossy());
        }

        for directive in &self.import_directives {
            fp.update_str(&directive.reference)
                .update_str(directive.kind().as_str())
                .update_str(&directive.package_name)
                .update_str(&directive.resolved_path.to_string_lossy())
                .update_str(&directive.location().to_string_lossy())
                .update_opt(directive.link_target.as_deref());
        }
    }
}
