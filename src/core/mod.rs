//! Core data structures for Mooring.
//!
//! This module contains the foundational types used throughout Mooring:
//! - Project and solution manifests
//! - Import strategies and directives
//! - Target descriptors
//! - Workspace (input discovery)

pub mod descriptor;
pub mod import;
pub mod manifest;
pub mod workspace;

pub use descriptor::TargetDescriptor;
pub use import::{ImportDirective, ImportKind, ImportMethod, ImportSite};
pub use manifest::{
    ManifestError, ProjectManifest, SolutionManifest, PROJECT_MANIFEST, SOLUTION_MANIFEST,
};
pub use workspace::{find_input, find_third_party_root, Input, Workspace};
