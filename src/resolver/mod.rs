//! Project graph resolution.
//!
//! Turns the raw dependency references of a `Project.json` into classified
//! import directives: references are expanded, located on disk, classified
//! by what the directory contains and probed for runtime libraries. Nested
//! projects are resolved recursively into a shared [`ProjectGraph`].

pub mod classify;
pub mod errors;
pub mod expand;
pub mod graph;
pub mod locate;
pub mod probe;

pub use classify::{clean_package_name, Classifier, ConfigMatch};
pub use errors::ResolveError;
pub use expand::{ExpandedReference, PathExpander};
pub use graph::{GraphBuilder, ProjectGraph};
pub use locate::{LocateFailure, Locator, ResolvedLocation};
pub use probe::ArtifactProber;
