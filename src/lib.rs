//! Mooring - CMake generation for JSON-described C++ projects
//!
//! This crate resolves `Project.json` / `Solution.json` manifests into a
//! graph of target descriptors, classifying every dependency directory by
//! how it can be imported, and renders `CMakeLists.txt` files from the
//! result.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test fixtures for Mooring unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests.
#[cfg(test)]
pub mod test_support;

pub use core::{
    descriptor::TargetDescriptor, import::ImportDirective, import::ImportMethod,
    manifest::ProjectManifest, manifest::SolutionManifest, workspace::Workspace,
};

pub use resolver::{GraphBuilder, ProjectGraph, ResolveError};
pub use util::context::GlobalContext;
