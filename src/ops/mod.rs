//! High-level operations.
//!
//! This module contains the implementation of Mooring commands.

pub mod classify;
pub mod generate;
pub mod graph;
pub mod resolve;

pub use classify::{classify_dir, ClassifyReport};
pub use generate::{generate, FileStatus, GenerateOptions, GenerateResult};
pub use graph::{format_graph, GraphFormat};
pub use resolve::{resolve_workspace, ResolvedWorkspace};
