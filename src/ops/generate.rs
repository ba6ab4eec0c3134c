//! `mooring generate` - write CMake files for a resolved workspace.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::builder::{CMakeEmitter, GeneratedFile};
use crate::core::workspace::Workspace;
use crate::ops::resolve::{resolve_workspace, ResolvedWorkspace};
use crate::util::env::Env;
use crate::util::fs::write_if_changed;

/// Options for generation.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Render everything but write nothing
    pub dry_run: bool,
}

/// What happened to one generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Written,
    Unchanged,
    /// Dry run; not written
    Planned,
}

#[derive(Debug, Clone)]
pub struct GeneratedEntry {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Result of a generate run.
#[derive(Debug)]
pub struct GenerateResult {
    pub files: Vec<GeneratedEntry>,
    pub fingerprint: String,
}

impl GenerateResult {
    pub fn written(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Written)
            .count()
    }
}

/// Resolve the workspace, then write one `CMakeLists.txt` per project (and a
/// root one for solutions).
///
/// Every file is rendered before the first is written, so a failure leaves
/// the tree untouched.
pub fn generate(ws: &Workspace, env: &dyn Env, opts: &GenerateOptions) -> Result<GenerateResult> {
    let resolved = resolve_workspace(ws, env)?;
    let planned = render(&resolved, env)?;
    let fingerprint = resolved.fingerprint();

    let mut files = Vec::with_capacity(planned.len());
    for file in planned {
        let status = if opts.dry_run {
            tracing::info!("would write {}", file.path.display());
            FileStatus::Planned
        } else if write_if_changed(&file.path, &file.contents)
            .with_context(|| format!("failed to generate {}", file.path.display()))?
        {
            tracing::info!("generated {}", file.path.display());
            FileStatus::Written
        } else {
            tracing::debug!("{} is up to date", file.path.display());
            FileStatus::Unchanged
        };
        files.push(GeneratedEntry {
            path: file.path,
            status,
        });
    }

    Ok(GenerateResult { files, fingerprint })
}

/// Render every file for a resolved workspace, dependencies first.
pub fn render(resolved: &ResolvedWorkspace, env: &dyn Env) -> Result<Vec<GeneratedFile>> {
    let emitter = CMakeEmitter::new(env);
    let mut files = Vec::new();

    for descriptor in resolved.graph.descriptors() {
        files.extend(emitter.render_project(descriptor)?);
    }

    if let Some(solution) = &resolved.solution {
        let projects: Vec<_> = resolved.roots.iter().map(|d| d.as_ref()).collect();
        files.push(emitter.render_solution(solution, &projects));
    }

    Ok(files)
}
