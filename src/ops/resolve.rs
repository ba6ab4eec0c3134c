//! Workspace resolution.

use std::sync::Arc;

use crate::core::descriptor::TargetDescriptor;
use crate::core::manifest::SolutionManifest;
use crate::core::workspace::{Input, Workspace};
use crate::resolver::{GraphBuilder, ProjectGraph, ResolveError};
use crate::util::env::Env;

/// Everything reachable from a workspace input, fully resolved.
#[derive(Debug)]
pub struct ResolvedWorkspace {
    pub graph: ProjectGraph,

    /// Descriptors of the input projects, in input order
    pub roots: Vec<Arc<TargetDescriptor>>,

    /// The solution, when the input was one
    pub solution: Option<SolutionManifest>,
}

impl ResolvedWorkspace {
    /// Digest of the whole graph; identical for identical trees.
    pub fn fingerprint(&self) -> String {
        self.graph.fingerprint()
    }
}

/// Resolve the workspace input and every project it reaches.
///
/// Resolution is all-or-nothing: the first fatal error aborts the run and no
/// partial graph is returned.
pub fn resolve_workspace(ws: &Workspace, env: &dyn Env) -> Result<ResolvedWorkspace, ResolveError> {
    let builder = GraphBuilder::for_workspace(ws, env);
    let mut graph = ProjectGraph::new();

    let (manifests, solution) = match ws.input() {
        Input::Project(path) => (vec![path.clone()], None),
        Input::Solution(path) => {
            let solution = SolutionManifest::load(path)?;
            tracing::debug!(
                "solution `{}` lists {} projects",
                solution.name,
                solution.projects.len()
            );
            (solution.project_manifests(), Some(solution))
        }
    };

    let roots = builder.resolve_all(&manifests, &mut graph)?;
    tracing::debug!("resolved {} projects", graph.len());

    Ok(ResolvedWorkspace {
        graph,
        roots,
        solution,
    })
}
