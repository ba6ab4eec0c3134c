//! Output formatting for resolved project graphs (text/JSON).

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::descriptor::TargetDescriptor;
use crate::ops::resolve::ResolvedWorkspace;
use crate::util::fs::forward_slashes;

/// Graph output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct GraphDocument<'a> {
    fingerprint: String,
    roots: Vec<&'a Path>,
    projects: Vec<&'a TargetDescriptor>,
}

/// Format a resolved workspace.
pub fn format_graph(resolved: &ResolvedWorkspace, format: GraphFormat) -> Result<String> {
    match format {
        GraphFormat::Text => Ok(format_graph_text(resolved)),
        GraphFormat::Json => format_graph_json(resolved),
    }
}

/// Human-readable listing: a project tree, then every descriptor in
/// resolution order.
pub fn format_graph_text(resolved: &ResolvedWorkspace) -> String {
    let mut out = String::new();

    let mut seen = HashSet::new();
    for root in &resolved.roots {
        write_tree(&mut out, resolved, root, 0, &mut seen);
    }

    for descriptor in resolved.graph.descriptors() {
        writeln!(out).unwrap();
        write_descriptor(&mut out, resolved, descriptor);
    }

    writeln!(out).unwrap();
    writeln!(out, "fingerprint: {}", resolved.fingerprint()).unwrap();
    out
}

/// JSON document with the fingerprint, root manifests and all descriptors.
pub fn format_graph_json(resolved: &ResolvedWorkspace) -> Result<String> {
    let doc = GraphDocument {
        fingerprint: resolved.fingerprint(),
        roots: resolved
            .roots
            .iter()
            .map(|d| d.manifest_path.as_path())
            .collect(),
        projects: resolved.graph.descriptors().map(|d| d.as_ref()).collect(),
    };
    serde_json::to_string_pretty(&doc).context("failed to serialize project graph")
}

fn write_tree(
    out: &mut String,
    resolved: &ResolvedWorkspace,
    descriptor: &TargetDescriptor,
    depth: usize,
    seen: &mut HashSet<PathBuf>,
) {
    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };

    let is_duplicate = !seen.insert(descriptor.manifest_path.clone());
    let dup_marker = if is_duplicate { " (*)" } else { "" };
    writeln!(
        out,
        "{}{} v{}{}",
        prefix, descriptor.name, descriptor.version, dup_marker
    )
    .unwrap();

    if is_duplicate {
        return;
    }

    for dep in resolved.graph.project_dependencies(&descriptor.manifest_path) {
        write_tree(out, resolved, dep, depth + 1, seen);
    }
}

fn write_descriptor(
    out: &mut String,
    resolved: &ResolvedWorkspace,
    descriptor: &TargetDescriptor,
) {
    let target = descriptor.primary_target.as_deref().unwrap_or("none");
    writeln!(out, "{} v{} (target: {})", descriptor.name, descriptor.version, target).unwrap();
    writeln!(out, "  manifest: {}", forward_slashes(&descriptor.manifest_path)).unwrap();

    if !descriptor.import_directives.is_empty() {
        writeln!(out, "  imports:").unwrap();
        for directive in &descriptor.import_directives {
            let link = directive
                .link_target
                .as_deref()
                .map(|t| format!(" [{}]", t))
                .unwrap_or_default();
            writeln!(
                out,
                "    {} -> {} `{}`{} at {}",
                directive.reference,
                directive.kind(),
                directive.package_name,
                link,
                forward_slashes(directive.location())
            )
            .unwrap();
        }
    }

    let dependents = resolved.graph.project_dependents(&descriptor.manifest_path);
    if !dependents.is_empty() {
        let names: Vec<_> = dependents.iter().map(|d| d.name.as_str()).collect();
        writeln!(out, "  used by: {}", names.join(", ")).unwrap();
    }

    if !descriptor.artifact_dirs.is_empty() {
        writeln!(out, "  artifacts:").unwrap();
        for dir in &descriptor.artifact_dirs {
            writeln!(out, "    {}", forward_slashes(dir)).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::workspace::Workspace;
    use crate::ops::resolve::resolve_workspace;
    use crate::test_support::{ProjectFixture, TreeFixture};
    use crate::util::GlobalContext;
    use std::collections::HashMap;

    fn resolved(fx: &TreeFixture) -> ResolvedWorkspace {
        fx.file("3rdparty/zlib/Findzlib.cmake");
        fx.file("3rdparty/zlib/bin/zlib1.dll");
        ProjectFixture::library("core")
            .with_dependency("zlib")
            .write_to(&fx.path("core"))
            .unwrap();
        ProjectFixture::executable("app")
            .with_dependency("../core")
            .write_to(&fx.path("app"))
            .unwrap();

        let ctx = GlobalContext::with_cwd(fx.root().to_path_buf())
            .unwrap()
            .with_global_config(None);
        let ws = Workspace::discover(Some(Path::new("app")), &ctx).unwrap();
        resolve_workspace(&ws, &HashMap::<String, String>::new()).unwrap()
    }

    #[test]
    fn test_text_output() {
        let fx = TreeFixture::new();
        let resolved = resolved(&fx);
        let text = format_graph_text(&resolved);

        assert!(text.starts_with("app v1.0.0\n├── core v1.0.0\n"));
        assert!(text.contains("core v1.0.0 (target: coreLib)"));
        assert!(text.contains("    zlib -> module `zlib` [zlib] at "));
        assert!(text.contains("    ../core -> project `core` [coreLib] at "));
        assert!(text.contains("  used by: app\n"));
        assert!(text.contains(&format!(
            "  artifacts:\n    {}",
            forward_slashes(&fx.path("3rdparty/zlib/bin"))
        )));
        assert!(text.contains(&format!("fingerprint: {}", resolved.fingerprint())));
    }

    #[test]
    fn test_json_output() {
        let fx = TreeFixture::new();
        let resolved = resolved(&fx);
        let json = format_graph(&resolved, GraphFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["fingerprint"], resolved.fingerprint());
        assert_eq!(value["projects"][0]["name"], "core");
        assert_eq!(value["projects"][1]["primary_target"], "app");
        assert_eq!(
            value["projects"][1]["import_directives"][0]["method"]["method"],
            "project"
        );
        assert_eq!(value["projects"][1]["import_directives"][0]["link_target"], "coreLib");
    }
}
