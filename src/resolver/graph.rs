//! Project graph construction.
//!
//! Starting from one or more `Project.json` files, every dependency
//! reference is expanded, located and classified. Nested projects are
//! resolved recursively and memoized by canonical manifest path, so a
//! project shared by several dependents is only loaded once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::core::descriptor::TargetDescriptor;
use crate::core::import::{ImportDirective, ImportMethod};
use crate::core::manifest::{ProjectManifest, PROJECT_MANIFEST};
use crate::core::workspace::Workspace;
use crate::resolver::classify::Classifier;
use crate::resolver::errors::ResolveError;
use crate::resolver::expand::PathExpander;
use crate::resolver::locate::Locator;
use crate::resolver::probe::ArtifactProber;
use crate::util::env::Env;
use crate::util::fs::normalize_path;
use crate::util::hash::Fingerprint;

/// Memoized descriptors of every project reached so far.
///
/// Entries are written once and never replaced. Iteration follows
/// completion order, so a project always comes after the projects it
/// depends on.
#[derive(Debug, Default)]
pub struct ProjectGraph {
    descriptors: HashMap<PathBuf, Arc<TargetDescriptor>>,

    /// Manifest paths in completion order
    order: Vec<PathBuf>,

    /// Manifests currently being resolved, outermost first
    in_progress: Vec<PathBuf>,

    /// Project-to-project edges
    graph: DiGraph<PathBuf, ()>,

    /// Map from manifest path to node index
    nodes: HashMap<PathBuf, NodeIndex>,
}

impl ProjectGraph {
    pub fn new() -> Self {
        ProjectGraph::default()
    }

    pub fn get(&self, manifest_path: &Path) -> Option<&Arc<TargetDescriptor>> {
        self.descriptors.get(manifest_path)
    }

    pub fn contains(&self, manifest_path: &Path) -> bool {
        self.descriptors.contains_key(manifest_path)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in completion order (dependencies first).
    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<TargetDescriptor>> {
        self.order.iter().filter_map(|path| self.descriptors.get(path))
    }

    /// Nested projects a project depends on directly, in insertion order.
    pub fn project_dependencies(&self, manifest_path: &Path) -> Vec<&Arc<TargetDescriptor>> {
        self.neighbors(manifest_path, Direction::Outgoing)
    }

    /// Projects that depend directly on a project.
    pub fn project_dependents(&self, manifest_path: &Path) -> Vec<&Arc<TargetDescriptor>> {
        self.neighbors(manifest_path, Direction::Incoming)
    }

    /// Stable digest over every descriptor in completion order.
    pub fn fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        for descriptor in self.descriptors() {
            descriptor.fingerprint_into(&mut fp);
        }
        fp.finish()
    }

    fn neighbors(&self, manifest_path: &Path, direction: Direction) -> Vec<&Arc<TargetDescriptor>> {
        let Some(&node) = self.nodes.get(manifest_path) else {
            return Vec::new();
        };

        // petgraph walks edges newest first
        let mut found: Vec<_> = self
            .graph
            .neighbors_directed(node, direction)
            .filter_map(|n| self.descriptors.get(&self.graph[n]))
            .collect();
        found.reverse();
        found
    }

    fn node(&mut self, manifest_path: &Path) -> NodeIndex {
        if let Some(&node) = self.nodes.get(manifest_path) {
            return node;
        }
        let node = self.graph.add_node(manifest_path.to_path_buf());
        self.nodes.insert(manifest_path.to_path_buf(), node);
        node
    }

    fn add_edge(&mut self, from: &Path, to: &Path) {
        let a = self.node(from);
        let b = self.node(to);
        if self.graph.find_edge(a, b).is_none() {
            self.graph.add_edge(a, b, ());
        }
    }

    /// Mark a manifest as being resolved, failing if it already is.
    fn enter(&mut self, manifest_path: &Path) -> Result<(), ResolveError> {
        if let Some(start) = self.in_progress.iter().position(|p| p == manifest_path) {
            let mut chain = self.in_progress[start..].to_vec();
            chain.push(manifest_path.to_path_buf());
            return Err(ResolveError::CycleDetected { chain });
        }
        self.in_progress.push(manifest_path.to_path_buf());
        Ok(())
    }

    fn leave(&mut self, manifest_path: &Path) {
        if let Some(pos) = self.in_progress.iter().rposition(|p| p == manifest_path) {
            self.in_progress.remove(pos);
        }
    }

    fn insert(&mut self, descriptor: TargetDescriptor) -> Arc<TargetDescriptor> {
        let key = descriptor.manifest_path.clone();
        if let Some(existing) = self.descriptors.get(&key) {
            return Arc::clone(existing);
        }

        self.node(&key);
        let descriptor = Arc::new(descriptor);
        self.descriptors.insert(key.clone(), Arc::clone(&descriptor));
        self.order.push(key);
        descriptor
    }
}

/// Builds target descriptors, recursing into nested projects.
pub struct GraphBuilder<'a> {
    env: &'a dyn Env,
    locator: Locator,
    classifier: Classifier,
    prober: ArtifactProber,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(
        env: &'a dyn Env,
        locator: Locator,
        classifier: Classifier,
        prober: ArtifactProber,
    ) -> Self {
        GraphBuilder {
            env,
            locator,
            classifier,
            prober,
        }
    }

    /// Builder configured from a discovered workspace.
    pub fn for_workspace(ws: &Workspace, env: &'a dyn Env) -> Self {
        let config = ws.config();
        GraphBuilder::new(
            env,
            Locator::new(ws.third_party_root().map(Path::to_path_buf)),
            Classifier::new(config.config_scan_depth()),
            ArtifactProber::from_config(&config.artifacts),
        )
    }

    /// Resolve several top-level manifests into one shared graph.
    pub fn resolve_all(
        &self,
        manifests: &[PathBuf],
        graph: &mut ProjectGraph,
    ) -> Result<Vec<Arc<TargetDescriptor>>, ResolveError> {
        manifests
            .iter()
            .map(|path| self.resolve(path, graph))
            .collect()
    }

    /// Resolve one manifest, returning the cached descriptor when the same
    /// canonical path was resolved before.
    pub fn resolve(
        &self,
        manifest_path: &Path,
        graph: &mut ProjectGraph,
    ) -> Result<Arc<TargetDescriptor>, ResolveError> {
        let key = normalize_path(manifest_path);
        if let Some(descriptor) = graph.get(&key) {
            return Ok(Arc::clone(descriptor));
        }

        graph.enter(&key)?;
        tracing::debug!("resolving {}", key.display());
        let built = self.build(&key, graph);
        graph.leave(&key);

        Ok(graph.insert(built?))
    }

    fn build(
        &self,
        manifest_path: &Path,
        graph: &mut ProjectGraph,
    ) -> Result<TargetDescriptor, ResolveError> {
        let manifest = ProjectManifest::load(manifest_path)?;
        let mut descriptor = TargetDescriptor::new(manifest, manifest_path.to_path_buf());
        let project_dir = descriptor.project_dir().to_path_buf();
        let references = descriptor.manifest.dependencies.clone();
        let expander = PathExpander::new(self.env, &self.locator);

        for raw in &references {
            for expanded in expander.expand(raw, &project_dir) {
                let location = self
                    .locator
                    .locate(&expanded.path, &project_dir)
                    .map_err(|failure| ResolveError::DependencyNotFound {
                        reference: raw.clone(),
                        manifest: manifest_path.to_path_buf(),
                        searched: failure.searched,
                        not_a_directory: failure.not_a_directory,
                    })?;

                if location.path == project_dir {
                    tracing::warn!(
                        "{}: dependency `{}` refers to the project itself, skipping",
                        descriptor.name,
                        raw
                    );
                    continue;
                }

                let directive = self.import(
                    raw,
                    location.path,
                    manifest_path,
                    &mut descriptor,
                    graph,
                )?;
                descriptor.import_directives.push(directive);
            }
        }

        Ok(descriptor)
    }

    /// Classify a located dependency and turn it into a directive. Nested
    /// projects are resolved first so their target name and artifacts are
    /// known.
    fn import(
        &self,
        raw: &str,
        path: PathBuf,
        manifest_path: &Path,
        descriptor: &mut TargetDescriptor,
        graph: &mut ProjectGraph,
    ) -> Result<ImportDirective, ResolveError> {
        let mut method = self.classifier.classify(&path);

        let link_target = match &mut method {
            ImportMethod::Unknown => {
                return Err(ResolveError::Unclassifiable {
                    reference: raw.to_string(),
                    manifest: manifest_path.to_path_buf(),
                    path,
                })
            }
            ImportMethod::Project(site) => {
                let nested = self.resolve(&path.join(PROJECT_MANIFEST), graph)?;
                graph.add_edge(manifest_path, &nested.manifest_path);
                descriptor
                    .artifact_dirs
                    .extend(nested.artifact_dirs.iter().cloned());
                site.package_name = nested.name.clone();
                nested.primary_target.clone()
            }
            other => other.package_name().map(str::to_string),
        };

        if let Some(dir) = self.prober.probe(&path) {
            descriptor.artifact_dirs.insert(dir);
        }

        let package_name = method.package_name().unwrap_or_default().to_string();
        tracing::debug!(
            "{}: `{}` imported as {} package `{}`",
            descriptor.name,
            raw,
            method.kind(),
            package_name
        );

        Ok(ImportDirective {
            reference: raw.to_string(),
            method,
            package_name,
            resolved_path: path,
            link_target,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::import::ImportKind;
    use crate::test_support::TreeFixture;
    use std::collections::HashMap;

    fn builder(env: &HashMap<String, String>, third_party: Option<PathBuf>) -> GraphBuilder<'_> {
        GraphBuilder::new(
            env,
            Locator::new(third_party),
            Classifier::default(),
            ArtifactProber::default(),
        )
    }

    #[test]
    fn test_leaf_project() {
        let fx = TreeFixture::new();
        let manifest = fx.project("app", r#"{ "name": "app", "executable": { "compile": true, "entry_file": "main.cpp" } }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let app = builder(&env, None).resolve(&manifest, &mut graph).unwrap();

        assert_eq!(app.name, "app");
        assert_eq!(app.primary_target.as_deref(), Some("app"));
        assert!(app.import_directives.is_empty());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_directives_follow_declaration_order() {
        let fx = TreeFixture::new();
        fx.file("3rdparty/zlib/Findzlib.cmake");
        fx.file("3rdparty/fmt/lib/cmake/fmt/fmt-config.cmake");
        fx.file("3rdparty/json/CMakeLists.txt");
        fx.dir("3rdparty/boost-1.84/include");
        fx.dir("3rdparty/boost-1.84/lib");
        let manifest = fx.project(
            "app",
            r#"{ "name": "app", "dependencies": ["zlib", "fmt", "json", "boost-1.84"] }"#,
        );

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let app = builder(&env, Some(fx.path("3rdparty")))
            .resolve(&manifest, &mut graph)
            .unwrap();

        let kinds: Vec<_> = app.import_directives.iter().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            vec![ImportKind::Module, ImportKind::Config, ImportKind::Source, ImportKind::Root]
        );
        let names: Vec<_> = app
            .import_directives
            .iter()
            .map(|d| d.package_name.as_str())
            .collect();
        assert_eq!(names, vec!["zlib", "fmt", "json", "boost"]);
        assert_eq!(
            app.import_directives[1].location(),
            fx.path("3rdparty/fmt/lib/cmake/fmt")
        );
    }

    #[test]
    fn test_shared_project_is_resolved_once() {
        let fx = TreeFixture::new();
        fx.project("core", r#"{ "name": "core", "library": { "compile": true } }"#);
        fx.project("net", r#"{ "name": "net", "dependencies": ["../core"], "library": { "compile": true } }"#);
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["../core", "../net"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let app = builder(&env, None).resolve(&manifest, &mut graph).unwrap();

        assert_eq!(graph.len(), 3);
        let core = Arc::clone(graph.get(&fx.path("core/Project.json")).unwrap());
        let net = Arc::clone(graph.get(&fx.path("net/Project.json")).unwrap());
        assert_eq!(net.import_directives[0].link_target.as_deref(), Some("coreLib"));
        assert_eq!(app.import_directives[0].package_name, "core");
        assert_eq!(app.import_directives[0].link_target.as_deref(), Some("coreLib"));

        let again = builder(&env, None)
            .resolve(&fx.path("core/Project.json"), &mut graph)
            .unwrap();
        assert!(Arc::ptr_eq(&core, &again));

        let order: Vec<_> = graph.descriptors().map(|d| d.name.as_str()).collect();
        assert_eq!(order, vec!["core", "net", "app"]);

        let deps: Vec<_> = graph
            .project_dependencies(&app.manifest_path)
            .iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(deps, vec!["core", "net"]);
        assert_eq!(graph.project_dependents(&core.manifest_path).len(), 2);
    }

    #[test]
    fn test_nested_manifest_name_overrides_directory() {
        let fx = TreeFixture::new();
        fx.project("libs/geometry-2.0", r#"{ "name": "geom", "library": { "compile": true } }"#);
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["../libs/geometry-2.0"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let app = builder(&env, None).resolve(&manifest, &mut graph).unwrap();

        let directive = &app.import_directives[0];
        assert_eq!(directive.kind(), ImportKind::Project);
        assert_eq!(directive.package_name, "geom");
        assert_eq!(directive.method.package_name(), Some("geom"));
        assert_eq!(directive.link_target.as_deref(), Some("geomLib"));
    }

    #[test]
    fn test_self_reference_is_dropped() {
        let fx = TreeFixture::new();
        fx.file("app/vendor/CMakeLists.txt");
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": [".", "vendor"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let app = builder(&env, None).resolve(&manifest, &mut graph).unwrap();

        assert_eq!(app.import_directives.len(), 1);
        assert_eq!(app.import_directives[0].package_name, "vendor");
    }

    #[test]
    fn test_wildcard_produces_one_directive_per_subdir() {
        let fx = TreeFixture::new();
        for name in ["c", "a", "b"] {
            fx.file(&format!("app/plugins/{}/CMakeLists.txt", name));
        }
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["plugins/*"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let app = builder(&env, None).resolve(&manifest, &mut graph).unwrap();

        let names: Vec<_> = app
            .import_directives
            .iter()
            .map(|d| d.package_name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(app.import_directives.iter().all(|d| d.reference == "plugins/*"));
    }

    #[test]
    fn test_placeholders_are_expanded() {
        let fx = TreeFixture::new();
        fx.file("sdk/eigen/CMakeLists.txt");
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["${SDK_ROOT}/eigen"] }"#);

        let mut env: HashMap<String, String> = HashMap::new();
        env.insert("SDK_ROOT".to_string(), fx.path("sdk").display().to_string());
        let mut graph = ProjectGraph::new();
        let app = builder(&env, None).resolve(&manifest, &mut graph).unwrap();

        assert_eq!(app.import_directives[0].resolved_path, fx.path("sdk/eigen"));
        assert_eq!(app.import_directives[0].reference, "${SDK_ROOT}/eigen");
    }

    #[test]
    fn test_missing_dependency_is_fatal() {
        let fx = TreeFixture::new();
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["libs/missing"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let err = builder(&env, None).resolve(&manifest, &mut graph).unwrap_err();

        match err {
            ResolveError::DependencyNotFound { reference, .. } => {
                assert_eq!(reference, "libs/missing")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(graph.is_empty());
    }

    #[test]
    fn test_unclassifiable_is_fatal() {
        let fx = TreeFixture::new();
        fx.file("app/blob/readme.txt");
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["blob"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let err = builder(&env, None).resolve(&manifest, &mut graph).unwrap_err();
        assert!(matches!(err, ResolveError::Unclassifiable { .. }));
    }

    #[test]
    fn test_cycle_is_detected() {
        let fx = TreeFixture::new();
        fx.project("a", r#"{ "name": "a", "dependencies": ["../b"] }"#);
        fx.project("b", r#"{ "name": "b", "dependencies": ["../a"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let err = builder(&env, None)
            .resolve(&fx.path("a/Project.json"), &mut graph)
            .unwrap_err();

        match err {
            ResolveError::CycleDetected { chain } => {
                assert_eq!(
                    chain,
                    vec![
                        fx.path("a/Project.json"),
                        fx.path("b/Project.json"),
                        fx.path("a/Project.json"),
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_artifacts_propagate_transitively() {
        let fx = TreeFixture::new();
        fx.file("3rdparty/zlib/CMakeLists.txt");
        fx.file("3rdparty/zlib/bin/zlib1.dll");
        fx.file("3rdparty/png/CMakeLists.txt");
        fx.file("3rdparty/png/lib/libpng.so.16");
        fx.project("image", r#"{ "name": "image", "dependencies": ["zlib"], "library": { "compile": true } }"#);
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["../image", "png"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut graph = ProjectGraph::new();
        let app = builder(&env, Some(fx.path("3rdparty")))
            .resolve(&manifest, &mut graph)
            .unwrap();

        let image = graph.get(&fx.path("image/Project.json")).unwrap();
        assert!(image.artifact_dirs.contains(&fx.path("3rdparty/zlib/bin")));
        assert!(app.artifact_dirs.contains(&fx.path("3rdparty/zlib/bin")));
        assert!(app.artifact_dirs.contains(&fx.path("3rdparty/png/lib")));
        assert_eq!(app.artifact_dirs.len(), 2);
    }

    #[test]
    fn test_fingerprint_is_stable_across_runs() {
        let fx = TreeFixture::new();
        fx.file("app/vendor/CMakeLists.txt");
        let manifest = fx.project("app", r#"{ "name": "app", "dependencies": ["vendor"] }"#);

        let env: HashMap<String, String> = HashMap::new();
        let mut first = ProjectGraph::new();
        builder(&env, None).resolve(&manifest, &mut first).unwrap();
        let mut second = ProjectGraph::new();
        builder(&env, None).resolve(&manifest, &mut second).unwrap();

        assert_eq!(first.fingerprint(), second.fingerprint());
    }
}
