//! CMake generation from resolved target descriptors.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::sources::collect_sources;
use crate::core::descriptor::TargetDescriptor;
use crate::core::import::{ImportDirective, ImportMethod};
use crate::core::manifest::SolutionManifest;
use crate::resolver::expand::expand_placeholders;
use crate::util::env::Env;
use crate::util::fs::{base_name, forward_slashes, normalize_lexically};

/// Build file written into every project directory.
pub const CMAKE_LISTS: &str = "CMakeLists.txt";

/// Minimum CMake version declared by generated files.
pub const CMAKE_MINIMUM_VERSION: &str = "3.10";

/// A file the emitter wants on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// Line-oriented CMake text buffer.
#[derive(Debug, Default)]
struct CMakeWriter {
    out: String,
}

impl CMakeWriter {
    fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        writeln!(self.out, "{}", line.as_ref()).unwrap();
        self
    }

    fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    /// `command(head` followed by one indented item per line and `)`.
    fn block<I, S>(&mut self, head: &str, items: I, tail: Option<&str>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.line(head);
        for item in items {
            self.line(format!("    {}", item.as_ref()));
        }
        match tail {
            Some(tail) => self.line(format!("    {})", tail)),
            None => self.line(")"),
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn quoted(path: &Path) -> String {
    format!("\"{}\"", forward_slashes(path))
}

/// Renders `CMakeLists.txt` files for resolved projects and solutions.
pub struct CMakeEmitter<'a> {
    env: &'a dyn Env,
}

impl<'a> CMakeEmitter<'a> {
    pub fn new(env: &'a dyn Env) -> Self {
        CMakeEmitter { env }
    }

    /// Files for one project: its `CMakeLists.txt`, plus `<name>Config.cmake`
    /// when the library is installed.
    pub fn render_project(&self, descriptor: &TargetDescriptor) -> Result<Vec<GeneratedFile>> {
        let manifest = &descriptor.manifest;
        let project_dir = descriptor.project_dir();
        let sources = collect_sources(project_dir, &manifest.source_dirs)?;
        let include_dirs = self.include_dirs(descriptor);
        let link_targets: Vec<&str> = descriptor.link_targets().collect();
        let install_dir = self.install_dir(descriptor);

        let mut w = CMakeWriter::default();
        w.line(format!("cmake_minimum_required(VERSION {})", CMAKE_MINIMUM_VERSION))
            .line(format!("project({} VERSION {})", descriptor.name, descriptor.version))
            .blank()
            .line(format!(
                "add_definitions(-DRootPath={})",
                quoted(project_dir)
            ))
            .blank()
            .line("set(CMAKE_CXX_STANDARD 17)")
            .line("set(CMAKE_CXX_STANDARD_REQUIRED ON)")
            .blank();

        if let Some(dir) = &install_dir {
            w.line(format!(
                "set(CMAKE_INSTALL_PREFIX {} CACHE PATH \"Install prefix\" FORCE)",
                quoted(dir)
            ))
            .blank();
        }

        if !descriptor.import_directives.is_empty() {
            for directive in &descriptor.import_directives {
                write_import(&mut w, directive);
            }
            w.blank();
        }

        let mut files = Vec::new();

        if manifest.library.compile {
            let lib = manifest.library_target();
            let kind = if manifest.library.static_lib {
                "STATIC"
            } else {
                "SHARED"
            };

            w.block(&format!("add_library({} {}", lib, kind), &sources, None);

            if !include_dirs.is_empty() {
                let items = include_dirs.iter().flat_map(|dir| {
                    [
                        format!("$<BUILD_INTERFACE:{}>", dir),
                        "$<INSTALL_INTERFACE:include>".to_string(),
                    ]
                });
                w.block(&format!("target_include_directories({} PUBLIC", lib), items, None);
            }

            if !link_targets.is_empty() {
                w.block(
                    &format!("target_link_libraries({} PRIVATE", lib),
                    &link_targets,
                    None,
                );
            }

            if install_dir.is_some() {
                files.push(self.write_install(&mut w, descriptor, &lib));
            }
            w.blank();
        }

        if manifest.executable.compile {
            let exe = &descriptor.name;
            let entry = manifest
                .executable
                .entry_file
                .as_deref()
                .map(|e| forward_slashes(&normalize_lexically(Path::new(e))))
                .unwrap_or_default();

            let mut items = vec![entry.clone()];
            if !manifest.library.compile {
                items.extend(sources.iter().filter(|s| **s != entry).cloned());
            }
            w.block(&format!("add_executable({}", exe), &items, None);

            if !include_dirs.is_empty() {
                w.block(
                    &format!("target_include_directories({} PRIVATE", exe),
                    &include_dirs,
                    None,
                );
            }

            let mut links = Vec::new();
            if manifest.library.compile {
                links.push(manifest.library_target());
            }
            links.extend(link_targets.iter().map(|t| t.to_string()));
            w.block(&format!("target_link_libraries({} PRIVATE", exe), &links, None);

            for dir in &descriptor.artifact_dirs {
                w.line(format!("add_custom_command(TARGET {} POST_BUILD", exe)).line(format!(
                    "    COMMAND ${{CMAKE_COMMAND}} -E copy_directory {} \"$<TARGET_FILE_DIR:{}>\")",
                    quoted(dir),
                    exe
                ));
            }
            w.blank();
        }

        files.insert(
            0,
            GeneratedFile {
                path: project_dir.join(CMAKE_LISTS),
                contents: w.finish(),
            },
        );
        Ok(files)
    }

    /// Root `CMakeLists.txt` for a solution. Projects already added as a
    /// dependency of an earlier project are skipped by their target guard.
    pub fn render_solution(
        &self,
        solution: &SolutionManifest,
        projects: &[&TargetDescriptor],
    ) -> GeneratedFile {
        let mut w = CMakeWriter::default();
        w.line(format!("cmake_minimum_required(VERSION {})", CMAKE_MINIMUM_VERSION))
            .line(format!("project({})", solution.name))
            .blank()
            .line("set(CMAKE_CXX_STANDARD 17)")
            .line("set(CMAKE_CXX_STANDARD_REQUIRED ON)")
            .blank();

        for project in projects {
            let dir = project.project_dir();
            let add = format!(
                "add_subdirectory({} \"${{CMAKE_BINARY_DIR}}/{}\")",
                quoted(dir),
                base_name(dir)
            );
            match &project.primary_target {
                Some(target) => {
                    w.line(format!("if(NOT TARGET {})", target))
                        .line(format!("    {}", add))
                        .line("endif()");
                }
                None => {
                    w.line(add);
                }
            }
        }

        GeneratedFile {
            path: solution.solution_dir().join(CMAKE_LISTS),
            contents: w.finish(),
        }
    }

    /// Include directories, placeholder-expanded and absolute.
    fn include_dirs(&self, descriptor: &TargetDescriptor) -> Vec<String> {
        descriptor
            .manifest
            .include_dirs
            .iter()
            .map(|dir| {
                let expanded = expand_placeholders(dir, self.env).replace('\\', "/");
                let abs = descriptor.project_dir().join(expanded);
                forward_slashes(&normalize_lexically(&abs))
            })
            .collect()
    }

    fn install_dir(&self, descriptor: &TargetDescriptor) -> Option<PathBuf> {
        let library = &descriptor.manifest.library;
        if !library.compile {
            return None;
        }
        library
            .install_dir
            .as_deref()
            .filter(|dir| !dir.is_empty())
            .map(|dir| normalize_lexically(&descriptor.project_dir().join(dir)))
    }

    /// Install and export rules; returns the package config file they install.
    fn write_install(
        &self,
        w: &mut CMakeWriter,
        descriptor: &TargetDescriptor,
        lib: &str,
    ) -> GeneratedFile {
        let name = &descriptor.name;
        let headers = &descriptor.manifest.library.export_headers;

        w.blank()
            .line(format!("install(TARGETS {} EXPORT {}Targets", lib, name))
            .line("    DESTINATION lib)");
        if !headers.is_empty() {
            w.block("install(FILES", headers, Some("DESTINATION include"));
        }
        w.line(format!("install(EXPORT {}Targets", name))
            .line(format!("    FILE {}Targets.cmake", name))
            .line(format!("    NAMESPACE {}::", name))
            .line(format!("    DESTINATION lib/cmake/{})", name))
            .line(format!("install(FILES {}Config.cmake", name))
            .line(format!("    DESTINATION lib/cmake/{})", name));

        let mut config = CMakeWriter::default();
        config
            .line(format!("include(${{CMAKE_CURRENT_LIST_DIR}}/{}Targets.cmake)", name))
            .line(format!("set({}_VERSION {})", name, descriptor.version));

        GeneratedFile {
            path: descriptor.project_dir().join(format!("{}Config.cmake", name)),
            contents: config.finish(),
        }
    }
}

/// One import block per directive.
fn write_import(w: &mut CMakeWriter, directive: &ImportDirective) {
    let pkg = &directive.package_name;
    let path = &directive.resolved_path;

    match &directive.method {
        ImportMethod::Module(site) => {
            w.line(format!("list(APPEND CMAKE_MODULE_PATH {})", quoted(&site.location)))
                .line(format!("find_package({} REQUIRED)", pkg));
        }
        ImportMethod::Config(site) => {
            w.line(format!(
                "find_package({} REQUIRED PATHS {})",
                pkg,
                quoted(&site.location)
            ));
        }
        ImportMethod::Source(_) | ImportMethod::Project(_) => {
            let guard = directive.link_target.as_deref().unwrap_or(pkg);
            w.line(format!("if(NOT TARGET {})", guard))
                .line(format!(
                    "    add_subdirectory({} \"${{CMAKE_BINARY_DIR}}/deps/{}\")",
                    quoted(path),
                    base_name(path)
                ))
                .line("endif()");
        }
        ImportMethod::Root(site) => {
            w.line(format!("if(NOT TARGET {})", pkg))
                .line(format!("    add_library({} INTERFACE IMPORTED)", pkg))
                .line(format!("    set_target_properties({} PROPERTIES", pkg))
                .line(format!(
                    "        INTERFACE_INCLUDE_DIRECTORIES {}",
                    quoted(&site.location.join("include"))
                ))
                .line(format!(
                    "        INTERFACE_LINK_DIRECTORIES {})",
                    quoted(&site.location.join("lib"))
                ))
                .line("endif()");
        }
        // Unknown never survives resolution.
        ImportMethod::Unknown => {}
    }
}
