//! Resolution error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::manifest::ManifestError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Fatal error during project graph resolution. Any of these aborts the run.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(code(mooring::manifest::invalid))]
    Manifest(#[from] ManifestError),

    #[error("dependency `{reference}` not found")]
    #[diagnostic(code(mooring::resolve::not_found))]
    DependencyNotFound {
        /// The reference as declared in the manifest
        reference: String,
        /// Manifest that declared it
        manifest: PathBuf,
        /// Candidate locations that were tried, in order
        searched: Vec<PathBuf>,
        /// First candidate that exists but is not a directory
        not_a_directory: Option<PathBuf>,
    },

    #[error("could not determine how to import dependency `{reference}` at {}", path.display())]
    #[diagnostic(code(mooring::resolve::unclassifiable))]
    Unclassifiable {
        reference: String,
        manifest: PathBuf,
        path: PathBuf,
    },

    #[error("cycle detected in project graph")]
    #[diagnostic(code(mooring::resolve::cycle))]
    CycleDetected { chain: Vec<PathBuf> },
}

impl ResolveError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::Manifest(err) => err.to_diagnostic(),

            ResolveError::DependencyNotFound {
                reference,
                manifest,
                searched,
                not_a_directory,
            } => {
                let mut diag = Diagnostic::error(format!("dependency `{}` not found", reference))
                    .with_location(manifest);

                for path in searched {
                    diag = diag.with_context(format!("searched {}", path.display()));
                }
                if let Some(path) = not_a_directory {
                    diag = diag.with_context(format!("{} exists but is not a directory", path.display()));
                }

                diag.with_suggestion(suggestions::MISSING_DEPENDENCY)
            }

            ResolveError::Unclassifiable {
                reference,
                manifest,
                path,
            } => Diagnostic::error(format!(
                "could not determine how to import dependency `{}`",
                reference
            ))
            .with_location(manifest)
            .with_context(format!("resolved to {}", path.display()))
            .with_suggestion(suggestions::UNCLASSIFIABLE),

            ResolveError::CycleDetected { chain } => {
                let names: Vec<String> = chain.iter().map(|p| p.display().to_string()).collect();
                Diagnostic::error("cycle detected in project graph")
                    .with_context(format!("cycle: {}", names.join(" -> ")))
                    .with_suggestion(suggestions::CYCLE)
            }
        }
    }
}
