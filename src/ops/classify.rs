//! `mooring classify` - report how a single directory would be imported.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::core::import::ImportMethod;
use crate::resolver::{ArtifactProber, Classifier, ConfigMatch};
use crate::util::fs::normalize_path;
use crate::util::Config;

/// Classification of one directory.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyReport {
    pub path: PathBuf,
    pub method: ImportMethod,

    /// Winning package-config file and its score, for config imports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_score: Option<u8>,

    /// Runtime library directory, if one was found
    pub artifact_dir: Option<PathBuf>,
}

/// Classify `dir` with the same rules the resolver applies to dependencies.
pub fn classify_dir(dir: &Path, config: &Config) -> Result<ClassifyReport> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let path = normalize_path(dir);
    let classifier = Classifier::new(config.config_scan_depth());
    let method = classifier.classify(&path);

    let config_match: Option<ConfigMatch> = match &method {
        ImportMethod::Config(_) => classifier.find_config(&path),
        _ => None,
    };

    Ok(ClassifyReport {
        artifact_dir: ArtifactProber::from_config(&config.artifacts).probe(&path),
        config_file: config_match.as_ref().map(|m| m.path.clone()),
        config_score: config_match.map(|m| m.score),
        method,
        path,
    })
}
