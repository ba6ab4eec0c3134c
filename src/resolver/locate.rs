//! Location of expanded references on disk.

use std::path::{Path, PathBuf};

use crate::util::fs::normalize_path;

/// An absolute dependency directory and the project it was resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// Canonical directory path
    pub path: PathBuf,

    /// Project directory the reference was resolved relative to
    pub relative_to: PathBuf,
}

/// Why a reference could not be located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateFailure {
    /// Candidates tried, in order
    pub searched: Vec<PathBuf>,

    /// First candidate that exists but is a file
    pub not_a_directory: Option<PathBuf>,
}

/// Resolves references against, in order: the absolute path itself, the
/// requesting project directory, and the shared third-party root.
#[derive(Debug, Clone, Default)]
pub struct Locator {
    third_party_root: Option<PathBuf>,
}

impl Locator {
    pub fn new(third_party_root: Option<PathBuf>) -> Self {
        Locator { third_party_root }
    }

    pub fn third_party_root(&self) -> Option<&Path> {
        self.third_party_root.as_deref()
    }

    /// Candidate locations for a reference, in search order.
    pub fn candidates(&self, reference: &Path, project_dir: &Path) -> Vec<PathBuf> {
        if reference.is_absolute() {
            return vec![reference.to_path_buf()];
        }

        let mut candidates = vec![project_dir.join(reference)];
        if let Some(root) = &self.third_party_root {
            candidates.push(root.join(reference));
        }
        candidates
    }

    /// Locate a reference. The first existing candidate wins; it must be a
    /// directory.
    pub fn locate(
        &self,
        reference: &Path,
        project_dir: &Path,
    ) -> Result<ResolvedLocation, LocateFailure> {
        let searched = self.candidates(reference, project_dir);

        match searched.iter().find(|c| c.exists()) {
            Some(found) if found.is_dir() => Ok(ResolvedLocation {
                path: normalize_path(found),
                relative_to: project_dir.to_path_buf(),
            }),
            Some(found) => {
                let not_a_directory = Some(found.clone());
                Err(LocateFailure {
                    searched,
                    not_a_directory,
                })
            }
            None => Err(LocateFailure {
                searched,
                not_a_directory: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Tree {
        _tmp: TempDir,
        project: PathBuf,
        third_party: PathBuf,
    }

    fn tree() -> Tree {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("app");
        let third_party = tmp.path().join("3rdparty");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::create_dir_all(&third_party).unwrap();
        Tree {
            project: normalize_path(&project),
            third_party: normalize_path(&third_party),
            _tmp: tmp,
        }
    }

    #[test]
    fn test_absolute_reference() {
        let t = tree();
        let locator = Locator::new(Some(t.third_party.clone()));
        let loc = locator.locate(&t.third_party, &t.project).unwrap();
        assert_eq!(loc.path, t.third_party);
    }

    #[test]
    fn test_project_relative_wins_over_third_party() {
        let t = tree();
        std::fs::create_dir_all(t.project.join("zlib")).unwrap();
        std::fs::create_dir_all(t.third_party.join("zlib")).unwrap();

        let locator = Locator::new(Some(t.third_party.clone()));
        let loc = locator.locate(Path::new("zlib"), &t.project).unwrap();
        assert_eq!(loc.path, t.project.join("zlib"));
        assert_eq!(loc.relative_to, t.project);
    }

    #[test]
    fn test_falls_back_to_third_party() {
        let t = tree();
        std::fs::create_dir_all(t.third_party.join("eigen")).unwrap();

        let locator = Locator::new(Some(t.third_party.clone()));
        let loc = locator.locate(Path::new("eigen"), &t.project).unwrap();
        assert_eq!(loc.path, t.third_party.join("eigen"));
    }

    #[test]
    fn test_missing_everywhere() {
        let t = tree();
        let locator = Locator::new(Some(t.third_party.clone()));
        let failure = locator.locate(Path::new("ghost"), &t.project).unwrap_err();
        assert_eq!(
            failure.searched,
            vec![t.project.join("ghost"), t.third_party.join("ghost")]
        );
        assert!(failure.not_a_directory.is_none());
    }

    #[test]
    fn test_file_is_rejected() {
        let t = tree();
        std::fs::write(t.project.join("notes.txt"), "").unwrap();

        let locator = Locator::new(None);
        let failure = locator
            .locate(Path::new("notes.txt"), &t.project)
            .unwrap_err();
        assert_eq!(failure.not_a_directory, Some(t.project.join("notes.txt")));
    }
}
