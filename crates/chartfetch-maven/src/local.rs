//! Local repository management.
//!
//! Artifacts are stored in the Maven 2 default layout:
//!
//! ```text
//! <basedir>/
//!   org/example/            — group id, dots become directories
//!     mychart/              — artifact id
//!       1.2.0/              — version
//!         mychart-1.2.0.tgz
//!         mychart-1.2.0.tgz.sha256
//!         mychart-1.2.0-debug.zip   — classified artifact
//! ```

use std::path::{Path, PathBuf};

use crate::artifact::Artifact;
use crate::error::ResolutionError;
use crate::integrity::{self, ContentHash};

/// Relative path of `artifact` inside any default-layout repository.
pub fn artifact_path(artifact: &Artifact) -> PathBuf {
    let mut file_name = format!("{}-{}", artifact.artifact_id(), artifact.version());
    if let Some(classifier) = artifact.classifier() {
        file_name.push('-');
        file_name.push_str(classifier);
    }
    file_name.push('.');
    file_name.push_str(artifact.extension());

    versions_path(artifact.group_id(), artifact.artifact_id())
        .join(artifact.version())
        .join(file_name)
}

/// Refuse identities whose parts would not stay inside a repository root.
pub(crate) fn check_layout(artifact: &Artifact) -> Result<(), ResolutionError> {
    artifact.validate().map_err(|source| ResolutionError::InvalidArtifact {
        artifact: artifact.to_string(),
        source,
    })
}

/// Sibling file that a copy is written to before it is renamed into place.
fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Relative directory holding all versions of `group_id:artifact_id`.
pub fn versions_path(group_id: &str, artifact_id: &str) -> PathBuf {
    let mut path: PathBuf = group_id.split('.').collect();
    path.push(artifact_id);
    path
}

/// List version directories under `root` for an artifact, sorted by name.
pub(crate) fn list_version_dirs(root: &Path, group_id: &str, artifact_id: &str) -> Result<Vec<String>, ResolutionError> {
    let dir = root.join(versions_path(group_id, artifact_id));
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut versions = Vec::new();
    for entry in std::fs::read_dir(&dir).map_err(|e| ResolutionError::io(&dir, e))? {
        let entry = entry.map_err(|e| ResolutionError::io(&dir, e))?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                versions.push(name.to_string());
            }
        }
    }
    versions.sort();
    Ok(versions)
}

/// Manages the on-disk local repository that resolved artifacts land in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepositoryManager {
    basedir: PathBuf,
}

impl LocalRepositoryManager {
    pub fn new(basedir: PathBuf) -> Self {
        LocalRepositoryManager { basedir }
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }

    /// Absolute path where `artifact` lives (or would live).
    pub fn path_of(&self, artifact: &Artifact) -> PathBuf {
        self.basedir.join(artifact_path(artifact))
    }

    /// The local file for `artifact`, if it is present.
    pub fn find(&self, artifact: &Artifact) -> Option<PathBuf> {
        let path = self.path_of(artifact);
        path.is_file().then_some(path)
    }

    /// All locally present versions of `group_id:artifact_id`.
    pub fn list_versions(&self, group_id: &str, artifact_id: &str) -> Result<Vec<String>, ResolutionError> {
        list_version_dirs(&self.basedir, group_id, artifact_id)
    }

    /// Copy `source` into the local repository as `artifact` and record its
    /// checksum sidecar. Returns the installed path.
    pub fn store(&self, artifact: &Artifact, source: &Path) -> Result<PathBuf, ResolutionError> {
        check_layout(artifact)?;
        let target = self.path_of(artifact);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ResolutionError::io(parent, e))?;
        }

        // Copy next to the target first so readers never see a partial file.
        let staging = staging_path(&target);
        std::fs::copy(source, &staging).map_err(|e| ResolutionError::io(&staging, e))?;
        std::fs::rename(&staging, &target).map_err(|e| ResolutionError::io(&target, e))?;

        let hash = ContentHash::compute_file(&target).map_err(|e| ResolutionError::io(&target, e))?;
        let sidecar = integrity::sidecar_path(&target);
        std::fs::write(&sidecar, hash.as_str()).map_err(|e| ResolutionError::io(&sidecar, e))?;

        tracing::debug!(artifact = %artifact, path = %target.display(), "installed into local repository");
        Ok(target)
    }

    /// Check a stored artifact against its sidecar. Returns `false` when the
    /// artifact or sidecar is missing or the digest differs.
    pub fn verify(&self, artifact: &Artifact) -> Result<bool, ResolutionError> {
        let Some(path) = self.find(artifact) else {
            return Ok(false);
        };
        let Some(expected) = integrity::read_sidecar(&path).map_err(|e| ResolutionError::io(&path, e))? else {
            return Ok(false);
        };
        let actual = ContentHash::compute_file(&path).map_err(|e| ResolutionError::io(&path, e))?;
        Ok(actual == expected)
    }

    /// Remove one version of an artifact. Returns whether anything was
    /// removed.
    pub fn remove(&self, artifact: &Artifact) -> Result<bool, ResolutionError> {
        check_layout(artifact)?;
        let dir = self
            .basedir
            .join(versions_path(artifact.group_id(), artifact.artifact_id()))
            .join(artifact.version());
        if dir.is_dir() {
            std::fs::remove_dir_all(&dir).map_err(|e| ResolutionError::io(&dir, e))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
