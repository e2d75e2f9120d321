//! Filesystem-backed resolution engine.
//!
//! Resolves from the session's local repository first, then from each
//! remote repository in order. Remote repositories must be reachable as
//! directories (`file:` URLs or plain paths); other transports are reported
//! as a per-repository cause. An artifact found remotely is copied into the
//! local repository and resolved from there.
//!
//! `LATEST` resolves to the highest version found in the local repository
//! and the enabled remotes, snapshots included; `RELEASE` skips snapshots.

use std::path::Path;

use crate::artifact::{is_snapshot_version, Artifact};
use crate::error::ResolutionError;
use crate::integrity::{self, ContentHash};
use crate::local::{self, LocalRepositoryManager};
use crate::repository::{ChecksumPolicy, LocalRepository, RemoteRepository, Transport};
use crate::session::RepositorySession;
use crate::system::{ArtifactRequest, ArtifactResult, RepositorySystem};
use crate::version::{self, Metaversion};

/// Repository id reported for artifacts found in the local repository.
pub const LOCAL_REPOSITORY_ID: &str = "local";

/// A [`RepositorySystem`] over local directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRepositorySystem;

impl FileRepositorySystem {
    pub fn new() -> Self {
        FileRepositorySystem
    }

    /// Pin a `LATEST`/`RELEASE` artifact to a concrete version.
    fn resolve_version(
        &self,
        session: &RepositorySession,
        manager: &LocalRepositoryManager,
        artifact: &Artifact,
        repositories: &[RemoteRepository],
        meta: Metaversion,
    ) -> Result<Artifact, ResolutionError> {
        let mut candidates = manager.list_versions(artifact.group_id(), artifact.artifact_id())?;
        if !session.is_offline() {
            for repository in repositories {
                let Transport::File(root) = repository.transport() else {
                    continue;
                };
                // Only versions this repository would actually serve.
                let published = local::list_version_dirs(&root, artifact.group_id(), artifact.artifact_id())?;
                candidates.extend(
                    published
                        .into_iter()
                        .filter(|v| repository.policy_for(is_snapshot_version(v)).enabled),
                );
            }
        }

        let chosen = version::select(candidates.iter().map(String::as_str), meta).ok_or_else(|| {
            ResolutionError::VersionNotFound {
                artifact: artifact.key(),
                version: meta.as_str().to_string(),
            }
        })?;
        tracing::debug!(artifact = %artifact.key(), requested = meta.as_str(), chosen, "resolved metaversion");
        Ok(artifact.with_version(chosen))
    }

    /// Try one remote repository. `Ok(None)` means the repository was
    /// skipped by policy.
    fn fetch_from(
        &self,
        session: &RepositorySession,
        manager: &LocalRepositoryManager,
        artifact: &Artifact,
        repository: &RemoteRepository,
    ) -> Result<Option<Artifact>, ResolutionError> {
        let policy = repository.policy_for(artifact.is_snapshot());
        if !policy.enabled {
            tracing::debug!(repository = repository.id(), artifact = %artifact, "repository policy disabled, skipping");
            return Ok(None);
        }

        if session.is_offline() {
            return Err(ResolutionError::Offline {
                artifact: artifact.to_string(),
                repository: repository.id().to_string(),
            });
        }

        let root = match repository.transport() {
            Transport::File(root) => root,
            Transport::Http | Transport::Other(_) => {
                return Err(ResolutionError::UnsupportedTransport {
                    repository: repository.id().to_string(),
                    url: repository.url().to_string(),
                })
            }
        };

        let source = root.join(local::artifact_path(artifact));
        if !source.is_file() {
            return Err(ResolutionError::ArtifactNotFound {
                artifact: artifact.to_string(),
                repository: repository.id().to_string(),
            });
        }

        let checksum_policy = policy.checksum_policy.unwrap_or(session.checksum_policy());
        verify_checksum(&source, artifact, repository, checksum_policy)?;

        let installed = manager.store(artifact, &source)?;
        Ok(Some(artifact.with_file(installed)))
    }
}

fn verify_checksum(
    source: &Path,
    artifact: &Artifact,
    repository: &RemoteRepository,
    policy: ChecksumPolicy,
) -> Result<(), ResolutionError> {
    if policy == ChecksumPolicy::Ignore {
        return Ok(());
    }

    let expected = match integrity::read_sidecar(source).map_err(|e| ResolutionError::io(source, e))? {
        Some(expected) => expected,
        None => {
            tracing::debug!(artifact = %artifact, repository = repository.id(), "no checksum published");
            return Ok(());
        }
    };
    let actual = ContentHash::compute_file(source).map_err(|e| ResolutionError::io(source, e))?;
    if actual == expected {
        return Ok(());
    }

    match policy {
        ChecksumPolicy::Fail => Err(ResolutionError::ChecksumFailure {
            artifact: artifact.to_string(),
            repository: repository.id().to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }),
        _ => {
            tracing::warn!(
                artifact = %artifact,
                repository = repository.id(),
                %expected,
                %actual,
                "checksum mismatch, accepting artifact"
            );
            Ok(())
        }
    }
}

impl RepositorySystem for FileRepositorySystem {
    fn resolve_artifact(
        &self,
        session: &RepositorySession,
        request: &ArtifactRequest<'_>,
    ) -> Result<ArtifactResult, ResolutionError> {
        let manager = session
            .local_repository_manager()
            .ok_or(ResolutionError::LocalRepositoryMissing)?;
        if let Err(cause) = local::check_layout(request.artifact) {
            return Ok(ArtifactResult::failed(vec![cause]));
        }

        let artifact = match Metaversion::parse(request.artifact.version()) {
            Some(meta) => {
                match self.resolve_version(session, manager, request.artifact, request.repositories, meta) {
                    Ok(artifact) => artifact,
                    Err(cause) => return Ok(ArtifactResult::failed(vec![cause])),
                }
            }
            None => request.artifact.clone(),
        };

        if let Some(path) = manager.find(&artifact) {
            tracing::debug!(artifact = %artifact, "found in local repository");
            return Ok(ArtifactResult::resolved(artifact.with_file(path), LOCAL_REPOSITORY_ID));
        }

        let mut causes = Vec::new();
        for repository in request.repositories {
            match self.fetch_from(session, manager, &artifact, repository) {
                Ok(Some(resolved)) => {
                    tracing::info!(artifact = %artifact, repository = repository.id(), "resolved from remote repository");
                    return Ok(ArtifactResult::resolved(resolved, repository.id()));
                }
                Ok(None) => {}
                Err(cause) => {
                    tracing::debug!(repository = repository.id(), %cause, "repository did not provide artifact");
                    causes.push(cause);
                }
            }
        }

        if causes.is_empty() {
            causes.push(ResolutionError::ArtifactNotFound {
                artifact: artifact.to_string(),
                repository: LOCAL_REPOSITORY_ID.to_string(),
            });
        }
        Ok(ArtifactResult::failed(causes))
    }

    fn new_local_repository_manager(
        &self,
        _session: &RepositorySession,
        local: &LocalRepository,
    ) -> Result<LocalRepositoryManager, ResolutionError> {
        let basedir = local.basedir();
        if basedir.exists() && !basedir.is_dir() {
            return Err(ResolutionError::InvalidLayout {
                path: basedir.to_path_buf(),
                detail: "local repository path is not a directory".to_string(),
            });
        }
        Ok(LocalRepositoryManager::new(basedir.to_path_buf()))
    }

    fn new_resolution_repositories(
        &self,
        session: &RepositorySession,
        repositories: &[RemoteRepository],
    ) -> Vec<RemoteRepository> {
        let selector = session.mirror_selector();
        let mut result: Vec<RemoteRepository> = Vec::new();

        for repository in repositories {
            let candidate = selector.apply(repository).unwrap_or_else(|| repository.clone());
            match result.iter_mut().find(|r| r.id() == candidate.id()) {
                Some(existing) => {
                    // A second repository behind the same mirror joins the
                    // mirror's list of originals.
                    for original in candidate.mirrored() {
                        if !existing.mirrored().iter().any(|m| m.id() == original.id()) {
                            existing.mirrored_mut().push(original.clone());
                        }
                    }
                }
                None => result.push(candidate),
            }
        }
        result
    }
}
