//! The resolution engine contract.
//!
//! The `RepositorySystem` trait abstracts over engines that can materialize
//! an [`Artifact`] as a local file. The chart resolver depends only on this
//! trait; [`FileRepositorySystem`] is the bundled filesystem implementation.
//!
//! [`FileRepositorySystem`]: crate::filesystem::FileRepositorySystem

use crate::artifact::Artifact;
use crate::error::ResolutionError;
use crate::local::LocalRepositoryManager;
use crate::repository::{LocalRepository, RemoteRepository};
use crate::session::RepositorySession;

/// A request to resolve one artifact against an ordered list of remotes.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactRequest<'a> {
    pub artifact: &'a Artifact,
    pub repositories: &'a [RemoteRepository],
    /// Free-form label describing why the artifact is wanted.
    pub context: Option<&'a str>,
}

impl<'a> ArtifactRequest<'a> {
    pub fn new(artifact: &'a Artifact, repositories: &'a [RemoteRepository]) -> Self {
        ArtifactRequest {
            artifact,
            repositories,
            context: None,
        }
    }
}

/// The outcome of a resolution request.
///
/// The outcome is either resolved (an artifact bound to a local file) or
/// failed with zero or more ordered causes.
#[derive(Debug, Default)]
pub struct ArtifactResult {
    artifact: Option<Artifact>,
    repository: Option<String>,
    exceptions: Vec<ResolutionError>,
}

impl ArtifactResult {
    /// A resolved outcome. `artifact` must carry its local file.
    pub fn resolved(artifact: Artifact, repository: &str) -> Self {
        ArtifactResult {
            artifact: Some(artifact),
            repository: Some(repository.to_string()),
            exceptions: Vec::new(),
        }
    }

    /// A failed outcome with the given causes, which may be empty.
    pub fn failed(exceptions: Vec<ResolutionError>) -> Self {
        ArtifactResult {
            artifact: None,
            repository: None,
            exceptions,
        }
    }

    /// Whether the artifact was materialized as a local file.
    pub fn is_resolved(&self) -> bool {
        self.artifact.as_ref().is_some_and(|a| a.file().is_some())
    }

    /// The resolved artifact, present only on success.
    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref().filter(|a| a.file().is_some())
    }

    /// Id of the repository the artifact came from.
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    /// Failure causes in the order they occurred.
    pub fn exceptions(&self) -> &[ResolutionError] {
        &self.exceptions
    }

    /// Take ownership of the failure causes.
    pub fn into_exceptions(self) -> Vec<ResolutionError> {
        self.exceptions
    }
}

/// A resolution engine.
///
/// `resolve_artifact` may block on I/O. Failures to find the artifact are
/// reported inside the returned [`ArtifactResult`]; an `Err` means the engine
/// could not attempt resolution at all.
pub trait RepositorySystem: Send + Sync {
    /// Resolve one artifact to a local file.
    fn resolve_artifact(
        &self,
        session: &RepositorySession,
        request: &ArtifactRequest<'_>,
    ) -> Result<ArtifactResult, ResolutionError>;

    /// Create the manager for a local repository root.
    fn new_local_repository_manager(
        &self,
        session: &RepositorySession,
        local: &LocalRepository,
    ) -> Result<LocalRepositoryManager, ResolutionError>;

    /// Prepare configured remotes for resolution, applying the session's
    /// mirrors and dropping duplicates.
    fn new_resolution_repositories(
        &self,
        session: &RepositorySession,
        repositories: &[RemoteRepository],
    ) -> Vec<RemoteRepository>;
}
