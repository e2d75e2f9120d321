//! Chart resolution from coordinates.
//!
//! [`ChartResolver`] ties the pieces together: parse coordinates, ask the
//! injected [`RepositorySystem`] for the artifact, fold a failed outcome into
//! a single [`ChartResolverError`], and hand the resolved file to the decoder
//! for its packaging.

use std::sync::Arc;

use chartfetch_chart::Chart;

use crate::artifact::{parse_coordinates, Artifact};
use crate::error::{ChartResolverError, Result};
use crate::packaging::{load_chart, LoaderProvider, StandardLoaders};
use crate::repository::RemoteRepository;
use crate::session::RepositorySession;
use crate::system::{ArtifactRequest, RepositorySystem};

/// Resolves charts through an injected engine and session.
///
/// The resolver only reads its configuration, so one instance can be shared
/// across threads.
#[derive(Clone)]
pub struct ChartResolver {
    system: Option<Arc<dyn RepositorySystem>>,
    session: Option<Arc<RepositorySession>>,
    remote_repositories: Option<Vec<RemoteRepository>>,
    loaders: Arc<dyn LoaderProvider>,
}

impl std::fmt::Debug for ChartResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartResolver")
            .field("system", &self.system.as_ref().map(|_| ".."))
            .field("session", &self.session)
            .field("remote_repositories", &self.remote_repositories)
            .finish_non_exhaustive()
    }
}

impl ChartResolver {
    /// Create a fully configured resolver using the standard decoders.
    pub fn new(
        system: Arc<dyn RepositorySystem>,
        session: Arc<RepositorySession>,
        remote_repositories: Vec<RemoteRepository>,
    ) -> Self {
        ChartResolver {
            system: Some(system),
            session: Some(session),
            remote_repositories: Some(remote_repositories),
            loaders: Arc::new(StandardLoaders),
        }
    }

    pub fn builder() -> ChartResolverBuilder {
        ChartResolverBuilder::default()
    }

    pub fn repository_system(&self) -> Option<&Arc<dyn RepositorySystem>> {
        self.system.as_ref()
    }

    pub fn session(&self) -> Option<&Arc<RepositorySession>> {
        self.session.as_ref()
    }

    pub fn remote_repositories(&self) -> Option<&[RemoteRepository]> {
        self.remote_repositories.as_deref()
    }

    /// Parse `coordinates` and resolve the chart they name. A missing
    /// version means `LATEST`.
    pub fn resolve_coordinates(&self, coordinates: &str, version: Option<&str>) -> Result<Chart> {
        let artifact = parse_coordinates(coordinates, version)?;
        self.resolve_artifact(&artifact)
    }

    /// Resolve `artifact` through the engine and decode the resulting file.
    /// The file is decoded according to the packaging of `artifact` itself.
    pub fn resolve_artifact(&self, artifact: &Artifact) -> Result<Chart> {
        let system = self.system.as_ref().ok_or_else(|| ChartResolverError::Configuration {
            detail: "no repository system".to_string(),
        })?;
        let session = self.session.as_ref().ok_or_else(|| ChartResolverError::Configuration {
            detail: "no repository session".to_string(),
        })?;
        artifact.validate()?;

        let repositories = self.remote_repositories.as_deref().unwrap_or(&[]);
        let request = ArtifactRequest::new(artifact, repositories);
        tracing::debug!(
            artifact = %artifact,
            repositories = repositories.len(),
            "requesting artifact"
        );

        let result = system
            .resolve_artifact(session, &request)
            .map_err(ChartResolverError::Engine)?;

        let resolved = match result.artifact() {
            Some(resolved) => resolved.clone(),
            None => {
                let causes = result.into_exceptions();
                for cause in &causes {
                    tracing::warn!(artifact = %artifact, %cause, "resolution failure");
                }
                return Err(ChartResolverError::from_causes(artifact.to_string(), causes));
            }
        };

        // resolved artifacts always carry a file
        let file = resolved.file().ok_or_else(|| ChartResolverError::Unresolved {
            artifact: artifact.to_string(),
        })?;
        tracing::debug!(
            artifact = %resolved,
            repository = result.repository().unwrap_or("unknown"),
            file = %file.display(),
            "artifact resolved"
        );

        load_chart(file, artifact.extension(), self.loaders.as_ref())
    }
}

/// Assembles a [`ChartResolver`]. Anything left unset stays unset; resolution
/// then fails with a configuration error.
#[derive(Default)]
pub struct ChartResolverBuilder {
    system: Option<Arc<dyn RepositorySystem>>,
    session: Option<Arc<RepositorySession>>,
    remote_repositories: Option<Vec<RemoteRepository>>,
    loaders: Option<Arc<dyn LoaderProvider>>,
}

impl ChartResolverBuilder {
    pub fn repository_system(mut self, system: Arc<dyn RepositorySystem>) -> Self {
        self.system = Some(system);
        self
    }

    pub fn session(mut self, session: Arc<RepositorySession>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn remote_repositories(mut self, repositories: Vec<RemoteRepository>) -> Self {
        self.remote_repositories = Some(repositories);
        self
    }

    /// Replace the standard decoders.
    pub fn loaders(mut self, loaders: Arc<dyn LoaderProvider>) -> Self {
        self.loaders = Some(loaders);
        self
    }

    pub fn build(self) -> ChartResolver {
        ChartResolver {
            system: self.system,
            session: self.session,
            remote_repositories: self.remote_repositories,
            loaders: self.loaders.unwrap_or_else(|| Arc::new(StandardLoaders)),
        }
    }
}
