//! Error types for coordinate parsing, artifact resolution and chart loading.

use std::path::PathBuf;

use chartfetch_chart::ChartError;

/// Malformed coordinate input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinateError {
    /// The coordinate string does not have 2 to 4 segments.
    #[error("expected group:name[:packaging[:classifier]], got {count} segment(s) in '{coordinates}'")]
    SegmentCount { coordinates: String, count: usize },

    /// A segment between colons is empty.
    #[error("segment {position} of '{coordinates}' is empty")]
    EmptySegment { coordinates: String, position: usize },

    /// An explicit version was supplied but is blank.
    #[error("version for '{coordinates}' is empty")]
    EmptyVersion { coordinates: String },

    /// A segment cannot be used as a repository path component.
    #[error("'{segment}' in '{coordinates}' is not a valid path component")]
    InvalidSegment { coordinates: String, segment: String },
}

/// A failure reported by a resolution engine, either as an engine-level
/// error or as one cause inside a failed [`ArtifactResult`].
///
/// [`ArtifactResult`]: crate::system::ArtifactResult
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// The artifact is not present in the named repository.
    #[error("{artifact} was not found in {repository}")]
    ArtifactNotFound { artifact: String, repository: String },

    /// No concrete version matches a `LATEST`/`RELEASE` request.
    #[error("no {version} version of {artifact} is available")]
    VersionNotFound { artifact: String, version: String },

    /// The repository URL uses a transport this engine cannot speak.
    #[error("repository {repository} uses an unsupported transport: {url}")]
    UnsupportedTransport { repository: String, url: String },

    /// The session is offline, so the remote repository was not consulted.
    #[error("cannot access {repository} in offline mode to resolve {artifact}")]
    Offline { artifact: String, repository: String },

    /// The downloaded file does not match its published checksum.
    #[error("checksum mismatch for {artifact} from {repository}: expected {expected}, got {actual}")]
    ChecksumFailure {
        artifact: String,
        repository: String,
        expected: String,
        actual: String,
    },

    /// The requested identity cannot be mapped onto a repository path.
    #[error("cannot resolve {artifact}: {source}")]
    InvalidArtifact {
        artifact: String,
        #[source]
        source: CoordinateError,
    },

    /// The session has no local repository to resolve into.
    #[error("session has no local repository manager")]
    LocalRepositoryMissing,

    /// A repository directory exists but cannot be used.
    #[error("invalid repository layout at {}: {detail}", .path.display())]
    InvalidLayout { path: PathBuf, detail: String },

    /// I/O failure while reading or copying an artifact.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolutionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResolutionError::Io {
            path: path.into(),
            source,
        }
    }
}

/// The single error type returned by [`ChartResolver`].
///
/// [`ChartResolver`]: crate::resolver::ChartResolver
#[derive(Debug, thiserror::Error)]
pub enum ChartResolverError {
    /// The coordinate string could not be parsed.
    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(#[from] CoordinateError),

    /// The resolver is missing its engine or session.
    #[error("chart resolver is not configured: {detail}")]
    Configuration { detail: String },

    /// The engine itself failed before producing an outcome.
    #[error("artifact resolution failed: {0}")]
    Engine(#[source] ResolutionError),

    /// The engine reported failure without giving a reason.
    #[error("could not resolve {artifact}")]
    Unresolved { artifact: String },

    /// The engine reported failure with one or more causes. `primary` is the
    /// first cause; the rest are kept, in order, in `suppressed`.
    #[error("could not resolve {artifact}: {primary}{}", more_causes(.suppressed))]
    Resolution {
        artifact: String,
        #[source]
        primary: ResolutionError,
        suppressed: Vec<ResolutionError>,
    },

    /// The packaging tag matches no known decoder.
    #[error("cannot load chart {}; unhandled packaging: {packaging}", .file.display())]
    UnsupportedPackaging { file: PathBuf, packaging: String },

    /// Opening or decoding the chart archive failed.
    #[error("cannot load chart {}: {source}", .file.display())]
    Load {
        file: PathBuf,
        #[source]
        source: ChartError,
    },
}

fn more_causes(suppressed: &[ResolutionError]) -> String {
    match suppressed.len() {
        0 => String::new(),
        1 => " (and 1 more cause)".to_string(),
        n => format!(" (and {n} more causes)"),
    }
}

impl ChartResolverError {
    /// Build the error for a failed outcome from its ordered causes.
    pub fn from_causes(artifact: impl Into<String>, causes: Vec<ResolutionError>) -> Self {
        let artifact = artifact.into();
        let mut causes = causes.into_iter();
        match causes.next() {
            None => ChartResolverError::Unresolved { artifact },
            Some(primary) => ChartResolverError::Resolution {
                artifact,
                primary,
                suppressed: causes.collect(),
            },
        }
    }

    /// The main resolution cause, if this error came from the engine.
    pub fn primary_cause(&self) -> Option<&ResolutionError> {
        match self {
            ChartResolverError::Engine(cause) => Some(cause),
            ChartResolverError::Resolution { primary, .. } => Some(primary),
            _ => None,
        }
    }

    /// Secondary resolution causes, in the order the engine reported them.
    pub fn suppressed(&self) -> &[ResolutionError] {
        match self {
            ChartResolverError::Resolution { suppressed, .. } => suppressed,
            _ => &[],
        }
    }
}

/// Result type alias for chart resolution.
pub type Result<T> = std::result::Result<T, ChartResolverError>;
