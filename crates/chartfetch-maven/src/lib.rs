//! Resolve Helm charts stored in Maven-layout artifact repositories.
//!
//! A chart is addressed by a coordinate string such as
//! `io.example.charts:ingress:tgz` plus an optional version. The
//! [`ChartResolver`] turns the coordinates into an [`Artifact`], asks a
//! [`RepositorySystem`] to materialize it as a local file, then decodes the
//! file with the loader matching the artifact's packaging.
//!
//! # Architecture
//!
//! - **Coordinates**: parsing into an [`Artifact`] identity
//! - **Resolution engine**: the [`RepositorySystem`] trait, with
//!   [`FileRepositorySystem`] as a filesystem-backed implementation
//! - **Dispatch**: [`Packaging`] selects a decoder from `chartfetch-chart`
//!
//! Engines and sessions are injected by the caller and shared read-only;
//! the resolver never creates or caches them.

pub mod artifact;
pub mod error;
pub mod filesystem;
pub mod integrity;
pub mod local;
pub mod mirror;
pub mod packaging;
pub mod repository;
pub mod resolver;
pub mod session;
pub mod system;
pub mod version;

// Re-exports for convenience.
pub use artifact::{parse_coordinates, Artifact, DEFAULT_PACKAGING, LATEST_VERSION, RELEASE_VERSION};
pub use error::{ChartResolverError, CoordinateError, ResolutionError, Result};
pub use filesystem::FileRepositorySystem;
pub use integrity::ContentHash;
pub use local::LocalRepositoryManager;
pub use mirror::{Mirror, MirrorSelector};
pub use packaging::{load_chart, LoaderProvider, Packaging, StandardLoaders};
pub use repository::{ChecksumPolicy, LocalRepository, RemoteRepository, RepositoryPolicy};
pub use resolver::{ChartResolver, ChartResolverBuilder};
pub use session::RepositorySession;
pub use system::{ArtifactRequest, ArtifactResult, RepositorySystem};
