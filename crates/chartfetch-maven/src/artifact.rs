//! Artifact identities and coordinate parsing.
//!
//! Coordinates take one of three forms:
//!
//! ```text
//! group:name
//! group:name:packaging
//! group:name:packaging:classifier
//! ```
//!
//! The version is supplied separately and defaults to [`LATEST_VERSION`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoordinateError;

/// Packaging used when the coordinates do not name one.
pub const DEFAULT_PACKAGING: &str = "tgz";

/// Version sentinel for the most recently published version. What counts as
/// "most recent" is up to the resolution engine.
pub const LATEST_VERSION: &str = "LATEST";

/// Version sentinel for the most recent non-snapshot version.
pub const RELEASE_VERSION: &str = "RELEASE";

const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// The fully-qualified address of a chart in an artifact repository.
///
/// Identities are immutable; the engine reports a resolved file by returning
/// a new identity from [`Artifact::with_file`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Artifact {
    group_id: String,
    artifact_id: String,
    extension: String,
    classifier: Option<String>,
    version: String,
    file: Option<PathBuf>,
}

impl Artifact {
    /// Create an artifact identity from already-split parts.
    ///
    /// The parts are not checked here. Identities built this way should go
    /// through [`Artifact::validate`] before they are mapped onto a
    /// repository; [`parse_coordinates`] does so itself.
    pub fn new(
        group_id: &str,
        artifact_id: &str,
        extension: &str,
        classifier: Option<&str>,
        version: &str,
    ) -> Self {
        Artifact {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            extension: extension.to_string(),
            classifier: classifier.map(str::to_string),
            version: version.to_string(),
            file: None,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    /// The packaging tag, e.g. `tgz` or `zip`.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Local file of a resolved artifact.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Whether the version names a snapshot build.
    pub fn is_snapshot(&self) -> bool {
        is_snapshot_version(&self.version)
    }

    /// Whether the version is a `LATEST` or `RELEASE` sentinel.
    pub fn is_metaversion(&self) -> bool {
        self.version == LATEST_VERSION || self.version == RELEASE_VERSION
    }

    /// A copy of this identity with a different version.
    pub fn with_version(&self, version: &str) -> Self {
        Artifact {
            version: version.to_string(),
            ..self.clone()
        }
    }

    /// A copy of this identity bound to a local file.
    pub fn with_file(&self, file: PathBuf) -> Self {
        Artifact {
            file: Some(file),
            ..self.clone()
        }
    }

    /// `group:name` without packaging or version.
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// Check that every part is present and maps to a single path component
    /// of the repository layout. Each dot-separated piece of the group
    /// becomes its own directory.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        let mut segments = vec![&self.group_id, &self.artifact_id, &self.extension];
        segments.extend(self.classifier.as_ref());
        if let Some(index) = segments.iter().position(|s| s.is_empty()) {
            return Err(CoordinateError::EmptySegment {
                coordinates: self.to_string(),
                position: index + 1,
            });
        }
        if self.version.trim().is_empty() {
            return Err(CoordinateError::EmptyVersion {
                coordinates: self.to_string(),
            });
        }

        let components = self
            .group_id
            .split('.')
            .chain([self.artifact_id.as_str(), self.extension.as_str(), self.version.as_str()])
            .chain(self.classifier.as_deref());
        for component in components {
            if !is_path_component(component) {
                return Err(CoordinateError::InvalidSegment {
                    coordinates: self.to_string(),
                    segment: component.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Whether a version string names a snapshot build.
pub fn is_snapshot_version(version: &str) -> bool {
    version.ends_with(SNAPSHOT_SUFFIX)
}

fn is_path_component(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0'])
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for Artifact {
    type Err = CoordinateError;

    /// Parse coordinates with the default `LATEST` version.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coordinates(s, None)
    }
}

/// Parse a coordinate string and optional version into an [`Artifact`].
///
/// This never touches the filesystem or network.
pub fn parse_coordinates(coordinates: &str, version: Option<&str>) -> Result<Artifact, CoordinateError> {
    let parts: Vec<&str> = coordinates.split(':').collect();
    if parts.len() < 2 || parts.len() > 4 {
        return Err(CoordinateError::SegmentCount {
            coordinates: coordinates.to_string(),
            count: parts.len(),
        });
    }

    if let Some(index) = parts.iter().position(|p| p.is_empty()) {
        return Err(CoordinateError::EmptySegment {
            coordinates: coordinates.to_string(),
            position: index + 1,
        });
    }

    let version = match version {
        None => LATEST_VERSION,
        Some(v) if v.trim().is_empty() => {
            return Err(CoordinateError::EmptyVersion {
                coordinates: coordinates.to_string(),
            })
        }
        Some(v) => v,
    };

    let group_id = parts[0];
    let artifact_id = parts[1];
    let packaging = parts.get(2).copied().unwrap_or(DEFAULT_PACKAGING);
    let classifier = parts.get(3).copied();

    tracing::debug!(
        group_id,
        artifact_id,
        packaging,
        classifier,
        version,
        "parsed chart coordinates"
    );

    let artifact = Artifact::new(group_id, artifact_id, packaging, classifier, version);
    artifact.validate()?;
    Ok(artifact)
}
