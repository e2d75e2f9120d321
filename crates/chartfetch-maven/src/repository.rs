//! Repository descriptions: remote sources, their policies, and the local
//! repository root.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when a downloaded artifact does not match its checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    /// Reject the artifact.
    Fail,
    /// Log a warning and accept the artifact.
    #[default]
    Warn,
    /// Skip verification.
    Ignore,
}

impl FromStr for ChecksumPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(ChecksumPolicy::Fail),
            "warn" => Ok(ChecksumPolicy::Warn),
            "ignore" => Ok(ChecksumPolicy::Ignore),
            other => Err(format!("unknown checksum policy '{other}' (expected fail, warn or ignore)")),
        }
    }
}

/// Release or snapshot policy of a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPolicy {
    /// Whether artifacts of this kind may be fetched from the repository.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Overrides the session's checksum policy when set.
    #[serde(default)]
    pub checksum_policy: Option<ChecksumPolicy>,
}

fn default_enabled() -> bool {
    true
}

impl Default for RepositoryPolicy {
    fn default() -> Self {
        RepositoryPolicy {
            enabled: true,
            checksum_policy: None,
        }
    }
}

impl RepositoryPolicy {
    pub fn disabled() -> Self {
        RepositoryPolicy {
            enabled: false,
            checksum_policy: None,
        }
    }
}

/// How a remote repository is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// A directory on the local filesystem (`file:` URLs).
    File(PathBuf),
    /// `http` or `https`.
    Http,
    /// Any other scheme.
    Other(String),
}

/// A configured remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteRepository {
    id: String,
    layout: String,
    url: String,
    releases: RepositoryPolicy,
    snapshots: RepositoryPolicy,
    /// Repositories this one stands in for, when it is a mirror.
    mirrored: Vec<RemoteRepository>,
}

impl RemoteRepository {
    /// Create a repository with the default layout and enabled policies.
    pub fn new(id: &str, url: &str) -> Self {
        RemoteRepository {
            id: id.to_string(),
            layout: "default".to_string(),
            url: url.to_string(),
            releases: RepositoryPolicy::default(),
            snapshots: RepositoryPolicy::default(),
            mirrored: Vec::new(),
        }
    }

    pub fn with_layout(mut self, layout: &str) -> Self {
        self.layout = layout.to_string();
        self
    }

    pub fn with_release_policy(mut self, policy: RepositoryPolicy) -> Self {
        self.releases = policy;
        self
    }

    pub fn with_snapshot_policy(mut self, policy: RepositoryPolicy) -> Self {
        self.snapshots = policy;
        self
    }

    pub fn with_mirrored(mut self, mirrored: Vec<RemoteRepository>) -> Self {
        self.mirrored = mirrored;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn releases(&self) -> &RepositoryPolicy {
        &self.releases
    }

    pub fn snapshots(&self) -> &RepositoryPolicy {
        &self.snapshots
    }

    pub fn mirrored(&self) -> &[RemoteRepository] {
        &self.mirrored
    }

    pub(crate) fn mirrored_mut(&mut self) -> &mut Vec<RemoteRepository> {
        &mut self.mirrored
    }

    /// The policy that applies to a release or snapshot artifact.
    pub fn policy_for(&self, snapshot: bool) -> &RepositoryPolicy {
        if snapshot {
            &self.snapshots
        } else {
            &self.releases
        }
    }

    /// Work out the transport from the URL scheme. A URL with no scheme is
    /// taken as a filesystem path.
    pub fn transport(&self) -> Transport {
        let url = self.url.as_str();
        if let Some(rest) = url.strip_prefix("file://") {
            return Transport::File(PathBuf::from(rest));
        }
        if let Some(rest) = url.strip_prefix("file:") {
            return Transport::File(PathBuf::from(rest));
        }
        match url.split_once("://") {
            Some((scheme, _)) if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") => {
                Transport::Http
            }
            Some((scheme, _)) => Transport::Other(scheme.to_string()),
            None => Transport::File(PathBuf::from(url)),
        }
    }

    /// Whether the repository is outside this machine, as matched by the
    /// `external:*` mirror pattern.
    pub fn is_external(&self) -> bool {
        match self.transport() {
            Transport::File(_) => false,
            _ => {
                let host = self
                    .url
                    .split_once("://")
                    .map(|(_, rest)| rest)
                    .unwrap_or("")
                    .split(['/', ':'])
                    .next()
                    .unwrap_or("");
                !(host == "localhost" || host == "127.0.0.1")
            }
        }
    }
}

impl fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.url)
    }
}

/// The root directory of the local repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    basedir: PathBuf,
}

impl LocalRepository {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        LocalRepository {
            basedir: basedir.into(),
        }
    }

    /// The conventional `~/.m2/repository` location, if `HOME` is set.
    pub fn default_location() -> Option<Self> {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|home| LocalRepository::new(home.join(".m2").join("repository")))
    }

    pub fn basedir(&self) -> &Path {
        &self.basedir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_from_url() {
        assert_eq!(
            RemoteRepository::new("a", "file:///srv/repo").transport(),
            Transport::File(PathBuf::from("/srv/repo"))
        );
        assert_eq!(
            RemoteRepository::new("b", "file:/srv/repo").transport(),
            Transport::File(PathBuf::from("/srv/repo"))
        );
        assert_eq!(
            RemoteRepository::new("c", "https://repo.example.org/maven2").transport(),
            Transport::Http
        );
        assert_eq!(
            RemoteRepository::new("d", "HTTP://repo.example.org").transport(),
            Transport::Http
        );
        assert_eq!(
            RemoteRepository::new("e", "s3://bucket/repo").transport(),
            Transport::Other("s3".to_string())
        );
        assert_eq!(
            RemoteRepository::new("f", "relative/repo").transport(),
            Transport::File(PathBuf::from("relative/repo"))
        );
    }

    #[test]
    fn external_repositories() {
        assert!(RemoteRepository::new("central", "https://repo1.maven.org/maven2").is_external());
        assert!(!RemoteRepository::new("nexus", "http://localhost:8081/repo").is_external());
        assert!(!RemoteRepository::new("loop", "http://127.0.0.1/repo").is_external());
        assert!(!RemoteRepository::new("disk", "file:///srv/repo").is_external());
    }

    #[test]
    fn policy_selection() {
        let repo = RemoteRepository::new("r", "file:///r")
            .with_snapshot_policy(RepositoryPolicy::disabled());
        assert!(repo.policy_for(false).enabled);
        assert!(!repo.policy_for(true).enabled);
    }

    #[test]
    fn checksum_policy_parsing() {
        assert_eq!("FAIL".parse::<ChecksumPolicy>(), Ok(ChecksumPolicy::Fail));
        assert_eq!("warn".parse::<ChecksumPolicy>(), Ok(ChecksumPolicy::Warn));
        assert_eq!("ignore".parse::<ChecksumPolicy>(), Ok(ChecksumPolicy::Ignore));
        assert!("strict".parse::<ChecksumPolicy>().is_err());
        assert_eq!(ChecksumPolicy::default(), ChecksumPolicy::Warn);
    }
}
