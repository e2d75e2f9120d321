//! `chartfetch.toml` parsing.
//!
//! ```toml
//! local_repository = "/var/cache/charts"
//! offline = false
//! checksum_policy = "fail"
//!
//! [[remote]]
//! id = "internal"
//! url = "file:///srv/maven"
//! snapshots = { enabled = false }
//!
//! [[mirror]]
//! id = "corp"
//! url = "file:///srv/mirror"
//! mirror_of = "external:*"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chartfetch_maven::{ChecksumPolicy, Mirror, MirrorSelector, RemoteRepository, RepositoryPolicy};
use serde::{Deserialize, Serialize};

/// File name searched for from the working directory upward.
pub const CONFIG_FILE: &str = "chartfetch.toml";

/// Resolution settings loaded from `chartfetch.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartfetchConfig {
    /// Local repository root. Relative paths are taken from the config
    /// file's directory.
    #[serde(default)]
    pub local_repository: Option<PathBuf>,
    /// Never contact remote repositories.
    #[serde(default)]
    pub offline: bool,
    /// Default checksum policy for remotes that do not set their own.
    #[serde(default)]
    pub checksum_policy: Option<ChecksumPolicy>,
    /// Remote repositories, searched in order.
    #[serde(default, rename = "remote")]
    pub remotes: Vec<RemoteConfig>,
    #[serde(default, rename = "mirror")]
    pub mirrors: Vec<Mirror>,
}

/// One `[[remote]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub releases: Option<RepositoryPolicy>,
    #[serde(default)]
    pub snapshots: Option<RepositoryPolicy>,
}

impl RemoteConfig {
    pub fn to_repository(&self) -> RemoteRepository {
        let mut repository = RemoteRepository::new(&self.id, &self.url);
        if let Some(layout) = &self.layout {
            repository = repository.with_layout(layout);
        }
        if let Some(policy) = &self.releases {
            repository = repository.with_release_policy(policy.clone());
        }
        if let Some(policy) = &self.snapshots {
            repository = repository.with_snapshot_policy(policy.clone());
        }
        repository
    }
}

impl ChartfetchConfig {
    /// Search upward from `start_dir` for a `chartfetch.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let config = Self::load(&candidate)?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load a specific config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let mut config: ChartfetchConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        tracing::debug!(path = %path.display(), remotes = config.remotes.len(), "loaded config");
        Ok(config)
    }

    /// Make a relative `local_repository` relative to `base`.
    fn rebase(&mut self, base: &Path) {
        if let Some(local) = self.local_repository.take() {
            self.local_repository = Some(if local.is_relative() { base.join(local) } else { local });
        }
    }

    /// Configured remotes as repository descriptions, in file order.
    pub fn remote_repositories(&self) -> Vec<RemoteRepository> {
        self.remotes.iter().map(RemoteConfig::to_repository).collect()
    }

    pub fn mirror_selector(&self) -> MirrorSelector {
        let mut selector = MirrorSelector::new();
        for mirror in &self.mirrors {
            selector.add(mirror.clone());
        }
        selector
    }
}

/// Parse a `--remote ID=URL` argument.
pub fn parse_remote_arg(arg: &str) -> Result<RemoteRepository> {
    match arg.split_once('=') {
        Some((id, url)) if !id.is_empty() && !url.is_empty() => Ok(RemoteRepository::new(id, url)),
        _ => anyhow::bail!("invalid remote '{arg}': expected ID=URL"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
local_repository = "/var/cache/charts"
offline = true
checksum_policy = "fail"

[[remote]]
id = "internal"
url = "file:///srv/maven"
snapshots = { enabled = false }

[[remote]]
id = "central"
url = "https://repo1.maven.org/maven2"
releases = { checksum_policy = "ignore" }

[[mirror]]
id = "corp"
url = "file:///srv/mirror"
mirror_of = "external:*"
"#;
        let config: ChartfetchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.local_repository, Some(PathBuf::from("/var/cache/charts")));
        assert!(config.offline);
        assert_eq!(config.checksum_policy, Some(ChecksumPolicy::Fail));

        let remotes = config.remote_repositories();
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].id(), "internal");
        assert!(remotes[0].releases().enabled);
        assert!(!remotes[0].snapshots().enabled);
        assert!(remotes[1].releases().enabled);
        assert_eq!(remotes[1].releases().checksum_policy, Some(ChecksumPolicy::Ignore));

        let selector = config.mirror_selector();
        assert_eq!(selector.mirror_for(&remotes[1]).unwrap().id, "corp");
        assert!(selector.mirror_for(&remotes[0]).is_none());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: ChartfetchConfig = toml::from_str("").unwrap();
        assert!(config.local_repository.is_none());
        assert!(!config.offline);
        assert!(config.checksum_policy.is_none());
        assert!(config.remotes.is_empty());
        assert!(config.mirror_selector().is_empty());
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(toml::from_str::<ChartfetchConfig>("offlne = true").is_err());
        assert!(toml::from_str::<ChartfetchConfig>("checksum_policy = \"strict\"").is_err());
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "local_repository = \"cache\"\n[[remote]]\nid = \"r\"\nurl = \"file:///r\"\n",
        )
        .unwrap();

        let (config, found_in) = ChartfetchConfig::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(found_in, dir.path());
        assert_eq!(config.local_repository, Some(dir.path().join("cache")));
        assert_eq!(config.remotes[0].id, "r");
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ChartfetchConfig::load(&dir.path().join(CONFIG_FILE)).is_err());
    }

    #[test]
    fn remote_arguments() {
        let repo = parse_remote_arg("local=file:///srv/repo").unwrap();
        assert_eq!(repo.id(), "local");
        assert_eq!(repo.url(), "file:///srv/repo");
        assert!(parse_remote_arg("no-separator").is_err());
        assert!(parse_remote_arg("=file:///x").is_err());
        assert!(parse_remote_arg("id=").is_err());
    }
}
