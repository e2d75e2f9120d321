//! Mirror selection.
//!
//! A mirror replaces every repository its `mirror_of` pattern matches. The
//! pattern is a comma-separated list of:
//!
//! - a repository id, matching that repository,
//! - `*`, matching everything,
//! - `external:*`, matching repositories not on this machine,
//! - `!id`, excluding that repository even if another entry matches.

use serde::{Deserialize, Serialize};

use crate::repository::RemoteRepository;

/// A mirror definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mirror {
    pub id: String,
    pub url: String,
    /// Pattern of repository ids this mirror replaces.
    pub mirror_of: String,
    #[serde(default = "default_layout")]
    pub layout: String,
}

fn default_layout() -> String {
    "default".to_string()
}

impl Mirror {
    pub fn new(id: &str, url: &str, mirror_of: &str) -> Self {
        Mirror {
            id: id.to_string(),
            url: url.to_string(),
            mirror_of: mirror_of.to_string(),
            layout: default_layout(),
        }
    }
}

/// Chooses a mirror for a repository from an ordered list of mirrors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorSelector {
    mirrors: Vec<Mirror>,
}

impl MirrorSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mirror: Mirror) -> &mut Self {
        self.mirrors.push(mirror);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }

    /// Find the mirror for `repository`. A mirror naming the repository id
    /// exactly wins over wildcard patterns; otherwise the first matching
    /// pattern in declaration order is used.
    pub fn mirror_for(&self, repository: &RemoteRepository) -> Option<&Mirror> {
        self.mirrors
            .iter()
            .find(|m| m.mirror_of == repository.id())
            .or_else(|| {
                self.mirrors
                    .iter()
                    .find(|m| matches_pattern(repository, &m.mirror_of))
            })
    }

    /// The repository to use in place of `repository`, if it is mirrored.
    pub fn apply(&self, repository: &RemoteRepository) -> Option<RemoteRepository> {
        self.mirror_for(repository).map(|mirror| {
            RemoteRepository::new(&mirror.id, &mirror.url)
                .with_layout(&mirror.layout)
                .with_release_policy(repository.releases().clone())
                .with_snapshot_policy(repository.snapshots().clone())
                .with_mirrored(vec![repository.clone()])
        })
    }
}

fn matches_pattern(repository: &RemoteRepository, pattern: &str) -> bool {
    let mut matched = false;
    for entry in pattern.split(',').map(str::trim) {
        if let Some(excluded) = entry.strip_prefix('!') {
            if excluded == repository.id() {
                return false;
            }
        } else if entry == repository.id() {
            return true;
        } else if entry == "*" {
            matched = true;
        } else if entry == "external:*" && repository.is_external() {
            matched = true;
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn central() -> RemoteRepository {
        RemoteRepository::new("central", "https://repo1.maven.org/maven2")
    }

    fn internal() -> RemoteRepository {
        RemoteRepository::new("internal", "http://localhost:8081/repo")
    }

    #[test]
    fn exact_id_beats_wildcard() {
        let mut selector = MirrorSelector::new();
        selector
            .add(Mirror::new("all", "file:///all", "*"))
            .add(Mirror::new("c", "file:///c", "central"));
        assert_eq!(selector.mirror_for(&central()).unwrap().id, "c");
        assert_eq!(selector.mirror_for(&internal()).unwrap().id, "all");
    }

    #[test]
    fn exclusions_and_external() {
        let mut selector = MirrorSelector::new();
        selector.add(Mirror::new("ext", "file:///ext", "external:*,!central"));
        assert!(selector.mirror_for(&central()).is_none());
        assert!(selector.mirror_for(&internal()).is_none());

        let other = RemoteRepository::new("jboss", "https://repository.jboss.org/maven2");
        assert_eq!(selector.mirror_for(&other).unwrap().id, "ext");
    }

    #[test]
    fn list_pattern() {
        let mut selector = MirrorSelector::new();
        selector.add(Mirror::new("m", "file:///m", "internal, central"));
        assert!(selector.mirror_for(&central()).is_some());
        assert!(selector.mirror_for(&internal()).is_some());
    }

    #[test]
    fn apply_records_original() {
        let mut selector = MirrorSelector::new();
        selector.add(Mirror::new("m", "file:///m", "*"));
        let mirrored = selector.apply(&central()).unwrap();
        assert_eq!(mirrored.id(), "m");
        assert_eq!(mirrored.url(), "file:///m");
        assert_eq!(mirrored.mirrored().len(), 1);
        assert_eq!(mirrored.mirrored()[0].id(), "central");
    }

    #[test]
    fn empty_selector_matches_nothing() {
        let selector = MirrorSelector::new();
        assert!(selector.is_empty());
        assert!(selector.apply(&central()).is_none());
    }
}
