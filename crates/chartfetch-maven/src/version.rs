//! Metaversion selection.
//!
//! Wraps the `semver` crate to pick a concrete version for the `LATEST` and
//! `RELEASE` sentinels. Repository versions are often not strict semver
//! (`1.0`, `2.1-SNAPSHOT`), so they are padded before comparison; versions
//! that still fail to parse are ignored.

use crate::artifact::{LATEST_VERSION, RELEASE_VERSION};

/// A version sentinel understood by the filesystem engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metaversion {
    /// Highest version, pre-releases and snapshots included.
    Latest,
    /// Highest version without a pre-release tag.
    Release,
}

impl Metaversion {
    /// Recognize a sentinel version string.
    pub fn parse(version: &str) -> Option<Self> {
        match version {
            LATEST_VERSION => Some(Metaversion::Latest),
            RELEASE_VERSION => Some(Metaversion::Release),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metaversion::Latest => LATEST_VERSION,
            Metaversion::Release => RELEASE_VERSION,
        }
    }
}

/// Parse a repository version, padding a short numeric core to three parts.
pub fn parse_lenient(version: &str) -> Option<semver::Version> {
    if let Ok(v) = semver::Version::parse(version) {
        return Some(v);
    }

    let (core, pre) = match version.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (version, None),
    };
    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 || parts.iter().any(|p| p.parse::<u64>().is_err()) {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }

    let mut padded = parts.join(".");
    if let Some(pre) = pre {
        padded.push('-');
        padded.push_str(pre);
    }
    semver::Version::parse(&padded).ok()
}

/// Pick the version a sentinel refers to from the available candidates.
///
/// Returns the candidate string as it appeared in the repository.
pub fn select<'a>(candidates: impl IntoIterator<Item = &'a str>, meta: Metaversion) -> Option<&'a str> {
    candidates
        .into_iter()
        .filter_map(|c| parse_lenient(c).map(|v| (v, c)))
        .filter(|(v, _)| meta == Metaversion::Latest || v.pre.is_empty())
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, c)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_sentinels() {
        assert_eq!(Metaversion::parse("LATEST"), Some(Metaversion::Latest));
        assert_eq!(Metaversion::parse("RELEASE"), Some(Metaversion::Release));
        assert_eq!(Metaversion::parse("1.0.0"), None);
        assert_eq!(Metaversion::parse("latest"), None);
        assert_eq!(Metaversion::Release.as_str(), "RELEASE");
    }

    #[test]
    fn lenient_parsing() {
        assert_eq!(parse_lenient("1.2.3"), Some(semver::Version::new(1, 2, 3)));
        assert_eq!(parse_lenient("1.2"), Some(semver::Version::new(1, 2, 0)));
        assert_eq!(parse_lenient("7"), Some(semver::Version::new(7, 0, 0)));
        let snapshot = parse_lenient("2.1-SNAPSHOT").unwrap();
        assert_eq!(snapshot.minor, 1);
        assert_eq!(snapshot.pre.as_str(), "SNAPSHOT");
        assert!(parse_lenient("not-a-version").is_none());
        assert!(parse_lenient("1.2.3.4").is_none());
    }

    #[test]
    fn latest_includes_snapshots() {
        let available = ["1.0.0", "1.2", "2.0.0-SNAPSHOT", "1.10.0", "junk"];
        assert_eq!(select(available, Metaversion::Latest), Some("2.0.0-SNAPSHOT"));
    }

    #[test]
    fn release_excludes_snapshots() {
        let available = ["1.0.0", "1.2", "2.0.0-SNAPSHOT", "1.10.0"];
        assert_eq!(select(available, Metaversion::Release), Some("1.10.0"));
    }

    #[test]
    fn no_candidates() {
        assert_eq!(select(Vec::<&str>::new(), Metaversion::Latest), None);
        assert_eq!(select(["2.0.0-SNAPSHOT"], Metaversion::Release), None);
    }
}
