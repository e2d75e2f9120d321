//! Resolution session settings shared by all requests.

use crate::local::LocalRepositoryManager;
use crate::mirror::MirrorSelector;
use crate::repository::ChecksumPolicy;

/// Per-session configuration read by a [`RepositorySystem`].
///
/// A session is assembled once by the caller and then shared read-only,
/// typically behind an `Arc`.
///
/// [`RepositorySystem`]: crate::system::RepositorySystem
#[derive(Debug, Clone, Default)]
pub struct RepositorySession {
    offline: bool,
    checksum_policy: ChecksumPolicy,
    local_repository_manager: Option<LocalRepositoryManager>,
    mirror_selector: MirrorSelector,
}

impl RepositorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&mut self, offline: bool) -> &mut Self {
        self.offline = offline;
        self
    }

    pub fn set_checksum_policy(&mut self, policy: ChecksumPolicy) -> &mut Self {
        self.checksum_policy = policy;
        self
    }

    pub fn set_local_repository_manager(&mut self, manager: LocalRepositoryManager) -> &mut Self {
        self.local_repository_manager = Some(manager);
        self
    }

    pub fn set_mirror_selector(&mut self, selector: MirrorSelector) -> &mut Self {
        self.mirror_selector = selector;
        self
    }

    /// Whether remote repositories must not be contacted.
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Default checksum policy for repositories that do not set one.
    pub fn checksum_policy(&self) -> ChecksumPolicy {
        self.checksum_policy
    }

    pub fn local_repository_manager(&self) -> Option<&LocalRepositoryManager> {
        self.local_repository_manager.as_ref()
    }

    pub fn mirror_selector(&self) -> &MirrorSelector {
        &self.mirror_selector
    }
}
