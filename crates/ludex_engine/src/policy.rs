//! Synchronization policy.

/// How the engine treats remote failures.
///
/// The policy is fixed when the [`crate::SyncMachine`] is constructed;
/// the two behaviors are never mixed within one code path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Remote failures surface as typed errors on the matching state
    /// field. The local store is never touched.
    FailVisible,
    /// Remote failures are absorbed: the operation is retargeted at the
    /// local store and committed as a success. While online, successful
    /// remote results are mirrored into the store so the fallback has
    /// something to serve.
    FailSilent,
}

impl SyncPolicy {
    /// Returns true if remote failures are masked by the local fallback.
    pub fn masks_failures(&self) -> bool {
        matches!(self, SyncPolicy::FailSilent)
    }

    /// Returns true if successful remote results are mirrored into the
    /// local store.
    pub fn mirrors_remote(&self) -> bool {
        matches!(self, SyncPolicy::FailSilent)
    }
}
