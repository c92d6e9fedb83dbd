// ─────────────────────────────────────────────────────────────────────
// Tidewatch — Reporter Directory (User Store Interface)
// ─────────────────────────────────────────────────────────────────────
//! Access to reporter history and trust scores.
//!
//! The in-memory backend is used in tests and single-process setups.
//! Production deployments plug the document store in via the
//! `ReporterDirectory` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use tidewatch_types::{ReporterProfile, TidewatchError, TidewatchResult, TrustScore};

/// Trait for reporter profile backends.
#[async_trait]
pub trait ReporterDirectory: Send + Sync {
    /// Fetch a reporter's history. `Ok(None)` for unknown reporters.
    async fn profile(&self, reporter_id: &str) -> TidewatchResult<Option<ReporterProfile>>;

    /// Persist a new trust score, creating the profile if needed.
    async fn store_trust(&self, reporter_id: &str, trust: TrustScore) -> TidewatchResult<()>;
}

/// In-memory reporter directory.
///
/// Thread-safe: the profile map is guarded by a `parking_lot::Mutex`.
#[derive(Default)]
pub struct InMemoryDirectory {
    profiles: Mutex<HashMap<String, ReporterProfile>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: HashMap<String, ReporterProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
        }
    }

    pub fn insert(&self, reporter_id: impl Into<String>, profile: ReporterProfile) {
        self.profiles.lock().insert(reporter_id.into(), profile);
    }

    pub fn trust_of(&self, reporter_id: &str) -> Option<TrustScore> {
        self.profiles.lock().get(reporter_id).map(|p| p.trust)
    }
}

#[async_trait]
impl ReporterDirectory for InMemoryDirectory {
    async fn profile(&self, reporter_id: &str) -> TidewatchResult<Option<ReporterProfile>> {
        Ok(self.profiles.lock().get(reporter_id).cloned())
    }

    async fn store_trust(&self, reporter_id: &str, trust: TrustScore) -> TidewatchResult<()> {
        let mut profiles = self.profiles.lock();
        profiles
            .entry(reporter_id.to_string())
            .or_insert_with(|| ReporterProfile {
                total_reports: 0,
                verified_reports: 0,
                rejected_reports: 0,
                trust,
            })
            .trust = trust;
        Ok(())
    }
}

/// Directory whose every call fails. Stands in for an unreachable store.
pub struct UnavailableDirectory;

#[async_trait]
impl ReporterDirectory for UnavailableDirectory {
    async fn profile(&self, _reporter_id: &str) -> TidewatchResult<Option<ReporterProfile>> {
        Err(TidewatchError::Persistence("reporter directory unreachable".into()))
    }

    async fn store_trust(&self, _reporter_id: &str, _trust: TrustScore) -> TidewatchResult<()> {
        Err(TidewatchError::Persistence("reporter directory unreachable".into()))
    }
}
