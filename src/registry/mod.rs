//! Session registry: one live session per original product id.
//!
//! Sessions are cached with a capacity bound and an idle TTL, so abandoned
//! browsing sessions age out instead of accumulating. Eviction is
//! semantically safe: a re-created session simply restarts its pool
//! traversal.

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use tokio::sync::Mutex;
use tracing::debug;

use crate::catalog::CandidateStore;
use crate::session::{RecommendationSession, SessionPolicy};

/// Default maximum number of concurrently tracked sessions.
pub const DEFAULT_SESSION_CAPACITY: u64 = 10_000;

/// Default idle lifetime before a session is evicted.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(3600);

/// Shared map of per-original-product sessions.
///
/// Each session is wrapped in an async mutex because `next()` holds the
/// session across index and oracle awaits; concurrent requests for the same
/// original id serialize, requests for different ids do not contend.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Cache<String, Arc<Mutex<RecommendationSession>>>,
    store: Arc<CandidateStore>,
    policy: SessionPolicy,
}

impl SessionRegistry {
    pub fn new(store: Arc<CandidateStore>, policy: SessionPolicy) -> Self {
        Self::with_limits(store, policy, DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_IDLE)
    }

    pub fn with_limits(
        store: Arc<CandidateStore>,
        policy: SessionPolicy,
        capacity: u64,
        idle: Duration,
    ) -> Self {
        let sessions = Cache::builder()
            .max_capacity(capacity)
            .time_to_idle(idle)
            .build();

        Self {
            sessions,
            store,
            policy,
        }
    }

    /// Returns the session for an original product id, creating it on first
    /// sight. `None` means the id has no precomputed group at all.
    pub fn session_for(&self, original_id: &str) -> Option<Arc<Mutex<RecommendationSession>>> {
        let group = self.store.group_for(original_id)?;

        let session = self.sessions.get_with(original_id.to_string(), || {
            debug!(original_id, group_len = group.len(), "Creating session");
            Arc::new(Mutex::new(RecommendationSession::new(
                group.clone(),
                self.policy.clone(),
            )))
        });

        Some(session)
    }

    /// True when the backing store carries no groups at all.
    pub fn store_is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of live sessions (approximate under concurrent access).
    pub fn live_sessions(&self) -> u64 {
        self.sessions.run_pending_tasks();
        self.sessions.entry_count()
    }
}
