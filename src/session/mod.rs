//! Recommendation session: the per-original-product state machine.
//!
//! A session owns the traversal cursor over its precomputed group, the
//! dedup/diversity bookkeeping, and the arbitration among three tiers:
//! pool traversal, retrieval + oracle backfill, and fallback synthesis.
//! The last tier never fails, so [`RecommendationSession::next`] always
//! produces a result.

mod backfill;
mod fallback;
pub mod policy;


pub use policy::SessionPolicy;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::catalog::{Candidate, ReasonCode, Recommendation, RecommendationSource};
use crate::index::SimilarityIndex;
use crate::oracle::SelectionOracle;

/// Per-original-product mutable recommendation state.
///
/// Not internally synchronized: callers serialize access per original id
/// (the registry wraps each session in a mutex).
pub struct RecommendationSession {
    group: Arc<[Candidate]>,
    cursor: usize,
    rejected: HashSet<String>,
    used: HashSet<String>,
    used_brands: HashMap<String, u32>,
    policy: SessionPolicy,
    rng: StdRng,
}

impl RecommendationSession {
    /// Creates a session over a precomputed group.
    pub fn new(group: Arc<[Candidate]>, policy: SessionPolicy) -> Self {
        Self::with_rng(group, policy, StdRng::from_entropy())
    }

    /// Creates a session with a fixed RNG seed (reproducible fallback
    /// synthesis in tests).
    pub fn with_seed(group: Arc<[Candidate]>, policy: SessionPolicy, seed: u64) -> Self {
        Self::with_rng(group, policy, StdRng::seed_from_u64(seed))
    }

    fn with_rng(group: Arc<[Candidate]>, policy: SessionPolicy, rng: StdRng) -> Self {
        Self {
            group,
            cursor: 0,
            rejected: HashSet::new(),
            used: HashSet::new(),
            used_brands: HashMap::new(),
            policy,
            rng,
        }
    }

    /// Marks a candidate id as rejected by the caller. Idempotent.
    pub fn reject(&mut self, id: &str) {
        self.rejected.insert(id.to_string());
    }

    /// Produces the next recommendation.
    ///
    /// Scans the group from the cursor (each entry visited at most once per
    /// session), then backfills via retrieval + oracle, then falls through
    /// to synthesis. Infallible by construction.
    pub async fn next<I, O>(&mut self, index: &I, oracle: &O) -> Recommendation
    where
        I: SimilarityIndex,
        O: SelectionOracle,
    {
        while self.cursor < self.group.len() {
            let entry = self.group[self.cursor].clone();
            self.cursor += 1;

            if self.used.contains(&entry.id) || self.rejected.contains(&entry.id) {
                continue;
            }
            if self.brand_at_cap(&entry.brand) {
                debug!(
                    id = %entry.id,
                    brand = %entry.brand,
                    "Skipping pool candidate - brand at diversity cap"
                );
                continue;
            }

            self.record_emission(&entry.id, &entry.brand);
            let reason = entry.reason_code.unwrap_or(ReasonCode::Popularity);
            return Recommendation::from_candidate(&entry, reason, RecommendationSource::Pool);
        }

        debug!(group_len = self.group.len(), "Pool exhausted - backfilling");
        self.backfill(index, oracle).await
    }

    /// Assembles up to `policy.batch_size` recommendations in one call.
    ///
    /// The attempt bound exists to cap work when a group is pathologically
    /// small and fully rejected, not to allow partial batches: `next` always
    /// produces, so the batch fills unless the bound is tighter than the
    /// batch size.
    pub async fn initial_batch<I, O>(&mut self, index: &I, oracle: &O) -> Vec<Recommendation>
    where
        I: SimilarityIndex,
        O: SelectionOracle,
    {
        let max_attempts = (self.group.len() * 2).max(self.policy.batch_size * 2);
        let mut results = Vec::with_capacity(self.policy.batch_size);
        let mut attempts = 0;

        while results.len() < self.policy.batch_size && attempts < max_attempts {
            attempts += 1;
            results.push(self.next(index, oracle).await);
        }

        debug!(
            produced = results.len(),
            attempts, "Initial batch assembled"
        );
        results
    }

    /// The group's first entry, used as the semantic anchor for backfill.
    pub(crate) fn base(&self) -> Option<&Candidate> {
        self.group.first()
    }

    pub(crate) fn brand_at_cap(&self, brand: &str) -> bool {
        self.used_brands
            .get(brand)
            .is_some_and(|&count| count >= self.policy.brand_cap)
    }

    pub(crate) fn record_emission(&mut self, id: &str, brand: &str) {
        self.used.insert(id.to_string());
        *self.used_brands.entry(brand.to_string()).or_insert(0) += 1;
    }

    pub(crate) fn is_excluded(&self, id: &str) -> bool {
        self.used.contains(id) || self.rejected.contains(id)
    }

    /// Ids already emitted this session (superset of everything returned).
    pub fn used_ids(&self) -> &HashSet<String> {
        &self.used
    }

    /// Ids the caller has rejected.
    pub fn rejected_ids(&self) -> &HashSet<String> {
        &self.rejected
    }

    pub(crate) fn used_sorted(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.used.iter().cloned().collect();
        ids.sort();
        ids
    }

    pub(crate) fn rejected_sorted(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rejected.iter().cloned().collect();
        ids.sort();
        ids
    }
}
