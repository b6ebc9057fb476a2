//! Backfill: retrieval + oracle selection when the pool is exhausted.
//!
//! Every external call here is recoverable: a failed or timed-out index
//! query shrinks the candidate pool, a failed oracle attempt consumes one
//! retry, and exhaustion of any stage falls through to synthesis. Nothing
//! on this path aborts the session.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, warn};

use super::RecommendationSession;
use crate::catalog::{Candidate, ReasonCode, Recommendation, RecommendationSource};
use crate::index::SimilarityIndex;
use crate::oracle::{OracleSelection, SelectionConstraints, SelectionOracle};

/// One step of the oracle retry state machine.
enum AttemptOutcome {
    /// A fresh id was selected.
    Selected(OracleSelection),
    /// Provider/parse/timeout failure; the attempt is spent.
    ParseFailure,
    /// The oracle repeated an already-used id.
    DuplicateId(OracleSelection),
}

impl RecommendationSession {
    /// Synthesizes one recommendation via retrieval + oracle selection,
    /// falling through to fallback synthesis at every dead end.
    pub(crate) async fn backfill<I, O>(&mut self, index: &I, oracle: &O) -> Recommendation
    where
        I: SimilarityIndex,
        O: SelectionOracle,
    {
        let base = match self.base() {
            Some(base) => base.clone(),
            None => {
                warn!("Session has an empty group; synthesizing from placeholder base");
                let placeholder = placeholder_base();
                return self.synthesize(&placeholder);
            }
        };

        let available = self.gather_candidate_ids(index, &base).await;
        if available.is_empty() {
            debug!("No retrieval candidates available; falling back to synthesis");
            return self.synthesize(&base);
        }

        let shortlist = self.build_shortlist(index, &available).await;
        if shortlist.is_empty() {
            debug!("Shortlist empty after metadata filtering; falling back to synthesis");
            return self.synthesize(&base);
        }

        match self.run_oracle_attempts(oracle, &shortlist, &base).await {
            Some(recommendation) => recommendation,
            None => self.synthesize(&base),
        }
    }

    /// Phase 1: several differently-phrased similarity queries, unioned in
    /// first-seen order, minus used/rejected ids; one broader unfiltered
    /// relaxation query if that leaves nothing.
    async fn gather_candidate_ids<I>(&self, index: &I, base: &Candidate) -> Vec<String>
    where
        I: SimilarityIndex,
    {
        let deadline = self.policy.external_timeout;
        let mut seen: HashSet<String> = HashSet::new();
        let mut pool: Vec<String> = Vec::new();

        for query in query_variations(base) {
            let ids = recoverable(
                deadline,
                "index.query",
                index.query(&query, self.policy.retrieval_limit, Some(&base.country)),
            )
            .await
            .unwrap_or_default();

            for id in ids {
                if seen.insert(id.clone()) {
                    pool.push(id);
                }
            }
        }

        let mut available: Vec<String> =
            pool.into_iter().filter(|id| !self.is_excluded(id)).collect();

        if available.is_empty() {
            debug!("Filtered retrieval pool empty; relaxing country filter");
            let relaxed = recoverable(
                deadline,
                "index.query(relaxed)",
                index.query(
                    &format!("{} {}", base.name, base.category),
                    self.policy.relaxed_retrieval_limit,
                    None,
                ),
            )
            .await
            .unwrap_or_default();

            available = relaxed
                .into_iter()
                .filter(|id| !self.is_excluded(id))
                .collect();
        }

        available
    }

    /// Phase 2: resolve ids to metadata, drop brands at the diversity cap,
    /// truncate to the oracle shortlist size.
    async fn build_shortlist<I>(&self, index: &I, available: &[String]) -> Vec<Candidate>
    where
        I: SimilarityIndex,
    {
        let fetch_ids = &available[..available.len().min(self.policy.metadata_fetch_limit)];

        let metadata = match recoverable(
            self.policy.external_timeout,
            "index.fetch_metadata",
            index.fetch_metadata(fetch_ids),
        )
        .await
        {
            Some(metadata) => metadata,
            None => return Vec::new(),
        };

        let mut shortlist = Vec::new();
        for id in fetch_ids {
            let Some(candidate) = metadata.get(id) else {
                continue;
            };
            if self.brand_at_cap(&candidate.brand) {
                continue;
            }
            shortlist.push(candidate.clone());
            if shortlist.len() >= self.policy.shortlist_limit {
                break;
            }
        }

        debug!(candidates = shortlist.len(), "Shortlist assembled for oracle");
        shortlist
    }

    /// Phase 3: the bounded retry state machine around the oracle call.
    ///
    /// Parse failures spend an attempt and retry with a reinforced
    /// instruction; a duplicate id on the final attempt is accepted with a
    /// disambiguating suffix rather than discarded. Returns `None` only
    /// when every attempt was a parse failure.
    async fn run_oracle_attempts<O>(
        &mut self,
        oracle: &O,
        shortlist: &[Candidate],
        base: &Candidate,
    ) -> Option<Recommendation>
    where
        O: SelectionOracle,
    {
        let retries = self.policy.oracle_retries.max(1);
        let mut constraints = self.constraints_for(base);

        for attempt in 1..=retries {
            let last_attempt = attempt == retries;

            let outcome = match recoverable(
                self.policy.external_timeout,
                "oracle.select",
                oracle.select(shortlist, &constraints),
            )
            .await
            {
                None => AttemptOutcome::ParseFailure,
                Some(selection) if self.used.contains(&selection.replacement_id) => {
                    AttemptOutcome::DuplicateId(selection)
                }
                Some(selection) => AttemptOutcome::Selected(selection),
            };

            match outcome {
                AttemptOutcome::Selected(selection) => {
                    return Some(self.accept_selection(selection, shortlist, base));
                }
                AttemptOutcome::DuplicateId(mut selection) if last_attempt => {
                    // Terminal disambiguation: keep the pick, make the id fresh.
                    selection.replacement_id =
                        format!("{}_retry_{}", selection.replacement_id, attempt);
                    warn!(
                        id = %selection.replacement_id,
                        "Oracle repeated a used id on final attempt; suffixing"
                    );
                    return Some(self.accept_selection(selection, shortlist, base));
                }
                AttemptOutcome::DuplicateId(selection) => {
                    debug!(
                        id = %selection.replacement_id,
                        attempt,
                        "Oracle repeated a used id; retrying"
                    );
                }
                AttemptOutcome::ParseFailure if last_attempt => return None,
                AttemptOutcome::ParseFailure => {
                    debug!(attempt, "Oracle attempt failed; retrying");
                }
            }

            constraints.retry_instruction = Some(format!(
                "Attempt {}: Please select a DIFFERENT product.",
                attempt + 1
            ));
        }

        None
    }

    fn constraints_for(&self, base: &Candidate) -> SelectionConstraints {
        SelectionConstraints {
            country: base.country.clone(),
            category: base.category.clone(),
            min_price: base.price * 0.5,
            max_price: base.price * 2.0,
            min_popularity: (base.brand_popularity - 3.0).max(0.0),
            max_popularity: (base.brand_popularity + 3.0).min(10.0),
            avoid_brand: base.brand.clone(),
            rejected: self.rejected_sorted(),
            used: self.used_sorted(),
            retry_instruction: None,
        }
    }

    /// Records a validated selection and builds the result, resolving
    /// numeric fields from shortlist metadata when the oracle omitted or
    /// zeroed them.
    fn accept_selection(
        &mut self,
        selection: OracleSelection,
        shortlist: &[Candidate],
        base: &Candidate,
    ) -> Recommendation {
        // The shortlist entry is looked up by the pre-suffix id.
        let original_id = selection
            .replacement_id
            .split("_retry_")
            .next()
            .unwrap_or(&selection.replacement_id);
        let metadata = shortlist.iter().find(|c| c.id == original_id);

        let price = selection
            .price
            .filter(|p| *p > 0.0)
            .or(metadata.map(|c| c.price))
            .unwrap_or(base.price);
        let brand_popularity = selection
            .brand_popularity
            .filter(|p| *p > 0.0)
            .or(metadata.map(|c| c.brand_popularity))
            .unwrap_or(base.brand_popularity);

        self.record_emission(&selection.replacement_id, &selection.brand);

        Recommendation {
            replacement_id: selection.replacement_id,
            name: selection.name,
            brand: selection.brand,
            category: selection.category,
            price,
            reason_code: selection.reason_code.unwrap_or(ReasonCode::Popularity),
            brand_popularity,
            source: RecommendationSource::Oracle,
        }
    }
}

/// Differently-phrased retrieval queries for recall diversity.
fn query_variations(base: &Candidate) -> Vec<String> {
    vec![
        format!("{} {}", base.name, base.category),
        format!("{} {}", base.category, base.brand),
        format!("{} product alternative", base.category),
        format!("{} {} similar to {}", base.country, base.category, base.name),
        format!("{} substitute product", base.category),
    ]
}

pub(crate) fn placeholder_base() -> Candidate {
    Candidate {
        id: "unknown".to_string(),
        name: "Unknown Product".to_string(),
        brand: "Unknown".to_string(),
        category: "general".to_string(),
        price: 10.0,
        brand_popularity: 5.0,
        country: crate::catalog::DEFAULT_COUNTRY.to_string(),
        reason_code: None,
    }
}

/// Awaits an external call under a deadline, demoting errors and timeouts
/// to `None` so the caller can fall through to its next tier.
async fn recoverable<T, E>(
    deadline: Duration,
    op: &'static str,
    fut: impl std::future::Future<Output = Result<T, E>>,
) -> Option<T>
where
    E: std::fmt::Display,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!(op, error = %e, "External call failed");
            None
        }
        Err(_) => {
            warn!(op, timeout_secs = deadline.as_secs(), "External call timed out");
            None
        }
    }
}
