//! Startup index seeding from the candidate catalog.
//!
//! Mirrors the original offline index build: one point per distinct
//! candidate, embedding text "name category", full metadata in the payload.

use tracing::info;

use crate::catalog::CandidateStore;
use crate::index::QdrantIndex;
use crate::index::error::IndexError;

const UPSERT_CHUNK: usize = 256;

/// Ensures the collection exists and upserts every distinct catalog
/// candidate. Returns the number of points written.
pub async fn seed_from_store(
    index: &QdrantIndex,
    store: &CandidateStore,
) -> Result<usize, IndexError> {
    index.ensure_collection().await?;

    let candidates = store.distinct_candidates();
    for chunk in candidates.chunks(UPSERT_CHUNK) {
        index.upsert_candidates(chunk).await?;
    }

    info!(
        points = candidates.len(),
        collection = index.collection(),
        "Similarity index seeded"
    );
    Ok(candidates.len())
}
