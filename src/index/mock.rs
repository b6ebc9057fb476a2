use std::collections::HashMap;

use parking_lot::RwLock;

use crate::catalog::Candidate;
use crate::embedding::TextEmbedder;
use crate::index::IndexError;
use crate::index::client::SimilarityIndex;

/// In-memory index for tests: ranks seeded candidates by cosine similarity
/// of their "name category" embedding against the query embedding.
#[derive(Default)]
pub struct MockSimilarityIndex {
    candidates: RwLock<Vec<Candidate>>,
    embedder: TextEmbedder,
    fail_queries: RwLock<bool>,
}

impl MockSimilarityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mock index pre-seeded with candidates.
    pub fn with_candidates(candidates: impl IntoIterator<Item = Candidate>) -> Self {
        let index = Self::new();
        index.seed(candidates);
        index
    }

    /// Adds candidates to the index.
    pub fn seed(&self, candidates: impl IntoIterator<Item = Candidate>) {
        self.candidates.write().extend(candidates);
    }

    /// Makes every subsequent call fail, simulating an unreachable index.
    pub fn fail_all(&self) {
        *self.fail_queries.write() = true;
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.read().len()
    }

    fn check_available(&self, op: &str) -> Result<(), IndexError> {
        if *self.fail_queries.read() {
            return Err(IndexError::SearchFailed {
                collection: "mock".to_string(),
                message: format!("{op} unavailable"),
            });
        }
        Ok(())
    }
}

impl SimilarityIndex for MockSimilarityIndex {
    async fn query(
        &self,
        text: &str,
        limit: u64,
        country: Option<&str>,
    ) -> Result<Vec<String>, IndexError> {
        self.check_available("query")?;

        let query_vec = self.embedder.embed(text);

        let mut scored: Vec<(String, f32)> = self
            .candidates
            .read()
            .iter()
            .filter(|c| country.is_none_or(|tag| c.country == tag))
            .map(|c| {
                let vec = self.embedder.embed(&format!("{} {}", c.name, c.category));
                (c.id.clone(), cosine_similarity(&query_vec, &vec))
            })
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit as usize);

        Ok(scored.into_iter().map(|(id, _)| id).collect())
    }

    async fn fetch_metadata(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Candidate>, IndexError> {
        self.check_available("fetch_metadata")?;

        let candidates = self.candidates.read();
        Ok(ids
            .iter()
            .filter_map(|id| {
                candidates
                    .iter()
                    .find(|c| &c.id == id)
                    .map(|c| (c.id.clone(), c.clone()))
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), IndexError> {
        self.check_available("ping")
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
