//! Deterministic text embedder for index seeding and similarity queries.
//!
//! Embedding internals are an external collaborator here; what the index
//! needs is a stable `text -> normalized vector` function. This one is
//! hash-seeded: identical text always maps to the same unit vector, so
//! seeded collections and query embeddings agree without model files. A
//! model-backed embedder can replace it behind the same signature.

use tracing::debug;

/// Output dimension matching the MiniLM-class models the index was sized for.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Hash-seeded, L2-normalized text embedder.
#[derive(Debug, Clone)]
pub struct TextEmbedder {
    dim: usize,
}

impl Default for TextEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIM)
    }
}

impl TextEmbedder {
    /// Creates an embedder with the given output dimension.
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    /// Returns the output embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Generates a unit-norm embedding for `text`.
    pub fn embed(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        debug!(text_len = text.len(), "Generating embedding");

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dim);
        let mut state = seed;

        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        normalize(&mut embedding);
        embedding
    }
}

fn normalize(embedding: &mut [f32]) {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in embedding.iter_mut() {
            *x /= norm;
        }
    }
}
