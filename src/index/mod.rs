//! Qdrant similarity index over product embeddings.

pub mod client;
pub mod error;
pub mod seed;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{QdrantIndex, SimilarityIndex};
pub use error::IndexError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSimilarityIndex;
pub use seed::seed_from_store;

/// Default collection name (matches the original index build).
pub const DEFAULT_COLLECTION_NAME: &str = "usa_products";

/// Payload key carrying the candidate's string id.
pub const PAYLOAD_ID_KEY: &str = "replacement_id";
