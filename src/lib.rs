//! Swaprec library crate (used by the server binary and integration tests).
//!
//! Substitute-product recommendation service: each original product id maps
//! to a session that serves a ranked, deduplicated stream of replacement
//! candidates from three tiers — a precomputed pool, similarity retrieval
//! plus LLM selection, and always-succeeding fallback synthesis.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Candidate`], [`Recommendation`], [`ReasonCode`], [`CandidateStore`] -
//!   Catalog types
//! - [`RecommendationSession`], [`SessionPolicy`] - Per-product state machine
//! - [`SessionRegistry`] - Capacity/idle-bounded session map
//! - [`QdrantIndex`], [`SimilarityIndex`] - Similarity retrieval
//! - [`GenaiOracle`], [`SelectionOracle`] - LLM candidate selection
//! - [`TextEmbedder`] - Deterministic embedding for seeding and queries
//!
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod index;
pub mod oracle;
pub mod registry;
pub mod session;

pub use catalog::{
    Candidate, CandidateStore, CatalogError, ReasonCode, Recommendation, RecommendationSource,
};
pub use config::{Config, ConfigError};
pub use embedding::{DEFAULT_EMBEDDING_DIM, TextEmbedder};
pub use gateway::{HandlerState, create_router_with_state};
pub use hashing::{hash_candidate_id, hash_to_u64};
pub use index::{IndexError, QdrantIndex, SimilarityIndex, seed_from_store};
#[cfg(any(test, feature = "mock"))]
pub use index::MockSimilarityIndex;
pub use oracle::{GenaiOracle, OracleConfig, OracleError, SelectionOracle};
#[cfg(any(test, feature = "mock"))]
pub use oracle::MockSelectionOracle;
pub use registry::SessionRegistry;
pub use session::{RecommendationSession, SessionPolicy};
