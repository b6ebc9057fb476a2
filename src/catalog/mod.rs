//! Product catalog: candidate types and the precomputed replacement pool.
//!
//! The pool is loaded once at startup and read-only thereafter. Sessions hold
//! their group by `Arc` and never mutate it.

pub mod error;
pub mod loader;
pub mod model;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::CatalogError;
pub use model::{Candidate, ReasonCode, Recommendation, RecommendationSource};
pub use store::CandidateStore;

/// Popularity score assigned to records that carry none.
pub const DEFAULT_BRAND_POPULARITY: f64 = 5.0;

/// Country tag assigned to records that carry none.
pub const DEFAULT_COUNTRY: &str = "USA";
