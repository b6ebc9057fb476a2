//! LLM-assisted candidate selection.
//!
//! Given a shortlist of retrieved candidates and the session's constraints,
//! the oracle returns one structured pick. Its response is untrusted input:
//! parsing and duplicate handling live in the session's retry machinery.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use client::{GenaiOracle, SelectionOracle};
pub use error::OracleError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockSelectionOracle;
pub use types::{OracleConfig, OracleSelection, SelectionConstraints};

/// Default completion model.
pub const DEFAULT_ORACLE_MODEL: &str = "gemini-2.0-flash";

/// Shortlist entries actually serialized into the prompt.
pub const PROMPT_SHORTLIST_LIMIT: usize = 15;
