use std::sync::Arc;

use crate::index::SimilarityIndex;
use crate::oracle::SelectionOracle;
use crate::registry::SessionRegistry;

/// Shared state handed to every gateway handler.
pub struct HandlerState<
    I: SimilarityIndex + Send + Sync + 'static,
    O: SelectionOracle + Send + Sync + 'static,
> {
    pub registry: SessionRegistry,

    pub index: Arc<I>,

    pub oracle: Arc<O>,

    /// True when the oracle serves canned selections instead of a provider.
    pub mock_oracle: bool,
}

impl<I, O> Clone for HandlerState<I, O>
where
    I: SimilarityIndex + Send + Sync + 'static,
    O: SelectionOracle + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            index: self.index.clone(),
            oracle: self.oracle.clone(),
            mock_oracle: self.mock_oracle,
        }
    }
}

impl<I, O> HandlerState<I, O>
where
    I: SimilarityIndex + Send + Sync + 'static,
    O: SelectionOracle + Send + Sync + 'static,
{
    pub fn new(registry: SessionRegistry, index: Arc<I>, oracle: Arc<O>, mock_oracle: bool) -> Self {
        Self {
            registry,
            index,
            oracle,
            mock_oracle,
        }
    }
}
