use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::debug;

use crate::catalog::{Candidate, ReasonCode};
use crate::oracle::prompt::{SYSTEM_PROMPT, build_selection_prompt, parse_selection};
use crate::oracle::types::{OracleConfig, OracleSelection, SelectionConstraints};
use crate::oracle::OracleError;

/// Interface the session's backfill procedure uses to pick one candidate.
pub trait SelectionOracle: Send + Sync {
    /// Asks for one pick from `shortlist` under `constraints`.
    fn select(
        &self,
        shortlist: &[Candidate],
        constraints: &SelectionConstraints,
    ) -> impl std::future::Future<Output = Result<OracleSelection, OracleError>> + Send;
}

/// Completion-service oracle (genai multi-provider client).
pub struct GenaiOracle {
    client: Client,
    config: OracleConfig,
}

impl GenaiOracle {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            client: Client::default(),
            config,
        }
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Local selection used when the provider is mocked out: first shortlist
    /// entry not already used, echoed verbatim.
    fn mock_selection(
        shortlist: &[Candidate],
        constraints: &SelectionConstraints,
    ) -> Result<OracleSelection, OracleError> {
        let pick = shortlist
            .iter()
            .find(|c| !constraints.used.contains(&c.id))
            .or_else(|| shortlist.first())
            .ok_or(OracleError::EmptyResponse)?;

        Ok(OracleSelection {
            replacement_id: pick.id.clone(),
            name: pick.name.clone(),
            brand: pick.brand.clone(),
            category: pick.category.clone(),
            price: Some(pick.price),
            reason_code: Some(ReasonCode::Popularity),
            brand_popularity: Some(pick.brand_popularity),
        })
    }
}

impl SelectionOracle for GenaiOracle {
    async fn select(
        &self,
        shortlist: &[Candidate],
        constraints: &SelectionConstraints,
    ) -> Result<OracleSelection, OracleError> {
        if self.config.mock_provider {
            debug!("Mock provider enabled - selecting locally");
            return Self::mock_selection(shortlist, constraints);
        }

        let prompt = build_selection_prompt(shortlist, constraints);
        let request = ChatRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt),
        ]);

        let response = self
            .client
            .exec_chat(&self.config.model, request, None)
            .await
            .map_err(|e| OracleError::Provider {
                message: e.to_string(),
            })?;

        let reply = response.first_text().ok_or(OracleError::EmptyResponse)?;
        debug!(reply_len = reply.len(), "Oracle reply received");

        parse_selection(reply)
    }
}
