use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::catalog::{Candidate, ReasonCode};
use crate::oracle::client::SelectionOracle;
use crate::oracle::types::{OracleSelection, SelectionConstraints};
use crate::oracle::OracleError;

/// Scripted oracle for tests.
///
/// Replies are consumed front to back; once the script is empty it falls
/// back to echoing the first shortlist entry not yet used.
#[derive(Default)]
pub struct MockSelectionOracle {
    script: Mutex<VecDeque<Result<OracleSelection, OracleError>>>,
    calls: Mutex<u32>,
}

impl MockSelectionOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a scripted reply.
    pub fn push_reply(&self, reply: Result<OracleSelection, OracleError>) {
        self.script.lock().push_back(reply);
    }

    /// Queues a successful pick of the given id (metadata synthesized).
    pub fn push_selection_of(&self, id: &str) {
        self.push_reply(Ok(selection_of(id)));
    }

    /// Queues a malformed-response failure.
    pub fn push_parse_failure(&self) {
        self.push_reply(Err(OracleError::MalformedResponse {
            message: "expected value at line 1".to_string(),
        }));
    }

    /// Number of `select` calls observed.
    pub fn call_count(&self) -> u32 {
        *self.calls.lock()
    }
}

/// A plausible selection for an id, for scripting.
pub fn selection_of(id: &str) -> OracleSelection {
    OracleSelection {
        replacement_id: id.to_string(),
        name: format!("Product {id}"),
        brand: format!("Brand {id}"),
        category: "baby care".to_string(),
        price: Some(9.99),
        reason_code: Some(ReasonCode::Quality),
        brand_popularity: Some(6.0),
    }
}

impl SelectionOracle for MockSelectionOracle {
    async fn select(
        &self,
        shortlist: &[Candidate],
        constraints: &SelectionConstraints,
    ) -> Result<OracleSelection, OracleError> {
        *self.calls.lock() += 1;

        if let Some(reply) = self.script.lock().pop_front() {
            return reply;
        }

        let pick = shortlist
            .iter()
            .find(|c| !constraints.used.contains(&c.id) && !constraints.rejected.contains(&c.id))
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
