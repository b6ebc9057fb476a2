use serde::Deserialize;

use crate::catalog::ReasonCode;
use crate::oracle::DEFAULT_ORACLE_MODEL;

/// Oracle client configuration.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Completion model name.
    pub model: String,

    /// When set, selections are fabricated locally instead of calling the
    /// provider (serve without an API key; same switch as tests).
    pub mock_provider: bool,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_ORACLE_MODEL.to_string(),
            mock_provider: false,
        }
    }
}

impl OracleConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            mock_provider: false,
        }
    }

    pub fn mock_provider(mut self, mock: bool) -> Self {
        self.mock_provider = mock;
        self
    }
}

/// Constraints handed to the oracle alongside the shortlist.
///
/// "Must" constraints are hard requirements; the rest are preferences the
/// prompt states but the session does not re-verify.
#[derive(Debug, Clone)]
pub struct SelectionConstraints {
    /// Required country/region tag.
    pub country: String,

    /// Preferred category (the base product's).
    pub category: String,

    /// Preferred price band around the base price.
    pub min_price: f64,
    pub max_price: f64,

    /// Preferred popularity band around the base score.
    pub min_popularity: f64,
    pub max_popularity: f64,

    /// Brand to steer away from (the base product's).
    pub avoid_brand: String,

    /// Ids the caller rejected; the pick must avoid these.
    pub rejected: Vec<String>,

    /// Ids already emitted this session; the pick must avoid these.
    pub used: Vec<String>,

    /// Reinforcement added on retry attempts ("pick a different product").
    pub retry_instruction: Option<String>,
}

/// The oracle's structured pick.
///
/// String fields are required: their absence is a parse failure. Numeric
/// fields and the reason code are optional because models echo them
/// unreliably; the session resolves them from shortlist metadata instead.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleSelection {
    pub replacement_id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub reason_code: Option<ReasonCode>,
    #[serde(default)]
    pub brand_popularity: Option<f64>,
}
