use serde::{Deserialize, Serialize};

/// One potential substitute product.
///
/// Ids are globally unique across the precomputed pool and the similarity
/// index; `price` is non-negative and `brand_popularity` is conventionally
/// on a 0-10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique candidate id (`replacement_id` on the wire).
    #[serde(rename = "replacement_id")]
    pub id: String,

    pub name: String,

    pub brand: String,

    pub category: String,

    pub price: f64,

    pub brand_popularity: f64,

    pub country: String,

    /// Precomputed reason for pool candidates; index metadata carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_code: Option<ReasonCode>,
}

/// Fixed vocabulary explaining why a substitution was suggested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonCode {
    Tariff,
    Popularity,
    Quality,
}

impl ReasonCode {
    /// All reason codes, in a stable order (used by fallback synthesis).
    pub const ALL: [ReasonCode; 3] = [
        ReasonCode::Tariff,
        ReasonCode::Popularity,
        ReasonCode::Quality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Tariff => "tariff",
            ReasonCode::Popularity => "popularity",
            ReasonCode::Quality => "quality",
        }
    }
}

/// Which arbitration tier produced a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecommendationSource {
    /// Served from the precomputed pool traversal.
    #[default]
    Pool,
    /// Synthesized via retrieval + oracle selection.
    Oracle,
    /// Fabricated by fallback synthesis.
    Fallback,
}

impl RecommendationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationSource::Pool => "pool",
            RecommendationSource::Oracle => "oracle",
            RecommendationSource::Fallback => "fallback",
        }
    }
}

/// The value returned to the caller for one `next()` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub replacement_id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: f64,
    pub reason_code: ReasonCode,
    pub brand_popularity: f64,

    /// Provenance tier; surfaced as a response header, not in the JSON body.
    #[serde(skip)]
    pub source: RecommendationSource,
}

impl Recommendation {
    /// Builds a result from candidate metadata.
    pub fn from_candidate(
        candidate: &Candidate,
        reason_code: ReasonCode,
        source: RecommendationSource,
    ) -> Self {
        Self {
            replacement_id: candidate.id.clone(),
            name: candidate.name.clone(),
            brand: candidate.brand.clone(),
            category: candidate.category.clone(),
            price: candidate.price,
            reason_code,
            brand_popularity: candidate.brand_popularity,
            source,
        }
    }
}
