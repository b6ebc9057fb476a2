//! JSON dataset loader with column defaulting.
//!
//! Records missing optional columns get the same defaults the index builder
//! applies: popularity 5.0, country "USA", "Unknown" for text fields.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::model::{Candidate, ReasonCode};
use super::{DEFAULT_BRAND_POPULARITY, DEFAULT_COUNTRY, CatalogError};

/// One row of the replacement dataset.
#[derive(Debug, Deserialize)]
pub(crate) struct DatasetRecord {
    pub original_id: String,
    pub replacement_id: String,
    #[serde(default = "default_text")]
    pub name: String,
    #[serde(default = "default_text")]
    pub brand: String,
    #[serde(default = "default_text")]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_popularity")]
    pub brand_popularity: f64,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub reason_code: Option<ReasonCode>,
}

fn default_text() -> String {
    "Unknown".to_string()
}

fn default_popularity() -> f64 {
    DEFAULT_BRAND_POPULARITY
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl DatasetRecord {
    fn into_candidate(self) -> Candidate {
        Candidate {
            id: self.replacement_id,
            name: self.name,
            brand: self.brand,
            category: self.category,
            price: self.price.max(0.0),
            brand_popularity: self.brand_popularity.clamp(0.0, 10.0),
            country: self.country,
            reason_code: self.reason_code,
        }
    }
}

/// Reads and sanitizes dataset records, preserving file order.
pub(crate) fn read_records(path: &Path) -> Result<Vec<(String, Candidate)>, CatalogError> {
    let bytes = std::fs::read(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<DatasetRecord> =
        serde_json::from_slice(&bytes).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        if record.original_id.is_empty() || record.replacement_id.is_empty() {
            warn!("skipping dataset record with empty id");
            continue;
        }
        rows.push((record.original_id.clone(), record.into_candidate()));
    }

    if rows.is_empty() {
        return Err(CatalogError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!(records = rows.len(), path = %path.display(), "Dataset loaded");
    Ok(rows)
}
