use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, GetPointsBuilder, PointId, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};

use crate::catalog::{Candidate, DEFAULT_BRAND_POPULARITY, DEFAULT_COUNTRY};
use crate::embedding::TextEmbedder;
use crate::hashing::hash_candidate_id;
use crate::index::{IndexError, PAYLOAD_ID_KEY};

/// Minimal async interface the session's backfill procedure needs.
///
/// `query` returns candidate ids ranked by similarity to `text`;
/// `fetch_metadata` resolves ids back to full candidate records.
pub trait SimilarityIndex: Send + Sync {
    /// Searches for candidate ids similar to `text`, optionally filtered by
    /// country tag.
    fn query(
        &self,
        text: &str,
        limit: u64,
        country: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<String>, IndexError>> + Send;

    /// Fetches full metadata for the given candidate ids. Unknown ids are
    /// silently absent from the result.
    fn fetch_metadata(
        &self,
        ids: &[String],
    ) -> impl std::future::Future<Output = Result<HashMap<String, Candidate>, IndexError>> + Send;

    /// Cheap liveness probe, used by readiness reporting.
    fn ping(&self) -> impl std::future::Future<Output = Result<(), IndexError>> + Send;
}

#[derive(Clone)]
/// Qdrant-backed similarity index.
pub struct QdrantIndex {
    client: Qdrant,
    url: String,
    collection: String,
    embedder: TextEmbedder,
}

impl QdrantIndex {
    /// Connects to a qdrant endpoint.
    pub async fn connect(
        url: &str,
        collection: impl Into<String>,
        embedder: TextEmbedder,
    ) -> Result<Self, IndexError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| IndexError::ConnectionFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.into(),
            embedder,
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the embedder used for queries and seeding.
    pub fn embedder(&self) -> &TextEmbedder {
        &self.embedder
    }

    /// Performs a basic health check request.
    pub async fn health_check(&self) -> Result<(), IndexError> {
        self.client
            .health_check()
            .await
            .map_err(|e| IndexError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Ensures the collection exists (creates it with cosine distance if
    /// missing).
    pub async fn ensure_collection(&self) -> Result<(), IndexError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| IndexError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        if exists {
            return Ok(());
        }

        let vectors_config =
            VectorParamsBuilder::new(self.embedder.dim() as u64, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| IndexError::CreateCollectionFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Upserts one point per candidate, embedding "name category" text.
    pub async fn upsert_candidates(&self, candidates: &[Candidate]) -> Result<(), IndexError> {
        if candidates.is_empty() {
            return Ok(());
        }

        let indexed_at = chrono::Utc::now().timestamp();

        let points: Vec<PointStruct> = candidates
            .iter()
            .map(|c| {
                let vector = self
                    .embedder
                    .embed(&format!("{} {}", c.name, c.category));

                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert(PAYLOAD_ID_KEY.to_string(), c.id.clone().into());
                payload.insert("name".to_string(), c.name.clone().into());
                payload.insert("brand".to_string(), c.brand.clone().into());
                payload.insert("category".to_string(), c.category.clone().into());
                payload.insert("price".to_string(), c.price.into());
                payload.insert("brand_popularity".to_string(), c.brand_popularity.into());
                payload.insert("country".to_string(), c.country.clone().into());
                payload.insert("indexed_at".to_string(), indexed_at.into());

                PointStruct::new(hash_candidate_id(&c.id), vector, payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| IndexError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }
}

/// Rebuilds a [`Candidate`] from a point payload, defaulting absent fields
/// the same way the index builder does.
fn candidate_from_payload(
    payload: &HashMap<String, qdrant_client::qdrant::Value>,
) -> Option<Candidate> {
    let id = payload.get(PAYLOAD_ID_KEY)?.as_str()?.to_string();

    let text = |key: &str| -> String {
        payload
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    };

    let number = |key: &str, default: f64| -> f64 {
        payload
            .get(key)
            .and_then(|v| v.as_double().or_else(|| v.as_integer().map(|i| i as f64)))
            .unwrap_or(default)
    };

    Some(Candidate {
        id,
        name: text("name"),
        brand: text("brand"),
        category: text("category"),
        price: number("price", 0.0),
        brand_popularity: number("brand_popularity", DEFAULT_BRAND_POPULARITY),
        country: payload
            .get("country")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
        reason_code: None,
    })
}

impl SimilarityIndex for QdrantIndex {
    async fn query(
        &self,
        text: &str,
        limit: u64,
        country: Option<&str>,
    ) -> Result<Vec<String>, IndexError> {
        let vector = self.embedder.embed(text);

        let mut search_builder =
            SearchPointsBuilder::new(&self.collection, vector, limit).with_payload(true);

        if let Some(country) = country {
            let filter = Filter::must([Condition::matches("country", country.to_string())]);
            search_builder = search_builder.filter(filter);
        }

        let search_result = self
            .client
            .search_points(search_builder)
            .await
            .map_err(|e| IndexError::SearchFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let ids = search_result
            .result
            .into_iter()
            .filter_map(|point| {
                point
                    .payload
                    .get(PAYLOAD_ID_KEY)
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string())
            })
            .collect();

        Ok(ids)
    }

    async fn fetch_metadata(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Candidate>, IndexError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let point_ids: Vec<PointId> = ids
            .iter()
            .map(|id| PointId::from(hash_candidate_id(id)))
            .collect();

        let response = self
            .client
            .get_points(
                GetPointsBuilder::new(&self.collection, point_ids).with_payload(true),
            )
            .await
            .map_err(|e| IndexError::RetrieveFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        let candidates = response
            .result
            .into_iter()
            .filter_map(|point| candidate_from_payload(&point.payload))
            .map(|c| (c.id.clone(), c))
            .collect();

        Ok(candidates)
    }

    async fn ping(&self) -> Result<(), IndexError> {
        self.health_check().await
    }
}
