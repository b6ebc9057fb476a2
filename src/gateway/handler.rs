use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::catalog::Recommendation;
use crate::gateway::SOURCE_HEADER;
use crate::gateway::error::GatewayError;
use crate::gateway::state::HandlerState;
use crate::index::SimilarityIndex;
use crate::oracle::SelectionOracle;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub original_id: String,

    /// Candidate the shopper turned down; recorded before producing the next
    /// result.
    pub rejected_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InitialQuery {
    pub original_id: String,
}

/// Serves the next recommendation for an original product.
#[instrument(
    skip(state),
    fields(original_id = %query.original_id, request_id = %uuid::Uuid::new_v4())
)]
pub async fn recommend_handler<I, O>(
    State(state): State<HandlerState<I, O>>,
    Query(query): Query<RecommendQuery>,
) -> Result<Response, GatewayError>
where
    I: SimilarityIndex + Send + Sync + 'static,
    O: SelectionOracle + Send + Sync + 'static,
{
    let original_id = validated_id(&query.original_id)?;

    let session = state
        .registry
        .session_for(original_id)
        .ok_or_else(|| GatewayError::UnknownProduct {
            original_id: original_id.to_string(),
        })?;

    let mut session = session.lock().await;

    if let Some(rejected_id) = query.rejected_id.as_deref() {
        let rejected_id = rejected_id.trim();
        if !rejected_id.is_empty() {
            debug!(rejected_id, "Recording rejection");
            session.reject(rejected_id);
        }
    }

    let recommendation = session.next(state.index.as_ref(), state.oracle.as_ref()).await;

    info!(
        replacement_id = %recommendation.replacement_id,
        source = recommendation.source.as_str(),
        "Recommendation served"
    );

    Ok(single_response(recommendation))
}

/// Serves the opening batch of recommendations for an original product.
#[instrument(
    skip(state),
    fields(original_id = %query.original_id, request_id = %uuid::Uuid::new_v4())
)]
pub async fn initial_recommendations_handler<I, O>(
    State(state): State<HandlerState<I, O>>,
    Query(query): Query<InitialQuery>,
) -> Result<Response, GatewayError>
where
    I: SimilarityIndex + Send + Sync + 'static,
    O: SelectionOracle + Send + Sync + 'static,
{
    let original_id = validated_id(&query.original_id)?;

    let session = state
        .registry
        .session_for(original_id)
        .ok_or_else(|| GatewayError::UnknownProduct {
            original_id: original_id.to_string(),
        })?;

    let mut session = session.lock().await;
    let batch = session
        .initial_batch(state.index.as_ref(), state.oracle.as_ref())
        .await;

    info!(produced = batch.len(), "Initial batch served");

    let mut headers = HeaderMap::new();
    headers.insert(SOURCE_HEADER, HeaderValue::from_static("batch"));

    Ok((StatusCode::OK, headers, Json(batch)).into_response())
}

fn validated_id(original_id: &str) -> Result<&str, GatewayError> {
    let trimmed = original_id.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "original_id must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

fn single_response(recommendation: Recommendation) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SOURCE_HEADER,
        HeaderValue::from_static(recommendation.source.as_str()),
    );

    (StatusCode::OK, headers, Json(recommendation)).into_response()
}
