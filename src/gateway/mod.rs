//! HTTP gateway (Axum) for recommendation lookup.
//!
//! This module is primarily used by the `swaprec` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{initial_recommendations_handler, recommend_handler};
pub use state::HandlerState;

use crate::index::SimilarityIndex;
use crate::oracle::SelectionOracle;

/// Response header carrying which arbitration tier produced the body.
pub const SOURCE_HEADER: &str = "x-swaprec-source";

/// Response header carrying gateway status on health and error responses.
pub const STATUS_HEADER: &str = "x-swaprec-status";

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_ERROR: &str = "error";

pub fn create_router_with_state<I, O>(state: HandlerState<I, O>) -> Router
where
    I: SimilarityIndex + Send + Sync + 'static,
    O: SelectionOracle + Send + Sync + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/recommend", get(recommend_handler))
        .route("/recommend/initial", get(initial_recommendations_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub dataset: &'static str,
    pub index: &'static str,
    pub oracle_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(STATUS_HEALTHY));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<I, O>(State(state): State<HandlerState<I, O>>) -> Response
where
    I: SimilarityIndex + Send + Sync + 'static,
    O: SelectionOracle + Send + Sync + 'static,
{
    let dataset_status = if state.registry.store_is_empty() {
        STATUS_ERROR
    } else {
        STATUS_READY
    };

    let index_status = match state.index.ping().await {
        Ok(()) => STATUS_READY,
        Err(_) => "pending",
    };

    let oracle_mode = if state.mock_oracle { "mock" } else { "real" };

    let components = ComponentStatus {
        http: STATUS_READY,
        dataset: dataset_status,
        index: index_status,
        oracle_mode,
    };

    let is_ready = components.dataset == STATUS_READY && components.index == STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { "pending" };

    let mut headers = HeaderMap::new();
    headers.insert(
        STATUS_HEADER,
        HeaderValue::from_str(status_msg).unwrap_or(HeaderValue::from_static(STATUS_ERROR)),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
