//! ResearchOS HTTP API
//!
//! Axum-based HTTP server in front of the query gateway.
//!
//! Architecture: handlers are thin — topic extraction and a request-id
//! span here, all decision logic in `researchos_core::QueryGateway`. Both
//! endpoints answer HTTP 200 unconditionally; a canister outage shows up
//! in the payload (`degraded`, demo content), never as an error status.
//!
//! Endpoints:
//! - POST /api/neural-query — research query, uniform envelope response
//! - GET  /api/health       — canister reachability, online vs demo

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use researchos_core::{QueryGateway, ResearchConfig};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::Instrument;
use uuid::Uuid;

/// Shared state for all HTTP handlers
#[derive(Clone)]
pub struct HttpState {
    pub gateway: Arc<QueryGateway>,
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/api/neural-query", post(neural_query_handler))
        .route("/api/health", get(health_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    config: ResearchConfig,
    gateway: Arc<QueryGateway>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);
    let state = Arc::new(HttpState { gateway });

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("ResearchOS HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NeuralQueryRequest {
    pub query: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/neural-query. The body is optional and a malformed body is
/// treated like a missing one — the gateway substitutes the default topic
/// rather than rejecting the request.
pub async fn neural_query_handler(
    State(state): State<Arc<HttpState>>,
    payload: Option<Json<NeuralQueryRequest>>,
) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    let query = payload.and_then(|Json(req)| req.query);

    let envelope = state
        .gateway
        .research(query)
        .instrument(tracing::info_span!("neural_query", %request_id))
        .await;

    Json(envelope)
}

/// GET /api/health. Always 200; the payload carries online vs demo.
pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let status = state.gateway.check_health().await;
    Json(status)
}

// ============================================================================
// Unit Tests
// ============================================================================
