//! HTTP API gateway for feedmix.
//!
//! Exposes the feed pipeline and the in-process metrics engine over REST.
//! Built on Axum.

pub mod api_v1;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::{Router, response::Json, routing::get};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use feedmix_config::{AppConfig, FeedConfig};
use feedmix_engine::{FeedPipeline, PipelineOptions};
use feedmix_telemetry::MetricsEngine;

/// Request bodies are never needed; anything larger is rejected.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub pipeline: Arc<FeedPipeline>,
    pub metrics: Arc<MetricsEngine>,
    /// Defaults for query parameters the caller leaves out.
    pub feed: FeedConfig,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS, GET only
/// - Request body size limit (64 KiB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Wire store, reporter and pipeline from `config`.
pub async fn build_state(config: &AppConfig) -> Result<SharedState, Box<dyn std::error::Error>> {
    let store = feedmix_store::open_store(&config.store).await?;
    let metrics = Arc::new(MetricsEngine::with_capacity(config.telemetry.max_records));
    let reporter = feedmix_telemetry::build_reporter(&config.telemetry, metrics.clone())?;
    let pipeline = FeedPipeline::new(store, reporter, PipelineOptions::from_config(&config.feed));

    Ok(Arc::new(GatewayState {
        pipeline: Arc::new(pipeline),
        metrics,
        feed: config.feed.clone(),
    }))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = build_state(&config).await?;
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}
