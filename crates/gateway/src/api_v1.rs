//! HTTP API v1.
//!
//! Endpoints:
//!
//! - `GET /v1/feed`            — Assemble one feed
//! - `GET /v1/metrics`         — Aggregate feed metrics
//! - `GET /v1/metrics/recent`  — Most recent feed metrics records

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::num::IntErrorKind;
use tracing::error;

use crate::SharedState;
use feedmix_core::{ContentItem, Error, FeedMetrics, FeedRequest};
use feedmix_telemetry::MetricsSnapshot;

/// Records returned by `/v1/metrics/recent` when no limit is given.
const DEFAULT_RECENT_LIMIT: usize = 50;

pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/feed", get(feed_handler))
        .route("/metrics", get(metrics_handler))
        .route("/metrics/recent", get(recent_metrics_handler))
        .with_state(state)
}

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// A pipeline failure on its way to the client.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            Error::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
            Error::SourceFetch { .. } | Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), error = %self.0, "Feed request failed");
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ── Feed ──────────────────────────────────────────────────────────────────

/// Query parameters for `/v1/feed`.
///
/// Empty values count as absent. Numbers too large for `i64` saturate and
/// are then clamped like any other out-of-range value.
#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub company_id: Option<String>,
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub sponsored_interval: Option<i64>,
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    match raw.trim().parse::<i64>() {
        Ok(n) => Ok(Some(n)),
        Err(e) => match e.kind() {
            IntErrorKind::Empty => Ok(None),
            IntErrorKind::PosOverflow => Ok(Some(i64::MAX)),
            IntErrorKind::NegOverflow => Ok(Some(i64::MIN)),
            _ => Err(serde::de::Error::custom(format!("invalid integer `{raw}`"))),
        },
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponse {
    pub items: Vec<ContentItem>,
    pub count: usize,
}

impl FeedParams {
    fn into_request(self, state: &SharedState) -> FeedRequest {
        let mut request = FeedRequest::new(self.limit.unwrap_or(state.feed.default_limit))
            .with_sponsored_interval(
                self.sponsored_interval
                    .unwrap_or(state.feed.default_sponsored_interval),
            );
        if let Some(company) = self.company_id.filter(|c| !c.is_empty()) {
            request = request.with_company(company);
        }
        if let Some(category) = self.category_id.filter(|c| !c.is_empty()) {
            request = request.with_category(category);
        }
        request
    }
}

async fn feed_handler(
    State(state): State<SharedState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, ApiError> {
    let request = params.into_request(&state);
    let result = state.pipeline.assemble_feed(&request).await?;

    Ok(Json(FeedResponse {
        count: result.len(),
        items: result.into_items(),
    }))
}

// ── Metrics ───────────────────────────────────────────────────────────────

async fn metrics_handler(State(state): State<SharedState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecentMetricsResponse {
    pub count: usize,
    pub records: Vec<FeedMetrics>,
}

async fn recent_metrics_handler(
    State(state): State<SharedState>,
    Query(params): Query<RecentParams>,
) -> Json<RecentMetricsResponse> {
    let records = state
        .metrics
        .recent(params.limit.unwrap_or(DEFAULT_RECENT_LIMIT));
    Json(RecentMetricsResponse {
        count: records.len(),
        records,
    })
}
