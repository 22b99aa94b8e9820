//! HTTP handlers for the REST API.
//!
//! Handlers only parse input and shape output; all numbers come from the
//! shared [`ListenerEstimator`](crate::services::ListenerEstimator).

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::{DateTime, FixedOffset, Utc};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    BackfillResponse, EstimateQuery, EstimateResponse, HealthResponse, LiveQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{EstimationParameters, PlaylistEntry};
use crate::services::{backfill, ListenerEstimator};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health & configuration
// =============================================================================

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
    }))
}

/// GET /v1/parameters
///
/// Active estimation parameters, after file and environment overrides.
pub async fn get_parameters(State(state): State<AppState>) -> HandlerResult<EstimationParameters> {
    Ok(Json(state.estimator.params().clone()))
}

// =============================================================================
// Estimation
// =============================================================================

fn require_key(key: Option<String>) -> Result<String, AppError> {
    match key {
        Some(k) if !k.trim().is_empty() => Ok(k),
        _ => Err(AppError::BadRequest(
            "Query parameter 'key' is required".to_string(),
        )),
    }
}

fn parse_instant(at: Option<&str>) -> Result<DateTime<FixedOffset>, AppError> {
    match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid 'at' timestamp '{}': {}", raw, e))),
        None => Ok(Utc::now().fixed_offset()),
    }
}

fn respond(
    estimator: &ListenerEstimator,
    at: &DateTime<FixedOffset>,
    key: String,
    client_ts_ms: Option<i64>,
    debug: bool,
) -> EstimateResponse {
    let estimate = estimator.evaluate(at, &key, client_ts_ms, debug);
    EstimateResponse {
        listeners: estimate.listeners,
        key,
        at: at.with_timezone(&estimator.time_zone()).to_rfc3339(),
        breakdown: estimate.breakdown,
    }
}

/// GET /v1/estimate?key=...&at=...&ts=...&debug=...
pub async fn get_estimate(
    State(state): State<AppState>,
    Query(query): Query<EstimateQuery>,
) -> HandlerResult<EstimateResponse> {
    let key = require_key(query.key)?;
    let at = parse_instant(query.at.as_deref())?;
    Ok(Json(respond(&state.estimator, &at, key, query.ts, query.debug)))
}

/// POST /v1/backfill
///
/// Fill missing `listeners` on the posted records and return them.
pub async fn post_backfill(
    State(state): State<AppState>,
    Json(mut entries): Json<Vec<PlaylistEntry>>,
) -> HandlerResult<BackfillResponse> {
    let report = backfill(&state.estimator, &mut entries);
    tracing::info!(
        updated = report.updated,
        skipped = report.skipped,
        failed = report.failed,
        "Backfill request processed"
    );
    Ok(Json(BackfillResponse { entries, report }))
}

/// GET /v1/live?key=...&ts=...
///
/// Server-sent events: one `estimate` event per live tick for the current
/// instant. With `ts`, live windows follow the client's clock.
pub async fn stream_live(
    State(state): State<AppState>,
    Query(query): Query<LiveQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let key = require_key(query.key)?;
    let estimator = state.estimator.clone();
    let tick = state.live_tick;
    let clock_offset_ms = query
        .ts
        .map(|ts| ts.saturating_sub(Utc::now().timestamp_millis()));

    tracing::debug!(key = %key, tick_secs = tick.as_secs(), "Live stream opened");

    let stream = async_stream::stream! {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            let now = Utc::now().fixed_offset();
            let client_ts_ms =
                clock_offset_ms.map(|offset| now.timestamp_millis().saturating_add(offset));
            let response = respond(&estimator, &now, key.clone(), client_ts_ms, false);
            let data = serde_json::to_string(&response).unwrap_or_default();
            yield Ok(Event::default().event("estimate").data(data));
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}
