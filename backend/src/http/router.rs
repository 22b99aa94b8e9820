//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Widgets embed the count from arbitrary origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/parameters", get(handlers::get_parameters))
        .route("/estimate", get(handlers::get_estimate))
        .route("/backfill", post(handlers::post_backfill))
        .route("/live", get(handlers::stream_live));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::dto::EstimateResponse;
    use crate::models::EstimationParameters;
    use crate::services::ListenerEstimator;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::DateTime;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn router_with(params: EstimationParameters) -> (Router, Arc<ListenerEstimator>) {
        let estimator = Arc::new(ListenerEstimator::new(params).unwrap());
        let state = AppState::new(estimator.clone(), Duration::from_secs(5));
        (create_router(state), estimator)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_route() {
        let (app, _) = router_with(EstimationParameters::default());
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_estimate_without_key_is_bad_request() {
        let (app, _) = router_with(EstimationParameters::default());
        let response = app.oneshot(get("/v1/estimate")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_live_first_event_matches_engine() {
        // One live window spans the whole test run, so the bucket picked from
        // the client offset is known regardless of scheduling delays.
        let (app, estimator) = router_with(EstimationParameters {
            live_bucket_seconds: u32::MAX,
            ..Default::default()
        });
        let response = app
            .oneshot(get("/v1/live?key=Elan%7CKaskader&ts=1000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let mut body = response.into_body().into_data_stream();
        let mut buffer = String::new();
        while !buffer.contains("\n\n") {
            let chunk = body.next().await.unwrap().unwrap();
            buffer.push_str(std::str::from_utf8(&chunk).unwrap());
        }

        assert!(buffer.contains("event: estimate"), "unexpected frame: {}", buffer);
        let data = buffer
            .lines()
            .find_map(|line| line.strip_prefix("data: "))
            .unwrap();
        let event: EstimateResponse = serde_json::from_str(data).unwrap();
        assert_eq!(event.key, "Elan|Kaskader");

        let at = DateTime::parse_from_rfc3339(&event.at).unwrap();
        assert_eq!(event.listeners, estimator.estimate(&at, &event.key, Some(1_000)));
    }
}
