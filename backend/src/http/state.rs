//! Application state for the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::services::ListenerEstimator;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Estimator built from the startup parameters
    pub estimator: Arc<ListenerEstimator>,
    /// Interval between live stream events
    pub live_tick: Duration,
}

impl AppState {
    /// Create a new application state around `estimator`.
    pub fn new(estimator: Arc<ListenerEstimator>, live_tick: Duration) -> Self {
        Self {
            estimator,
            live_tick,
        }
    }
}
