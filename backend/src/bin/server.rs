//! Melody listeners HTTP server binary.
//!
//! Resolves the estimation parameters, builds the estimator once and serves
//! it over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin melody-server
//!
//! # Tighter jitter, explicit config file
//! MELODY_CONFIG=listeners.toml JITTER_SIGMA=0.04 cargo run --bin melody-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `LIVE_TICK_SECONDS`: Interval of the live event stream (default: 5)
//! - `MELODY_CONFIG`: Path of a TOML configuration file
//! - `RUST_LOG`: Log level (default: info)
//! - Estimation overrides: see `melody_listeners::config::env`

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use melody_listeners::config::Settings;
use melody_listeners::http::{create_router, AppState};
use melody_listeners::services::ListenerEstimator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting melody listeners server");

    let settings = Settings::load()?;
    let params = &settings.estimation;
    info!(
        weekday_peak = params.weekday_peak,
        weekend_peak = params.weekend_peak,
        night_min = params.night_min,
        jitter_sigma = params.jitter_sigma,
        live_bucket_seconds = params.live_bucket_seconds,
        time_zone = %params.time_zone.name(),
        "Estimation parameters resolved"
    );

    let estimator = Arc::new(ListenerEstimator::new(settings.estimation.clone())?);
    let state = AppState::new(
        estimator,
        Duration::from_secs(settings.server.live_tick_seconds),
    );
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
