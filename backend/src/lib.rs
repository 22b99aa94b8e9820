//! # Melody Listeners
//!
//! Deterministic synthetic listener estimates for a radio stream.
//!
//! There is no audience measurement feed behind the station's "now playing"
//! page, so this crate produces a number that behaves like one: it follows a
//! diurnal demand curve, drops at night, moves smoothly between requests and
//! is fully reproducible from `(time, identity key)` across processes.
//!
//! ## Features
//!
//! - **Diurnal model**: weekday/weekend Gaussian demand silhouettes,
//!   normalized on a 5-minute grid and cached per process
//! - **Damping**: night trough, late-evening tail and a small daily ripple
//! - **Deterministic jitter**: SHA-256 seeded Box–Muller noise, bucketed into
//!   live windows so a UI sees a stable value that still changes over time
//! - **Backfill**: fill missing counts on historical playlist records
//! - **HTTP API**: REST + server-sent events (feature `http-server`)
//!
//! ## Architecture
//!
//! - [`models`]: time decomposition, parameters, playlist records
//! - [`services`]: the estimation pipeline and backfill
//! - [`config`]: TOML + environment configuration
//! - [`error`]: error types
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```
//! use chrono::TimeZone;
//! use chrono_tz::Europe::Bratislava;
//! use melody_listeners::models::EstimationParameters;
//! use melody_listeners::services::ListenerEstimator;
//!
//! let estimator = ListenerEstimator::new(EstimationParameters::default()).unwrap();
//! let at = Bratislava.with_ymd_and_hms(2025, 10, 15, 17, 20, 0).unwrap();
//! let key = "Elán|Kaskadér|15.10.2025|17:20";
//!
//! let listeners = estimator.estimate(&at, key, None);
//! assert!((180..=3200).contains(&listeners));
//! assert_eq!(listeners, estimator.estimate(&at, key, None));
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{EstimationError, Result};
