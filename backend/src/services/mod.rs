//! Estimation pipeline.
//!
//! Each stage lives in its own module; [`estimator`] composes them into the
//! public entry point and [`backfill`] applies it to historical records.

pub mod backfill;
pub mod damping;
pub mod diurnal;
pub mod estimator;
pub mod jitter;
pub mod scale;

pub use backfill::{backfill, BackfillReport};
pub use estimator::{Estimate, EstimateBreakdown, ListenerEstimator};
