//! Night trough, evening tail and daily ripple applied on top of the diurnal
//! shape.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::models::{circular_hour_distance, EstimationParameters, HOURS_PER_DAY};

/// Smallest damped shape value handed to the scale mapper.
pub const DAMPED_FLOOR: f64 = 1e-3;

/// Multiplicative suppression around `night_center_hour`, in `[0, 1]`.
pub fn night_depressor(hour: f64, params: &EstimationParameters) -> f64 {
    let d = circular_hour_distance(hour, params.night_center_hour);
    let z = d / params.night_width;
    let valley = (-0.5 * z * z).exp();
    (1.0 - params.night_strength * valley)
        .clamp(0.0, 1.0)
        .powf(params.night_power)
}

/// Logistic drop-off after `evening_tail_start_hour`, in
/// `[1 - evening_tail_strength, 1]`.
///
/// The ramp runs on the plain hour, not the 24h circle: it only acts from the
/// start hour up to midnight and resets to ~1 at 00:00. Past midnight the
/// night depressor takes over.
pub fn evening_tail(hour: f64, params: &EstimationParameters) -> f64 {
    let x = params.evening_tail_slope * (hour - params.evening_tail_start_hour);
    let sigmoid = 1.0 / (1.0 + (-x).exp());
    1.0 - params.evening_tail_strength * sigmoid
}

/// Small sinusoidal ripple around 1.
pub fn wobble(hour: f64, params: &EstimationParameters) -> f64 {
    1.0 + params.wobble_amplitude * (2.0 * PI * hour / HOURS_PER_DAY + params.wobble_phase).sin()
}

/// Per-stage factors and the combined damped shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Damping {
    pub night_depressor: f64,
    pub evening_tail: f64,
    pub wobble: f64,
    /// Product of the three factors, clamped to `[DAMPED_FLOOR, 1]`.
    pub factor: f64,
    /// `shape * factor`, clamped to `[DAMPED_FLOOR, 1]`.
    pub damped_shape: f64,
}

/// Apply every damping stage to a normalized `shape` value.
pub fn damp(shape: f64, hour: f64, params: &EstimationParameters) -> Damping {
    let night_depressor = night_depressor(hour, params);
    let evening_tail = evening_tail(hour, params);
    let wobble = wobble(hour, params);

    let factor = (night_depressor * evening_tail * wobble).clamp(DAMPED_FLOOR, 1.0);
    let damped_shape = (shape * factor).clamp(DAMPED_FLOOR, 1.0);

    Damping {
        night_depressor,
        evening_tail,
        wobble,
        factor,
        damped_shape,
    }
}
