//! Maps a damped demand fraction onto an absolute listener baseline.

use crate::models::{DayType, EstimationParameters};

/// Absolute baseline `night_min + damped * (peak - night_min)`.
///
/// `damped_shape` is clamped to `[0, 1]`, so the result always lies in
/// `[night_min, peak]`.
pub fn scale_base(damped_shape: f64, day_type: DayType, params: &EstimationParameters) -> f64 {
    let peak = params.peak_for(day_type);
    let fraction = damped_shape.clamp(0.0, 1.0);
    params.night_min + fraction * (peak - params.night_min)
}
