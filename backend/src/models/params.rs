//! Tunable constants of the listener estimation model.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::time::{DayType, HOURS_PER_DAY};
use crate::error::{EstimationError, Result};

/// Immutable configuration bundle for the estimator.
///
/// Every field has a documented default and can be overridden from a TOML
/// file or the environment (see [`crate::config`]). Build once at startup and
/// call [`EstimationParameters::validate`] before handing it to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationParameters {
    /// Upper demand bound on Monday..Friday.
    pub weekday_peak: f64,
    /// Upper demand bound on Saturday and Sunday.
    pub weekend_peak: f64,
    /// Absolute floor of every estimate.
    pub night_min: f64,
    /// Civil hour of the deepest nocturnal trough.
    pub night_center_hour: f64,
    /// Gaussian width (hours) of the trough.
    pub night_width: f64,
    /// Depth of the trough in `[0, 1]`.
    pub night_strength: f64,
    /// Exponent applied to the depressor; values above 1 sharpen the trough.
    pub night_power: f64,
    /// Midpoint hour of the late-evening listener drop.
    pub evening_tail_start_hour: f64,
    /// Fraction of listeners lost once the evening tail has fully kicked in.
    pub evening_tail_strength: f64,
    /// Logistic slope (per hour) of the evening tail.
    pub evening_tail_slope: f64,
    /// Relative amplitude of the daily sinusoidal ripple.
    pub wobble_amplitude: f64,
    /// Phase offset (radians) of the ripple.
    pub wobble_phase: f64,
    /// Standard deviation of the live jitter, as a fraction of the base.
    pub jitter_sigma: f64,
    /// Hard bound on the total jitter fraction.
    pub jitter_clip: f64,
    /// Standard deviation of the per-track drift; 0 disables it.
    pub drift_sigma: f64,
    /// Width of a live window in seconds.
    pub live_bucket_seconds: u32,
    /// Reference zone for civil time.
    pub time_zone: Tz,
}

impl Default for EstimationParameters {
    fn default() -> Self {
        Self {
            weekday_peak: 3200.0,
            weekend_peak: 2000.0,
            night_min: 180.0,
            night_center_hour: 2.5,
            night_width: 2.0,
            night_strength: 0.8,
            night_power: 2.0,
            evening_tail_start_hour: 21.5,
            evening_tail_strength: 0.35,
            evening_tail_slope: 1.5,
            wobble_amplitude: 0.03,
            wobble_phase: 0.0,
            jitter_sigma: 0.05,
            jitter_clip: 0.10,
            drift_sigma: 0.0,
            live_bucket_seconds: 30,
            time_zone: chrono_tz::Europe::Bratislava,
        }
    }
}

impl EstimationParameters {
    /// Upper demand bound for the given day type.
    pub fn peak_for(&self, day_type: DayType) -> f64 {
        match day_type {
            DayType::Weekday => self.weekday_peak,
            DayType::Weekend => self.weekend_peak,
        }
    }

    /// Integer bounds `[ceil(night_min), floor(peak)]` of a final estimate.
    pub fn integer_bounds(&self, day_type: DayType) -> (u32, u32) {
        let floor = self.night_min.ceil() as u32;
        let peak = self.peak_for(day_type).floor() as u32;
        (floor, peak.max(floor))
    }

    /// Check every invariant of the bundle.
    ///
    /// Malformed parameters are a startup error; the engine never re-checks
    /// them at call time.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("weekday_peak", self.weekday_peak),
            ("weekend_peak", self.weekend_peak),
            ("night_min", self.night_min),
            ("night_center_hour", self.night_center_hour),
            ("night_width", self.night_width),
            ("night_strength", self.night_strength),
            ("night_power", self.night_power),
            ("evening_tail_start_hour", self.evening_tail_start_hour),
            ("evening_tail_strength", self.evening_tail_strength),
            ("evening_tail_slope", self.evening_tail_slope),
            ("wobble_amplitude", self.wobble_amplitude),
            ("wobble_phase", self.wobble_phase),
            ("jitter_sigma", self.jitter_sigma),
            ("jitter_clip", self.jitter_clip),
            ("drift_sigma", self.drift_sigma),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(EstimationError::invalid_parameter(name, "must be finite"));
            }
        }

        if self.night_min < 0.0 {
            return Err(EstimationError::invalid_parameter(
                "night_min",
                "must be non-negative",
            ));
        }
        if self.night_min > f64::from(u32::MAX) {
            return Err(EstimationError::invalid_parameter(
                "night_min",
                "exceeds the representable listener range",
            ));
        }
        for (name, peak) in [
            ("weekday_peak", self.weekday_peak),
            ("weekend_peak", self.weekend_peak),
        ] {
            if peak <= self.night_min {
                return Err(EstimationError::invalid_parameter(
                    name,
                    format!("must be greater than night_min ({})", self.night_min),
                ));
            }
            if peak.floor() < self.night_min.ceil() {
                return Err(EstimationError::invalid_parameter(
                    name,
                    "leaves no integer between night_min and the peak",
                ));
            }
            if peak > f64::from(u32::MAX) {
                return Err(EstimationError::invalid_parameter(
                    name,
                    "exceeds the representable listener range",
                ));
            }
        }

        check_hour("night_center_hour", self.night_center_hour)?;
        check_hour("evening_tail_start_hour", self.evening_tail_start_hour)?;

        if self.night_width <= 0.0 {
            return Err(EstimationError::invalid_parameter(
                "night_width",
                "must be positive",
            ));
        }
        if self.night_power <= 0.0 {
            return Err(EstimationError::invalid_parameter(
                "night_power",
                "must be positive",
            ));
        }
        check_unit("night_strength", self.night_strength)?;
        check_unit("evening_tail_strength", self.evening_tail_strength)?;

        if !(0.0..1.0).contains(&self.wobble_amplitude) {
            return Err(EstimationError::invalid_parameter(
                "wobble_amplitude",
                "must be in [0, 1)",
            ));
        }
        if !(0.0..1.0).contains(&self.jitter_clip) {
            return Err(EstimationError::invalid_parameter(
                "jitter_clip",
                "must be in [0, 1)",
            ));
        }
        if self.jitter_sigma < 0.0 {
            return Err(EstimationError::invalid_parameter(
                "jitter_sigma",
                "must be non-negative",
            ));
        }
        if self.drift_sigma < 0.0 {
            return Err(EstimationError::invalid_parameter(
                "drift_sigma",
                "must be non-negative",
            ));
        }
        if self.live_bucket_seconds == 0 {
            return Err(EstimationError::invalid_parameter(
                "live_bucket_seconds",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

fn check_hour(name: &str, value: f64) -> Result<()> {
    if (0.0..HOURS_PER_DAY).contains(&value) {
        Ok(())
    } else {
        Err(EstimationError::invalid_parameter(name, "must be in [0, 24)"))
    }
}

fn check_unit(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EstimationError::invalid_parameter(name, "must be in [0, 1]"))
    }
}
