//! Listener estimator: the single public entry point of the demand model.
//!
//! ```text
//! instant ──► TimePoint ──► diurnal shape ──► damping ──► scale ──► base
//!                 │                                                  │
//!                 └──► live bucket ──► jitter(identity, bucket) ─────┴──► clamp ──► count
//! ```
//!
//! Every call is a pure function of its arguments, the immutable
//! [`EstimationParameters`] and the process-wide normalization tables.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::damping::damp;
use super::diurnal::shape_value;
use super::jitter::{deterministic_jitter, seed_fingerprint};
use super::scale::scale_base;
use crate::error::{EstimationError, Result};
use crate::models::{client_epoch_seconds, live_bucket, DayType, EstimationParameters, TimePoint};

/// Intermediate values of one estimation, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub hour_of_day: f64,
    pub day_type: DayType,
    pub shape: f64,
    pub night_depressor: f64,
    pub evening_tail: f64,
    pub wobble: f64,
    pub damped_shape: f64,
    pub base: f64,
    pub live_bucket: i64,
    /// Fingerprint of the live jitter seed.
    pub live_seed: String,
    pub live_jitter: f64,
    pub drift_jitter: f64,
    /// Total jitter fraction actually applied.
    pub jitter: f64,
    pub floor: u32,
    pub peak: u32,
    pub value: u32,
}

/// Final listener count, with the breakdown when requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub listeners: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<EstimateBreakdown>,
}

/// Seed of the per-window jitter component.
pub fn live_seed(identity_key: &str, bucket: i64) -> String {
    format!("live::{}::{}", identity_key, bucket)
}

/// Seed of the per-track drift component.
pub fn drift_seed(identity_key: &str) -> String {
    format!("drift::{}", identity_key)
}

/// Deterministic listener estimator.
///
/// Cheap to share: wrap it in an `Arc` and call it from any thread.
#[derive(Debug, Clone)]
pub struct ListenerEstimator {
    params: EstimationParameters,
}

impl ListenerEstimator {
    /// Create an estimator, rejecting invalid parameters up front.
    pub fn new(params: EstimationParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &EstimationParameters {
        &self.params
    }

    pub fn time_zone(&self) -> Tz {
        self.params.time_zone
    }

    /// Listener count for `at`.
    ///
    /// `at` may carry any zone; it is converted to the reference zone before
    /// the civil hour and day type are derived. `client_ts_ms`, when given,
    /// selects the live window instead of `at`.
    pub fn estimate<Z: TimeZone>(
        &self,
        at: &DateTime<Z>,
        identity_key: &str,
        client_ts_ms: Option<i64>,
    ) -> u32 {
        self.breakdown(at, identity_key, client_ts_ms).value
    }

    /// Like [`estimate`](Self::estimate), optionally keeping the breakdown.
    pub fn evaluate<Z: TimeZone>(
        &self,
        at: &DateTime<Z>,
        identity_key: &str,
        client_ts_ms: Option<i64>,
        debug: bool,
    ) -> Estimate {
        let breakdown = self.breakdown(at, identity_key, client_ts_ms);
        Estimate {
            listeners: breakdown.value,
            breakdown: debug.then_some(breakdown),
        }
    }

    /// Run the full pipeline and return every intermediate value.
    pub fn breakdown<Z: TimeZone>(
        &self,
        at: &DateTime<Z>,
        identity_key: &str,
        client_ts_ms: Option<i64>,
    ) -> EstimateBreakdown {
        let p = &self.params;
        let local = at.with_timezone(&p.time_zone);
        let tp = TimePoint::from_datetime(&local);

        let shape = shape_value(tp.hour_of_day, tp.day_type);
        let damping = damp(shape, tp.hour_of_day, p);
        let base = scale_base(damping.damped_shape, tp.day_type, p);

        let effective_seconds = client_ts_ms
            .map(client_epoch_seconds)
            .unwrap_or(tp.epoch_seconds);
        let bucket = live_bucket(effective_seconds, p.live_bucket_seconds);

        let live_seed = live_seed(identity_key, bucket);
        let live_jitter = deterministic_jitter(&live_seed, p.jitter_sigma, p.jitter_clip);
        let drift_jitter =
            deterministic_jitter(&drift_seed(identity_key), p.drift_sigma, p.jitter_clip);
        let jitter = ((1.0 + live_jitter) * (1.0 + drift_jitter) - 1.0)
            .clamp(-p.jitter_clip, p.jitter_clip);

        let (floor, peak) = p.integer_bounds(tp.day_type);
        let value = (base * (1.0 + jitter))
            .round()
            .clamp(f64::from(floor), f64::from(peak)) as u32;

        log::trace!(
            "estimate key={} hour={:.3} bucket={} base={:.1} jitter={:.4} value={}",
            identity_key,
            tp.hour_of_day,
            bucket,
            base,
            jitter,
            value
        );

        EstimateBreakdown {
            hour_of_day: tp.hour_of_day,
            day_type: tp.day_type,
            shape,
            night_depressor: damping.night_depressor,
            evening_tail: damping.evening_tail,
            wobble: damping.wobble,
            damped_shape: damping.damped_shape,
            base,
            live_bucket: bucket,
            live_seed: seed_fingerprint(&live_seed),
            live_jitter,
            drift_jitter,
            jitter,
            floor,
            peak,
            value,
        }
    }

    /// Estimate for an instant given as Unix epoch milliseconds.
    pub fn estimate_at_epoch_ms(
        &self,
        epoch_ms: i64,
        identity_key: &str,
        client_ts_ms: Option<i64>,
        debug: bool,
    ) -> Result<Estimate> {
        let at: DateTime<Utc> = DateTime::from_timestamp_millis(epoch_ms)
            .ok_or(EstimationError::InvalidTimestamp(epoch_ms))?;
        Ok(self.evaluate(&at, identity_key, client_ts_ms, debug))
    }

    /// Estimate for a naive civil date/time in the reference zone.
    pub fn estimate_civil(
        &self,
        civil: NaiveDateTime,
        identity_key: &str,
        client_ts_ms: Option<i64>,
    ) -> Result<u32> {
        let at = self.localize(civil)?;
        Ok(self.estimate(&at, identity_key, client_ts_ms))
    }

    /// Attach the reference zone to a civil date/time.
    ///
    /// Ambiguous wall-clock times (DST fall-back) pick the earlier instant;
    /// times inside a DST gap move forward one hour.
    pub fn localize(&self, civil: NaiveDateTime) -> Result<DateTime<Tz>> {
        let tz = self.params.time_zone;
        tz.from_local_datetime(&civil)
            .earliest()
            .or_else(|| {
                tz.from_local_datetime(&(civil + Duration::hours(1)))
                    .earliest()
            })
            .ok_or_else(|| {
                EstimationError::InvalidCivilTime(format!("{} in {}", civil, tz.name()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};
    use chrono_tz::Europe::Bratislava;

    fn estimator() -> ListenerEstimator {
        ListenerEstimator::new(EstimationParameters::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_params() {
        let params = EstimationParameters {
            weekday_peak: 100.0,
            ..Default::default()
        };
        assert!(ListenerEstimator::new(params).is_err());
    }

    #[test]
    fn test_estimate_within_bounds() {
        let est = estimator();
        // 2025-10-15 is a Wednesday
        let at = Bratislava.with_ymd_and_hms(2025, 10, 15, 8, 0, 0).unwrap();
        let value = est.estimate(&at, "Elán|Voda|15.10.2025|08:00", None);
        assert!((180..=3200).contains(&value));
    }

    #[test]
    fn test_zone_is_normalized_before_decomposition() {
        let est = estimator();
        let local = Bratislava.with_ymd_and_hms(2025, 10, 15, 17, 20, 0).unwrap();
        let utc = local.with_timezone(&Utc);
        assert_eq!(est.breakdown(&local, "k", None), est.breakdown(&utc, "k", None));
        assert!((est.breakdown(&utc, "k", None).hour_of_day - (17.0 + 20.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_client_timestamp_selects_bucket() {
        let est = estimator();
        let at = Bratislava.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap();
        let b = est.breakdown(&at, "k", Some(61_999));
        // 61.999 s floors to 61 s, bucket 61 / 30 = 2
        assert_eq!(b.live_bucket, 2);

        let b = est.breakdown(&at, "k", None);
        assert_eq!(b.live_bucket, at.timestamp().div_euclid(30));
    }

    #[test]
    fn test_evaluate_debug_toggle() {
        let est = estimator();
        let at = Bratislava.with_ymd_and_hms(2025, 10, 18, 14, 0, 0).unwrap();
        let plain = est.evaluate(&at, "k", None, false);
        let debug = est.evaluate(&at, "k", None, true);
        assert!(plain.breakdown.is_none());
        let breakdown = debug.breakdown.unwrap();
        assert_eq!(breakdown.value, plain.listeners);
        assert_eq!(breakdown.day_type, DayType::Weekend);
        assert_eq!(breakdown.peak, 2000);
        assert_eq!(breakdown.floor, 180);
    }

    #[test]
    fn test_breakdown_serializes_without_none() {
        let est = estimator();
        let json = serde_json::to_value(est.estimate_at_epoch_ms(0, "k", None, false).unwrap())
            .unwrap();
        assert!(json.get("breakdown").is_none());
        assert!(json["listeners"].is_u64());
    }

    #[test]
    fn test_drift_component() {
        let params = EstimationParameters {
            jitter_sigma: 0.0,
            drift_sigma: 0.05,
            ..Default::default()
        };
        let est = ListenerEstimator::new(params).unwrap();
        let at = Bratislava.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap();
        let a = est.breakdown(&at, "track", Some(0));
        let b = est.breakdown(&at, "track", Some(3_600_000));
        // drift does not depend on the live window
        assert_ne!(a.live_bucket, b.live_bucket);
        assert_eq!(a.drift_jitter, b.drift_jitter);
        assert_eq!(a.value, b.value);
        assert_eq!(a.live_jitter, 0.0);
    }

    #[test]
    fn test_epoch_ms_out_of_range() {
        let est = estimator();
        assert_eq!(
            est.estimate_at_epoch_ms(i64::MAX, "k", None, false),
            Err(EstimationError::InvalidTimestamp(i64::MAX))
        );
    }

    #[test]
    fn test_localize_dst_gap_moves_forward() {
        let est = estimator();
        // 2025-03-30 02:30 does not exist in Central Europe
        let civil = NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let at = est.localize(civil).unwrap();
        assert_eq!((at.hour(), at.minute()), (3, 30));
    }

    #[test]
    fn test_localize_ambiguous_picks_earlier() {
        let est = estimator();
        // 2025-10-26 02:30 happens twice; the first one is still CEST
        let civil = NaiveDate::from_ymd_opt(2025, 10, 26)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let at = est.localize(civil).unwrap();
        assert_eq!(at.with_timezone(&Utc).hour(), 0);
    }

    #[test]
    fn test_estimate_civil_matches_zoned() {
        let est = estimator();
        let civil = NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(9, 45, 0)
            .unwrap();
        let zoned = Bratislava.with_ymd_and_hms(2025, 10, 15, 9, 45, 0).unwrap();
        assert_eq!(
            est.estimate_civil(civil, "k", Some(1_000)).unwrap(),
            est.estimate(&zoned, "k", Some(1_000))
        );
    }
}
