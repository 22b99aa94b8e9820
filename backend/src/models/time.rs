use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Number of hours in a civil day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Weekday/weekend classification of a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }

    pub fn is_weekend(self) -> bool {
        self == DayType::Weekend
    }
}

/// An instant decomposed into the inputs the demand model needs.
///
/// The decomposition uses whatever zone the source `DateTime` carries, so
/// callers convert to the reference zone first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Fractional hour of the civil day, in `[0, 24)`.
    pub hour_of_day: f64,
    pub day_type: DayType,
    /// Whole seconds since the Unix epoch.
    pub epoch_seconds: i64,
}

impl TimePoint {
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        let hour_of_day = dt.hour() as f64
            + dt.minute() as f64 / 60.0
            + dt.second() as f64 / 3600.0;
        Self {
            hour_of_day,
            day_type: DayType::from_weekday(dt.weekday()),
            epoch_seconds: dt.timestamp(),
        }
    }
}

/// Wrap an arbitrary hour value into `[0, 24)`.
pub fn wrap_hour(hour: f64) -> f64 {
    let wrapped = hour.rem_euclid(HOURS_PER_DAY);
    // rem_euclid can round up to exactly 24.0 for tiny negative inputs
    if wrapped >= HOURS_PER_DAY {
        0.0
    } else {
        wrapped
    }
}

/// Shortest distance between two hours on the 24h circle, in `[0, 12]`.
pub fn circular_hour_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(HOURS_PER_DAY);
    d.min(HOURS_PER_DAY - d)
}

/// Index of the live window containing `epoch_seconds`.
///
/// Floors toward negative infinity, so instants before the epoch still land
/// in a consistent window.
pub fn live_bucket(epoch_seconds: i64, bucket_seconds: u32) -> i64 {
    epoch_seconds.div_euclid(i64::from(bucket_seconds.max(1)))
}

/// Whole seconds of a client-supplied millisecond timestamp.
pub fn client_epoch_seconds(client_ts_ms: i64) -> i64 {
    client_ts_ms.div_euclid(1000)
}
