//! Environment variable overrides.

use std::str::FromStr;

use chrono_tz::Tz;

use super::file::ServerSettings;
use crate::error::{EstimationError, Result};
use crate::models::EstimationParameters;

/// Explicit path of the TOML configuration file.
pub const CONFIG_PATH_VAR: &str = "MELODY_CONFIG";

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
            EstimationError::invalid_parameter(key, format!("cannot parse '{}': {}", raw, e))
        }),
    }
}

fn set<T, F>(target: &mut T, lookup: &F, key: &str) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = parse_var(lookup, key)? {
        *target = value;
    }
    Ok(())
}

/// Overwrite estimation parameters from the environment.
///
/// # Environment Variables
/// - `WEEKDAY_PEAK`, `WEEKEND_PEAK`, `NIGHT_MIN`
/// - `NIGHT_CENTER_HOUR`, `NIGHT_WIDTH`, `NIGHT_STRENGTH`, `NIGHT_POWER`
/// - `EVENING_TAIL_START_HOUR`, `EVENING_TAIL_STRENGTH`, `EVENING_TAIL_SLOPE`
/// - `WOBBLE_AMPLITUDE`, `WOBBLE_PHASE`
/// - `JITTER_SIGMA`, `JITTER_CLIP`, `DRIFT_SIGMA`, `LIVE_BUCKET_SECONDS`
/// - `MELODY_TZ`: IANA zone name (e.g. `Europe/Bratislava`)
///
/// Unset or blank variables leave the current value alone.
///
/// # Errors
/// Returns `InvalidParameter` naming the variable if a value does not parse.
/// Range checks are left to [`EstimationParameters::validate`].
pub fn apply_overrides<F>(params: &mut EstimationParameters, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    set(&mut params.weekday_peak, &lookup, "WEEKDAY_PEAK")?;
    set(&mut params.weekend_peak, &lookup, "WEEKEND_PEAK")?;
    set(&mut params.night_min, &lookup, "NIGHT_MIN")?;
    set(&mut params.night_center_hour, &lookup, "NIGHT_CENTER_HOUR")?;
    set(&mut params.night_width, &lookup, "NIGHT_WIDTH")?;
    set(&mut params.night_strength, &lookup, "NIGHT_STRENGTH")?;
    set(&mut params.night_power, &lookup, "NIGHT_POWER")?;
    set(&mut params.evening_tail_start_hour, &lookup, "EVENING_TAIL_START_HOUR")?;
    set(&mut params.evening_tail_strength, &lookup, "EVENING_TAIL_STRENGTH")?;
    set(&mut params.evening_tail_slope, &lookup, "EVENING_TAIL_SLOPE")?;
    set(&mut params.wobble_amplitude, &lookup, "WOBBLE_AMPLITUDE")?;
    set(&mut params.wobble_phase, &lookup, "WOBBLE_PHASE")?;
    set(&mut params.jitter_sigma, &lookup, "JITTER_SIGMA")?;
    set(&mut params.jitter_clip, &lookup, "JITTER_CLIP")?;
    set(&mut params.drift_sigma, &lookup, "DRIFT_SIGMA")?;
    set(&mut params.live_bucket_seconds, &lookup, "LIVE_BUCKET_SECONDS")?;
    set::<Tz, _>(&mut params.time_zone, &lookup, "MELODY_TZ")?;
    Ok(())
}

/// Overwrite server settings from `HOST`, `PORT` and `LIVE_TICK_SECONDS`.
pub fn apply_server_overrides<F>(server: &mut ServerSettings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    set(&mut server.host, &lookup, "HOST")?;
    set(&mut server.port, &lookup, "PORT")?;
    set(&mut server.live_tick_seconds, &lookup, "LIVE_TICK_SECONDS")?;
    if server.live_tick_seconds == 0 {
        return Err(EstimationError::invalid_parameter(
            "LIVE_TICK_SECONDS",
            "must be at least 1",
        ));
    }
    Ok(())
}
