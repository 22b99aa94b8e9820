//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, TimeZone};
use chrono_tz::{Europe::Bratislava, Tz};
use melody_listeners::models::EstimationParameters;
use melody_listeners::services::ListenerEstimator;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with the listed environment variables set (`Some`) or removed
/// (`None`), restoring the previous values afterwards, even on panic.
///
/// Access is serialized because the environment is process-global and tests
/// run in parallel.
pub fn with_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvRestore::apply(vars);
    f()
}

struct EnvRestore {
    saved: Vec<(String, Option<String>)>,
}

impl EnvRestore {
    fn apply(vars: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = vars.iter().map(|(k, _)| *k).collect();
        let saved = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }
        Self { saved }
    }
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (k, v) in self.saved.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Estimator with default parameters.
pub fn default_estimator() -> ListenerEstimator {
    ListenerEstimator::new(EstimationParameters::default()).expect("defaults are valid")
}

/// Wednesday 2025-10-15 at `hour:minute` in Bratislava.
pub fn weekday_at(hour: u32, minute: u32) -> DateTime<Tz> {
    Bratislava
        .with_ymd_and_hms(2025, 10, 15, hour, minute, 0)
        .unwrap()
}

/// Saturday 2025-10-18 at `hour:minute` in Bratislava.
pub fn weekend_at(hour: u32, minute: u32) -> DateTime<Tz> {
    Bratislava
        .with_ymd_and_hms(2025, 10, 18, hour, minute, 0)
        .unwrap()
}
