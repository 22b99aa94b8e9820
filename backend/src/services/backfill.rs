//! Fill missing listener counts on historical playlist records.

use serde::{Deserialize, Serialize};

use super::estimator::ListenerEstimator;
use crate::models::PlaylistEntry;

/// Outcome of a backfill pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillReport {
    /// Records that received a fresh estimate.
    pub updated: usize,
    /// Records that already carried a count.
    pub skipped: usize,
    /// Records whose date or time could not be parsed.
    pub failed: usize,
}

/// Estimate `listeners` for every record that lacks one.
///
/// Historical records have no client timestamp, so the live window comes from
/// the record's own play time and repeated runs produce the same numbers.
/// Unparseable records are logged and counted, never fatal.
pub fn backfill(estimator: &ListenerEstimator, entries: &mut [PlaylistEntry]) -> BackfillReport {
    let mut report = BackfillReport::default();

    for entry in entries.iter_mut() {
        if !entry.needs_listeners() {
            report.skipped += 1;
            continue;
        }

        let estimate = entry
            .civil_time()
            .and_then(|civil| estimator.estimate_civil(civil, &entry.identity_key(), None));

        match estimate {
            Ok(listeners) => {
                entry.listeners = Some(listeners);
                report.updated += 1;
            }
            Err(e) => {
                log::warn!("Skipping playlist record: {}", e);
                report.failed += 1;
            }
        }
    }

    log::info!(
        "Backfill finished: {} updated, {} skipped, {} failed",
        report.updated,
        report.skipped,
        report.failed
    );
    report
}
