//! Diurnal demand silhouette.
//!
//! The raw shape is a sum of Gaussian bumps per day type. It is sampled once
//! on a 5-minute grid, min-max normalized to `[0, 1]`, and cached for the
//! lifetime of the process. Queries snap to the nearest grid point.

use std::sync::OnceLock;

use crate::models::{wrap_hour, DayType, HOURS_PER_DAY};

/// Grid points per hour (5-minute resolution).
pub const GRID_STEPS_PER_HOUR: usize = 12;

/// Number of grid points covering `0h..=24h`.
pub const GRID_LEN: usize = 24 * GRID_STEPS_PER_HOUR + 1;

/// One Gaussian demand bump: `amplitude * exp(-0.5 * ((h - center) / width)^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bump {
    pub center: f64,
    pub width: f64,
    pub amplitude: f64,
}

impl Bump {
    pub const fn new(center: f64, width: f64, amplitude: f64) -> Self {
        Self {
            center,
            width,
            amplitude,
        }
    }

    pub fn at(&self, hour: f64) -> f64 {
        let z = (hour - self.center) / self.width;
        self.amplitude * (-0.5 * z * z).exp()
    }
}

/// Strong morning and afternoon drive-time peaks, smaller midday and evening.
pub const WEEKDAY_BUMPS: [Bump; 4] = [
    Bump::new(7.8, 1.2, 0.90),
    Bump::new(12.5, 1.3, 0.45),
    Bump::new(17.3, 1.3, 0.85),
    Bump::new(20.5, 1.8, 0.35),
];

/// Late start, broad afternoon, moderate early evening.
pub const WEEKEND_BUMPS: [Bump; 3] = [
    Bump::new(10.0, 1.7, 0.35),
    Bump::new(14.0, 2.0, 0.95),
    Bump::new(19.5, 2.0, 0.55),
];

pub fn bumps_for(day_type: DayType) -> &'static [Bump] {
    match day_type {
        DayType::Weekday => &WEEKDAY_BUMPS,
        DayType::Weekend => &WEEKEND_BUMPS,
    }
}

/// Unnormalized shape value at `hour`.
pub fn raw_shape(bumps: &[Bump], hour: f64) -> f64 {
    bumps.iter().map(|b| b.at(hour)).sum()
}

/// Hour value of grid point `index`.
pub fn grid_hour(index: usize) -> f64 {
    index as f64 / GRID_STEPS_PER_HOUR as f64
}

/// Min-max normalized shape samples on the 5-minute grid.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationTable {
    values: Vec<f64>,
}

impl NormalizationTable {
    /// Sample `bumps` over the full day and normalize.
    pub fn build(bumps: &[Bump]) -> Self {
        let samples = (0..GRID_LEN).map(|i| raw_shape(bumps, grid_hour(i))).collect();
        Self::from_samples(samples)
    }

    /// Normalize raw samples to `[0, 1]`.
    ///
    /// A constant (or empty) sample set normalizes to all zeros.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        let values = if range > 0.0 && range.is_finite() {
            samples.iter().map(|v| (v - min) / range).collect()
        } else {
            vec![0.0; samples.len()]
        };
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Normalized value at the grid point nearest to `hour`.
    pub fn lookup(&self, hour: f64) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let steps = (self.values.len() - 1) as f64 / HOURS_PER_DAY;
        let index = (wrap_hour(hour) * steps).round() as usize;
        self.values[index.min(self.values.len() - 1)]
    }
}

static WEEKDAY_TABLE: OnceLock<NormalizationTable> = OnceLock::new();
static WEEKEND_TABLE: OnceLock<NormalizationTable> = OnceLock::new();

/// Process-wide table for `day_type`, built on first use.
pub fn table_for(day_type: DayType) -> &'static NormalizationTable {
    let cell = match day_type {
        DayType::Weekday => &WEEKDAY_TABLE,
        DayType::Weekend => &WEEKEND_TABLE,
    };
    cell.get_or_init(|| {
        log::debug!("Building {:?} normalization table ({} points)", day_type, GRID_LEN);
        NormalizationTable::build(bumps_for(day_type))
    })
}

/// Normalized diurnal demand fraction in `[0, 1]`.
pub fn shape_value(hour: f64, day_type: DayType) -> f64 {
    table_for(day_type).lookup(hour)
}
