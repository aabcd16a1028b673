//! Seeded synthetic occupancy history for demos and tests.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Deserialize;

use crate::analytics::forecast::next_full_hour;
use crate::analytics::records::{MAX_TRAFFIC_INDEX, OccupancyRecord};
use crate::space::SpaceInfo;

/// Seed stride between spaces so their noise streams are uncorrelated.
const SPACE_SEED_STRIDE: u64 = 7919;

/// First and last (exclusive) hour a space is normally open.
const OPEN_HOUR: u32 = 8;
const CLOSE_HOUR: u32 = 20;

/// Load multiplier on Saturdays and Sundays.
const WEEKEND_FACTOR: f64 = 0.4;
/// Load multiplier on holidays.
const HOLIDAY_FACTOR: f64 = 0.3;
/// Chance that any given day is a holiday.
const HOLIDAY_PROBABILITY: f64 = 0.05;
/// Chance of rain in any given hour.
const RAIN_PROBABILITY: f64 = 0.2;

/// Parameters of the synthetic history generator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    /// Master random seed.
    pub seed: u64,
    /// Days of hourly history to produce (must be > 0).
    pub days: usize,
    /// Load at opening and closing time, as a fraction of capacity.
    pub base_load: f64,
    /// Midday load, as a fraction of capacity (>= `base_load`).
    pub peak_load: f64,
    /// Gaussian noise standard deviation, in occupants.
    pub noise_std: f64,
    /// Probability that a reading is replaced by an anomalous spike.
    pub outlier_rate: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            days: 28,
            base_load: 0.3,
            peak_load: 0.8,
            noise_std: 1.5,
            outlier_rate: 0.0,
        }
    }
}

/// Generates hourly records for `space`, ending at the last full hour at or
/// before `end`.
///
/// Output is deterministic for a given config, space and `end`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use occupancy_analytics::space::SpaceInfo;
/// use occupancy_analytics::synthetic::{SyntheticConfig, generate_history};
///
/// let space = SpaceInfo { id: 1, name: "Hub".into(), capacity: 20 };
/// let end = Utc.with_ymd_and_hms(2024, 6, 3, 12, 30, 0).unwrap();
/// let cfg = SyntheticConfig { days: 2, ..SyntheticConfig::default() };
///
/// let records = generate_history(&space, &cfg, end);
/// assert_eq!(records.len(), 48);
/// assert!(records.iter().all(|r| r.occupied_count <= 20));
/// ```
pub fn generate_history(
    space: &SpaceInfo,
    cfg: &SyntheticConfig,
    end: DateTime<Utc>,
) -> Vec<OccupancyRecord> {
    let seed = cfg
        .seed
        .wrapping_add(u64::from(space.id).wrapping_mul(SPACE_SEED_STRIDE));
    let mut rng = StdRng::seed_from_u64(seed);

    let hours = cfg.days * 24;
    let last = next_full_hour(end) - Duration::hours(1);
    let first = last - Duration::hours(hours as i64 - 1);
    let capacity = f64::from(space.capacity);

    let mut records = Vec::with_capacity(hours);
    let mut holiday = false;
    for i in 0..hours {
        let ts = first + Duration::hours(i as i64);
        if i == 0 || ts.hour() == 0 {
            holiday = rng.random_bool(HOLIDAY_PROBABILITY);
        }

        let mut load = cfg.base_load + (cfg.peak_load - cfg.base_load) * day_shape(ts.hour());
        if !is_open(ts.hour()) {
            load = 0.0;
        }
        if ts.weekday().num_days_from_monday() >= 5 {
            load *= WEEKEND_FACTOR;
        }
        if holiday {
            load *= HOLIDAY_FACTOR;
        }

        let noisy = load * capacity + gaussian(&mut rng) * cfg.noise_std;
        let mut count = noisy.round().clamp(0.0, capacity) as u32;
        if cfg.outlier_rate > 0.0 && rng.random_bool(cfg.outlier_rate.min(1.0)) {
            count = space.capacity.saturating_mul(3).max(10);
        }

        // Warmest mid-afternoon, coolest before dawn.
        let diurnal = ((f64::from(ts.hour()) - 9.0) / 24.0 * std::f64::consts::TAU).sin();
        let temperature = 22.5 + 2.5 * diurnal + rng.random_range(-0.5..0.5);
        let pressure = rng.random_range(750.0..770.0);
        let precipitation = if rng.random_bool(RAIN_PROBABILITY) {
            rng.random_range(0.1..8.0)
        } else {
            0.0
        };
        let traffic = if matches!(ts.hour(), 7..=9 | 16..=18) {
            rng.random_range(6..=MAX_TRAFFIC_INDEX)
        } else {
            rng.random_range(0..=5)
        };

        records.push(
            OccupancyRecord::new(ts, count)
                .with_temperature(temperature)
                .with_pressure(pressure)
                .with_precipitation(precipitation)
                .with_traffic_index(traffic)
                .with_holiday(holiday),
        );
    }
    records
}

fn is_open(hour: u32) -> bool {
    (OPEN_HOUR..CLOSE_HOUR).contains(&hour)
}

/// Bell-shaped daytime profile in `[0, 1]`, zero outside opening hours.
fn day_shape(hour: u32) -> f64 {
    if !is_open(hour) {
        return 0.0;
    }
    let span = f64::from(CLOSE_HOUR - OPEN_HOUR);
    let pos = (f64::from(hour - OPEN_HOUR) + 0.5) / span;
    (std::f64::consts::PI * pos).sin()
}

/// Standard normal sample via Box-Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
