//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};

use occupancy_analytics::analytics::records::OccupancyRecord;
use occupancy_analytics::space::SpaceInfo;
use occupancy_analytics::store::RecordStore;
use occupancy_analytics::synthetic::{SyntheticConfig, generate_history};

/// Monday 2024-04-29 00:00 UTC.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 29, 0, 0, 0).unwrap()
}

/// Reference instant used for forecasts (Monday 2024-05-06 14:23 UTC).
pub fn forecast_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 14, 23, 0).unwrap()
}

/// Hourly records starting at [`t0`] with the given counts.
pub fn hourly(counts: &[u32]) -> Vec<OccupancyRecord> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| OccupancyRecord::new(t0() + Duration::hours(i as i64), c))
        .collect()
}

/// Default space (id 1, capacity 20).
pub fn default_space() -> SpaceInfo {
    SpaceInfo {
        id: 1,
        name: "Main Open Space".to_string(),
        capacity: 20,
    }
}

/// Store holding two weeks of synthetic history for space 1 and an empty
/// space 2.
pub fn synthetic_store() -> RecordStore {
    let space = default_space();
    let cfg = SyntheticConfig {
        days: 14,
        ..SyntheticConfig::default()
    };
    let records = generate_history(&space, &cfg, forecast_now());
    let empty = SpaceInfo {
        id: 2,
        name: "Meeting Room Alpha".to_string(),
        capacity: 6,
    };
    RecordStore::new(vec![space, empty], records.into_iter().map(|r| (1, r)))
}
