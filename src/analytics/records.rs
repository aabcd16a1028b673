//! Occupancy observations and the time-ordered view over them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Highest value accepted for [`OccupancyRecord::traffic_index`].
pub const MAX_TRAFFIC_INDEX: u8 = 10;

/// One timestamped occupancy observation with its ambient covariates.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use occupancy_analytics::analytics::records::OccupancyRecord;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
/// let rec = OccupancyRecord::new(ts, 12).with_temperature(21.5);
/// assert_eq!(rec.occupied_count, 12);
/// assert_eq!(rec.precipitation, 0.0);
/// assert_eq!(rec.temperature, Some(21.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    /// When the reading was taken.
    pub timestamp: DateTime<Utc>,
    /// Seats or desks in use.
    pub occupied_count: u32,
    /// Air temperature (°C), if measured.
    pub temperature: Option<f64>,
    /// Air pressure (mmHg), if measured.
    pub pressure: Option<f64>,
    /// Precipitation (mm).
    #[serde(default)]
    pub precipitation: f64,
    /// Traffic congestion on a 0–10 scale.
    #[serde(default)]
    pub traffic_index: u8,
    /// Whether the reading fell on a public holiday.
    #[serde(default)]
    pub is_holiday: bool,
}

impl OccupancyRecord {
    /// Creates a record with every covariate at its default.
    pub fn new(timestamp: DateTime<Utc>, occupied_count: u32) -> Self {
        Self {
            timestamp,
            occupied_count,
            temperature: None,
            pressure: None,
            precipitation: 0.0,
            traffic_index: 0,
            is_holiday: false,
        }
    }

    pub fn with_temperature(mut self, celsius: f64) -> Self {
        self.temperature = Some(celsius);
        self
    }

    pub fn with_pressure(mut self, mmhg: f64) -> Self {
        self.pressure = Some(mmhg);
        self
    }

    pub fn with_precipitation(mut self, mm: f64) -> Self {
        self.precipitation = mm;
        self
    }

    /// Sets the traffic index, saturating at [`MAX_TRAFFIC_INDEX`].
    pub fn with_traffic_index(mut self, index: u8) -> Self {
        self.traffic_index = index.min(MAX_TRAFFIC_INDEX);
        self
    }

    pub fn with_holiday(mut self, is_holiday: bool) -> Self {
        self.is_holiday = is_holiday;
        self
    }
}

/// Observations for a single space, sorted ascending by timestamp.
///
/// Records sharing a timestamp keep the order in which they were supplied.
/// An empty set is a valid state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<OccupancyRecord>,
}

impl RecordSet {
    /// Sorts an unordered collection into a record set (stable).
    pub fn from_unordered(mut records: Vec<OccupancyRecord>) -> Self {
        records.sort_by_key(|r| r.timestamp);
        Self { records }
    }

    /// Wraps records whose relative order must be kept as-is.
    ///
    /// Used by stages that only ever drop records from an already-sorted set.
    pub(crate) fn from_sorted(records: Vec<OccupancyRecord>) -> Self {
        debug_assert!(records.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[OccupancyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OccupancyRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<OccupancyRecord> {
        self.records
    }

    /// Occupied counts in timestamp order, widened to `f64`.
    pub fn counts(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| f64::from(r.occupied_count))
    }

    /// Most recent observation.
    pub fn latest(&self) -> Option<&OccupancyRecord> {
        self.records.last()
    }

    /// Up to `n` of the newest observations, newest first.
    pub fn recent(&self, n: usize) -> Vec<&OccupancyRecord> {
        self.records.iter().rev().take(n).collect()
    }
}

impl From<Vec<OccupancyRecord>> for RecordSet {
    fn from(records: Vec<OccupancyRecord>) -> Self {
        Self::from_unordered(records)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a OccupancyRecord;
    type IntoIter = std::slice::Iter<'a, OccupancyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
