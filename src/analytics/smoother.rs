//! Centered moving average with shrinking edge windows.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AnalyticsError, Result};

use super::records::RecordSet;

/// One point of a plot-ready occupancy series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    /// Occupied count, fractional once smoothed.
    pub occupied_count: f64,
}

/// Replaces each count with the mean of a centered window of `window_size`
/// records.
///
/// At the edges the window shrinks to the neighbors that exist, so every
/// output averages at least one value. For an even `window_size` the extra
/// neighbor is taken from the left. Timestamps and length are unchanged;
/// `window_size == 1` reproduces the input counts.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidParameter`] if `window_size` is zero.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use occupancy_analytics::analytics::records::{OccupancyRecord, RecordSet};
/// use occupancy_analytics::analytics::smoother::smooth;
///
/// let t0 = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
/// let set = RecordSet::from_unordered(vec![
///     OccupancyRecord::new(t0, 10),
///     OccupancyRecord::new(t0 + Duration::hours(1), 20),
///     OccupancyRecord::new(t0 + Duration::hours(2), 30),
/// ]);
///
/// let values: Vec<f64> = smooth(&set, 3)
///     .unwrap()
///     .iter()
///     .map(|p| p.occupied_count)
///     .collect();
/// assert_eq!(values, vec![15.0, 20.0, 25.0]);
/// ```
pub fn smooth(set: &RecordSet, window_size: usize) -> Result<Vec<SeriesPoint>> {
    if window_size == 0 {
        return Err(AnalyticsError::invalid_parameter(
            "window_size",
            "must be >= 1, got 0",
        ));
    }

    let records = set.records();
    if window_size == 1 {
        return Ok(records
            .iter()
            .map(|r| SeriesPoint {
                timestamp: r.timestamp,
                occupied_count: f64::from(r.occupied_count),
            })
            .collect());
    }

    let right = (window_size - 1) / 2;
    let left = window_size - 1 - right;
    let n = records.len();

    // Two-pointer sliding window over [lo, hi).
    let mut out = Vec::with_capacity(n);
    let mut lo = 0usize;
    let mut hi = 0usize;
    let mut sum = 0u64;
    for (i, rec) in records.iter().enumerate() {
        let want_hi = (i + right + 1).min(n);
        while hi < want_hi {
            sum += u64::from(records[hi].occupied_count);
            hi += 1;
        }
        let want_lo = i.saturating_sub(left);
        while lo < want_lo {
            sum -= u64::from(records[lo].occupied_count);
            lo += 1;
        }
        out.push(SeriesPoint {
            timestamp: rec.timestamp,
            occupied_count: sum as f64 / (hi - lo) as f64,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::records::OccupancyRecord;
    use chrono::{Duration, TimeZone};

    fn set_of(counts: &[u32]) -> RecordSet {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        RecordSet::from_unordered(
            counts
                .iter()
                .enumerate()
                .map(|(i, &c)| OccupancyRecord::new(t0 + Duration::minutes(15 * i as i64), c))
                .collect(),
        )
    }

    fn values(points: &[SeriesPoint]) -> Vec<f64> {
        points.iter().map(|p| p.occupied_count).collect()
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = smooth(&set_of(&[1, 2]), 0).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::InvalidParameter {
                name: "window_size",
                ..
            }
        ));
    }

    #[test]
    fn window_one_is_identity() {
        let out = smooth(&set_of(&[4, 0, 9, 2]), 1).unwrap();
        assert_eq!(values(&out), vec![4.0, 0.0, 9.0, 2.0]);
    }

    #[test]
    fn three_point_centered_window() {
        let out = smooth(&set_of(&[10, 20, 30]), 3).unwrap();
        assert_eq!(values(&out), vec![15.0, 20.0, 25.0]);
    }

    #[test]
    fn even_window_leans_left() {
        // window 4: two neighbors on the left, one on the right
        let out = smooth(&set_of(&[0, 4, 8, 12, 16]), 4).unwrap();
        assert_eq!(values(&out), vec![2.0, 4.0, 6.0, 10.0, 12.0]);
    }

    #[test]
    fn window_wider_than_series_averages_everything_reachable() {
        let out = smooth(&set_of(&[2, 4, 6]), 9).unwrap();
        assert_eq!(values(&out), vec![4.0, 4.0, 4.0]);
    }

    #[test]
    fn timestamps_and_length_unchanged() {
        let set = set_of(&[3, 1, 4, 1, 5, 9, 2, 6]);
        let out = smooth(&set, 5).unwrap();
        assert_eq!(out.len(), set.len());
        for (p, r) in out.iter().zip(set.iter()) {
            assert_eq!(p.timestamp, r.timestamp);
        }
    }

    #[test]
    fn empty_set_smooths_to_empty() {
        let out = smooth(&RecordSet::default(), 3).unwrap();
        assert!(out.is_empty());
    }
}
