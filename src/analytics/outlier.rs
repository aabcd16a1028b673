//! Z-score rejection of anomalous occupancy samples.

use tracing::debug;

use super::records::RecordSet;
use super::stats::Moments;

/// Sets at or below this size are passed through untouched.
pub const MIN_OUTLIER_SAMPLE: usize = 10;

/// Records with `|x - μ| / σ` at or above this value are discarded.
pub const Z_SCORE_THRESHOLD: f64 = 2.0;

/// Drops records whose occupied count is a statistical outlier.
///
/// Mean and sample standard deviation are computed once over the whole input
/// and every record is judged against those. The filter is a pass-through
/// when disabled, when the set has [`MIN_OUTLIER_SAMPLE`] records or fewer,
/// or when the counts have zero variance. Retained records keep their order.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use occupancy_analytics::analytics::outlier::filter_outliers;
/// use occupancy_analytics::analytics::records::{OccupancyRecord, RecordSet};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap();
/// let mut counts = vec![5; 12];
/// counts[8] = 100;
/// let records = counts
///     .into_iter()
///     .enumerate()
///     .map(|(i, c)| OccupancyRecord::new(t0 + Duration::hours(i as i64), c))
///     .collect::<Vec<_>>();
///
/// let kept = filter_outliers(RecordSet::from_unordered(records), true);
/// assert_eq!(kept.len(), 11);
/// assert!(kept.iter().all(|r| r.occupied_count == 5));
/// ```
pub fn filter_outliers(set: RecordSet, enabled: bool) -> RecordSet {
    if !enabled || set.len() <= MIN_OUTLIER_SAMPLE {
        return set;
    }

    let moments: Moments = set.counts().collect();
    let (Some(mean), Some(std_dev)) = (moments.mean(), moments.sample_std_dev()) else {
        return set;
    };
    if std_dev == 0.0 {
        debug!(records = set.len(), "zero variance, outlier filter skipped");
        return set;
    }

    let before = set.len();
    let kept: Vec<_> = set
        .into_records()
        .into_iter()
        .filter(|r| (f64::from(r.occupied_count) - mean).abs() / std_dev < Z_SCORE_THRESHOLD)
        .collect();

    debug!(
        mean,
        std_dev,
        removed = before - kept.len(),
        kept = kept.len(),
        "outlier filter applied"
    );
    RecordSet::from_sorted(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::records::OccupancyRecord;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn t(i: usize) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::hours(i as i64)
    }

    fn set_of(counts: &[u32]) -> RecordSet {
        RecordSet::from_unordered(
            counts
                .iter()
                .enumerate()
                .map(|(i, &c)| OccupancyRecord::new(t(i), c))
                .collect(),
        )
    }

    #[test]
    fn disabled_is_identity() {
        let set = set_of(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 500]);
        assert_eq!(filter_outliers(set.clone(), false), set);
    }

    #[test]
    fn small_sample_is_identity() {
        let set = set_of(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 900]);
        assert_eq!(set.len(), MIN_OUTLIER_SAMPLE);
        assert_eq!(filter_outliers(set.clone(), true), set);
    }

    #[test]
    fn zero_variance_is_identity() {
        let set = set_of(&[7; 15]);
        assert_eq!(filter_outliers(set.clone(), true), set);
    }

    #[test]
    fn single_spike_is_removed() {
        let mut counts = vec![5; 12];
        counts[8] = 100;
        let set = set_of(&counts);
        let spike_ts = t(8);

        let kept = filter_outliers(set, true);
        assert_eq!(kept.len(), 11);
        assert!(kept.iter().all(|r| r.timestamp != spike_ts));
    }

    #[test]
    fn order_is_preserved() {
        let counts = [3, 4, 5, 4, 3, 4, 5, 4, 3, 60, 4, 5];
        let kept = filter_outliers(set_of(&counts), true);
        let ts: Vec<_> = kept.iter().map(|r| r.timestamp).collect();
        let mut sorted = ts.clone();
        sorted.sort();
        assert_eq!(ts, sorted);
        assert_eq!(kept.len(), counts.len() - 1);
    }
}
