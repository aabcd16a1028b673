//! Outlier filtering and smoothing composed into a plot-ready series.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalyticsError, Result};

use super::outlier::filter_outliers;
use super::records::{OccupancyRecord, RecordSet};
use super::smoother::{SeriesPoint, smooth};

/// Caller-supplied knobs for the occupancy-history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisParams {
    /// Smoothing span in records (must be >= 1).
    pub window_size: usize,
    /// Whether to drop z-score outliers before smoothing.
    pub remove_outliers: bool,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            window_size: 1,
            remove_outliers: false,
        }
    }
}

impl AnalysisParams {
    /// Checks the parameters without running anything.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidParameter`] if `window_size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(AnalyticsError::invalid_parameter(
                "window_size",
                "must be >= 1, got 0",
            ));
        }
        Ok(())
    }

    /// Builds parameters from loosely-typed request values.
    ///
    /// A `window_size` that is absent or does not parse as an integer falls
    /// back to the default of 1; a parsed value below 1 is rejected.
    /// `remove_outliers` is enabled only by `"on"` or `"true"`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::InvalidParameter`] for a window size below 1.
    pub fn from_query(window_size: Option<&str>, remove_outliers: Option<&str>) -> Result<Self> {
        let defaults = Self::default();
        let window_size = match window_size.map(|s| s.trim().parse::<i64>()) {
            Some(Ok(n)) if n < 1 => {
                return Err(AnalyticsError::invalid_parameter(
                    "window_size",
                    format!("must be >= 1, got {n}"),
                ));
            }
            Some(Ok(n)) => usize::try_from(n).unwrap_or(usize::MAX),
            Some(Err(_)) | None => defaults.window_size,
        };
        let remove_outliers = matches!(remove_outliers, Some("on" | "true"));
        Ok(Self {
            window_size,
            remove_outliers,
        })
    }
}

/// The occupancy-history view for one space.
#[derive(Debug, Clone, PartialEq)]
pub enum HistorySeries {
    Points(Vec<SeriesPoint>),
    NoData,
}

impl HistorySeries {
    pub fn points(&self) -> Option<&[SeriesPoint]> {
        match self {
            HistorySeries::Points(p) => Some(p),
            HistorySeries::NoData => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, HistorySeries::NoData)
    }
}

/// Sorts `records`, optionally drops outliers, then smooths.
///
/// Parameters are validated before the data is looked at, so an invalid
/// window size is rejected even for an empty input. An empty set at any
/// stage yields [`HistorySeries::NoData`].
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidParameter`] if `params.window_size` is 0.
pub fn produce_series(
    records: Vec<OccupancyRecord>,
    params: &AnalysisParams,
) -> Result<HistorySeries> {
    produce_series_from_set(RecordSet::from_unordered(records), params)
}

/// Same as [`produce_series`] for an already-sorted set.
pub fn produce_series_from_set(set: RecordSet, params: &AnalysisParams) -> Result<HistorySeries> {
    params.validate()?;
    if set.is_empty() {
        return Ok(HistorySeries::NoData);
    }

    let raw = set.len();
    let filtered = filter_outliers(set, params.remove_outliers);
    if filtered.is_empty() {
        return Ok(HistorySeries::NoData);
    }

    let points = smooth(&filtered, params.window_size)?;
    debug!(
        raw,
        plotted = points.len(),
        window_size = params.window_size,
        remove_outliers = params.remove_outliers,
        "history series produced"
    );
    Ok(HistorySeries::Points(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn records(counts: &[u32]) -> Vec<OccupancyRecord> {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        counts
            .iter()
            .enumerate()
            .map(|(i, &c)| OccupancyRecord::new(t0 + Duration::hours(i as i64), c))
            .collect()
    }

    #[test]
    fn empty_input_is_no_data() {
        let out = produce_series(Vec::new(), &AnalysisParams::default()).unwrap();
        assert!(out.is_no_data());
    }

    #[test]
    fn zero_window_rejected_before_looking_at_data() {
        let params = AnalysisParams {
            window_size: 0,
            remove_outliers: false,
        };
        assert!(produce_series(Vec::new(), &params).is_err());
        assert!(produce_series(records(&[1, 2, 3]), &params).is_err());
    }

    #[test]
    fn default_params_plot_raw_counts() {
        let out = produce_series(records(&[3, 1, 2]), &AnalysisParams::default()).unwrap();
        let values: Vec<f64> = out.points().unwrap().iter().map(|p| p.occupied_count).collect();
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn outliers_removed_before_smoothing() {
        let mut counts = vec![5; 12];
        counts[8] = 100;
        let params = AnalysisParams {
            window_size: 3,
            remove_outliers: true,
        };
        let out = produce_series(records(&counts), &params).unwrap();
        let points = out.points().unwrap();
        assert_eq!(points.len(), 11);
        assert!(points.iter().all(|p| p.occupied_count == 5.0));
    }

    #[test]
    fn query_parsing_follows_request_rules() {
        let p = AnalysisParams::from_query(Some("5"), Some("on")).unwrap();
        assert_eq!(p.window_size, 5);
        assert!(p.remove_outliers);

        let p = AnalysisParams::from_query(Some("abc"), Some("off")).unwrap();
        assert_eq!(p, AnalysisParams::default());

        let p = AnalysisParams::from_query(None, None).unwrap();
        assert_eq!(p, AnalysisParams::default());

        assert!(AnalysisParams::from_query(Some("0"), None).is_err());
        assert!(AnalysisParams::from_query(Some("-3"), None).is_err());
    }
}
