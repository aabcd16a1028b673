//! Per-space bundle of every analytic product, with a text rendering.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::space::{SpaceInfo, SpaceStatus};

use super::correlation::{CorrelationOutcome, correlate};
use super::forecast::{Forecast, forecast_week};
use super::records::RecordSet;
use super::series::{AnalysisParams, HistorySeries, produce_series_from_set};

/// Status, history, correlation and forecast for one space.
#[derive(Debug, Clone)]
pub struct SpaceReport {
    pub status: SpaceStatus,
    pub params: AnalysisParams,
    /// Records in the raw history.
    pub raw_records: usize,
    pub history: HistorySeries,
    pub correlation: CorrelationOutcome,
    pub forecast: Forecast,
}

impl SpaceReport {
    /// Runs every analysis over the same snapshot of `set`.
    ///
    /// Correlation and forecasting see the raw records; only the history
    /// view is filtered and smoothed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AnalyticsError::InvalidParameter`] if
    /// `params` are invalid.
    pub fn build(
        space: &SpaceInfo,
        set: &RecordSet,
        params: AnalysisParams,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let history = produce_series_from_set(set.clone(), &params)?;
        let correlation = correlate(set);
        let forecast = forecast_week(set, now);
        info!(
            space_id = space.id,
            records = set.len(),
            "space analytics computed"
        );
        Ok(Self {
            status: SpaceStatus::from_records(space, set),
            params,
            raw_records: set.len(),
            history,
            correlation,
            forecast,
        })
    }
}

impl fmt::Display for SpaceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.status)?;

        match &self.history {
            HistorySeries::NoData => writeln!(f, "History:        no data")?,
            HistorySeries::Points(points) => {
                let lo = points.iter().map(|p| p.occupied_count).fold(f64::INFINITY, f64::min);
                let hi = points.iter().map(|p| p.occupied_count).fold(f64::NEG_INFINITY, f64::max);
                writeln!(
                    f,
                    "History:        {} of {} records plotted \
                     (window {}, outliers {}), range {:.2}..{:.2}",
                    points.len(),
                    self.raw_records,
                    self.params.window_size,
                    if self.params.remove_outliers { "removed" } else { "kept" },
                    lo,
                    hi
                )?;
            }
        }

        match &self.correlation {
            CorrelationOutcome::InsufficientData => {
                writeln!(f, "Correlation:    insufficient data")?;
            }
            CorrelationOutcome::Coefficients(c) => {
                writeln!(f, "Correlation:")?;
                for (covariate, r) in c.iter() {
                    match r {
                        Some(r) => writeln!(f, "  {:<14}{:+.3}", covariate.name(), r)?,
                        None => writeln!(f, "  {:<14}undefined", covariate.name())?,
                    }
                }
            }
        }

        if self.forecast.is_empty_history() {
            return write!(f, "Forecast:       no data");
        }
        match self.forecast.peak() {
            Some(peak) => write!(
                f,
                "Forecast:       {} hourly points, peak {:.2} at {} ({} degraded)",
                self.forecast.points.len(),
                peak.predicted_count,
                peak.timestamp.format("%a %Y-%m-%d %H:%M"),
                self.forecast.degraded_points()
            ),
            None => write!(f, "Forecast:       no data"),
        }
    }
}
