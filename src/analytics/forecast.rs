//! Day-of-week / hour-of-day historical-average forecasting.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::Serialize;
use tracing::debug;

use super::records::RecordSet;

pub const DAYS_PER_WEEK: usize = 7;
pub const HOURS_PER_DAY: usize = 24;
/// Number of hourly points in every forecast (one week).
pub const FORECAST_HORIZON_HOURS: usize = DAYS_PER_WEEK * HOURS_PER_DAY;

/// Sum and count of the occupied counts that fell into one bucket.
#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    sum: f64,
    count: u32,
}

impl Bucket {
    fn add(&mut self, x: f64) {
        self.sum += x;
        self.count += 1;
    }

    fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// `(day_of_week, hour)` of a timestamp in UTC, Monday = 0.
pub fn weekly_slot(ts: DateTime<Utc>) -> (usize, usize) {
    (
        ts.weekday().num_days_from_monday() as usize,
        ts.hour() as usize,
    )
}

/// Mean occupancy per `(day_of_week, hour)` slot plus per-hour means.
///
/// Stored as fixed 7×24 and 24 entry tables indexed directly by slot.
#[derive(Debug, Clone)]
pub struct HistoricalProfile {
    slots: [Bucket; FORECAST_HORIZON_HOURS],
    hours: [Bucket; HOURS_PER_DAY],
    samples: usize,
}

impl HistoricalProfile {
    /// Buckets every record of `set` by its weekly slot.
    pub fn build(set: &RecordSet) -> Self {
        let mut slots = [Bucket::default(); FORECAST_HORIZON_HOURS];
        let mut hours = [Bucket::default(); HOURS_PER_DAY];
        for rec in set {
            let (day, hour) = weekly_slot(rec.timestamp);
            let x = f64::from(rec.occupied_count);
            slots[day * HOURS_PER_DAY + hour].add(x);
            hours[hour].add(x);
        }
        Self {
            slots,
            hours,
            samples: set.len(),
        }
    }

    /// Mean count for an exact slot, if any history fell into it.
    ///
    /// Out-of-range arguments yield `None`.
    pub fn slot_mean(&self, day_of_week: usize, hour: usize) -> Option<f64> {
        if day_of_week >= DAYS_PER_WEEK || hour >= HOURS_PER_DAY {
            return None;
        }
        self.slots[day_of_week * HOURS_PER_DAY + hour].mean()
    }

    /// Mean count across all days for one hour of the day.
    pub fn hour_mean(&self, hour: usize) -> Option<f64> {
        self.hours.get(hour).and_then(|b| b.mean())
    }

    /// Number of slots with at least one observation.
    pub fn populated_slots(&self) -> usize {
        self.slots.iter().filter(|b| b.count > 0).count()
    }

    /// Records the profile was built from.
    pub fn samples(&self) -> usize {
        self.samples
    }
}

/// Where a forecast value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastBasis {
    /// Mean of the exact `(day_of_week, hour)` slot.
    Slot,
    /// Mean of the hour across every day of the week.
    Hour,
    /// No history for the hour; predicted as zero.
    Default,
}

impl ForecastBasis {
    pub fn as_str(self) -> &'static str {
        match self {
            ForecastBasis::Slot => "slot",
            ForecastBasis::Hour => "hour",
            ForecastBasis::Default => "default",
        }
    }
}

/// One hourly forecast value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    /// Monday = 0.
    pub day_of_week: u8,
    pub hour: u8,
    /// Expected occupied count, never negative.
    pub predicted_count: f64,
    pub basis: ForecastBasis,
}

/// A week-ahead forecast together with the history it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// Reference instant the horizon was anchored to.
    pub now: DateTime<Utc>,
    /// Records in the history; zero means every point is a default.
    pub history_len: usize,
    pub points: Vec<ForecastPoint>,
}

impl Forecast {
    /// Whether the forecast was built without any history.
    pub fn is_empty_history(&self) -> bool {
        self.history_len == 0
    }

    /// The point with the highest predicted count (earliest on ties).
    pub fn peak(&self) -> Option<&ForecastPoint> {
        self.points.iter().fold(None, |best, p| match best {
            Some(b) if b.predicted_count >= p.predicted_count => Some(b),
            _ => Some(p),
        })
    }

    /// Points that fell back past their exact slot.
    pub fn degraded_points(&self) -> usize {
        self.points
            .iter()
            .filter(|p| p.basis != ForecastBasis::Slot)
            .count()
    }
}

/// Historical-average forecaster.
///
/// Each future hour is resolved through a fallback chain: the mean of its
/// exact weekly slot, then the mean of its hour across all days, then zero.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use occupancy_analytics::analytics::forecast::{ForecastModel, FORECAST_HORIZON_HOURS};
/// use occupancy_analytics::analytics::records::RecordSet;
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 6, 14, 23, 0).unwrap();
/// let points = ForecastModel::fit(&RecordSet::default()).forecast(now);
/// assert_eq!(points.len(), FORECAST_HORIZON_HOURS);
/// assert_eq!(points[0].timestamp, Utc.with_ymd_and_hms(2024, 5, 6, 15, 0, 0).unwrap());
/// assert!(points.iter().all(|p| p.predicted_count == 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct ForecastModel {
    profile: HistoricalProfile,
}

impl ForecastModel {
    /// Builds the historical profile from the full history of a space.
    pub fn fit(set: &RecordSet) -> Self {
        let profile = HistoricalProfile::build(set);
        debug!(
            samples = profile.samples(),
            populated_slots = profile.populated_slots(),
            "historical profile built"
        );
        Self { profile }
    }

    pub fn profile(&self) -> &HistoricalProfile {
        &self.profile
    }

    /// Resolves the expected count for one weekly slot.
    pub fn predict(&self, day_of_week: usize, hour: usize) -> (f64, ForecastBasis) {
        if let Some(mean) = self.profile.slot_mean(day_of_week, hour) {
            (mean, ForecastBasis::Slot)
        } else if let Some(mean) = self.profile.hour_mean(hour) {
            (mean, ForecastBasis::Hour)
        } else {
            (0.0, ForecastBasis::Default)
        }
    }

    /// Hourly points for the week starting at the first full hour after `now`.
    pub fn forecast(&self, now: DateTime<Utc>) -> Vec<ForecastPoint> {
        let start = next_full_hour(now);
        (0..FORECAST_HORIZON_HOURS)
            .map(|i| {
                let timestamp = start + Duration::hours(i as i64);
                let (day, hour) = weekly_slot(timestamp);
                let (predicted, basis) = self.predict(day, hour);
                ForecastPoint {
                    timestamp,
                    day_of_week: day as u8,
                    hour: hour as u8,
                    predicted_count: predicted.max(0.0),
                    basis,
                }
            })
            .collect()
    }
}

/// Fits a model on `set` and forecasts the week after `now`.
pub fn forecast_week(set: &RecordSet, now: DateTime<Utc>) -> Forecast {
    let points = ForecastModel::fit(set).forecast(now);
    Forecast {
        now,
        history_len: set.len(),
        points,
    }
}

/// The first whole hour strictly after `now`.
pub fn next_full_hour(now: DateTime<Utc>) -> DateTime<Utc> {
    let into_hour = Duration::minutes(i64::from(now.minute()))
        + Duration::seconds(i64::from(now.second()))
        + Duration::nanoseconds(i64::from(now.nanosecond()));
    now - into_hour + Duration::hours(1)
}
