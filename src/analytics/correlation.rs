//! Pearson correlation of occupancy against the ambient covariates.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::records::{OccupancyRecord, RecordSet};
use super::stats::CoMoments;

/// Below this many records the whole analysis reports insufficient data.
pub const MIN_CORRELATION_SAMPLE: usize = 5;

/// Covariates correlated against `occupied_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Covariate {
    Temperature,
    Precipitation,
    TrafficIndex,
}

impl Covariate {
    pub const ALL: [Covariate; 3] = [
        Covariate::Temperature,
        Covariate::Precipitation,
        Covariate::TrafficIndex,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Covariate::Temperature => "temperature",
            Covariate::Precipitation => "precipitation",
            Covariate::TrafficIndex => "traffic_index",
        }
    }

    /// The covariate's value on `rec`, `None` when it was not measured.
    fn value(self, rec: &OccupancyRecord) -> Option<f64> {
        match self {
            Covariate::Temperature => rec.temperature,
            Covariate::Precipitation => Some(rec.precipitation),
            Covariate::TrafficIndex => Some(f64::from(rec.traffic_index)),
        }
    }
}

impl fmt::Display for Covariate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Correlation coefficients in `[-1, 1]`; `None` means undefined.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CorrelationResult {
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub traffic_index: Option<f64>,
}

impl CorrelationResult {
    pub fn get(&self, covariate: Covariate) -> Option<f64> {
        match covariate {
            Covariate::Temperature => self.temperature,
            Covariate::Precipitation => self.precipitation,
            Covariate::TrafficIndex => self.traffic_index,
        }
    }

    /// `(covariate, coefficient)` pairs in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (Covariate, Option<f64>)> + '_ {
        Covariate::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Outcome of a correlation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CorrelationOutcome {
    Coefficients(CorrelationResult),
    /// Fewer than [`MIN_CORRELATION_SAMPLE`] records were supplied.
    InsufficientData,
}

impl CorrelationOutcome {
    pub fn coefficients(&self) -> Option<&CorrelationResult> {
        match self {
            CorrelationOutcome::Coefficients(c) => Some(c),
            CorrelationOutcome::InsufficientData => None,
        }
    }
}

/// Correlates raw occupancy against temperature, precipitation and traffic.
///
/// Each pair is computed independently: a record missing its temperature is
/// left out of the temperature pair only. A pair with zero variance on
/// either side, or fewer than two complete observations, is undefined.
pub fn correlate(set: &RecordSet) -> CorrelationOutcome {
    if set.len() < MIN_CORRELATION_SAMPLE {
        debug!(records = set.len(), "too few records for correlation");
        return CorrelationOutcome::InsufficientData;
    }

    let mut acc = [CoMoments::new(); 3];
    for rec in set {
        let y = f64::from(rec.occupied_count);
        for (slot, covariate) in acc.iter_mut().zip(Covariate::ALL) {
            if let Some(x) = covariate.value(rec) {
                slot.push(x, y);
            }
        }
    }

    let [temperature, precipitation, traffic_index] = acc;
    debug!(
        temperature_pairs = temperature.count(),
        records = set.len(),
        "correlation computed"
    );
    CorrelationOutcome::Coefficients(CorrelationResult {
        temperature: temperature.pearson(),
        precipitation: precipitation.pearson(),
        traffic_index: traffic_index.pearson(),
    })
}
