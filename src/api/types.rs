//! API response and query types.
//!
//! Undefined statistics serialize as `null`; data-driven empty results carry
//! a `status` of `no_data` or `insufficient_data` instead of an HTTP error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::correlation::{CorrelationOutcome, CorrelationResult};
use crate::analytics::forecast::{Forecast, ForecastPoint};
use crate::analytics::series::{AnalysisParams, HistorySeries};
use crate::analytics::smoother::SeriesPoint;

/// Analysis outcome tag shared by every analytics response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    NoData,
    InsufficientData,
}

/// Occupancy-history view for one space.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub space_id: u32,
    pub status: ResponseStatus,
    pub window_size: usize,
    pub remove_outliers: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<SeriesPoint>,
}

impl HistoryResponse {
    pub fn new(space_id: u32, params: AnalysisParams, history: HistorySeries) -> Self {
        let (status, points) = match history {
            HistorySeries::Points(points) => (ResponseStatus::Ok, points),
            HistorySeries::NoData => (ResponseStatus::NoData, Vec::new()),
        };
        Self {
            space_id,
            status,
            window_size: params.window_size,
            remove_outliers: params.remove_outliers,
            points,
        }
    }
}

/// Correlation coefficients for one space.
#[derive(Debug, Serialize)]
pub struct CorrelationResponse {
    pub space_id: u32,
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<CorrelationResult>,
}

impl CorrelationResponse {
    pub fn new(space_id: u32, outcome: CorrelationOutcome) -> Self {
        match outcome {
            CorrelationOutcome::Coefficients(c) => Self {
                space_id,
                status: ResponseStatus::Ok,
                coefficients: Some(c),
            },
            CorrelationOutcome::InsufficientData => Self {
                space_id,
                status: ResponseStatus::InsufficientData,
                coefficients: None,
            },
        }
    }
}

/// Week-ahead forecast for one space.
///
/// `points` always holds the full horizon; `status` is `no_data` when the
/// space had no history and every point is a zero default.
#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub space_id: u32,
    pub status: ResponseStatus,
    pub now: DateTime<Utc>,
    pub points: Vec<ForecastPoint>,
}

impl ForecastResponse {
    pub fn new(space_id: u32, forecast: Forecast) -> Self {
        let status = if forecast.is_empty_history() {
            ResponseStatus::NoData
        } else {
            ResponseStatus::Ok
        };
        Self {
            space_id,
            status,
            now: forecast.now,
            points: forecast.points,
        }
    }
}

/// Query parameters for the history endpoint, taken as raw text.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub window_size: Option<String>,
    pub remove_outliers: Option<String>,
}

/// Query parameters for the forecast endpoint.
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    /// Reference instant; defaults to the current time.
    pub now: Option<DateTime<Utc>>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_history_omits_points() {
        let resp = HistoryResponse::new(4, AnalysisParams::default(), HistorySeries::NoData);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "no_data");
        assert!(json.get("points").is_none());
    }

    #[test]
    fn undefined_coefficients_serialize_as_null() {
        let resp = CorrelationResponse::new(
            1,
            CorrelationOutcome::Coefficients(CorrelationResult {
                temperature: Some(0.5),
                precipitation: None,
                traffic_index: None,
            }),
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["coefficients"]["temperature"], 0.5);
        assert!(json["coefficients"]["precipitation"].is_null());
    }
}
