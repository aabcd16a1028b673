//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tracing::warn;

use super::AppState;
use super::types::{
    CorrelationResponse, ErrorResponse, ForecastQuery, ForecastResponse, HistoryQuery,
    HistoryResponse,
};
use crate::analytics::correlation::correlate;
use crate::analytics::forecast::forecast_week;
use crate::analytics::records::OccupancyRecord;
use crate::analytics::series::{AnalysisParams, produce_series_from_set};
use crate::error::AnalyticsError;
use crate::space::{SpaceStatus, recent_records};

/// Maps core errors onto HTTP status codes with an [`ErrorResponse`] body.
pub struct ApiError(AnalyticsError);

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            AnalyticsError::UnknownSpace(_) => StatusCode::NOT_FOUND,
            AnalyticsError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Lists every space with its current occupancy.
///
/// `GET /spaces` → 200 + `Vec<SpaceStatus>` JSON
pub async fn list_spaces(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SpaceStatus>>, ApiError> {
    let statuses = state
        .store
        .spaces()
        .map(|space| {
            let set = state.store.records(space.id)?;
            Ok(SpaceStatus::from_records(space, &set))
        })
        .collect::<Result<Vec<_>, AnalyticsError>>()?;
    Ok(Json(statuses))
}

/// Returns the filtered and smoothed occupancy history of a space.
///
/// `GET /spaces/{id}/history?window_size=N&remove_outliers=on` → 200
/// `GET /spaces/{id}/history?window_size=0` → 400 + `ErrorResponse`
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let set = state.store.records(id)?;
    let params = AnalysisParams::from_query(
        query.window_size.as_deref(),
        query.remove_outliers.as_deref(),
    )?;
    let history = produce_series_from_set(set, &params)?;
    Ok(Json(HistoryResponse::new(id, params, history)))
}

/// Returns occupancy correlation against each covariate.
///
/// `GET /spaces/{id}/correlation` → 200 + `CorrelationResponse` JSON
pub async fn get_correlation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<CorrelationResponse>, ApiError> {
    let set = state.store.records(id)?;
    Ok(Json(CorrelationResponse::new(id, correlate(&set))))
}

/// Returns the week-ahead hourly forecast.
///
/// `GET /spaces/{id}/forecast` → anchored at the current time
/// `GET /spaces/{id}/forecast?now=2024-05-06T14:23:00Z` → anchored at `now`
pub async fn get_forecast(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let set = state.store.records(id)?;
    let now = query.now.unwrap_or_else(Utc::now);
    Ok(Json(ForecastResponse::new(id, forecast_week(&set, now))))
}

/// Returns the newest records of a space, newest first.
///
/// `GET /spaces/{id}/recent` → 200 + `Vec<OccupancyRecord>` JSON
pub async fn get_recent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Vec<OccupancyRecord>>, ApiError> {
    let set = state.store.records(id)?;
    Ok(Json(recent_records(&set)))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{DateTime, Duration, TimeZone};
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::space::SpaceInfo;
    use crate::store::RecordStore;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 29, 0, 0, 0).unwrap()
    }

    fn make_test_state() -> Arc<AppState> {
        let spaces = vec![
            SpaceInfo {
                id: 1,
                name: "Main Open Space".to_string(),
                capacity: 20,
            },
            SpaceInfo {
                id: 2,
                name: "Empty Room".to_string(),
                capacity: 4,
            },
        ];
        let records = (0..24).map(|h| {
            let rec = OccupancyRecord::new(t0() + Duration::hours(h), (h % 12) as u32)
                .with_temperature(18.0 + h as f64 * 0.5)
                .with_traffic_index((h % 10) as u8);
            (1, rec)
        });
        Arc::new(AppState {
            store: RecordStore::new(spaces, records),
        })
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router(make_test_state());
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn spaces_lists_status() {
        let (status, json) = get_json("/spaces").await;
        assert_eq!(status, StatusCode::OK);
        let spaces = json.as_array().unwrap();
        assert_eq!(spaces.len(), 2);
        // last record at 23:00 has count 11 of 20 → 55%
        assert_eq!(spaces[0]["current_occupancy"], 11);
        assert_eq!(spaces[0]["occupancy_percentage"], 55);
        assert_eq!(spaces[0]["band"], "yellow");
        assert_eq!(spaces[1]["current_occupancy"], 0);
    }

    #[tokio::test]
    async fn history_returns_every_record_by_default() {
        let (status, json) = get_json("/spaces/1/history").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["window_size"], 1);
        assert_eq!(json["points"].as_array().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn history_zero_window_returns_400() {
        let (status, json) = get_json("/spaces/1/history?window_size=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn history_of_empty_space_is_no_data() {
        let (status, json) = get_json("/spaces/2/history?window_size=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "no_data");
    }

    #[tokio::test]
    async fn unknown_space_returns_404() {
        let (status, json) = get_json("/spaces/99/correlation").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("99"));
    }

    #[tokio::test]
    async fn correlation_reports_coefficients() {
        let (status, json) = get_json("/spaces/1/correlation").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        // precipitation never varies
        assert!(json["coefficients"]["precipitation"].is_null());
        assert!(json["coefficients"]["temperature"].is_number());
    }

    #[tokio::test]
    async fn forecast_is_anchored_at_now() {
        let (status, json) = get_json("/spaces/1/forecast?now=2024-05-06T14:23:00Z").await;
        assert_eq!(status, StatusCode::OK);
        let points = json["points"].as_array().unwrap();
        assert_eq!(points.len(), 168);
        assert_eq!(points[0]["timestamp"], "2024-05-06T15:00:00Z");
        // Monday 15:00 saw a count of 3 on 2024-04-29
        assert_eq!(points[0]["predicted_count"], 3.0);
        assert_eq!(points[0]["basis"], "slot");
    }

    #[tokio::test]
    async fn recent_is_newest_first() {
        let (status, json) = get_json("/spaces/1/recent").await;
        assert_eq!(status, StatusCode::OK);
        let recent = json.as_array().unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0]["occupied_count"], 11);
        assert_eq!(recent[4]["occupied_count"], 7);
    }
}
