//! Integration tests for the REST API feature.

#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;

use occupancy_analytics::api::{AppState, router};

use common::synthetic_store;

async fn get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = router(Arc::new(AppState {
        store: synthetic_store(),
    }));
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn smoothed_history_keeps_every_timestamp() {
    let (status, raw) = get("/spaces/1/history").await;
    assert_eq!(status, StatusCode::OK);
    let (status, smoothed) = get("/spaces/1/history?window_size=5").await;
    assert_eq!(status, StatusCode::OK);

    let raw = raw["points"].as_array().unwrap();
    let smoothed = smoothed["points"].as_array().unwrap();
    assert_eq!(raw.len(), 14 * 24);
    assert_eq!(raw.len(), smoothed.len());
    for (a, b) in raw.iter().zip(smoothed) {
        assert_eq!(a["timestamp"], b["timestamp"]);
    }
}

#[tokio::test]
async fn unparseable_window_falls_back_to_one() {
    let (status, json) = get("/spaces/1/history?window_size=abc&remove_outliers=on").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["window_size"], 1);
    assert_eq!(json["remove_outliers"], true);
}

#[tokio::test]
async fn negative_window_is_a_bad_request() {
    let (status, json) = get("/spaces/1/history?window_size=-2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("window_size"));
}

#[tokio::test]
async fn empty_space_degrades_without_errors() {
    let (status, json) = get("/spaces/2/correlation").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "insufficient_data");
    assert!(json.get("coefficients").is_none());

    let (status, json) = get("/spaces/2/forecast?now=2024-05-06T14:23:00Z").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "no_data");
    let points = json["points"].as_array().unwrap();
    assert_eq!(points.len(), 168);
    assert!(points.iter().all(|p| p["predicted_count"] == 0.0));
}

#[tokio::test]
async fn forecast_for_synthetic_space_uses_exact_slots() {
    let (status, json) = get("/spaces/1/forecast?now=2024-05-06T14:23:00Z").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    let points = json["points"].as_array().unwrap();
    assert!(points.iter().all(|p| p["basis"] == "slot"));
    assert_eq!(points[0]["day_of_week"], 0);
    assert_eq!(points[0]["hour"], 15);
}

#[tokio::test]
async fn unknown_space_is_not_found_on_every_route() {
    for route in ["history", "correlation", "forecast", "recent"] {
        let (status, json) = get(&format!("/spaces/42/{route}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "route {route}");
        assert!(json.get("error").is_some());
    }
}
