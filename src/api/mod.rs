//! Read-only REST API over the analytics core.
//!
//! Endpoints:
//! - `/spaces`: every space with its live occupancy status
//! - `/spaces/{id}/history`: filtered and smoothed occupancy history
//! - `/spaces/{id}/correlation`: occupancy vs covariate coefficients
//! - `/spaces/{id}/forecast`: week-ahead hourly forecast
//! - `/spaces/{id}/recent`: newest records

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::store::RecordStore;

pub use types::{CorrelationResponse, ErrorResponse, ForecastResponse, HistoryResponse};

/// Immutable application state shared across all request handlers.
///
/// Every request computes its analytics from a snapshot of this store, so
/// no locks are needed.
pub struct AppState {
    /// Spaces and their occupancy history.
    pub store: RecordStore,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/spaces", get(handlers::list_spaces))
        .route("/spaces/{id}/history", get(handlers::get_history))
        .route("/spaces/{id}/correlation", get(handlers::get_correlation))
        .route("/spaces/{id}/forecast", get(handlers::get_forecast))
        .route("/spaces/{id}/recent", get(handlers::get_recent))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
