//! Occupancy analytics for shared workspaces.
//!
//! Turns a space's timestamped occupancy records into a filtered and
//! smoothed history, covariate correlations, and a week-ahead forecast.

pub mod analytics;
pub mod config;
pub mod error;
pub mod io;
pub mod space;
pub mod store;
pub mod synthetic;

/// HTTP API (requires the `api` feature).
#[cfg(feature = "api")]
pub mod api;
