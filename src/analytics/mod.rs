//! The analytics core: pure, synchronous transforms over a record snapshot.
//!
//! `records` → `outlier` → `smoother` form the history view (composed in
//! `series`); `correlation` and `forecast` read the raw records directly.

/// Pearson correlation against ambient covariates.
pub mod correlation;
/// Day-of-week / hour historical-average forecasting.
pub mod forecast;
pub mod outlier;
/// Observation type and the sorted per-space record set.
pub mod records;
pub mod report;
/// History-series pipeline and its request parameters.
pub mod series;
pub mod smoother;
pub mod stats;
