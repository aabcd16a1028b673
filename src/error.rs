//! Error type shared by the analytics core and its I/O surfaces.

use thiserror::Error;

/// Convenience alias for results carrying an [`AnalyticsError`].
pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Failures that reject a request outright.
///
/// Data-driven outcomes (empty input, too few samples, zero variance) are
/// not errors; they surface as variants of the analytic result types.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A caller-supplied parameter violates its constraint.
    #[error("invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Parameter name as the caller spelled it.
        name: &'static str,
        /// Constraint that was violated.
        message: String,
    },
    /// A record row could not be turned into an observation.
    #[error("import error on line {line}: {message}")]
    Import {
        /// 1-based line number in the source file, header included.
        line: u64,
        /// What was wrong with the row.
        message: String,
    },
    /// No space with the given id is known to the store.
    #[error("unknown space id {0}")]
    UnknownSpace(u32),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AnalyticsError {
    /// Builds an [`AnalyticsError::InvalidParameter`].
    pub fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}
