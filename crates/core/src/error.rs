//! Metrics error model.

use thiserror::Error;

/// Result type used across the metrics core.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Core-level error.
///
/// The aggregation functions themselves are total; these variants only cover
/// malformed input handed over by callers (unknown period tokens, records that
/// miss required fields, inconsistent windows).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// A period token was not recognized by the window resolver.
    #[error("invalid period: {0:?}")]
    InvalidPeriod(String),

    /// A record supplied by the record source is missing a required field or
    /// carries an inconsistent value.
    #[error("invalid {kind} record: {reason}")]
    InvalidRecord { kind: &'static str, reason: String },

    /// A value failed validation (e.g. a window whose start is after its end).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl MetricsError {
    pub fn invalid_period(token: impl Into<String>) -> Self {
        Self::InvalidPeriod(token.into())
    }

    pub fn invalid_record(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind,
            reason: reason.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Record kind for `InvalidRecord` errors.
    pub fn record_kind(&self) -> Option<&'static str> {
        match self {
            MetricsError::InvalidRecord { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
