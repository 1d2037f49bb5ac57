//! Configuration loading and representation.
//!
//! Values come from environment variables; anything unset falls back to a
//! logged default.

use thiserror::Error;

use ledgerlens_core::{Period, WindowResolver};
use ledgerlens_inventory::DEFAULT_LOW_STOCK_THRESHOLD;

pub const LOW_STOCK_THRESHOLD_VAR: &str = "LEDGERLENS_LOW_STOCK_THRESHOLD";
pub const UTC_OFFSET_MINUTES_VAR: &str = "LEDGERLENS_UTC_OFFSET_MINUTES";
pub const DEFAULT_PERIOD_VAR: &str = "LEDGERLENS_DEFAULT_PERIOD";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Settings shared by every aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Quantity at or below which products are flagged.
    pub low_stock_threshold: u64,
    /// Resolver carrying the calendar offset used for day/month boundaries.
    pub resolver: WindowResolver,
    /// Period used when a caller does not name one.
    pub default_period: Period,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            resolver: WindowResolver::utc(),
            default_period: Period::Day,
        }
    }
}

impl MetricsConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup` (key -> value).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match lookup(LOW_STOCK_THRESHOLD_VAR) {
            Some(raw) => {
                config.low_stock_threshold = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::invalid(LOW_STOCK_THRESHOLD_VAR, &raw, e.to_string())
                })?;
            }
            None => tracing::debug!(
                "{LOW_STOCK_THRESHOLD_VAR} not set; using default {}",
                config.low_stock_threshold
            ),
        }

        match lookup(UTC_OFFSET_MINUTES_VAR) {
            Some(raw) => {
                let minutes = raw.trim().parse::<i32>().map_err(|e| {
                    ConfigError::invalid(UTC_OFFSET_MINUTES_VAR, &raw, e.to_string())
                })?;
                config.resolver = WindowResolver::from_offset_minutes(minutes)
                    .map_err(|e| ConfigError::invalid(UTC_OFFSET_MINUTES_VAR, &raw, e.to_string()))?;
            }
            None => tracing::debug!("{UTC_OFFSET_MINUTES_VAR} not set; resolving windows in UTC"),
        }

        match lookup(DEFAULT_PERIOD_VAR) {
            Some(raw) => {
                config.default_period = raw
                    .parse::<Period>()
                    .map_err(|e| ConfigError::invalid(DEFAULT_PERIOD_VAR, &raw, e.to_string()))?;
            }
            None => tracing::debug!(
                "{DEFAULT_PERIOD_VAR} not set; using default {}",
                config.default_period
            ),
        }

        Ok(config)
    }
}
