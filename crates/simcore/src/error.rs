//! Error types for configuration input.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("rim radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    #[error("{field} of {value}s does not fit in a duration")]
    DurationOutOfRange { field: &'static str, value: f64 },

    #[error("tick rate must be positive, got {0}")]
    NonPositiveTickRate(f64),
}

impl ConfigError {
    /// Rejects NaN and infinities for a named field.
    pub fn check_finite(field: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConfigError::NonFinite { field, value })
        }
    }

    /// Rejects values that cannot be represented as a [`Duration`].
    pub fn check_duration(field: &'static str, seconds: f64) -> Result<Duration> {
        Duration::try_from_secs_f64(seconds)
            .map_err(|_| ConfigError::DurationOutOfRange { field, value: seconds })
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
