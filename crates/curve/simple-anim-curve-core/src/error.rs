//! Error types for curve operations

use serde::{Deserialize, Serialize};

/// Errors raised by the checked curve entry points.
///
/// The solver itself is total; these only come out of validation and
/// (de)serialization.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CurveError {
    /// A time or value is NaN or infinite
    #[error("Non-finite {field} at key {index}: {value}")]
    NonFinite {
        index: usize,
        field: String,
        value: f64,
    },

    /// Two keys share the same time
    #[error("Duplicate key time {time} at key {index}")]
    DuplicateTime { index: usize, time: f64 },

    /// Keys are not sorted by time
    #[error("Key {index} at time {time} precedes previous key at {previous}")]
    Unordered {
        index: usize,
        time: f64,
        previous: f64,
    },

    /// Tension outside [0, 1]
    #[error("Invalid tension: {tension}")]
    InvalidTension { tension: f64 },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl CurveError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::NonFinite { .. }
            | Self::DuplicateTime { .. }
            | Self::Unordered { .. }
            | Self::InvalidTension { .. } => "validation",
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for CurveError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}
