//! Error types for sequence tooling

use serde::{Deserialize, Serialize};
use simple_anim_curve_core::CurveError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum SequenceError {
    /// Skeleton hierarchy or reference pose is malformed
    #[error("Invalid skeleton: {reason}")]
    InvalidSkeleton { reason: String },

    /// Bone name not present in the skeleton
    #[error("Bone not found: {name}")]
    BoneNotFound { name: String },

    /// A bone track does not have one key per frame
    #[error("Track '{bone}' has {actual} keys, expected {expected}")]
    TrackLengthMismatch {
        bone: String,
        expected: usize,
        actual: usize,
    },

    /// Sequence has no frames to operate on
    #[error("Sequence '{name}' has no keys")]
    EmptySequence { name: String },

    /// Frame index past the last key
    #[error("Frame {frame} is out of range (num keys: {num_keys})")]
    FrameOutOfRange { frame: usize, num_keys: usize },

    /// Frame rate must be positive and finite
    #[error("Invalid frame rate: {frame_rate}")]
    InvalidFrameRate { frame_rate: f32 },

    /// Curve data failed validation
    #[error("Curve '{name}': {source}")]
    Curve { name: String, source: CurveError },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },
}

impl SequenceError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidSkeleton { .. } | Self::BoneNotFound { .. } => "skeleton",
            Self::TrackLengthMismatch { .. }
            | Self::EmptySequence { .. }
            | Self::FrameOutOfRange { .. }
            | Self::InvalidFrameRate { .. } => "sequence",
            Self::Curve { .. } => "curve",
            Self::SerializationError { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for SequenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = SequenceError::BoneNotFound {
            name: "ik_foot_l".to_string(),
        };
        assert_eq!(err.category(), "skeleton");
        assert_eq!(err.to_string(), "Bone not found: ik_foot_l");

        let err = SequenceError::Curve {
            name: "speed".to_string(),
            source: CurveError::InvalidTension { tension: 2.0 },
        };
        assert_eq!(err.category(), "curve");
        assert_eq!(err.to_string(), "Curve 'speed': Invalid tension: 2");
    }

    #[test]
    fn test_serialization() {
        let err = SequenceError::EmptySequence {
            name: "idle".to_string(),
        };
        let serialized = serde_json::to_string(&err).unwrap();
        let deserialized: SequenceError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(err, deserialized);
    }
}
