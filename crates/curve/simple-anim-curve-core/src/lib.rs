//! simple-anim curve core (engine-agnostic)
//!
//! Keyframe curve model and the auto-tangent solver used when authoring float
//! curves: sorted key building from raw samples, tangent and tangent-weight
//! computation, and Hermite evaluation for previewing the result.

pub mod build;
pub mod config;
pub mod curve;
pub mod error;
pub mod key;
pub mod tangent;

// Re-exports for consumers
pub use build::{
    build_auto_cubic_keys, build_auto_keys, build_auto_keys_with, build_auto_linear_keys,
    compute_tangent_weights, try_build_auto_keys,
};
pub use config::CurveConfig;
pub use curve::Curve;
pub use error::CurveError;
pub use key::{AutoInterp, InterpMode, Key, TangentMode, TangentWeightMode};
pub use tangent::{compute_auto_tangents, compute_auto_tangents_with, compute_curve_tangent};

/// Curve result type
pub type Result<T> = core::result::Result<T, CurveError>;
