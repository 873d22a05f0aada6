//! Curve key model.

use serde::{Deserialize, Serialize};

/// How the segment leaving a key is interpolated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpMode {
    /// Hold the key's value until the next key.
    Constant,
    #[default]
    Linear,
    /// Hermite segment driven by the leave/arrive tangents.
    Cubic,
}

/// Interpolation modes accepted when building keys from raw samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoInterp {
    Linear,
    Cubic,
}

impl From<AutoInterp> for InterpMode {
    #[inline]
    fn from(mode: AutoInterp) -> Self {
        match mode {
            AutoInterp::Linear => InterpMode::Linear,
            AutoInterp::Cubic => InterpMode::Cubic,
        }
    }
}

/// How a key's tangents are authored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TangentMode {
    /// Computed from neighboring keys.
    #[default]
    Auto,
    /// Authored, arrive and leave locked together.
    User,
    /// Authored, arrive and leave independent.
    Break,
}

/// Which tangent handles carry an explicit weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TangentWeightMode {
    #[default]
    WeightedNone,
    WeightedArrive,
    WeightedLeave,
    WeightedBoth,
}

/// A single key on a 1-D curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Key {
    pub time: f64,
    pub value: f64,
    #[serde(default)]
    pub interp_mode: InterpMode,
    #[serde(default)]
    pub tangent_mode: TangentMode,
    #[serde(default)]
    pub tangent_weight_mode: TangentWeightMode,
    #[serde(default)]
    pub arrive_tangent: f64,
    #[serde(default)]
    pub leave_tangent: f64,
    #[serde(default)]
    pub arrive_tangent_weight: f64,
    #[serde(default)]
    pub leave_tangent_weight: f64,
}

impl Default for Key {
    fn default() -> Self {
        Self {
            time: 0.0,
            value: 0.0,
            interp_mode: InterpMode::default(),
            tangent_mode: TangentMode::default(),
            tangent_weight_mode: TangentWeightMode::default(),
            arrive_tangent: 0.0,
            leave_tangent: 0.0,
            arrive_tangent_weight: 0.0,
            leave_tangent_weight: 0.0,
        }
    }
}

impl Key {
    /// Create a linear, auto-tangent key with flat tangents.
    #[inline]
    pub fn new(time: f64, value: f64) -> Self {
        Self {
            time,
            value,
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_interp(mut self, interp_mode: InterpMode) -> Self {
        self.interp_mode = interp_mode;
        self
    }

    #[inline]
    pub fn with_tangent_mode(mut self, tangent_mode: TangentMode) -> Self {
        self.tangent_mode = tangent_mode;
        self
    }

    /// Set both tangents at once.
    #[inline]
    pub fn with_tangents(mut self, arrive: f64, leave: f64) -> Self {
        self.arrive_tangent = arrive;
        self.leave_tangent = leave;
        self
    }

    /// True when the solver owns this key's tangents on a cubic segment.
    #[inline]
    pub fn is_auto_cubic(&self) -> bool {
        self.interp_mode == InterpMode::Cubic && self.tangent_mode == TangentMode::Auto
    }
}
