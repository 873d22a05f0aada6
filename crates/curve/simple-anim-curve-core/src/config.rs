//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Knobs for tangent solving and key building.
///
/// The defaults reproduce the editor's "auto key" behavior exactly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Damping applied to computed tangents, in [0, 1].
    pub tension: f64,
    /// Clamp auto tangents so segments do not overshoot their neighbors.
    pub clamp_tangents: bool,
    /// Recompute tangent weights once tangents are solved.
    ///
    /// Off by default: weights are derived from the still-flat tangents, which
    /// keeps parity with curves built by the editor.
    pub recompute_weights_after_solve: bool,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            tension: 0.0,
            clamp_tangents: false,
            recompute_weights_after_solve: false,
        }
    }
}

impl CurveConfig {
    pub fn with_tension(mut self, tension: f64) -> Self {
        self.tension = tension;
        self
    }

    pub fn validate(&self) -> Result<(), CurveError> {
        if !self.tension.is_finite() || !(0.0..=1.0).contains(&self.tension) {
            return Err(CurveError::InvalidTension {
                tension: self.tension,
            });
        }
        Ok(())
    }

    pub fn from_json(s: &str) -> Result<Self, CurveError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = CurveConfig::from_json(r#"{"clamp_tangents": true}"#).unwrap();
        assert_eq!(cfg.tension, 0.0);
        assert!(cfg.clamp_tangents);
        assert!(!cfg.recompute_weights_after_solve);
    }

    #[test]
    fn tension_out_of_range_is_rejected() {
        let err = CurveConfig::from_json(r#"{"tension": 1.5}"#).unwrap_err();
        assert_eq!(err, CurveError::InvalidTension { tension: 1.5 });
    }
}
