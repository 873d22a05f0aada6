//! Named float curve: an ordered key sequence plus evaluation.
//!
//! Segment [Ki -> K(i+1)] is interpolated by Ki.interp_mode:
//! - Constant holds Ki.value
//! - Linear blends values
//! - Cubic is a Hermite segment using Ki.leave_tangent and K(i+1).arrive_tangent
//!
//! Tangent weights are carried but not used for sampling.

use serde::{Deserialize, Serialize};

use crate::config::CurveConfig;
use crate::error::CurveError;
use crate::key::{InterpMode, Key};
use crate::tangent::{compute_auto_tangents, compute_auto_tangents_with};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub name: String,
    pub keys: Vec<Key>,
}

impl Curve {
    pub fn new(name: impl Into<String>, keys: Vec<Key>) -> Self {
        Self {
            name: name.into(),
            keys,
        }
    }

    pub fn from_json(s: &str) -> Result<Self, CurveError> {
        let curve: Self = serde_json::from_str(s)?;
        curve.validate()?;
        Ok(curve)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check that every key is finite and times strictly increase.
    pub fn validate(&self) -> Result<(), CurveError> {
        let mut previous: Option<f64> = None;
        for (index, key) in self.keys.iter().enumerate() {
            if !key.time.is_finite() {
                return Err(CurveError::NonFinite {
                    index,
                    field: "time".into(),
                    value: key.time,
                });
            }
            if !key.value.is_finite() {
                return Err(CurveError::NonFinite {
                    index,
                    field: "value".into(),
                    value: key.value,
                });
            }
            if let Some(prev) = previous {
                if key.time == prev {
                    return Err(CurveError::DuplicateTime {
                        index,
                        time: key.time,
                    });
                }
                if key.time < prev {
                    return Err(CurveError::Unordered {
                        index,
                        time: key.time,
                        previous: prev,
                    });
                }
            }
            previous = Some(key.time);
        }
        Ok(())
    }

    /// Recompute auto tangents in place.
    pub fn auto_set_tangents(&mut self, tension: f64) {
        compute_auto_tangents(&mut self.keys, tension);
    }

    pub fn auto_set_tangents_with(&mut self, config: &CurveConfig) {
        compute_auto_tangents_with(&mut self.keys, config);
    }

    /// Sample the curve at `time`. Outside the key range the end values are
    /// held. Returns `None` for an empty curve or a NaN time.
    pub fn evaluate(&self, time: f64) -> Option<f64> {
        if time.is_nan() {
            return None;
        }
        let first = self.keys.first()?;
        let last = self.keys.last()?;
        if time <= first.time {
            return Some(first.value);
        }
        if time >= last.time {
            return Some(last.value);
        }

        // First key strictly after `time`. Unordered keys can push this to
        // either end, so keep a valid segment.
        let hi = self
            .keys
            .partition_point(|k| k.time <= time)
            .clamp(1, self.keys.len() - 1);
        let k0 = &self.keys[hi - 1];
        let k1 = &self.keys[hi];
        Some(evaluate_segment(k0, k1, time))
    }
}

fn evaluate_segment(k0: &Key, k1: &Key, time: f64) -> f64 {
    let dt = k1.time - k0.time;
    if dt <= 0.0 {
        return k0.value;
    }
    let t = (time - k0.time) / dt;
    match k0.interp_mode {
        InterpMode::Constant => k0.value,
        InterpMode::Linear => k0.value + (k1.value - k0.value) * t,
        InterpMode::Cubic => hermite(
            k0.value,
            k0.leave_tangent * dt,
            k1.value,
            k1.arrive_tangent * dt,
            t,
        ),
    }
}

#[inline]
fn hermite(p0: f64, m0: f64, p1: f64, m1: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    (2.0 * t3 - 3.0 * t2 + 1.0) * p0
        + (t3 - 2.0 * t2 + t) * m0
        + (-2.0 * t3 + 3.0 * t2) * p1
        + (t3 - t2) * m1
}
