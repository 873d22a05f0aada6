//! Auto-tangent solver.
//!
//! Tangents are slopes in value-per-second. Interior auto keys get a
//! three-point estimate where each neighboring secant is weighted by the
//! duration of the opposite segment, so the shorter side dominates:
//!
//! ```text
//! tangent = (1 - tension) * (d2 * s1 + d1 * s2) / (d1 + d2)
//! ```
//!
//! First and last keys are flattened on their open side. Keys touching a
//! constant segment are flattened on that side.

use log::debug;

use crate::config::CurveConfig;
use crate::key::{InterpMode, Key};

/// Stand-in for zero or negative time deltas (duplicate or unordered keys).
const MIN_TIME_DELTA: f64 = 1e-4;

/// Fraction of the neighbor-to-neighbor rise within which clamping kicks in.
const CLAMP_THRESHOLD: f64 = 0.333;

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

// Positive deltas are used as-is, however small. NaN falls through.
#[inline]
fn guard_delta(dt: f64) -> f64 {
    if dt <= 0.0 {
        MIN_TIME_DELTA
    } else {
        dt
    }
}

/// Compute the tangent at `cur` given its neighbors, each as `(time, value)`.
///
/// `tension` scales the result by `1 - tension`. With `clamp` set the result
/// is limited so the curve cannot overshoot the three values: a local
/// extremum gets a flat tangent, and a middle value close to one neighbor
/// pulls the tangent toward the secant on that side.
pub fn compute_curve_tangent(
    prev: (f64, f64),
    cur: (f64, f64),
    next: (f64, f64),
    tension: f64,
    clamp: bool,
) -> f64 {
    let d1 = guard_delta(cur.0 - prev.0);
    let d2 = guard_delta(next.0 - cur.0);
    let s1 = (cur.1 - prev.1) / d1;
    let s2 = (next.1 - cur.1) / d2;

    let tangent = (1.0 - tension) * (d2 * s1 + d1 * s2) / (d1 + d2);
    if clamp {
        clamp_tangent(tangent, prev.1, cur.1, next.1, s1, s2)
    } else {
        tangent
    }
}

fn clamp_tangent(tangent: f64, v0: f64, v1: f64, v2: f64, s1: f64, s2: f64) -> f64 {
    let rise_in = v1 - v0;
    let rise_out = v2 - v1;

    // Crest, trough or plateau: any slope would overshoot.
    if (rise_in >= 0.0 && rise_out <= 0.0) || (rise_in <= 0.0 && rise_out >= 0.0) {
        return 0.0;
    }

    // Strictly monotonic here, so v2 != v0.
    let alpha = rise_in / (v2 - v0);
    if alpha < CLAMP_THRESHOLD {
        lerp(tangent, s1, 1.0 - alpha / CLAMP_THRESHOLD)
    } else if alpha > 1.0 - CLAMP_THRESHOLD {
        lerp(tangent, s2, (alpha - (1.0 - CLAMP_THRESHOLD)) / CLAMP_THRESHOLD)
    } else {
        tangent
    }
}

/// Recompute tangents for every auto key of an ordered sequence, in place.
///
/// Keys that are not auto/cubic keep their authored tangents unless they
/// border a constant segment.
pub fn compute_auto_tangents(keys: &mut [Key], tension: f64) {
    solve(keys, tension, false);
}

/// [`compute_auto_tangents`] driven by a [`CurveConfig`].
pub fn compute_auto_tangents_with(keys: &mut [Key], config: &CurveConfig) {
    solve(keys, config.tension, config.clamp_tangents);
}

fn solve(keys: &mut [Key], tension: f64, clamp: bool) {
    let n = keys.len();
    let mut solved = 0usize;

    for i in 0..n {
        let key = keys[i];
        let mut arrive = key.arrive_tangent;
        let mut leave = key.leave_tangent;

        if i == 0 {
            if n > 1 && key.is_auto_cubic() {
                leave = 0.0;
            }
        } else if i == n - 1 {
            if key.is_auto_cubic() {
                arrive = 0.0;
            }
        } else {
            let prev = keys[i - 1];
            if key.is_auto_cubic() {
                let next = keys[i + 1];
                let tangent = compute_curve_tangent(
                    (prev.time, prev.value),
                    (key.time, key.value),
                    (next.time, next.value),
                    tension,
                    clamp,
                );
                // Auto tangents are continuous through the key.
                arrive = tangent;
                leave = tangent;
                solved += 1;
            } else if prev.interp_mode == InterpMode::Constant
                || key.interp_mode == InterpMode::Constant
            {
                leave = 0.0;
                if prev.interp_mode != InterpMode::Cubic {
                    arrive = 0.0;
                }
            }
        }

        keys[i].arrive_tangent = arrive;
        keys[i].leave_tangent = leave;
    }

    debug!(
        "auto tangents: {} keys, {} interior solved (tension={}, clamp={})",
        n, solved, tension, clamp
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::TangentMode;

    fn cubic(time: f64, value: f64) -> Key {
        Key::new(time, value).with_interp(InterpMode::Cubic)
    }

    #[test]
    fn uniform_spacing_is_central_difference() {
        let t = compute_curve_tangent((0.0, 0.0), (1.0, 1.0), (2.0, 4.0), 0.0, false);
        assert!((t - 2.0).abs() < 1e-12);
    }

    #[test]
    fn shorter_segment_dominates() {
        // Secants: 1.0 over 1s, then 10.0 over 0.1s.
        let t = compute_curve_tangent((0.0, 0.0), (1.0, 1.0), (1.1, 2.0), 0.0, false);
        let expected = (0.1 * 1.0 + 1.0 * 10.0) / 1.1;
        assert!((t - expected).abs() < 1e-9);
    }

    #[test]
    fn clamp_flattens_extremum() {
        let t = compute_curve_tangent((0.0, 0.0), (1.0, 2.0), (3.0, 1.0), 0.0, true);
        assert_eq!(t, 0.0);
    }

    #[test]
    fn clamp_leaves_even_slopes_alone() {
        let t = compute_curve_tangent((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), 0.0, true);
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clamp_pulls_toward_near_side_secant() {
        // Middle value sits 10% of the way up: tangent eases toward the shallow secant.
        let unclamped = compute_curve_tangent((0.0, 0.0), (1.0, 0.1), (2.0, 1.0), 0.0, false);
        let clamped = compute_curve_tangent((0.0, 0.0), (1.0, 0.1), (2.0, 1.0), 0.0, true);
        assert!(clamped < unclamped);
        assert!(clamped >= 0.1);
    }

    #[test]
    fn sub_millisecond_spacing_uses_raw_deltas() {
        let t = compute_curve_tangent((0.0, 0.0), (5e-5, 1.0), (1.0, 1.0), 0.0, false);
        let (d1, d2) = (5e-5, 1.0 - 5e-5);
        let expected = (d2 * (1.0 / d1) + d1 * 0.0) / (d1 + d2);
        assert!((t - expected).abs() < 1e-6, "{t} vs {expected}");
        assert!((t - 19999.0).abs() < 1e-6);
    }

    #[test]
    fn duplicate_times_stay_finite() {
        let t = compute_curve_tangent((0.0, 0.0), (0.0, 1.0), (1.0, 2.0), 0.0, false);
        assert!(t.is_finite());
    }

    #[test]
    fn single_key_is_untouched() {
        let mut keys = vec![cubic(0.0, 1.0).with_tangents(3.0, 4.0)];
        compute_auto_tangents(&mut keys, 0.0);
        assert_eq!(keys[0].arrive_tangent, 3.0);
        assert_eq!(keys[0].leave_tangent, 4.0);
    }

    #[test]
    fn user_tangents_survive_next_to_linear_keys() {
        let mut keys = vec![
            Key::new(0.0, 0.0),
            Key::new(1.0, 1.0)
                .with_tangent_mode(TangentMode::User)
                .with_tangents(0.5, 0.7),
            Key::new(2.0, 0.0),
        ];
        compute_auto_tangents(&mut keys, 0.0);
        assert_eq!(keys[1].arrive_tangent, 0.5);
        assert_eq!(keys[1].leave_tangent, 0.7);
    }
}
