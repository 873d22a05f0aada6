//! Build auto-tangent key sequences from raw `(time, value)` samples.
//!
//! Mirrors the editor's "auto cubic" / "auto linear" key shortcuts: samples
//! are sorted by time, weights are derived, then tangents are solved.
//!
//! Note the ordering: weights are computed before tangents are solved, so by
//! default they reflect flat tangents (`dx / 3`). Set
//! [`CurveConfig::recompute_weights_after_solve`] to derive them from the
//! solved tangents instead.

use log::debug;

use crate::config::CurveConfig;
use crate::error::CurveError;
use crate::key::{AutoInterp, InterpMode, Key, TangentMode, TangentWeightMode};
use crate::tangent::compute_auto_tangents_with;

const ONE_THIRD: f64 = 1.0 / 3.0;

/// Length of a Bezier handle spanning a third of `dx` along `tangent`.
#[inline]
fn handle_weight(dx: f64, tangent: f64) -> f64 {
    let dy = tangent * dx;
    (dx * dx + dy * dy).sqrt() * ONE_THIRD
}

/// Derive arrive/leave tangent weights from the current tangents.
///
/// The first key gets no arrive weight and the last no leave weight.
pub fn compute_tangent_weights(keys: &mut [Key]) {
    let n = keys.len();
    for i in 0..n {
        if i > 0 {
            let dx = keys[i].time - keys[i - 1].time;
            keys[i].arrive_tangent_weight = handle_weight(dx, keys[i].arrive_tangent);
        }
        if i + 1 < n {
            let dx = keys[i + 1].time - keys[i].time;
            keys[i].leave_tangent_weight = handle_weight(dx, keys[i].leave_tangent);
        }
    }
}

/// Build an ordered, auto-tangent key sequence from unordered samples.
///
/// Returns an empty sequence when fewer than two samples are supplied. Inputs
/// are not validated; use [`try_build_auto_keys`] for checked input.
pub fn build_auto_keys<I>(samples: I, mode: AutoInterp) -> Vec<Key>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    build_auto_keys_with(samples, mode, &CurveConfig::default())
}

/// Same as pressing "auto cubic" on the selected keys.
pub fn build_auto_cubic_keys<I>(samples: I) -> Vec<Key>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    build_auto_keys(samples, AutoInterp::Cubic)
}

/// Same as pressing "auto linear" on the selected keys.
pub fn build_auto_linear_keys<I>(samples: I) -> Vec<Key>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    build_auto_keys(samples, AutoInterp::Linear)
}

/// [`build_auto_keys`] with explicit solver settings.
pub fn build_auto_keys_with<I>(samples: I, mode: AutoInterp, config: &CurveConfig) -> Vec<Key>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut samples: Vec<(f64, f64)> = samples.into_iter().collect();
    if samples.len() <= 1 {
        debug!("auto keys: {} sample(s), nothing to build", samples.len());
        return Vec::new();
    }
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    let interp_mode = InterpMode::from(mode);
    let mut keys: Vec<Key> = samples
        .into_iter()
        .map(|(time, value)| Key {
            time,
            value,
            interp_mode,
            tangent_mode: TangentMode::Auto,
            tangent_weight_mode: TangentWeightMode::WeightedNone,
            ..Key::default()
        })
        .collect();

    compute_tangent_weights(&mut keys);
    compute_auto_tangents_with(&mut keys, config);
    if config.recompute_weights_after_solve {
        compute_tangent_weights(&mut keys);
    }

    debug!("auto keys: built {} {:?} keys", keys.len(), interp_mode);
    keys
}

/// Checked variant of [`build_auto_keys_with`].
///
/// Rejects non-finite times or values, duplicate times and out-of-range
/// tension. Fewer than two samples still yields an empty sequence.
pub fn try_build_auto_keys<I>(
    samples: I,
    mode: AutoInterp,
    config: &CurveConfig,
) -> Result<Vec<Key>, CurveError>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    config.validate()?;

    let mut samples: Vec<(f64, f64)> = samples.into_iter().collect();
    for (index, &(time, value)) in samples.iter().enumerate() {
        if !time.is_finite() {
            return Err(CurveError::NonFinite {
                index,
                field: "time".into(),
                value: time,
            });
        }
        if !value.is_finite() {
            return Err(CurveError::NonFinite {
                index,
                field: "value".into(),
                value,
            });
        }
    }

    samples.sort_by(|a, b| a.0.total_cmp(&b.0));
    if let Some(index) = samples.windows(2).position(|w| w[0].0 == w[1].0) {
        return Err(CurveError::DuplicateTime {
            index: index + 1,
            time: samples[index].0,
        });
    }

    Ok(build_auto_keys_with(samples, mode, config))
}
