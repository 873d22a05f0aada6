//! Animation sequence asset: per-bone local tracks sampled at a fixed rate,
//! float curves, notifies, modifiers and the editor-facing flags.
//!
//! Tracks hold one local transform per key. Bones without a track evaluate to
//! their reference pose. With `force_root_lock` set the root bone always
//! evaluates to its reference pose.

use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};

use simple_anim_curve_core::{build_auto_keys, compute_auto_tangents, AutoInterp, Curve};

use crate::error::SequenceError;
use crate::modifier::AnimModifier;
use crate::pose::{compare_bone_transforms, AnimPose};
use crate::skeleton::Skeleton;
use crate::transform::Transform;

/// Named event marker on the sequence timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notify {
    pub name: String,
    /// Seconds from the start of the sequence.
    pub time: f32,
}

fn default_frame_rate() -> f32 {
    30.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimSequence {
    pub name: String,
    pub skeleton: Skeleton,
    /// Number of sampled keys per track.
    pub num_keys: usize,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    /// Local-space bone tracks keyed by bone name.
    #[serde(default)]
    pub tracks: HashMap<String, Vec<Transform>>,
    #[serde(default)]
    pub force_root_lock: bool,
    #[serde(default)]
    pub enable_root_motion: bool,
    /// Name of the curve compression settings asset, if any.
    #[serde(default)]
    pub curve_compression: Option<String>,
    #[serde(default)]
    pub curves: Vec<Curve>,
    #[serde(default)]
    pub notifies: Vec<Notify>,
    #[serde(default)]
    pub modifiers: Vec<AnimModifier>,
    /// Asset path of the preview skeletal mesh.
    #[serde(default)]
    pub preview_mesh: Option<String>,
    /// Set by any edit that needs saving.
    #[serde(skip)]
    pub dirty: bool,
}

impl AnimSequence {
    /// An untracked sequence: every bone sits at its reference pose.
    pub fn new(name: impl Into<String>, skeleton: Skeleton, num_keys: usize, frame_rate: f32) -> Self {
        Self {
            name: name.into(),
            skeleton,
            num_keys,
            frame_rate,
            tracks: HashMap::new(),
            force_root_lock: false,
            enable_root_motion: false,
            curve_compression: None,
            curves: Vec::new(),
            notifies: Vec::new(),
            modifiers: Vec::new(),
            preview_mesh: None,
            dirty: false,
        }
    }

    pub fn from_json(s: &str) -> Result<Self, SequenceError> {
        let seq: Self = serde_json::from_str(s)?;
        seq.validate()?;
        Ok(seq)
    }

    /// Check frame rate, track bone names, track lengths and curve keys.
    pub fn validate(&self) -> Result<(), SequenceError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(SequenceError::InvalidFrameRate {
                frame_rate: self.frame_rate,
            });
        }
        for (bone, keys) in &self.tracks {
            if self.skeleton.find_bone(bone).is_none() {
                return Err(SequenceError::BoneNotFound { name: bone.clone() });
            }
            if keys.len() != self.num_keys {
                return Err(SequenceError::TrackLengthMismatch {
                    bone: bone.clone(),
                    expected: self.num_keys,
                    actual: keys.len(),
                });
            }
        }
        for curve in &self.curves {
            curve.validate().map_err(|source| SequenceError::Curve {
                name: curve.name.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Length in seconds; a single key has zero length.
    #[inline]
    pub fn play_length(&self) -> f32 {
        if self.num_keys > 1 {
            (self.num_keys - 1) as f32 / self.frame_rate
        } else {
            0.0
        }
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn track(&self, bone: &str) -> Option<&[Transform]> {
        self.tracks.get(bone).map(|t| t.as_slice())
    }

    fn local_at_frame(&self, bone: usize, frame: usize) -> Transform {
        let ref_pose = self.skeleton.ref_pose()[bone];
        if bone == 0 && self.force_root_lock {
            return ref_pose;
        }
        self.skeleton
            .bone_name(bone)
            .and_then(|name| self.tracks.get(name))
            .and_then(|keys| keys.get(frame.min(keys.len().saturating_sub(1))))
            .copied()
            .unwrap_or(ref_pose)
    }

    /// Pose at key `frame` (clamped to the last key).
    pub fn pose_at_frame(&self, frame: usize) -> AnimPose<'_> {
        let local = (0..self.skeleton.num_bones())
            .map(|bone| self.local_at_frame(bone, frame))
            .collect();
        AnimPose::from_local(&self.skeleton, local)
    }

    /// Pose at `time` seconds, blending linearly between neighboring keys.
    pub fn pose_at_time(&self, time: f32) -> AnimPose<'_> {
        let (f0, f1, alpha) = self.frame_span(time);
        let local = (0..self.skeleton.num_bones())
            .map(|bone| {
                let a = self.local_at_frame(bone, f0);
                let b = self.local_at_frame(bone, f1);
                a.lerp(&b, alpha)
            })
            .collect();
        AnimPose::from_local(&self.skeleton, local)
    }

    /// Local transform of a single bone at `time`: its track if it has one,
    /// else its reference pose, else identity for an unknown bone.
    pub fn bone_pose_at_time(&self, bone_name: &str, time: f32) -> Transform {
        match self.skeleton.find_bone(bone_name) {
            Some(bone) => {
                let (f0, f1, alpha) = self.frame_span(time);
                self.local_at_frame(bone, f0)
                    .lerp(&self.local_at_frame(bone, f1), alpha)
            }
            None => Transform::IDENTITY,
        }
    }

    fn frame_span(&self, time: f32) -> (usize, usize, f32) {
        if self.num_keys <= 1 || !time.is_finite() {
            return (0, 0, 0.0);
        }
        let last = (self.num_keys - 1) as f32;
        let pos = (time * self.frame_rate).clamp(0.0, last);
        let f0 = pos.floor() as usize;
        let f1 = (f0 + 1).min(self.num_keys - 1);
        (f0, f1, pos - f0 as f32)
    }

    /// Overwrite one key of a bone track. A missing track is created from the
    /// bone's reference pose first; an existing track must hold one key per
    /// frame.
    pub fn set_track_key(
        &mut self,
        bone_name: &str,
        frame: usize,
        transform: Transform,
    ) -> Result<(), SequenceError> {
        let bone = self
            .skeleton
            .find_bone(bone_name)
            .ok_or_else(|| SequenceError::BoneNotFound {
                name: bone_name.to_string(),
            })?;
        if frame >= self.num_keys {
            return Err(SequenceError::FrameOutOfRange {
                frame,
                num_keys: self.num_keys,
            });
        }
        let ref_pose = self.skeleton.ref_pose()[bone];
        let num_keys = self.num_keys;
        let track = self
            .tracks
            .entry(bone_name.to_string())
            .or_insert_with(|| vec![ref_pose; num_keys]);
        if track.len() != num_keys {
            return Err(SequenceError::TrackLengthMismatch {
                bone: bone_name.to_string(),
                expected: num_keys,
                actual: track.len(),
            });
        }
        track[frame] = transform;
        self.dirty = true;
        Ok(())
    }

    /// Add (or replace) a float curve built from raw samples with auto tangents.
    /// Returns the number of keys; fewer than two samples yields an empty curve.
    pub fn add_auto_curve<I>(&mut self, name: &str, samples: I, mode: AutoInterp) -> usize
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let keys = build_auto_keys(samples, mode);
        let count = keys.len();
        match self.curves.iter_mut().find(|c| c.name == name) {
            Some(curve) => curve.keys = keys,
            None => self.curves.push(Curve::new(name, keys)),
        }
        self.dirty = true;
        debug!("{}: curve '{}' set with {} keys", self.name, name, count);
        count
    }

    /// Re-solve auto tangents on every float curve.
    pub fn refresh_curve_tangents(&mut self, tension: f64) {
        for curve in &mut self.curves {
            compute_auto_tangents(&mut curve.keys, tension);
        }
        if !self.curves.is_empty() {
            self.dirty = true;
        }
    }

    /// Whether the first and last poses match within `threshold`.
    ///
    /// Root motion is usually ignored since a moving cycle never returns to
    /// its start. Ignoring the pelvis helps when root motion was authored on
    /// it by mistake.
    pub fn is_looping(&self, threshold: f32, ignore_root_motion: bool, ignore_pelvis: bool) -> bool {
        let mut first = self.pose_at_time(0.0).into_local();
        let mut last = self.pose_at_time(self.play_length()).into_local();
        if ignore_root_motion && !first.is_empty() {
            first.remove(0);
            last.remove(0);
        }
        if ignore_pelvis {
            let pelvis = if ignore_root_motion { 0 } else { 1 };
            if pelvis < first.len() {
                first.remove(pelvis);
                last.remove(pelvis);
            }
        }
        compare_bone_transforms(&first, &last, threshold)
    }
}

/// [`AnimSequence::is_looping`] with the usual defaults: threshold 5, root
/// motion ignored, pelvis compared.
pub fn is_looping_animation(sequence: &AnimSequence) -> bool {
    sequence.is_looping(5.0, true, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::Bone;

    fn skeleton() -> Skeleton {
        Skeleton::new(
            vec![Bone::new("root", None), Bone::new("pelvis", Some(0))],
            vec![
                Transform::IDENTITY,
                Transform::from_translation([0.0, 0.0, 90.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn play_length_counts_intervals() {
        let seq = AnimSequence::new("walk", skeleton(), 31, 30.0);
        assert!((seq.play_length() - 1.0).abs() < 1e-6);
        assert_eq!(AnimSequence::new("pose", skeleton(), 1, 30.0).play_length(), 0.0);
    }

    #[test]
    fn untracked_bones_use_reference_pose() {
        let seq = AnimSequence::new("idle", skeleton(), 2, 30.0);
        assert_eq!(seq.bone_pose_at_time("pelvis", 0.01).translation, [0.0, 0.0, 90.0]);
        assert_eq!(seq.bone_pose_at_time("missing", 0.0), Transform::IDENTITY);
    }

    #[test]
    fn root_lock_pins_root_to_reference() {
        let mut seq = AnimSequence::new("run", skeleton(), 2, 30.0);
        seq.set_track_key("root", 1, Transform::from_translation([50.0, 0.0, 0.0]))
            .unwrap();
        let moved = seq.pose_at_frame(1).bone_pose(0, crate::pose::PoseSpace::Local).unwrap();
        assert_eq!(moved.translation[0], 50.0);

        seq.force_root_lock = true;
        let locked = seq.pose_at_frame(1).bone_pose(0, crate::pose::PoseSpace::Local).unwrap();
        assert_eq!(locked, Transform::IDENTITY);
    }

    #[test]
    fn set_track_key_rejects_bad_frames() {
        let mut seq = AnimSequence::new("run", skeleton(), 2, 30.0);
        let err = seq.set_track_key("pelvis", 2, Transform::IDENTITY).unwrap_err();
        assert_eq!(err, SequenceError::FrameOutOfRange { frame: 2, num_keys: 2 });
        assert!(!seq.dirty);
    }

    #[test]
    fn short_track_is_rejected() {
        let mut seq = AnimSequence::new("run", skeleton(), 3, 30.0);
        seq.tracks.insert("pelvis".into(), vec![Transform::IDENTITY]);
        let err = seq.set_track_key("pelvis", 2, Transform::IDENTITY).unwrap_err();
        assert_eq!(
            err,
            SequenceError::TrackLengthMismatch {
                bone: "pelvis".into(),
                expected: 3,
                actual: 1,
            }
        );
        assert!(!seq.dirty);
    }

    #[test]
    fn auto_curve_replaces_by_name() {
        let mut seq = AnimSequence::new("run", skeleton(), 2, 30.0);
        assert_eq!(seq.add_auto_curve("speed", [(0.0, 0.0), (1.0, 1.0)], AutoInterp::Cubic), 2);
        assert_eq!(seq.add_auto_curve("speed", [(0.0, 1.0)], AutoInterp::Cubic), 0);
        assert_eq!(seq.curves.len(), 1);
        assert!(seq.curves[0].keys.is_empty());
    }
}
