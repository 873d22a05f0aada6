//! Animation modifiers: batch edits applied to a sequence's bone tracks.

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::error::SequenceError;
use crate::pose::PoseSpace;
use crate::sequence::AnimSequence;
use crate::transform::Transform;

/// Copy the pose of `source_bone` onto `target_bone`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyBonePair {
    pub source_bone: String,
    pub target_bone: String,
}

impl CopyBonePair {
    pub fn new(source_bone: impl Into<String>, target_bone: impl Into<String>) -> Self {
        Self {
            source_bone: source_bone.into(),
            target_bone: target_bone.into(),
        }
    }
}

/// Bakes source bone poses into target bones on every frame. The defaults
/// target the usual IK bone set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyBonesModifier {
    pub bones_to_copy: Vec<CopyBonePair>,
    pub bone_pose_space: PoseSpace,
}

impl Default for CopyBonesModifier {
    fn default() -> Self {
        Self {
            bones_to_copy: vec![
                CopyBonePair::new("hand_r", "ik_hand_gun"),
                CopyBonePair::new("hand_r", "ik_hand_r"),
                CopyBonePair::new("hand_l", "ik_hand_l"),
                CopyBonePair::new("foot_r", "ik_foot_r"),
                CopyBonePair::new("foot_l", "ik_foot_l"),
            ],
            bone_pose_space: PoseSpace::World,
        }
    }
}

struct ResolvedPair<'a> {
    source: usize,
    target: usize,
    target_name: &'a str,
}

impl CopyBonesModifier {
    /// Write the copied poses into `sequence`'s target tracks.
    ///
    /// Unknown bones are skipped. Targets are processed parent-first so a
    /// child target sees its parent's copied pose. Root lock is forced while
    /// sampling and restored afterwards.
    pub fn apply(&self, sequence: &mut AnimSequence) -> Result<(), SequenceError> {
        if sequence.num_keys == 0 {
            error!("CopyBonesModifier: '{}' has no keys", sequence.name);
            return Err(SequenceError::EmptySequence {
                name: sequence.name.clone(),
            });
        }

        let mut pairs: Vec<ResolvedPair<'_>> = Vec::with_capacity(self.bones_to_copy.len());
        for pair in &self.bones_to_copy {
            let source = sequence.skeleton.find_bone(&pair.source_bone);
            let target = sequence.skeleton.find_bone(&pair.target_bone);
            match (source, target) {
                (Some(source), Some(target)) => pairs.push(ResolvedPair {
                    source,
                    target,
                    target_name: &pair.target_bone,
                }),
                _ => warn!(
                    "CopyBonesModifier: skipping {} -> {} on '{}': bone not found",
                    pair.source_bone, pair.target_bone, sequence.name
                ),
            }
        }
        if pairs.is_empty() {
            return Ok(());
        }
        pairs.sort_by_key(|p| p.target);

        let root_lock = sequence.force_root_lock;
        sequence.force_root_lock = true;
        let result = self.copy_frames(sequence, &pairs);
        sequence.force_root_lock = root_lock;

        if result.is_ok() {
            debug!(
                "CopyBonesModifier: copied {} bone pairs over {} keys on '{}'",
                pairs.len(),
                sequence.num_keys,
                sequence.name
            );
        }
        result
    }

    fn copy_frames(
        &self,
        sequence: &mut AnimSequence,
        pairs: &[ResolvedPair<'_>],
    ) -> Result<(), SequenceError> {
        let space = self.bone_pose_space;
        let mut writes: Vec<Transform> = Vec::with_capacity(pairs.len());
        for frame in 0..sequence.num_keys {
            writes.clear();
            {
                let mut pose = sequence.pose_at_frame(frame);
                for pair in pairs {
                    let source = pose
                        .bone_pose(pair.source, space)
                        .unwrap_or(Transform::IDENTITY);
                    pose.set_bone_pose(pair.target, source, space);
                    writes.push(
                        pose.bone_pose(pair.target, PoseSpace::Local)
                            .unwrap_or(Transform::IDENTITY),
                    );
                }
            }
            for (pair, local) in pairs.iter().zip(&writes) {
                sequence.set_track_key(pair.target_name, frame, *local)?;
            }
        }
        Ok(())
    }

    /// Baked tracks are left in place.
    pub fn revert(&self, _sequence: &mut AnimSequence) -> Result<(), SequenceError> {
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKind {
    CopyBones,
}

/// Modifier instance stored on a sequence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimModifier {
    CopyBones(CopyBonesModifier),
}

impl AnimModifier {
    #[inline]
    pub fn kind(&self) -> ModifierKind {
        match self {
            Self::CopyBones(_) => ModifierKind::CopyBones,
        }
    }

    pub fn apply(&self, sequence: &mut AnimSequence) -> Result<(), SequenceError> {
        match self {
            Self::CopyBones(m) => m.apply(sequence),
        }
    }

    pub fn revert(&self, sequence: &mut AnimSequence) -> Result<(), SequenceError> {
        match self {
            Self::CopyBones(m) => m.revert(sequence),
        }
    }
}

impl From<CopyBonesModifier> for AnimModifier {
    fn from(m: CopyBonesModifier) -> Self {
        Self::CopyBones(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::{Bone, Skeleton};

    fn rig() -> Skeleton {
        Skeleton::new(
            vec![
                Bone::new("root", None),
                Bone::new("hand_r", Some(0)),
                Bone::new("ik_hand_root", Some(0)),
                Bone::new("ik_hand_r", Some(2)),
            ],
            vec![
                Transform::IDENTITY,
                Transform::from_translation([10.0, 0.0, 0.0]),
                Transform::from_translation([0.0, 0.0, 5.0]),
                Transform::IDENTITY,
            ],
        )
        .unwrap()
    }

    fn modifier() -> CopyBonesModifier {
        CopyBonesModifier {
            bones_to_copy: vec![CopyBonePair::new("hand_r", "ik_hand_r")],
            bone_pose_space: PoseSpace::World,
        }
    }

    #[test]
    fn default_pairs_target_ik_bones() {
        let m = CopyBonesModifier::default();
        assert_eq!(m.bones_to_copy.len(), 5);
        assert_eq!(m.bones_to_copy[0], CopyBonePair::new("hand_r", "ik_hand_gun"));
        assert_eq!(m.bone_pose_space, PoseSpace::World);
    }

    #[test]
    fn copies_world_pose_into_local_target_track() {
        let mut seq = AnimSequence::new("aim", rig(), 2, 30.0);
        seq.set_track_key("hand_r", 1, Transform::from_translation([20.0, 0.0, 0.0]))
            .unwrap();

        modifier().apply(&mut seq).unwrap();

        let track = seq.track("ik_hand_r").unwrap();
        assert_eq!(track[0].translation, [10.0, 0.0, -5.0]);
        assert_eq!(track[1].translation, [20.0, 0.0, -5.0]);
        assert!(!seq.force_root_lock);
        assert!(seq.dirty);
    }

    #[test]
    fn unknown_bones_are_skipped() {
        let mut seq = AnimSequence::new("aim", rig(), 2, 30.0);
        let m = CopyBonesModifier::default();
        m.apply(&mut seq).unwrap();
        assert!(seq.track("ik_hand_gun").is_none());
        assert!(seq.track("ik_hand_r").is_some());
    }

    #[test]
    fn short_target_track_is_an_error() {
        let mut seq = AnimSequence::new("aim", rig(), 3, 30.0);
        seq.tracks.insert("ik_hand_r".into(), vec![Transform::IDENTITY]);
        let err = modifier().apply(&mut seq).unwrap_err();
        assert!(matches!(
            err,
            SequenceError::TrackLengthMismatch { expected: 3, actual: 1, .. }
        ));
        assert!(!seq.force_root_lock);
    }

    #[test]
    fn empty_sequence_is_an_error() {
        let mut seq = AnimSequence::new("empty", rig(), 0, 30.0);
        let err = modifier().apply(&mut seq).unwrap_err();
        assert_eq!(err.category(), "sequence");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let m: AnimModifier = modifier().into();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["kind"], "copy_bones");
        let back: AnimModifier = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), ModifierKind::CopyBones);
    }
}
