//! Evaluated skeletal poses.

use serde::{Deserialize, Serialize};

use crate::skeleton::Skeleton;
use crate::transform::Transform;

/// Space a bone transform is read or written in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoseSpace {
    /// Relative to the parent bone.
    Local,
    /// Relative to the skeleton root's space (component space).
    #[default]
    World,
}

/// A full set of local bone transforms bound to its skeleton.
#[derive(Clone, Debug)]
pub struct AnimPose<'a> {
    skeleton: &'a Skeleton,
    local: Vec<Transform>,
}

impl<'a> AnimPose<'a> {
    /// The skeleton's reference pose.
    pub fn reference(skeleton: &'a Skeleton) -> Self {
        Self {
            skeleton,
            local: skeleton.ref_pose().to_vec(),
        }
    }

    /// Wrap local transforms; missing bones fall back to the reference pose.
    pub fn from_local(skeleton: &'a Skeleton, mut local: Vec<Transform>) -> Self {
        let n = skeleton.num_bones();
        if local.len() < n {
            local.extend_from_slice(&skeleton.ref_pose()[local.len()..]);
        }
        local.truncate(n);
        Self { skeleton, local }
    }

    #[inline]
    pub fn skeleton(&self) -> &'a Skeleton {
        self.skeleton
    }

    #[inline]
    pub fn local_transforms(&self) -> &[Transform] {
        &self.local
    }

    pub fn into_local(self) -> Vec<Transform> {
        self.local
    }

    fn world(&self, bone: usize) -> Transform {
        let mut world = self.local[bone];
        let mut current = self.skeleton.parent(bone);
        while let Some(parent) = current {
            world = self.local[parent].compose(&world);
            current = self.skeleton.parent(parent);
        }
        world
    }

    /// Transform of `bone` in `space`, `None` for an out-of-range index.
    pub fn bone_pose(&self, bone: usize, space: PoseSpace) -> Option<Transform> {
        if bone >= self.local.len() {
            return None;
        }
        Some(match space {
            PoseSpace::Local => self.local[bone],
            PoseSpace::World => self.world(bone),
        })
    }

    pub fn bone_pose_by_name(&self, name: &str, space: PoseSpace) -> Option<Transform> {
        self.bone_pose(self.skeleton.find_bone(name)?, space)
    }

    /// Place `bone` at `transform` given in `space`. Children keep their local
    /// transforms and therefore follow. Returns false for an unknown bone.
    pub fn set_bone_pose(&mut self, bone: usize, transform: Transform, space: PoseSpace) -> bool {
        if bone >= self.local.len() {
            return false;
        }
        self.local[bone] = match (space, self.skeleton.parent(bone)) {
            (PoseSpace::Local, _) | (PoseSpace::World, None) => transform,
            (PoseSpace::World, Some(parent)) => transform.relative_to(&self.world(parent)),
        };
        true
    }

    /// All bones in world space, computed parent-first in one pass.
    pub fn world_transforms(&self) -> Vec<Transform> {
        let mut out: Vec<Transform> = Vec::with_capacity(self.local.len());
        for (i, local) in self.local.iter().enumerate() {
            let world = match self.skeleton.parent(i) {
                Some(parent) => out[parent].compose(local),
                None => *local,
            };
            out.push(world);
        }
        out
    }
}

/// True when both poses have the same bone count and every transform is
/// within `tolerance`.
pub fn compare_bone_transforms(a: &[Transform], b: &[Transform], tolerance: f32) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y, tolerance))
}
